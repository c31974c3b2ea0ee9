//! Seabed Types - Level 1 Foundation Types
//!
//! Pure data structures for the marine-exploration dataset served by the
//! exploration REST API: contractors and their licence areas, research cruises,
//! stations, samples, media, and library documents.
//!
//! ## Architecture Level: LEVEL 1 (Foundation)
//!
//! The explorer crate depends on this crate; this crate depends on nothing in
//! the workspace.
//!
//! ## Wire schema
//!
//! The API speaks camelCase JSON, but some endpoints have historically emitted
//! PascalCase keys. The schema is fixed here, once, with `rename_all` and
//! `alias` attributes. Nothing downstream probes key casing at runtime.
//!
//! ## Critical Rules
//!
//! 1. **NO BUSINESS LOGIC** - filtering and export live in the explorer crate
//! 2. **SERIALIZABLE** - every wire type round-trips through serde
//! 3. **LENIENT DECODING** - missing optional fields default rather than fail

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type ContractorId = i64;
pub type AreaId = i64;
pub type BlockId = i64;
pub type CruiseId = i64;
pub type StationId = i64;
pub type SampleId = i64;
pub type MediaId = i64;
pub type LibraryId = i64;

// ============================================================================
// GEOMETRY
// ============================================================================

/// Errors raised when constructing geometry from untrusted values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("bounding box min latitude {min} is greater than max latitude {max}")]
    InvertedLatitude { min: f64, max: f64 },
}

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a point from optional wire coordinates
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

/// Latitude/longitude rectangle.
///
/// When `min_lon > max_lon` the box crosses the antimeridian (±180°) and covers
/// `[min_lon, 180] ∪ [-180, max_lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, GeoError> {
        for lat in [min_lat, max_lat] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(GeoError::LatitudeOutOfRange(lat));
            }
        }
        for lon in [min_lon, max_lon] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(GeoError::LongitudeOutOfRange(lon));
            }
        }
        if min_lat > max_lat {
            return Err(GeoError::InvertedLatitude {
                min: min_lat,
                max: max_lat,
            });
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// True if the box crosses the ±180° meridian
    pub fn wraps_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        if point.lat < self.min_lat || point.lat > self.max_lat {
            return false;
        }
        if self.wraps_antimeridian() {
            point.lon >= self.min_lon || point.lon <= self.max_lon
        } else {
            point.lon >= self.min_lon && point.lon <= self.max_lon
        }
    }

    /// Smallest non-wrapping box enclosing all points, or None for no points
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for p in iter {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.max_lon = bbox.max_lon.max(p.lon);
        }
        Some(bbox)
    }

    pub fn center(&self) -> GeoPoint {
        let lat = (self.min_lat + self.max_lat) / 2.0;
        let lon = if self.wraps_antimeridian() {
            let span = (180.0 - self.min_lon) + (self.max_lon + 180.0);
            let mid = self.min_lon + span / 2.0;
            if mid > 180.0 {
                mid - 360.0
            } else {
                mid
            }
        } else {
            (self.min_lon + self.max_lon) / 2.0
        };
        GeoPoint { lat, lon }
    }
}

// ============================================================================
// WIRE HELPERS
// ============================================================================

/// Dates arrive as `YYYY-MM-DD`, RFC 3339, or `YYYY-MM-DDTHH:MM:SS` without zone.
pub mod wire_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }
}

/// Accept a JSON string or number, keep its textual form
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

// ============================================================================
// CONTRACTORS, AREAS AND BLOCKS
// ============================================================================

/// Licence block status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockStatus {
    Active,
    Pending,
    Inactive,
    Reserved,
    #[default]
    Unspecified,
    /// Value the API sent that this build does not know
    Other(String),
}

impl BlockStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BlockStatus::Active => "active",
            BlockStatus::Pending => "pending",
            BlockStatus::Inactive => "inactive",
            BlockStatus::Reserved => "reserved",
            BlockStatus::Unspecified => "",
            BlockStatus::Other(raw) => raw,
        }
    }
}

impl FromStr for BlockStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "active" => BlockStatus::Active,
            "pending" => BlockStatus::Pending,
            "inactive" => BlockStatus::Inactive,
            "reserved" => BlockStatus::Reserved,
            "" => BlockStatus::Unspecified,
            _ => BlockStatus::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for BlockStatus {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<BlockStatus> for String {
    fn from(status: BlockStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    #[serde(alias = "BlockId")]
    pub block_id: BlockId,
    #[serde(alias = "BlockName")]
    pub block_name: String,
    #[serde(alias = "Status")]
    pub status: BlockStatus,
    #[serde(alias = "CenterLatitude")]
    pub center_latitude: Option<f64>,
    #[serde(alias = "CenterLongitude")]
    pub center_longitude: Option<f64>,
    #[serde(alias = "AreaSizeKm2")]
    pub area_size_km2: Option<f64>,
    /// GeoJSON geometry, passed through untouched
    #[serde(alias = "GeoJsonBoundary")]
    pub geo_json_boundary: Option<serde_json::Value>,
}

impl Block {
    pub fn center(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.center_latitude, self.center_longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Area {
    #[serde(alias = "AreaId")]
    pub area_id: AreaId,
    #[serde(alias = "AreaName")]
    pub area_name: String,
    #[serde(alias = "AreaDescription")]
    pub area_description: Option<String>,
    #[serde(alias = "CenterLatitude")]
    pub center_latitude: Option<f64>,
    #[serde(alias = "CenterLongitude")]
    pub center_longitude: Option<f64>,
    #[serde(alias = "TotalAreaSizeKm2")]
    pub total_area_size_km2: Option<f64>,
    #[serde(alias = "GeoJsonBoundary")]
    pub geo_json_boundary: Option<serde_json::Value>,
    #[serde(alias = "Blocks")]
    pub blocks: Vec<Block>,
}

impl Area {
    pub fn center(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.center_latitude, self.center_longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contractor {
    #[serde(alias = "ContractorId")]
    pub contractor_id: ContractorId,
    #[serde(alias = "ContractorName")]
    pub contractor_name: String,
    /// Contract type name, e.g. "Polymetallic Nodules"
    #[serde(alias = "ContractType")]
    pub contract_type: String,
    #[serde(alias = "ContractStatus")]
    pub contract_status: String,
    #[serde(alias = "SponsoringState")]
    pub sponsoring_state: String,
    #[serde(alias = "ContractualYear")]
    pub contractual_year: Option<i32>,
    #[serde(alias = "Remarks")]
    pub remarks: Option<String>,
    #[serde(alias = "ContractorAreas", alias = "areas")]
    pub contractor_areas: Vec<Area>,
}

impl Contractor {
    /// Area centres, or block centres for areas without one
    pub fn anchor_points(&self) -> Vec<GeoPoint> {
        let mut points = Vec::new();
        for area in &self.contractor_areas {
            match area.center() {
                Some(center) => points.push(center),
                None => points.extend(area.blocks.iter().filter_map(Block::center)),
            }
        }
        points
    }
}

// ============================================================================
// CRUISES, STATIONS AND SAMPLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CtdCast {
    #[serde(alias = "CtdId")]
    pub ctd_id: i64,
    #[serde(alias = "StationId")]
    pub station_id: StationId,
    #[serde(alias = "Depth")]
    pub depth: Option<f64>,
    #[serde(alias = "Temperature")]
    pub temperature: Option<f64>,
    #[serde(alias = "Salinity")]
    pub salinity: Option<f64>,
    #[serde(alias = "Oxygen")]
    pub oxygen: Option<f64>,
    #[serde(alias = "Pressure")]
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Media {
    #[serde(alias = "MediaId")]
    pub media_id: MediaId,
    #[serde(alias = "SampleId")]
    pub sample_id: Option<SampleId>,
    #[serde(alias = "FileName")]
    pub file_name: String,
    #[serde(alias = "MediaType")]
    pub media_type: String,
    #[serde(alias = "CaptureDate", with = "wire_date")]
    pub capture_date: Option<NaiveDate>,
    #[serde(alias = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(alias = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(alias = "CameraSpecs")]
    pub camera_specs: Option<String>,
    #[serde(alias = "Remarks", alias = "description")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentalResult {
    #[serde(alias = "EnvResultId")]
    pub env_result_id: i64,
    #[serde(alias = "SampleId")]
    pub sample_id: SampleId,
    #[serde(alias = "AnalysisCategory")]
    pub analysis_category: Option<String>,
    #[serde(alias = "AnalysisName")]
    pub analysis_name: Option<String>,
    #[serde(alias = "AnalysisValue", deserialize_with = "string_or_number")]
    pub analysis_value: Option<String>,
    #[serde(alias = "Units")]
    pub units: Option<String>,
    #[serde(alias = "Remarks")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeologicalResult {
    #[serde(alias = "GeoResultId")]
    pub geo_result_id: i64,
    #[serde(alias = "SampleId")]
    pub sample_id: SampleId,
    #[serde(alias = "Category")]
    pub category: Option<String>,
    #[serde(alias = "Analysis")]
    pub analysis: Option<String>,
    #[serde(alias = "AnalysisValue", deserialize_with = "string_or_number")]
    pub analysis_value: Option<String>,
    #[serde(alias = "Units")]
    pub units: Option<String>,
    #[serde(alias = "Qualifier")]
    pub qualifier: Option<String>,
    #[serde(alias = "Remarks")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sample {
    #[serde(alias = "SampleId")]
    pub sample_id: SampleId,
    #[serde(alias = "StationId")]
    pub station_id: StationId,
    #[serde(alias = "SampleCode")]
    pub sample_code: String,
    #[serde(alias = "SampleType")]
    pub sample_type: Option<String>,
    #[serde(alias = "MatrixType")]
    pub matrix_type: Option<String>,
    #[serde(alias = "HabitatType")]
    pub habitat_type: Option<String>,
    #[serde(alias = "SamplingDevice")]
    pub sampling_device: Option<String>,
    #[serde(alias = "DepthLower")]
    pub depth_lower: Option<f64>,
    #[serde(alias = "DepthUpper")]
    pub depth_upper: Option<f64>,
    #[serde(alias = "SampleDescription")]
    pub sample_description: Option<String>,
    #[serde(alias = "Analysis")]
    pub analysis: Option<String>,
    #[serde(alias = "Result", deserialize_with = "string_or_number")]
    pub result: Option<String>,
    #[serde(alias = "PhotoVideos", alias = "media")]
    pub photo_videos: Vec<Media>,
    #[serde(alias = "EnvResults")]
    pub env_results: Vec<EnvironmentalResult>,
    #[serde(alias = "GeoResults")]
    pub geo_results: Vec<GeologicalResult>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Station {
    #[serde(alias = "StationId")]
    pub station_id: StationId,
    #[serde(alias = "CruiseId")]
    pub cruise_id: CruiseId,
    #[serde(alias = "StationCode")]
    pub station_code: String,
    #[serde(alias = "StationType")]
    pub station_type: Option<String>,
    #[serde(alias = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(alias = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(alias = "Samples")]
    pub samples: Vec<Sample>,
    #[serde(alias = "CtdData")]
    pub ctd_data: Vec<CtdCast>,
}

impl Station {
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cruise {
    #[serde(alias = "CruiseId")]
    pub cruise_id: CruiseId,
    #[serde(alias = "ContractorId")]
    pub contractor_id: ContractorId,
    #[serde(alias = "CruiseName")]
    pub cruise_name: String,
    #[serde(alias = "ResearchVessel")]
    pub research_vessel: Option<String>,
    #[serde(alias = "StartDate", with = "wire_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "EndDate", with = "wire_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(alias = "CenterLatitude")]
    pub center_latitude: Option<f64>,
    #[serde(alias = "CenterLongitude")]
    pub center_longitude: Option<f64>,
    #[serde(alias = "Stations")]
    pub stations: Vec<Station>,
}

impl Cruise {
    pub fn center(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.center_latitude, self.center_longitude)
    }
}

// ============================================================================
// LIBRARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryDocument {
    #[serde(alias = "LibraryId")]
    pub library_id: LibraryId,
    #[serde(alias = "ContractorId")]
    pub contractor_id: Option<ContractorId>,
    #[serde(alias = "ContractorName")]
    pub contractor_name: Option<String>,
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(alias = "Theme")]
    pub theme: Option<String>,
    #[serde(alias = "Year")]
    pub year: Option<i32>,
    #[serde(alias = "Description")]
    pub description: Option<String>,
    #[serde(alias = "FileName")]
    pub file_name: Option<String>,
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// One dataset snapshot as returned by `/MapFilter/map-data`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapData {
    #[serde(alias = "Contractors")]
    pub contractors: Vec<Contractor>,
    #[serde(alias = "Cruises")]
    pub cruises: Vec<Cruise>,
    #[serde(alias = "Library")]
    pub library: Vec<LibraryDocument>,
}

impl MapData {
    /// Empty but structurally valid snapshot
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.contractors.is_empty() && self.cruises.is_empty() && self.library.is_empty()
    }

    pub fn contractor(&self, id: ContractorId) -> Option<&Contractor> {
        self.contractors.iter().find(|c| c.contractor_id == id)
    }

    pub fn cruise(&self, id: CruiseId) -> Option<&Cruise> {
        self.cruises.iter().find(|c| c.cruise_id == id)
    }

    pub fn cruises_for(&self, contractor_id: ContractorId) -> impl Iterator<Item = &Cruise> {
        self.cruises
            .iter()
            .filter(move |c| c.contractor_id == contractor_id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.cruises.iter().flat_map(|c| c.stations.iter())
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.stations().flat_map(|s| s.samples.iter())
    }
}

// ============================================================================
// FILTER OPTION CATALOG (wire shapes)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractType {
    #[serde(alias = "ContractTypeId")]
    pub contract_type_id: i64,
    #[serde(alias = "ContractTypeName")]
    pub contract_type_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractStatus {
    #[serde(alias = "ContractStatusId")]
    pub contract_status_id: i64,
    #[serde(alias = "ContractStatusName")]
    pub contract_status_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractorRef {
    #[serde(alias = "ContractorId")]
    pub contractor_id: ContractorId,
    #[serde(alias = "ContractorName")]
    pub contractor_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedLookup {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "Name")]
    pub name: String,
}

/// Lookup endpoints return bare strings, bare numbers or `{id, name}` records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupValue {
    Text(String),
    Number(i64),
    Named(NamedLookup),
}

impl LookupValue {
    /// Value used when the lookup is sent back as a query parameter
    pub fn key(&self) -> String {
        match self {
            LookupValue::Text(s) => s.clone(),
            LookupValue::Number(n) => n.to_string(),
            LookupValue::Named(named) => named.id.to_string(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            LookupValue::Text(s) => s.clone(),
            LookupValue::Number(n) => n.to_string(),
            LookupValue::Named(named) => named.name.clone(),
        }
    }
}

// ============================================================================
// ANALYTICS PAYLOADS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractorSummary {
    #[serde(alias = "ContractorId")]
    pub contractor_id: ContractorId,
    #[serde(alias = "ContractorName")]
    pub contractor_name: String,
    #[serde(alias = "TotalCruises")]
    pub total_cruises: u32,
    #[serde(alias = "TotalStations")]
    pub total_stations: u32,
    #[serde(alias = "TotalSamples")]
    pub total_samples: u32,
    #[serde(alias = "TotalAreaKm2")]
    pub total_area_km2: Option<f64>,
    /// Fields this build does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockAnalytics {
    #[serde(alias = "BlockId")]
    pub block_id: BlockId,
    #[serde(alias = "BlockName")]
    pub block_name: String,
    #[serde(alias = "StationCount")]
    pub station_count: u32,
    #[serde(alias = "SampleCount")]
    pub sample_count: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bounding_box_contains_plain() {
        let bbox = BoundingBox::new(0.0, 20.0, -160.0, -110.0).unwrap();
        assert!(bbox.contains(GeoPoint::new(10.0, -130.0)));
        assert!(!bbox.contains(GeoPoint::new(10.0, -100.0)));
        assert!(!bbox.contains(GeoPoint::new(25.0, -130.0)));
    }

    #[test]
    fn test_bounding_box_antimeridian() {
        let bbox = BoundingBox::new(-10.0, 30.0, 140.0, -150.0).unwrap();
        assert!(bbox.wraps_antimeridian());
        assert!(bbox.contains(GeoPoint::new(5.0, 170.0)));
        assert!(bbox.contains(GeoPoint::new(5.0, -170.0)));
        assert!(!bbox.contains(GeoPoint::new(5.0, 0.0)));
        assert!(!bbox.contains(GeoPoint::new(5.0, -140.0)));
    }

    #[test]
    fn test_bounding_box_rejects_bad_values() {
        assert_eq!(
            BoundingBox::new(-95.0, 0.0, 0.0, 1.0),
            Err(GeoError::LatitudeOutOfRange(-95.0))
        );
        assert!(BoundingBox::new(10.0, 0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_antimeridian_center() {
        let bbox = BoundingBox::new(0.0, 10.0, 170.0, -170.0).unwrap();
        let center = bbox.center();
        assert!((center.lon.abs() - 180.0).abs() < 1e-9);
        assert!((center.lat - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_block_status_parsing() {
        assert_eq!(BlockStatus::from("Active".to_string()), BlockStatus::Active);
        assert_eq!(BlockStatus::from("RESERVED".to_string()), BlockStatus::Reserved);
        assert_eq!(
            BlockStatus::from("relinquished".to_string()),
            BlockStatus::Other("relinquished".to_string())
        );
    }

    #[test]
    fn test_map_data_accepts_mixed_casing() {
        let json = r#"{
            "contractors": [{
                "ContractorId": 7,
                "contractorName": "Deep Ocean Resources",
                "contractType": "Polymetallic Nodules",
                "contractualYear": 2001,
                "contractorAreas": [{"areaId": 3, "AreaName": "Area A", "blocks": [
                    {"blockId": 1, "status": "Pending", "centerLatitude": 12.5, "centerLongitude": -130.0}
                ]}]
            }],
            "cruises": [{
                "cruiseId": 11, "contractorId": 7, "cruiseName": "DOR-1",
                "startDate": "2019-04-01T00:00:00", "EndDate": "2019-05-02",
                "stations": [{"stationId": 21, "cruiseId": 11, "stationCode": "S-1",
                    "samples": [{"sampleId": 31, "stationId": 21, "sampleCode": "X", "result": 10.01}]}]
            }]
        }"#;
        let data: MapData = serde_json::from_str(json).unwrap();
        assert_eq!(data.contractors[0].contractor_id, 7);
        assert_eq!(data.contractors[0].contractor_areas[0].area_name, "Area A");
        assert_eq!(
            data.contractors[0].contractor_areas[0].blocks[0].status,
            BlockStatus::Pending
        );
        let cruise = &data.cruises[0];
        assert_eq!(cruise.start_date, NaiveDate::from_ymd_opt(2019, 4, 1));
        assert_eq!(cruise.end_date, NaiveDate::from_ymd_opt(2019, 5, 2));
        assert_eq!(
            data.samples().next().unwrap().result.as_deref(),
            Some("10.01")
        );
        assert!(data.library.is_empty());
    }

    #[test]
    fn test_anchor_points_fall_back_to_blocks() {
        let contractor = Contractor {
            contractor_areas: vec![Area {
                blocks: vec![Block {
                    center_latitude: Some(1.0),
                    center_longitude: Some(2.0),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(contractor.anchor_points(), vec![GeoPoint::new(1.0, 2.0)]);
    }

    #[test]
    fn test_lookup_value_shapes() {
        let values: Vec<LookupValue> =
            serde_json::from_str(r#"["Sediment", 42, {"id": 3, "name": "Box corer"}]"#).unwrap();
        assert_eq!(values[0].label(), "Sediment");
        assert_eq!(values[1].key(), "42");
        assert_eq!(values[2].key(), "3");
        assert_eq!(values[2].label(), "Box corer");
    }
}
