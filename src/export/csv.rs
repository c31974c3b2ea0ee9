//! Sectioned CSV rendering
//!
//! Output layout, in order:
//! - UTF-8 byte-order mark
//! - one block per section: title row, header row, data rows
//! - two blank rows between blocks
//!
//! Fields are `;`-delimited with CRLF line endings. Header names are fixed
//! literals matching the API field names and must not change; spreadsheet
//! templates downstream key on them.

use crate::error::{ExplorerError, Result};
use regex::Regex;
use seabed_types::MapData;
use std::fmt::Display;
use std::sync::LazyLock;

pub const BOM: &str = "\u{feff}";
pub const SECTION_SEPARATOR: &str = "\r\n\r\n";

pub const CONTRACTOR_HEADERS: &[&str] = &[
    "ContractorId",
    "ContractorName",
    "ContractType",
    "ContractStatus",
    "SponsoringState",
    "ContractualYear",
    "Remarks",
];

pub const AREA_HEADERS: &[&str] = &[
    "ContractorId",
    "AreaId",
    "AreaName",
    "AreaDescription",
    "CenterLatitude",
    "CenterLongitude",
    "TotalAreaSizeKm2",
];

pub const BLOCK_HEADERS: &[&str] = &[
    "AreaId",
    "BlockId",
    "BlockName",
    "Status",
    "CenterLatitude",
    "CenterLongitude",
    "AreaSizeKm2",
];

pub const CRUISE_HEADERS: &[&str] = &[
    "CruiseId",
    "ContractorId",
    "CruiseName",
    "ResearchVessel",
    "StartDate",
    "EndDate",
];

pub const STATION_HEADERS: &[&str] = &[
    "StationId",
    "CruiseId",
    "StationCode",
    "StationType",
    "Latitude",
    "Longitude",
];

pub const CTD_HEADERS: &[&str] = &[
    "CtdId",
    "StationId",
    "Depth",
    "Temperature",
    "Salinity",
    "Oxygen",
    "Pressure",
];

pub const SAMPLE_HEADERS: &[&str] = &[
    "SampleId",
    "StationId",
    "SampleCode",
    "SampleType",
    "MatrixType",
    "HabitatType",
    "SamplingDevice",
    "DepthLower",
    "DepthUpper",
    "SampleDescription",
    "Analysis",
    "Result",
];

pub const ENV_RESULT_HEADERS: &[&str] = &[
    "EnvResultId",
    "SampleId",
    "AnalysisCategory",
    "AnalysisName",
    "AnalysisValue",
    "Units",
    "Remarks",
];

pub const GEO_RESULT_HEADERS: &[&str] = &[
    "GeoResultId",
    "SampleId",
    "Category",
    "Analysis",
    "AnalysisValue",
    "Units",
    "Qualifier",
    "Remarks",
];

pub const MEDIA_HEADERS: &[&str] = &[
    "MediaId",
    "SampleId",
    "FileName",
    "MediaType",
    "CaptureDate",
    "Latitude",
    "Longitude",
    "CameraSpecs",
    "Remarks",
];

pub const LIBRARY_HEADERS: &[&str] = &[
    "LibraryId",
    "ContractorId",
    "Title",
    "Theme",
    "Year",
    "Description",
    "FileName",
];

static DECIMAL_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+$").unwrap());

/// Wrap decimal-looking text as a formula literal so spreadsheets keep it as text
pub fn excel_text(value: &str) -> String {
    if DECIMAL_TEXT.is_match(value) {
        format!("=\"{}\"", value)
    } else {
        value.to_string()
    }
}

fn opt_text(value: Option<&String>) -> String {
    value.map(|v| excel_text(v)).unwrap_or_default()
}

fn opt_num<T: Display>(value: Option<T>) -> String {
    value.map(|v| excel_text(&v.to_string())).unwrap_or_default()
}

struct Section {
    title: &'static str,
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

impl Section {
    fn new(title: &'static str, headers: &'static [&'static str]) -> Self {
        Self {
            title,
            headers,
            rows: Vec::new(),
        }
    }

    fn render(&self) -> Result<String> {
        let mut writer = ::csv::WriterBuilder::new()
            .delimiter(b';')
            .terminator(::csv::Terminator::CRLF)
            .flexible(true)
            .from_writer(Vec::new());

        let write_err = |e: ::csv::Error| ExplorerError::Export(format!("{}: {}", self.title, e));
        writer.write_record([self.title]).map_err(write_err)?;
        writer.write_record(self.headers).map_err(write_err)?;
        for row in &self.rows {
            writer.write_record(row).map_err(write_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExplorerError::Export(format!("{}: {}", self.title, e.error())))?;
        String::from_utf8(bytes).map_err(|e| ExplorerError::Export(e.to_string()))
    }
}

/// Flatten a snapshot into the eleven export sections
pub fn convert_to_csv(data: &MapData) -> Result<String> {
    let mut contractors = Section::new("CONTRACTORS", CONTRACTOR_HEADERS);
    let mut areas = Section::new("CONTRACTOR AREAS", AREA_HEADERS);
    let mut blocks = Section::new("CONTRACTOR AREA BLOCKS", BLOCK_HEADERS);
    let mut cruises = Section::new("CRUISES", CRUISE_HEADERS);
    let mut stations = Section::new("STATIONS", STATION_HEADERS);
    let mut ctd = Section::new("CTD DATA", CTD_HEADERS);
    let mut samples = Section::new("SAMPLES", SAMPLE_HEADERS);
    let mut env_results = Section::new("ENVIRONMENTAL RESULTS", ENV_RESULT_HEADERS);
    let mut geo_results = Section::new("GEOLOGICAL RESULTS", GEO_RESULT_HEADERS);
    let mut media = Section::new("PHOTO_VIDEO", MEDIA_HEADERS);
    let mut library = Section::new("LIBRARY", LIBRARY_HEADERS);

    for c in &data.contractors {
        contractors.rows.push(vec![
            c.contractor_id.to_string(),
            excel_text(&c.contractor_name),
            excel_text(&c.contract_type),
            excel_text(&c.contract_status),
            excel_text(&c.sponsoring_state),
            opt_num(c.contractual_year),
            opt_text(c.remarks.as_ref()),
        ]);
        for area in &c.contractor_areas {
            areas.rows.push(vec![
                c.contractor_id.to_string(),
                area.area_id.to_string(),
                excel_text(&area.area_name),
                opt_text(area.area_description.as_ref()),
                opt_num(area.center_latitude),
                opt_num(area.center_longitude),
                opt_num(area.total_area_size_km2),
            ]);
            for block in &area.blocks {
                blocks.rows.push(vec![
                    area.area_id.to_string(),
                    block.block_id.to_string(),
                    excel_text(&block.block_name),
                    excel_text(block.status.as_str()),
                    opt_num(block.center_latitude),
                    opt_num(block.center_longitude),
                    opt_num(block.area_size_km2),
                ]);
            }
        }
    }

    for cruise in &data.cruises {
        cruises.rows.push(vec![
            cruise.cruise_id.to_string(),
            cruise.contractor_id.to_string(),
            excel_text(&cruise.cruise_name),
            opt_text(cruise.research_vessel.as_ref()),
            opt_num(cruise.start_date),
            opt_num(cruise.end_date),
        ]);
        for station in &cruise.stations {
            stations.rows.push(vec![
                station.station_id.to_string(),
                station.cruise_id.to_string(),
                excel_text(&station.station_code),
                opt_text(station.station_type.as_ref()),
                opt_num(station.latitude),
                opt_num(station.longitude),
            ]);
            for cast in &station.ctd_data {
                ctd.rows.push(vec![
                    cast.ctd_id.to_string(),
                    cast.station_id.to_string(),
                    opt_num(cast.depth),
                    opt_num(cast.temperature),
                    opt_num(cast.salinity),
                    opt_num(cast.oxygen),
                    opt_num(cast.pressure),
                ]);
            }
            for sample in &station.samples {
                samples.rows.push(vec![
                    sample.sample_id.to_string(),
                    sample.station_id.to_string(),
                    excel_text(&sample.sample_code),
                    opt_text(sample.sample_type.as_ref()),
                    opt_text(sample.matrix_type.as_ref()),
                    opt_text(sample.habitat_type.as_ref()),
                    opt_text(sample.sampling_device.as_ref()),
                    opt_num(sample.depth_lower),
                    opt_num(sample.depth_upper),
                    opt_text(sample.sample_description.as_ref()),
                    opt_text(sample.analysis.as_ref()),
                    opt_text(sample.result.as_ref()),
                ]);
                for r in &sample.env_results {
                    env_results.rows.push(vec![
                        r.env_result_id.to_string(),
                        r.sample_id.to_string(),
                        opt_text(r.analysis_category.as_ref()),
                        opt_text(r.analysis_name.as_ref()),
                        opt_text(r.analysis_value.as_ref()),
                        opt_text(r.units.as_ref()),
                        opt_text(r.remarks.as_ref()),
                    ]);
                }
                for r in &sample.geo_results {
                    geo_results.rows.push(vec![
                        r.geo_result_id.to_string(),
                        r.sample_id.to_string(),
                        opt_text(r.category.as_ref()),
                        opt_text(r.analysis.as_ref()),
                        opt_text(r.analysis_value.as_ref()),
                        opt_text(r.units.as_ref()),
                        opt_text(r.qualifier.as_ref()),
                        opt_text(r.remarks.as_ref()),
                    ]);
                }
                for m in &sample.photo_videos {
                    media.rows.push(vec![
                        m.media_id.to_string(),
                        // nested media belongs to its sample when the id is omitted
                        m.sample_id.unwrap_or(sample.sample_id).to_string(),
                        excel_text(&m.file_name),
                        excel_text(&m.media_type),
                        opt_num(m.capture_date),
                        opt_num(m.latitude),
                        opt_num(m.longitude),
                        opt_text(m.camera_specs.as_ref()),
                        opt_text(m.remarks.as_ref()),
                    ]);
                }
            }
        }
    }

    for doc in &data.library {
        library.rows.push(vec![
            doc.library_id.to_string(),
            opt_num(doc.contractor_id),
            excel_text(&doc.title),
            opt_text(doc.theme.as_ref()),
            opt_num(doc.year),
            opt_text(doc.description.as_ref()),
            opt_text(doc.file_name.as_ref()),
        ]);
    }

    let sections = [
        contractors,
        areas,
        blocks,
        cruises,
        stations,
        ctd,
        samples,
        env_results,
        geo_results,
        media,
        library,
    ];
    let rendered = sections
        .iter()
        .map(Section::render)
        .collect::<Result<Vec<_>>>()?;

    let mut out = String::from(BOM);
    // each rendered block already ends in CRLF, so two more CRLFs leave two blank rows
    out.push_str(&rendered.join(SECTION_SEPARATOR));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use seabed_types::{Contractor, Cruise, Sample, Station};

    fn one_station() -> MapData {
        MapData {
            contractors: vec![Contractor {
                contractor_id: 1,
                contractor_name: "Ocean Minerals".to_string(),
                ..Default::default()
            }],
            cruises: vec![Cruise {
                cruise_id: 10,
                contractor_id: 1,
                cruise_name: "CCZ-2021".to_string(),
                stations: vec![Station {
                    station_id: 100,
                    cruise_id: 10,
                    station_code: "ST-1".to_string(),
                    latitude: Some(10.01),
                    longitude: Some(-130.25),
                    samples: vec![
                        Sample {
                            sample_id: 1000,
                            station_id: 100,
                            sample_code: "S-1".to_string(),
                            result: Some("10.01".to_string()),
                            ..Default::default()
                        },
                        Sample {
                            sample_id: 1001,
                            station_id: 100,
                            sample_code: "S-2".to_string(),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn section_lines<'a>(csv: &'a str, title: &str) -> Vec<&'a str> {
        let lines: Vec<&str> = csv.trim_start_matches(BOM).split("\r\n").collect();
        let start = lines.iter().position(|l| *l == title).unwrap();
        lines[start..].to_vec()
    }

    #[test]
    fn test_bom_and_crlf() {
        let csv = convert_to_csv(&one_station()).unwrap();
        assert!(csv.starts_with(BOM));
        assert!(csv[BOM.len()..].starts_with("CONTRACTORS\r\n"));
        assert!(!csv.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_every_section_present_in_order() {
        let csv = convert_to_csv(&MapData::empty()).unwrap();
        let titles = [
            "CONTRACTORS",
            "CONTRACTOR AREAS",
            "CONTRACTOR AREA BLOCKS",
            "CRUISES",
            "STATIONS",
            "CTD DATA",
            "SAMPLES",
            "ENVIRONMENTAL RESULTS",
            "GEOLOGICAL RESULTS",
            "PHOTO_VIDEO",
            "LIBRARY",
        ];
        let lines: Vec<&str> = csv.trim_start_matches(BOM).split("\r\n").collect();
        let found: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|l| titles.contains(l))
            .collect();
        assert_eq!(found, titles.to_vec());
    }

    #[test]
    fn test_stations_section_shape() {
        let csv = convert_to_csv(&one_station()).unwrap();
        let lines = section_lines(&csv, "STATIONS");
        assert_eq!(
            lines[1],
            "StationId;CruiseId;StationCode;StationType;Latitude;Longitude"
        );
        assert_eq!(lines[2], "100;10;ST-1;;\"=\"\"10.01\"\"\";-130.25");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "CTD DATA");
    }

    #[test]
    fn test_samples_parse_back() {
        let data = one_station();
        let csv = convert_to_csv(&data).unwrap();
        let lines = section_lines(&csv, "SAMPLES");
        let body = lines[1..]
            .iter()
            .take_while(|l| !l.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\r\n");

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(body.as_bytes());
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        assert_eq!(headers, SAMPLE_HEADERS.to_vec());

        let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), data.samples().count());
        // decimal-looking text survives as a formula literal
        assert_eq!(&rows[0][11], "=\"10.01\"");
        assert_eq!(&rows[1][11], "");
    }

    #[test]
    fn test_decimal_numbers_are_escaped() {
        let data = MapData {
            contractors: vec![Contractor {
                contractor_id: 3,
                contractual_year: Some(2001),
                contractor_areas: vec![seabed_types::Area {
                    area_id: 30,
                    area_name: "CCZ".to_string(),
                    center_latitude: Some(10.01),
                    center_longitude: Some(-125.5),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let csv = convert_to_csv(&data).unwrap();
        let lines = section_lines(&csv, "CONTRACTOR AREAS");

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_reader(lines[2].as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        let cells: Vec<&str> = row.iter().collect();
        assert!(cells.contains(&"=\"10.01\""));
        // negative values and integers are left alone
        assert!(cells.contains(&"-125.5"));
        assert_eq!(cells[1], "30");

        let contractor_row = section_lines(&csv, "CONTRACTORS")[2];
        assert_eq!(contractor_row, "3;;;;;2001;");
    }

    #[test]
    fn test_excel_text() {
        assert_eq!(excel_text("10.01"), "=\"10.01\"");
        assert_eq!(excel_text("10"), "10");
        assert_eq!(excel_text("-1.5"), "-1.5");
        assert_eq!(excel_text("v1.2"), "v1.2");
    }

    #[test]
    fn test_delimiter_in_text_is_quoted() {
        let data = MapData {
            contractors: vec![Contractor {
                contractor_id: 7,
                contractor_name: "North; South".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let csv = convert_to_csv(&data).unwrap();
        let lines = section_lines(&csv, "CONTRACTORS");
        assert!(lines[2].starts_with("7;\"North; South\";"));
    }
}
