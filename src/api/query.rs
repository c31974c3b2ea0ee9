//! Query-string construction
//!
//! Only keys with a defined, non-empty value are sent.

use crate::filters::FilterState;
use url::Url;

/// Ordered query parameters for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate the filter store, renaming local keys to their wire names
    pub fn from_filters(filters: &FilterState) -> Self {
        let mut params = Self::new();
        for (key, value) in filters.iter() {
            params.push(key.wire_name(), Some(value));
        }
        params
    }

    /// Append `key=value` unless the value is absent or blank
    pub fn push<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.pairs.push((key.to_string(), value.trim().to_string()));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Write the parameters into `url`, percent-encoding as needed
    pub fn apply_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (k, v) in &self.pairs {
            query.append_pair(k, v);
        }
    }
}

/// Filters for `/Gallery/media`
#[derive(Debug, Clone, Default)]
pub struct MediaQuery {
    pub contractor_id: Option<i64>,
    pub cruise_id: Option<i64>,
    pub station_id: Option<i64>,
    pub sample_id: Option<i64>,
    pub media_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl MediaQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contractor(mut self, id: i64) -> Self {
        self.contractor_id = Some(id);
        self
    }

    pub fn with_cruise(mut self, id: i64) -> Self {
        self.cruise_id = Some(id);
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut p = QueryParams::new();
        p.push("contractorId", self.contractor_id)
            .push("cruiseId", self.cruise_id)
            .push("stationId", self.station_id)
            .push("sampleId", self.sample_id)
            .push("mediaType", self.media_type.as_deref())
            .push("search", self.search.as_deref())
            .push("page", self.page)
            .push("pageSize", self.page_size);
        p
    }
}

/// Filters for `/library/list`
#[derive(Debug, Clone, Default)]
pub struct LibraryQuery {
    pub contractor_id: Option<i64>,
    pub theme: Option<String>,
    pub year: Option<i32>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl LibraryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contractor(mut self, id: i64) -> Self {
        self.contractor_id = Some(id);
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut p = QueryParams::new();
        p.push("contractorId", self.contractor_id)
            .push("theme", self.theme.as_deref())
            .push("year", self.year)
            .push("search", self.search.as_deref())
            .push("page", self.page)
            .push("pageSize", self.page_size);
        p
    }
}

/// Filters for `/sample/list`
#[derive(Debug, Clone, Default)]
pub struct SampleQuery {
    pub contractor_id: Option<i64>,
    pub cruise_id: Option<i64>,
    pub station_id: Option<i64>,
    pub sample_type: Option<String>,
    pub matrix_type: Option<String>,
    pub habitat_type: Option<String>,
    pub analysis: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SampleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contractor(mut self, id: i64) -> Self {
        self.contractor_id = Some(id);
        self
    }

    pub fn with_sample_type(mut self, sample_type: impl Into<String>) -> Self {
        self.sample_type = Some(sample_type.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut p = QueryParams::new();
        p.push("contractorId", self.contractor_id)
            .push("cruiseId", self.cruise_id)
            .push("stationId", self.station_id)
            .push("sampleType", self.sample_type.as_deref())
            .push("matrixType", self.matrix_type.as_deref())
            .push("habitatType", self.habitat_type.as_deref())
            .push("analysis", self.analysis.as_deref())
            .push("search", self.search.as_deref())
            .push("page", self.page)
            .push("pageSize", self.page_size);
        p
    }
}

/// Lookup lists under `/sample/*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleLookup {
    SampleTypes,
    MatrixTypes,
    HabitatTypes,
    Analyses,
    Stations,
    Cruises,
    Contractors,
}

impl SampleLookup {
    pub fn path(&self) -> &'static str {
        match self {
            SampleLookup::SampleTypes => "sample/sampleTypes",
            SampleLookup::MatrixTypes => "sample/matrixtypes",
            SampleLookup::HabitatTypes => "sample/habitattypes",
            SampleLookup::Analyses => "sample/analyses",
            SampleLookup::Stations => "sample/stations",
            SampleLookup::Cruises => "sample/cruises",
            SampleLookup::Contractors => "sample/contractors",
        }
    }
}
