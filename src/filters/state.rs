//! Filter state store
//!
//! Holds the active filter selections as key → scalar value. Observers detect
//! changes through [`FilterState::revision`], which only moves when the map
//! actually changes.

use crate::error::ExplorerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value that clears a filter when set, as sent by "All" dropdown entries
pub const ALL_SENTINEL: &str = "all";

/// Filter dimensions understood by the store and the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    ContractorId,
    /// Local name for the contract type; sent to the API as `contractTypeId`
    MineralTypeId,
    ContractStatusId,
    SponsoringState,
    Year,
    CruiseId,
    LocationId,
    Search,
}

impl FilterKey {
    pub const ALL: [FilterKey; 8] = [
        FilterKey::ContractorId,
        FilterKey::MineralTypeId,
        FilterKey::ContractStatusId,
        FilterKey::SponsoringState,
        FilterKey::Year,
        FilterKey::CruiseId,
        FilterKey::LocationId,
        FilterKey::Search,
    ];

    /// Key as used inside the application
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::ContractorId => "contractorId",
            FilterKey::MineralTypeId => "mineralTypeId",
            FilterKey::ContractStatusId => "contractStatusId",
            FilterKey::SponsoringState => "sponsoringState",
            FilterKey::Year => "year",
            FilterKey::CruiseId => "cruiseId",
            FilterKey::LocationId => "locationId",
            FilterKey::Search => "search",
        }
    }

    /// Query-string key expected by the API
    pub fn wire_name(&self) -> &'static str {
        match self {
            FilterKey::MineralTypeId => "contractTypeId",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "contractorId" => Ok(FilterKey::ContractorId),
            "mineralTypeId" | "contractTypeId" => Ok(FilterKey::MineralTypeId),
            "contractStatusId" => Ok(FilterKey::ContractStatusId),
            "sponsoringState" => Ok(FilterKey::SponsoringState),
            "year" | "contractualYear" => Ok(FilterKey::Year),
            "cruiseId" => Ok(FilterKey::CruiseId),
            "locationId" | "location" => Ok(FilterKey::LocationId),
            "search" | "searchText" => Ok(FilterKey::Search),
            other => Err(ExplorerError::UnknownFilterKey(other.to_string())),
        }
    }
}

/// Current filter selections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<FilterKey, String>,
    revision: u64,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a filter.
    ///
    /// `None`, blank strings and the `"all"` sentinel remove the key.
    /// Returns true if the map changed.
    pub fn set_filter(&mut self, key: FilterKey, value: Option<&str>) -> bool {
        let normalized = value
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_SENTINEL));

        let changed = match normalized {
            Some(v) if self.values.get(&key).map(String::as_str) == Some(v) => false,
            Some(v) => {
                self.values.insert(key, v.to_string());
                true
            }
            None => self.values.remove(&key).is_some(),
        };
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Clear every filter. Returns true if anything was set.
    pub fn clear(&mut self) -> bool {
        if self.values.is_empty() {
            return false;
        }
        self.values.clear();
        self.revision += 1;
        true
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The single active key, if exactly one filter is set
    pub fn only_key(&self) -> Option<FilterKey> {
        if self.values.len() == 1 {
            self.values.keys().next().copied()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Monotonic change counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Parse an integer-valued filter
    pub fn get_i64(&self, key: FilterKey) -> Result<Option<i64>, ExplorerError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ExplorerError::InvalidFilter {
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Build a state from `(key, value)` pairs, skipping blank values
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ExplorerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = Self::new();
        for (k, v) in pairs {
            let key: FilterKey = k.as_ref().parse()?;
            state.set_filter(key, Some(v.as_ref()));
        }
        Ok(state)
    }
}
