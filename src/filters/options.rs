//! Filter option catalog and dropdown availability
//!
//! The catalog is loaded once from the `/MapFilter/*` lookup endpoints. Given
//! the currently displayed data, [`compute_availability`] marks which options
//! would still produce results.

use super::engine::same_label;
use super::regions::REGIONS;
use super::state::{FilterKey, FilterState};
use crate::error::ExplorerError;
use seabed_types::{ContractStatus, ContractType, Contractor, ContractorRef, Cruise, MapData};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Known values for every filterable dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptionsCatalog {
    pub contract_types: Vec<ContractType>,
    pub contract_statuses: Vec<ContractStatus>,
    pub sponsoring_states: Vec<String>,
    pub contractual_years: Vec<i32>,
    pub contractors: Vec<ContractorRef>,
}

impl FilterOptionsCatalog {
    /// Resolve a contract (mineral) type id to its name
    pub fn contract_type_name(&self, id: &str) -> Result<&str, ExplorerError> {
        let parsed = parse_id(FilterKey::MineralTypeId, id)?;
        self.contract_types
            .iter()
            .find(|t| t.contract_type_id == parsed)
            .map(|t| t.contract_type_name.as_str())
            .ok_or_else(|| ExplorerError::UnknownOption {
                dimension: FilterKey::MineralTypeId.to_string(),
                id: id.to_string(),
            })
    }

    /// Resolve a contract status id to its name
    pub fn contract_status_name(&self, id: &str) -> Result<&str, ExplorerError> {
        let parsed = parse_id(FilterKey::ContractStatusId, id)?;
        self.contract_statuses
            .iter()
            .find(|s| s.contract_status_id == parsed)
            .map(|s| s.contract_status_name.as_str())
            .ok_or_else(|| ExplorerError::UnknownOption {
                dimension: FilterKey::ContractStatusId.to_string(),
                id: id.to_string(),
            })
    }

    /// Fill lists the API did not provide from a full snapshot
    pub fn fill_missing_from(&mut self, original: &MapData) {
        if self.contractors.is_empty() {
            self.contractors = original
                .contractors
                .iter()
                .map(|c| ContractorRef {
                    contractor_id: c.contractor_id,
                    contractor_name: c.contractor_name.clone(),
                })
                .collect();
        }
        if self.sponsoring_states.is_empty() {
            let states: BTreeSet<&str> = original
                .contractors
                .iter()
                .map(|c| c.sponsoring_state.as_str())
                .filter(|s| !s.is_empty())
                .collect();
            self.sponsoring_states = states.into_iter().map(str::to_string).collect();
        }
        if self.contractual_years.is_empty() {
            let years: BTreeSet<i32> = original
                .contractors
                .iter()
                .filter_map(|c| c.contractual_year)
                .collect();
            self.contractual_years = years.into_iter().collect();
        }
    }
}

fn parse_id(key: FilterKey, raw: &str) -> Result<i64, ExplorerError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ExplorerError::InvalidFilter {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

/// Dropdowns shown in the filter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Dimension {
    Contractor,
    MineralType,
    ContractStatus,
    SponsoringState,
    Year,
    Location,
    Cruise,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Contractor,
        Dimension::MineralType,
        Dimension::ContractStatus,
        Dimension::SponsoringState,
        Dimension::Year,
        Dimension::Location,
        Dimension::Cruise,
    ];

    pub fn filter_key(&self) -> FilterKey {
        match self {
            Dimension::Contractor => FilterKey::ContractorId,
            Dimension::MineralType => FilterKey::MineralTypeId,
            Dimension::ContractStatus => FilterKey::ContractStatusId,
            Dimension::SponsoringState => FilterKey::SponsoringState,
            Dimension::Year => FilterKey::Year,
            Dimension::Location => FilterKey::LocationId,
            Dimension::Cruise => FilterKey::CruiseId,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionState {
    /// Value written into the filter when chosen
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionAvailability {
    pub dimensions: BTreeMap<Dimension, Vec<OptionState>>,
}

impl OptionAvailability {
    pub fn options(&self, dimension: Dimension) -> &[OptionState] {
        self.dimensions
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn enabled_values(&self, dimension: Dimension) -> Vec<&str> {
        self.options(dimension)
            .iter()
            .filter(|o| !o.disabled)
            .map(|o| o.value.as_str())
            .collect()
    }
}

/// Mark options absent from `filtered` as disabled.
///
/// When a dimension is the only active filter its own options all stay
/// enabled, so the user can jump straight to a sibling value.
pub fn compute_availability(
    filtered: &MapData,
    original: &MapData,
    catalog: &FilterOptionsCatalog,
    filters: &FilterState,
) -> OptionAvailability {
    let sole = filters.only_key();
    let mut availability = OptionAvailability::default();

    for dimension in Dimension::ALL {
        let keep_all = sole == Some(dimension.filter_key());
        let entries = known_options(dimension, original, catalog);
        let present = present_values(dimension, filtered, catalog);
        let states = entries
            .into_iter()
            .map(|(value, label)| OptionState {
                disabled: !keep_all && !present.contains(&value),
                value,
                label,
            })
            .collect();
        availability.dimensions.insert(dimension, states);
    }

    availability
}

fn known_options(
    dimension: Dimension,
    original: &MapData,
    catalog: &FilterOptionsCatalog,
) -> Vec<(String, String)> {
    match dimension {
        Dimension::Contractor => {
            if catalog.contractors.is_empty() {
                original
                    .contractors
                    .iter()
                    .map(|c| (c.contractor_id.to_string(), c.contractor_name.clone()))
                    .collect()
            } else {
                catalog
                    .contractors
                    .iter()
                    .map(|c| (c.contractor_id.to_string(), c.contractor_name.clone()))
                    .collect()
            }
        }
        Dimension::MineralType => catalog
            .contract_types
            .iter()
            .map(|t| (t.contract_type_id.to_string(), t.contract_type_name.clone()))
            .collect(),
        Dimension::ContractStatus => catalog
            .contract_statuses
            .iter()
            .map(|s| {
                (
                    s.contract_status_id.to_string(),
                    s.contract_status_name.clone(),
                )
            })
            .collect(),
        Dimension::SponsoringState => catalog
            .sponsoring_states
            .iter()
            .map(|s| (s.clone(), s.clone()))
            .collect(),
        Dimension::Year => catalog
            .contractual_years
            .iter()
            .map(|y| (y.to_string(), y.to_string()))
            .collect(),
        Dimension::Location => REGIONS
            .iter()
            .map(|r| (r.id.to_string(), r.name.to_string()))
            .collect(),
        Dimension::Cruise => original
            .cruises
            .iter()
            .map(|c| (c.cruise_id.to_string(), c.cruise_name.clone()))
            .collect(),
    }
}

fn present_values(
    dimension: Dimension,
    filtered: &MapData,
    catalog: &FilterOptionsCatalog,
) -> HashSet<String> {
    let contractors = &filtered.contractors;
    match dimension {
        Dimension::Contractor => contractors
            .iter()
            .map(|c| c.contractor_id.to_string())
            .collect(),
        Dimension::MineralType => catalog
            .contract_types
            .iter()
            .filter(|t| has_contract_type(contractors, &t.contract_type_name))
            .map(|t| t.contract_type_id.to_string())
            .collect(),
        Dimension::ContractStatus => catalog
            .contract_statuses
            .iter()
            .filter(|s| {
                contractors
                    .iter()
                    .any(|c| same_label(&c.contract_status, &s.contract_status_name))
            })
            .map(|s| s.contract_status_id.to_string())
            .collect(),
        Dimension::SponsoringState => contractors
            .iter()
            .map(|c| c.sponsoring_state.clone())
            .collect(),
        Dimension::Year => contractors
            .iter()
            .filter_map(|c| c.contractual_year)
            .map(|y| y.to_string())
            .collect(),
        Dimension::Location => REGIONS
            .iter()
            .filter(|r| {
                contractors
                    .iter()
                    .any(|c| c.anchor_points().into_iter().any(|p| r.contains(p)))
                    || filtered.cruises.iter().any(|c| cruise_touches(c, r))
            })
            .map(|r| r.id.to_string())
            .collect(),
        Dimension::Cruise => filtered
            .cruises
            .iter()
            .map(|c| c.cruise_id.to_string())
            .collect(),
    }
}

fn has_contract_type(contractors: &[Contractor], type_name: &str) -> bool {
    contractors
        .iter()
        .any(|c| same_label(&c.contract_type, type_name))
}

fn cruise_touches(cruise: &Cruise, region: &super::regions::Region) -> bool {
    cruise
        .stations
        .iter()
        .filter_map(|s| s.position())
        .chain(cruise.center())
        .any(|p| region.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seabed_types::Area;

    fn catalog() -> FilterOptionsCatalog {
        FilterOptionsCatalog {
            contract_types: vec![
                ContractType {
                    contract_type_id: 1,
                    contract_type_name: "Nodules".to_string(),
                },
                ContractType {
                    contract_type_id: 2,
                    contract_type_name: "Sulphides".to_string(),
                },
                ContractType {
                    contract_type_id: 3,
                    contract_type_name: "Crusts".to_string(),
                },
            ],
            contract_statuses: vec![ContractStatus {
                contract_status_id: 1,
                contract_status_name: "Active".to_string(),
            }],
            ..Default::default()
        }
    }

    fn data() -> MapData {
        MapData {
            contractors: vec![
                Contractor {
                    contractor_id: 1,
                    contractor_name: "A".to_string(),
                    contract_type: "Nodules".to_string(),
                    contract_status: "Active".to_string(),
                    sponsoring_state: "Japan".to_string(),
                    contractual_year: Some(2001),
                    contractor_areas: vec![Area {
                        center_latitude: Some(12.0),
                        center_longitude: Some(-130.0),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                Contractor {
                    contractor_id: 2,
                    contractor_name: "B".to_string(),
                    contract_type: "Sulphides".to_string(),
                    contract_status: "Active".to_string(),
                    sponsoring_state: "France".to_string(),
                    contractual_year: Some(2012),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.contract_type_name("2").unwrap(), "Sulphides");
        assert!(matches!(
            catalog.contract_type_name("9"),
            Err(ExplorerError::UnknownOption { .. })
        ));
        assert!(matches!(
            catalog.contract_status_name("x"),
            Err(ExplorerError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_fill_missing_from_snapshot() {
        let mut catalog = catalog();
        catalog.fill_missing_from(&data());
        assert_eq!(catalog.sponsoring_states, vec!["France", "Japan"]);
        assert_eq!(catalog.contractual_years, vec![2001, 2012]);
        assert_eq!(catalog.contractors.len(), 2);
    }

    #[test]
    fn test_absent_values_disabled() {
        let original = data();
        let filtered = MapData {
            contractors: vec![original.contractors[0].clone()],
            ..Default::default()
        };
        let mut filters = FilterState::new();
        filters.set_filter(FilterKey::SponsoringState, Some("Japan"));
        filters.set_filter(FilterKey::Year, Some("2001"));

        let availability = compute_availability(&filtered, &original, &catalog(), &filters);
        assert_eq!(availability.enabled_values(Dimension::MineralType), vec!["1"]);
        assert_eq!(availability.enabled_values(Dimension::Contractor), vec!["1"]);
        assert_eq!(
            availability.enabled_values(Dimension::Location),
            vec!["clarion-clipperton-zone"]
        );
    }

    #[test]
    fn test_sole_dimension_keeps_siblings_enabled() {
        let original = data();
        let filtered = MapData {
            contractors: vec![original.contractors[0].clone()],
            ..Default::default()
        };
        let mut filters = FilterState::new();
        filters.set_filter(FilterKey::MineralTypeId, Some("1"));

        let availability = compute_availability(&filtered, &original, &catalog(), &filters);
        assert!(availability
            .options(Dimension::MineralType)
            .iter()
            .all(|o| !o.disabled));
        // other dimensions still narrow
        assert_eq!(availability.enabled_values(Dimension::Contractor), vec!["1"]);
    }

    #[test]
    fn test_type_labels_match_loosely() {
        let mut original = data();
        original.contractors[0].contract_type = "  nodules ".to_string();
        let mut filters = FilterState::new();
        filters.set_filter(FilterKey::SponsoringState, Some("Japan"));
        let filtered = MapData {
            contractors: vec![original.contractors[0].clone()],
            ..Default::default()
        };

        let availability = compute_availability(&filtered, &original, &catalog(), &filters);
        assert_eq!(availability.enabled_values(Dimension::MineralType), vec!["1"]);
    }
}
