//! Filter engine
//!
//! Derives the displayed snapshot from the cached original without touching it.
//! The engine first computes index sets of surviving contractors and cruises
//! against the original, then clones only the survivors into a new snapshot.
//!
//! Rules, in order:
//!
//! 1. Contractor predicates are ANDed (id, mineral type, status, sponsoring
//!    state, year, location, search text).
//! 2. Cruises follow their contractor, except that an active `contractorId`
//!    keeps every cruise of that contractor whatever else is set.
//! 3. With a location and no contractor filter, cruises must also have a
//!    station (or, lacking positions, their centre) inside the region.
//! 4. An active `cruiseId` forces that cruise and its contractor into the result.
//!
//! Any failure while compiling the filters falls back to the original snapshot.

use super::options::FilterOptionsCatalog;
use super::regions::{self, Region};
use super::state::{FilterKey, FilterState};
use crate::error::ExplorerError;
use seabed_types::{Contractor, ContractorId, Cruise, CruiseId, MapData};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Indices into the original snapshot that survive filtering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub contractors: BTreeSet<usize>,
    pub cruises: BTreeSet<usize>,
}

impl FilterSelection {
    /// Clone the selected entities out of `original`, preserving order
    pub fn materialize(&self, original: &MapData) -> MapData {
        MapData {
            contractors: self
                .contractors
                .iter()
                .filter_map(|&i| original.contractors.get(i).cloned())
                .collect(),
            cruises: self
                .cruises
                .iter()
                .filter_map(|&i| original.cruises.get(i).cloned())
                .collect(),
            library: original.library.clone(),
        }
    }
}

/// Filters resolved against the catalog, ready to test entities
#[derive(Debug, Clone, Default)]
struct Criteria<'a> {
    contractor_id: Option<ContractorId>,
    contract_type: Option<&'a str>,
    contract_status: Option<&'a str>,
    sponsoring_state: Option<&'a str>,
    year: Option<i32>,
    region: Option<&'static Region>,
    search: Option<String>,
    cruise_id: Option<CruiseId>,
}

impl<'a> Criteria<'a> {
    fn compile(
        filters: &'a FilterState,
        catalog: &'a FilterOptionsCatalog,
    ) -> Result<Self, ExplorerError> {
        let year = match filters.get_i64(FilterKey::Year)? {
            Some(y) => Some(i32::try_from(y).map_err(|_| ExplorerError::InvalidFilter {
                key: FilterKey::Year.to_string(),
                value: y.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            contractor_id: filters.get_i64(FilterKey::ContractorId)?,
            contract_type: filters
                .get(FilterKey::MineralTypeId)
                .map(|id| catalog.contract_type_name(id))
                .transpose()?,
            contract_status: filters
                .get(FilterKey::ContractStatusId)
                .map(|id| catalog.contract_status_name(id))
                .transpose()?,
            sponsoring_state: filters.get(FilterKey::SponsoringState),
            year,
            region: filters
                .get(FilterKey::LocationId)
                .map(regions::region)
                .transpose()?,
            search: filters.get(FilterKey::Search).map(str::to_lowercase),
            cruise_id: filters.get_i64(FilterKey::CruiseId)?,
        })
    }

    fn matches_contractor(&self, contractor: &Contractor) -> bool {
        if let Some(id) = self.contractor_id {
            if contractor.contractor_id != id {
                return false;
            }
        }
        if let Some(type_name) = self.contract_type {
            if !same_label(&contractor.contract_type, type_name) {
                return false;
            }
        }
        if let Some(status) = self.contract_status {
            if !same_label(&contractor.contract_status, status) {
                return false;
            }
        }
        if let Some(state) = self.sponsoring_state {
            if contractor.sponsoring_state.trim() != state {
                return false;
            }
        }
        if let Some(year) = self.year {
            if contractor.contractual_year != Some(year) {
                return false;
            }
        }
        if let Some(region) = self.region {
            if !contractor.anchor_points().into_iter().any(|p| region.contains(p)) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            if !contractor.contractor_name.to_lowercase().contains(needle) {
                return false;
            }
        }
        true
    }
}

/// Trimmed, ASCII case-insensitive label match
pub(crate) fn same_label(value: &str, expected: &str) -> bool {
    value.trim().eq_ignore_ascii_case(expected.trim())
}

/// Stations with coordinates decide; the cruise centre is the fallback
pub fn cruise_in_region(cruise: &Cruise, region: &Region) -> bool {
    let mut positions = cruise.stations.iter().filter_map(|s| s.position()).peekable();
    if positions.peek().is_some() {
        positions.any(|p| region.contains(p))
    } else {
        cruise.center().is_some_and(|p| region.contains(p))
    }
}

/// Compute surviving indices, or an error if a filter cannot be resolved
pub fn select(
    original: &MapData,
    filters: &FilterState,
    catalog: &FilterOptionsCatalog,
) -> Result<FilterSelection, ExplorerError> {
    let criteria = Criteria::compile(filters, catalog)?;

    let mut contractors: BTreeSet<usize> = original
        .contractors
        .iter()
        .enumerate()
        .filter(|(_, c)| criteria.matches_contractor(c))
        .map(|(i, _)| i)
        .collect();

    let surviving: HashSet<ContractorId> = contractors
        .iter()
        .map(|&i| original.contractors[i].contractor_id)
        .collect();

    let mut cruises: BTreeSet<usize> = original
        .cruises
        .iter()
        .enumerate()
        .filter(|(_, cruise)| {
            surviving.contains(&cruise.contractor_id)
                || criteria.contractor_id == Some(cruise.contractor_id)
        })
        .map(|(i, _)| i)
        .collect();

    if let (Some(region), None) = (criteria.region, criteria.contractor_id) {
        cruises.retain(|&i| cruise_in_region(&original.cruises[i], region));
    }

    if let Some(cruise_id) = criteria.cruise_id {
        match original
            .cruises
            .iter()
            .position(|c| c.cruise_id == cruise_id)
        {
            Some(idx) => {
                cruises.insert(idx);
                let owner = original.cruises[idx].contractor_id;
                if let Some(ci) = original
                    .contractors
                    .iter()
                    .position(|c| c.contractor_id == owner)
                {
                    contractors.insert(ci);
                }
            }
            None => debug!(cruise_id, "selected cruise is not in the cached dataset"),
        }
    }

    Ok(FilterSelection {
        contractors,
        cruises,
    })
}

/// Derive the filtered snapshot.
///
/// An empty filter map returns `original` itself. Filters that cannot be
/// resolved also return `original`, so the view never goes blank.
pub fn filter_existing_data(
    original: &Arc<MapData>,
    filters: &FilterState,
    catalog: &FilterOptionsCatalog,
) -> Arc<MapData> {
    if filters.is_empty() {
        return Arc::clone(original);
    }

    match select(original, filters, catalog) {
        Ok(selection) => {
            debug!(
                contractors = selection.contractors.len(),
                cruises = selection.cruises.len(),
                revision = filters.revision(),
                "filtered cached dataset"
            );
            Arc::new(selection.materialize(original))
        }
        Err(err) => {
            warn!(error = %err, "filtering failed, showing unfiltered data");
            Arc::clone(original)
        }
    }
}
