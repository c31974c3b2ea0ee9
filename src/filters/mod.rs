//! Client-side filtering
//!
//! - [`state`]: the filter store
//! - [`engine`]: derives filtered snapshots from the cached original
//! - [`options`]: lookup catalog and dropdown availability
//! - [`regions`]: named regions for the location filter

pub mod engine;
pub mod options;
pub mod regions;
pub mod state;

pub use engine::{filter_existing_data, select, FilterSelection};
pub use options::{
    compute_availability, Dimension, FilterOptionsCatalog, OptionAvailability, OptionState,
};
pub use regions::{Region, REGIONS};
pub use state::{FilterKey, FilterState, ALL_SENTINEL};
