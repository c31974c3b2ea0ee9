//! Exploration API access
//!
//! [`MapDataSource`] is the boundary the cache and session talk to.
//! [`HttpApiClient`] implements it over HTTP; tests substitute an in-memory source.

pub mod http;
pub mod query;

use crate::error::Result;
use crate::filters::FilterOptionsCatalog;
use async_trait::async_trait;
use seabed_types::{BlockAnalytics, BlockId, ContractorId, ContractorSummary, MapData};

pub use http::HttpApiClient;
pub use query::{LibraryQuery, MediaQuery, QueryParams, SampleLookup, SampleQuery};

/// Source of map snapshots, filter lookups and analytics payloads
#[async_trait]
pub trait MapDataSource: Send + Sync {
    /// Fetch `/MapFilter/map-data` with the given query parameters
    async fn fetch_map_data(&self, params: &QueryParams) -> Result<MapData>;

    /// Load every `/MapFilter/*` lookup list
    async fn fetch_filter_options(&self) -> Result<FilterOptionsCatalog>;

    async fn fetch_contractor_summary(&self, id: ContractorId) -> Result<ContractorSummary>;

    async fn fetch_block_analytics(&self, id: BlockId) -> Result<BlockAnalytics>;
}
