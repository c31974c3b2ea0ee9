//! Data cache and filter synchronisation
//!
//! Two snapshots are kept: `original`, the last unfiltered fetch, and `current`,
//! what the view renders. Both are shared `Arc`s; "unchanged" always means
//! pointer-equal, never deep-equal.
//!
//! Fetches are split into [`DataCache::begin_refresh`] and
//! [`DataCache::complete_refresh`] so several may be in flight. Each carries a
//! request token, and only the most recently issued one may write.

use crate::api::{MapDataSource, QueryParams};
use crate::error::ExplorerError;
use crate::filters::{filter_existing_data, FilterOptionsCatalog, FilterState};
use seabed_types::MapData;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handle for one in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    token: u64,
    filter_revision: u64,
    replaces_original: bool,
    params: QueryParams,
}

impl RefreshTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Query parameters to send with the request
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// True when the fetch was issued with no filters active
    pub fn replaces_original(&self) -> bool {
        self.replaces_original
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { replaced_original: bool },
    Failed,
    /// A newer request was issued; this response was dropped
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    /// `current` was recomputed from `original` by the filter engine
    Rederived,
    /// Filters are empty and `current` now points at `original`
    ResetToOriginal,
    /// No original snapshot yet; the caller must fetch
    FetchRequired,
}

#[derive(Debug)]
pub struct DataCache {
    original: Option<Arc<MapData>>,
    original_generation: u64,
    current: Arc<MapData>,
    error: Option<String>,
    issued: u64,
    pending: Option<RefreshTicket>,
    fetched_revision: Option<u64>,
    derived_key: Option<(u64, u64)>,
}

impl Default for DataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DataCache {
    pub fn new() -> Self {
        Self {
            original: None,
            original_generation: 0,
            current: Arc::new(MapData::empty()),
            error: None,
            issued: 0,
            pending: None,
            fetched_revision: None,
            derived_key: None,
        }
    }

    pub fn original(&self) -> Option<&Arc<MapData>> {
        self.original.as_ref()
    }

    pub fn current(&self) -> &Arc<MapData> {
        &self.current
    }

    /// User-facing message from the last failed fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// True while the latest issued fetch has not completed
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Force the next [`DataCache::sync`] to re-run the engine, e.g. after
    /// the option catalog changed
    pub fn invalidate_derived(&mut self) {
        self.derived_key = None;
    }

    /// Issue a new request token for the current filters
    pub fn begin_refresh(&mut self, filters: &FilterState) -> RefreshTicket {
        self.issued += 1;
        let ticket = RefreshTicket {
            token: self.issued,
            filter_revision: filters.revision(),
            replaces_original: filters.is_empty(),
            params: QueryParams::from_filters(filters),
        };
        debug!(
            token = ticket.token,
            params = ?ticket.params.pairs(),
            "refresh issued"
        );
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Apply a fetch result, unless a newer request has been issued since
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<MapData, ExplorerError>,
    ) -> RefreshOutcome {
        if ticket.token != self.issued {
            warn!(
                token = ticket.token,
                latest = self.issued,
                "dropping stale response"
            );
            return RefreshOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(data) => {
                let data = Arc::new(data);
                if ticket.replaces_original {
                    self.original = Some(Arc::clone(&data));
                    self.original_generation += 1;
                    self.derived_key = None;
                }
                info!(
                    contractors = data.contractors.len(),
                    cruises = data.cruises.len(),
                    replaced_original = ticket.replaces_original,
                    "map data refreshed"
                );
                self.current = data;
                self.fetched_revision = Some(ticket.filter_revision);
                self.error = None;
                RefreshOutcome::Applied {
                    replaced_original: ticket.replaces_original,
                }
            }
            Err(err) => {
                warn!(error = %err, "map data refresh failed");
                self.error = Some(err.user_message());
                self.current = Arc::new(MapData::empty());
                self.fetched_revision = None;
                RefreshOutcome::Failed
            }
        }
    }

    /// Fetch and apply in one step
    pub async fn refresh_data(
        &mut self,
        source: &dyn MapDataSource,
        filters: &FilterState,
    ) -> RefreshOutcome {
        let ticket = self.begin_refresh(filters);
        let result = source.fetch_map_data(ticket.params()).await;
        self.complete_refresh(ticket, result)
    }

    /// React to a filter change without touching the network when possible
    pub fn sync(&mut self, filters: &FilterState, catalog: &FilterOptionsCatalog) -> SyncOutcome {
        let Some(original) = self.original.clone() else {
            let revision = Some(filters.revision());
            let in_flight = self.pending.as_ref().map(|t| t.filter_revision);
            if in_flight == revision || self.fetched_revision == revision {
                return SyncOutcome::Unchanged;
            }
            return SyncOutcome::FetchRequired;
        };

        if filters.is_empty() {
            return if self.replace_current(original) {
                SyncOutcome::ResetToOriginal
            } else {
                SyncOutcome::Unchanged
            };
        }

        let key = (filters.revision(), self.original_generation);
        if self.derived_key == Some(key) {
            return SyncOutcome::Unchanged;
        }
        let next = filter_existing_data(&original, filters, catalog);
        self.derived_key = Some(key);
        if self.replace_current(next) {
            SyncOutcome::Rederived
        } else {
            SyncOutcome::Unchanged
        }
    }

    fn replace_current(&mut self, next: Arc<MapData>) -> bool {
        if Arc::ptr_eq(&self.current, &next) {
            return false;
        }
        self.current = next;
        true
    }
}
