//! Explorer session
//!
//! Single owner of the filter store, data cache, selection state, option
//! catalog and map event bus. Every view action goes through here, so the
//! order "filter change, then recompute, then re-render" holds everywhere.

use crate::api::MapDataSource;
use crate::cache::{DataCache, RefreshOutcome, SyncOutcome};
use crate::config::ExplorerConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::events::{MapEvent, MapEventBus};
use crate::export::{convert_to_csv, export_scope, write_csv_file, ExportScope};
use crate::filters::{
    compute_availability, FilterKey, FilterOptionsCatalog, FilterState, OptionAvailability,
};
use crate::selection::SelectionState;
use chrono::NaiveDate;
use seabed_types::{BlockId, ContractorId, CruiseId, MapData, StationId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub struct ExplorerSession {
    source: Arc<dyn MapDataSource>,
    filters: FilterState,
    cache: DataCache,
    selection: SelectionState,
    catalog: FilterOptionsCatalog,
    events: MapEventBus,
    search_debouncer: Debouncer,
    search_tx: mpsc::UnboundedSender<String>,
    search_rx: mpsc::UnboundedReceiver<String>,
}

impl ExplorerSession {
    pub fn new(source: Arc<dyn MapDataSource>) -> Self {
        Self::with_config(source, &ExplorerConfig::default())
    }

    pub fn with_config(source: Arc<dyn MapDataSource>, config: &ExplorerConfig) -> Self {
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        Self {
            source,
            filters: FilterState::new(),
            cache: DataCache::new(),
            selection: SelectionState::new(),
            catalog: FilterOptionsCatalog::default(),
            events: MapEventBus::new(),
            search_debouncer: Debouncer::new(config.search_debounce),
            search_tx,
            search_rx,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Snapshot the view renders
    pub fn data(&self) -> &Arc<MapData> {
        self.cache.current()
    }

    pub fn original(&self) -> Option<&Arc<MapData>> {
        self.cache.original()
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn catalog(&self) -> &FilterOptionsCatalog {
        &self.catalog
    }

    pub fn events(&self) -> &MapEventBus {
        &self.events
    }

    pub fn error(&self) -> Option<&str> {
        self.cache.error()
    }

    // ------------------------------------------------------------------
    // Data and filters
    // ------------------------------------------------------------------

    /// Load the dropdown lookup lists.
    ///
    /// A failed lookup load leaves the previous catalog in place.
    pub async fn load_options(&mut self) -> Result<()> {
        let mut catalog = self.source.fetch_filter_options().await?;
        if let Some(original) = self.cache.original() {
            catalog.fill_missing_from(original);
        }
        self.catalog = catalog;
        self.cache.invalidate_derived();
        self.sync();
        Ok(())
    }

    /// Fetch map data for the current filters
    pub async fn refresh(&mut self) -> RefreshOutcome {
        let outcome = self
            .cache
            .refresh_data(self.source.as_ref(), &self.filters)
            .await;
        if let RefreshOutcome::Applied {
            replaced_original: true,
        } = outcome
        {
            if let Some(original) = self.cache.original() {
                self.catalog.fill_missing_from(original);
            }
        }
        self.sync();
        outcome
    }

    /// Recompute `current` locally from `original`
    pub fn sync(&mut self) -> SyncOutcome {
        let outcome = self.cache.sync(&self.filters, &self.catalog);
        debug!(?outcome, revision = self.filters.revision(), "filters synced");
        outcome
    }

    async fn sync_or_fetch(&mut self) -> SyncOutcome {
        let outcome = self.sync();
        if outcome == SyncOutcome::FetchRequired {
            self.refresh().await;
        }
        outcome
    }

    /// Set or clear one filter and bring `current` up to date
    pub async fn set_filter(&mut self, key: FilterKey, value: Option<&str>) -> SyncOutcome {
        if !self.filters.set_filter(key, value) {
            return SyncOutcome::Unchanged;
        }
        self.sync_or_fetch().await
    }

    /// Record search keystrokes; only the text still standing after the
    /// debounce period reaches the filter store.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn type_search(&mut self, text: &str) {
        let tx = self.search_tx.clone();
        let text = text.to_string();
        self.search_debouncer.schedule(move || async move {
            // the receiver lives as long as the session
            let _ = tx.send(text);
        });
    }

    pub fn search_pending(&self) -> bool {
        self.search_debouncer.is_pending()
    }

    /// Wait out the debounce period and apply the last typed search text
    pub async fn settle_search(&mut self) -> SyncOutcome {
        self.search_debouncer.settle().await;
        let mut latest = None;
        while let Ok(text) = self.search_rx.try_recv() {
            latest = Some(text);
        }
        match latest {
            Some(text) => self.set_filter(FilterKey::Search, Some(text.as_str())).await,
            None => SyncOutcome::Unchanged,
        }
    }

    /// Clear all filters and selections and return the map to its default view
    pub async fn reset_filters(&mut self) -> SyncOutcome {
        self.search_debouncer.cancel();
        while self.search_rx.try_recv().is_ok() {}
        self.filters.clear();
        self.selection.reset();
        self.events.publish(MapEvent::ResetView);
        self.sync_or_fetch().await
    }

    /// Dropdown options with disabled flags for the current filters
    pub fn availability(&self) -> OptionAvailability {
        let current = self.cache.current();
        let original = self.cache.original().unwrap_or(current);
        compute_availability(current, original, &self.catalog, &self.filters)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    fn lookup_snapshot(&self) -> Arc<MapData> {
        self.cache
            .original()
            .unwrap_or_else(|| self.cache.current())
            .clone()
    }

    fn publish_pending_zoom(&self) {
        if let Some(target) = self.selection.pending_zoom() {
            self.events.publish(MapEvent::ZoomTo(target));
        }
    }

    /// Select a contractor: filter to it, show its cruises and zoom to its areas.
    ///
    /// A cruise filter that no longer matches the selection is dropped in the
    /// same step, so `current` is recomputed once.
    pub async fn select_contractor(&mut self, id: ContractorId) {
        let data = self.lookup_snapshot();
        let keeps_cruise = self.selection.contractor == Some(id)
            && self
                .filters
                .get(FilterKey::CruiseId)
                .and_then(|v| v.parse::<CruiseId>().ok())
                .and_then(|cruise| data.cruise(cruise))
                .is_some_and(|cruise| cruise.contractor_id == id);

        let value = id.to_string();
        let mut changed = self
            .filters
            .set_filter(FilterKey::ContractorId, Some(value.as_str()));
        if !keeps_cruise {
            changed |= self.filters.set_filter(FilterKey::CruiseId, None);
        }
        if changed {
            self.sync_or_fetch().await;
        }
        let data = self.lookup_snapshot();
        self.selection.select_contractor(id, &data);
        self.events.publish(MapEvent::ShowCruises(id));
        self.publish_pending_zoom();
    }

    pub async fn select_cruise(&mut self, id: CruiseId) {
        let value = id.to_string();
        self.set_filter(FilterKey::CruiseId, Some(value.as_str()))
            .await;
        let data = self.lookup_snapshot();
        self.selection.select_cruise(id, &data);
        self.events.publish(MapEvent::FocusCruise(id));
        self.publish_pending_zoom();
    }

    pub fn select_station(&mut self, id: StationId) {
        let data = self.lookup_snapshot();
        self.selection.select_station(id, &data);
        self.events.publish(MapEvent::FocusStation(id));
        self.publish_pending_zoom();
    }

    pub async fn open_contractor_summary(&mut self, id: ContractorId) -> Result<()> {
        match self.source.fetch_contractor_summary(id).await {
            Ok(summary) => {
                self.selection.show_contractor_summary(summary);
                Ok(())
            }
            Err(err) => {
                warn!(contractor = id, error = %err, "contractor summary unavailable");
                Err(err)
            }
        }
    }

    pub async fn open_block_analytics(&mut self, id: BlockId) -> Result<()> {
        match self.source.fetch_block_analytics(id).await {
            Ok(analytics) => {
                self.selection.show_block_analytics(analytics);
                Ok(())
            }
            Err(err) => {
                warn!(block = id, error = %err, "block analytics unavailable");
                Err(err)
            }
        }
    }

    pub fn close_panel(&mut self) {
        self.selection.close_panel();
    }

    /// The map finished a requested zoom
    pub fn map_zoomed(&mut self) {
        self.selection.zoom_completed();
    }

    pub fn user_moved_map(&mut self) {
        self.selection.user_moved_map();
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// CSV text for the current snapshot, optionally narrowed
    pub fn export_csv(&self, scope: ExportScope) -> Result<String> {
        let data = export_scope(self.cache.current(), scope)?;
        convert_to_csv(&data)
    }

    pub fn write_export(
        &self,
        dir: &Path,
        base: &str,
        date: NaiveDate,
        scope: ExportScope,
    ) -> Result<PathBuf> {
        let data = export_scope(self.cache.current(), scope)?;
        write_csv_file(dir, base, date, &data)
    }
}
