//! Selection and detail-panel state
//!
//! At most one contractor, cruise, station and block are selected at a time.
//! Selecting a contractor raises a "smart zoom" request that the map consumes.
//! A manual pan or zoom suppresses automatic zoom until the next explicit
//! selection or reset.

use seabed_types::{
    BlockAnalytics, BlockId, BoundingBox, ContractorId, ContractorSummary, CruiseId, GeoPoint,
    MapData, StationId,
};
use serde::Serialize;

/// Which detail panel is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetailPanel {
    Contractor,
    Cruise,
    Station,
    BlockAnalytics,
    ContractorSummary,
}

/// Where the map should move next
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ZoomTarget {
    Bounds(BoundingBox),
    Point(GeoPoint),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub contractor: Option<ContractorId>,
    pub cruise: Option<CruiseId>,
    pub station: Option<StationId>,
    pub block: Option<BlockId>,
    pub panel: Option<DetailPanel>,
    pub contractor_summary: Option<ContractorSummary>,
    pub block_analytics: Option<BlockAnalytics>,
    zoom_target: Option<ZoomTarget>,
    smart_zoom_pending: bool,
    auto_zoom_suppressed: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a contractor and request a zoom to its areas
    pub fn select_contractor(&mut self, id: ContractorId, data: &MapData) {
        if self.contractor != Some(id) {
            self.cruise = None;
            self.station = None;
            self.contractor_summary = None;
        }
        self.contractor = Some(id);
        self.panel = Some(DetailPanel::Contractor);
        self.request_zoom(contractor_zoom_target(data, id));
    }

    pub fn select_cruise(&mut self, id: CruiseId, data: &MapData) {
        if let Some(cruise) = data.cruise(id) {
            self.contractor = Some(cruise.contractor_id);
        }
        if self.cruise != Some(id) {
            self.station = None;
        }
        self.cruise = Some(id);
        self.panel = Some(DetailPanel::Cruise);
        self.request_zoom(cruise_zoom_target(data, id));
    }

    pub fn select_station(&mut self, id: StationId, data: &MapData) {
        let found = data
            .cruises
            .iter()
            .find_map(|c| c.stations.iter().find(|s| s.station_id == id).map(|s| (c, s)));
        if let Some((cruise, station)) = found {
            self.cruise = Some(cruise.cruise_id);
            self.contractor = Some(cruise.contractor_id);
            self.request_zoom(station.position().map(ZoomTarget::Point));
        }
        self.station = Some(id);
        self.panel = Some(DetailPanel::Station);
    }

    pub fn show_contractor_summary(&mut self, summary: ContractorSummary) {
        self.contractor = Some(summary.contractor_id);
        self.contractor_summary = Some(summary);
        self.panel = Some(DetailPanel::ContractorSummary);
    }

    pub fn show_block_analytics(&mut self, analytics: BlockAnalytics) {
        self.block = Some(analytics.block_id);
        self.block_analytics = Some(analytics);
        self.panel = Some(DetailPanel::BlockAnalytics);
    }

    pub fn close_panel(&mut self) {
        self.panel = None;
    }

    /// Drop every selection, panel, payload and zoom state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn request_zoom(&mut self, target: Option<ZoomTarget>) {
        // an explicit selection re-arms automatic zoom
        self.auto_zoom_suppressed = false;
        self.zoom_target = target;
        self.smart_zoom_pending = target.is_some();
    }

    /// Zoom the map should perform now, if any
    pub fn pending_zoom(&self) -> Option<ZoomTarget> {
        if self.smart_zoom_pending && !self.auto_zoom_suppressed {
            self.zoom_target
        } else {
            None
        }
    }

    /// The map finished the requested zoom
    pub fn zoom_completed(&mut self) {
        self.smart_zoom_pending = false;
    }

    /// The user panned or zoomed by hand
    pub fn user_moved_map(&mut self) {
        self.smart_zoom_pending = false;
        self.auto_zoom_suppressed = true;
    }

    pub fn auto_zoom_suppressed(&self) -> bool {
        self.auto_zoom_suppressed
    }
}

/// Bounding box of a contractor's area and block centres
pub fn contractor_zoom_target(data: &MapData, id: ContractorId) -> Option<ZoomTarget> {
    let contractor = data.contractor(id)?;
    let points = contractor.contractor_areas.iter().flat_map(|area| {
        area.center()
            .into_iter()
            .chain(area.blocks.iter().filter_map(|b| b.center()))
    });
    BoundingBox::enclosing(points).map(ZoomTarget::Bounds)
}

/// Bounding box of a cruise's stations, or its centre point
pub fn cruise_zoom_target(data: &MapData, id: CruiseId) -> Option<ZoomTarget> {
    let cruise = data.cruise(id)?;
    BoundingBox::enclosing(cruise.stations.iter().filter_map(|s| s.position()))
        .map(ZoomTarget::Bounds)
        .or_else(|| cruise.center().map(ZoomTarget::Point))
}
