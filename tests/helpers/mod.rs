//! Shared fixtures for integration tests
//!
//! `FakeSource` serves a fixed snapshot from memory and records every map-data
//! request so tests can assert when the network would have been hit.

#![allow(dead_code)]

use async_trait::async_trait;
use seabed_explorer::api::MapDataSource;
use seabed_explorer::filters::FilterOptionsCatalog;
use seabed_explorer::types::{
    Area, BlockAnalytics, BlockId, ContractStatus, ContractType, Contractor, ContractorId,
    ContractorSummary, Cruise, LibraryDocument, MapData, Sample, Station,
};
use seabed_explorer::{ExplorerError, QueryParams, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub struct FakeSource {
    pub data: MapData,
    pub catalog: FilterOptionsCatalog,
    pub fail: AtomicBool,
    pub requests: Mutex<Vec<QueryParams>>,
}

impl FakeSource {
    pub fn new(data: MapData) -> Self {
        Self {
            data,
            catalog: catalog(),
            fail: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(data: MapData) -> Self {
        let source = Self::new(data);
        source.fail.store(true, Ordering::SeqCst);
        source
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<QueryParams> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MapDataSource for FakeSource {
    async fn fetch_map_data(&self, params: &QueryParams) -> Result<MapData> {
        self.requests.lock().unwrap().push(params.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(ExplorerError::Status {
                endpoint: "MapFilter/map-data".to_string(),
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.data.clone())
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptionsCatalog> {
        Ok(self.catalog.clone())
    }

    async fn fetch_contractor_summary(&self, id: ContractorId) -> Result<ContractorSummary> {
        let contractor = self.data.contractor(id).ok_or_else(|| ExplorerError::Status {
            endpoint: format!("Analytics/contractor-summary/{}", id),
            status: 404,
            body: String::new(),
        })?;
        let cruises: Vec<&Cruise> = self.data.cruises_for(id).collect();
        Ok(ContractorSummary {
            contractor_id: id,
            contractor_name: contractor.contractor_name.clone(),
            total_cruises: cruises.len() as u32,
            total_stations: cruises.iter().map(|c| c.stations.len() as u32).sum(),
            ..Default::default()
        })
    }

    async fn fetch_block_analytics(&self, id: BlockId) -> Result<BlockAnalytics> {
        Ok(BlockAnalytics {
            block_id: id,
            block_name: format!("Block {}", id),
            ..Default::default()
        })
    }
}

pub fn catalog() -> FilterOptionsCatalog {
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
        ],
        contract_statuses: vec![ContractStatus {
            contract_status_id: 1,
            contract_status_name: "Active".to_string(),
        }],
        sponsoring_states: vec!["France".to_string(), "Japan".to_string()],
        contractual_years: vec![2001, 2014],
        contractors: Vec::new(),
    }
}

/// Contractor A (id 1, Nodules, France) with cruises 10 and 11;
/// contractor B (id 2, Sulphides, Japan) with cruise 20.
pub fn dataset() -> MapData {
    MapData {
        contractors: vec![
            Contractor {
                contractor_id: 1,
                contractor_name: "Abyssal Nodules Ltd".to_string(),
                contract_type: "Nodules".to_string(),
                contract_status: "Active".to_string(),
                sponsoring_state: "France".to_string(),
                contractual_year: Some(2001),
                contractor_areas: vec![Area {
                    area_id: 100,
                    area_name: "CCZ East".to_string(),
                    center_latitude: Some(12.0),
                    center_longitude: Some(-125.0),
                    ..Default::default()
                }],
                ..Default::default()
            },
            Contractor {
                contractor_id: 2,
                contractor_name: "Benthic Sulphides Corp".to_string(),
                contract_type: "Sulphides".to_string(),
                contract_status: "Active".to_string(),
                sponsoring_state: "Japan".to_string(),
                contractual_year: Some(2014),
                contractor_areas: vec![Area {
                    area_id: 200,
                    area_name: "Ridge North".to_string(),
                    center_latitude: Some(25.0),
                    center_longitude: Some(-45.0),
                    ..Default::default()
                }],
                ..Default::default()
            },
        ],
        cruises: vec![
            cruise(10, 1, 101, (12.5, -126.0)),
            cruise(11, 1, 111, (11.0, -124.0)),
            cruise(20, 2, 201, (24.0, -44.0)),
        ],
        library: vec![LibraryDocument {
            library_id: 1,
            contractor_id: Some(1),
            title: "Baseline survey".to_string(),
            ..Default::default()
        }],
    }
}

/// Contractor A (id 1) with a single cruise
pub fn single_contractor() -> MapData {
    MapData {
        contractors: vec![Contractor {
            contractor_id: 1,
            contractor_name: "A".to_string(),
            ..Default::default()
        }],
        cruises: vec![cruise(1, 1, 1, (10.0, -130.0))],
        ..Default::default()
    }
}

fn cruise(id: i64, contractor_id: i64, station_id: i64, (lat, lon): (f64, f64)) -> Cruise {
    Cruise {
        cruise_id: id,
        contractor_id,
        cruise_name: format!("Cruise {}", id),
        stations: vec![Station {
            station_id,
            cruise_id: id,
            station_code: format!("ST-{}", station_id),
            latitude: Some(lat),
            longitude: Some(lon),
            samples: vec![Sample {
                sample_id: station_id * 10,
                station_id,
                sample_code: format!("SM-{}", station_id),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}
