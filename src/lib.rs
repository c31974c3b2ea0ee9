//! Seabed Explorer - client core for the marine-exploration data API
//!
//! Fetches contractors, cruises, stations and samples from the exploration
//! REST API, filters them locally, tracks map selection, and exports CSV.
//!
//! ## Data flow
//! Filter change -> FilterState -> DataCache::sync -> filter engine -> current snapshot
//!
//! Network fetches only happen when no unfiltered original is cached yet, or
//! on an explicit refresh.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use seabed_explorer::{ExplorerConfig, ExplorerSession, FilterKey, HttpApiClient};
//!
//! # async fn run() -> seabed_explorer::Result<()> {
//! let config = ExplorerConfig::from_env()?;
//! let client = HttpApiClient::new(&config)?;
//! let mut session = ExplorerSession::with_config(Arc::new(client), &config);
//! session.refresh().await;
//! session.set_filter(FilterKey::ContractorId, Some("2")).await;
//! println!("{} cruises", session.data().cruises.len());
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Environment configuration
pub mod config;

// REST API access
pub mod api;

// Client-side filtering
pub mod filters;

// Snapshot cache and filter sync
pub mod cache;

// Map selection and detail panels
pub mod selection;

// Map event bus
pub mod events;

pub mod debounce;
pub mod export;
pub mod preferences;

// Facade tying the above together
pub mod session;

pub use api::{HttpApiClient, MapDataSource, QueryParams};
pub use cache::{DataCache, RefreshOutcome, SyncOutcome};
pub use config::ExplorerConfig;
pub use debounce::Debouncer;
pub use error::{ExplorerError, Result};
pub use events::{MapEvent, MapEventBus, Subscription};
pub use export::{convert_to_csv, export_filename, write_csv_file, ExportScope};
pub use filters::{filter_existing_data, Dimension, FilterKey, FilterOptionsCatalog, FilterState};
pub use preferences::{Language, LanguageStore};
pub use selection::{DetailPanel, SelectionState, ZoomTarget};
pub use session::ExplorerSession;

pub use seabed_types as types;
