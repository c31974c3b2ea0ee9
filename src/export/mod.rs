//! CSV export
//!
//! [`convert_to_csv`] flattens a snapshot; [`export_scope`] narrows it to one
//! contractor or cruise first; [`write_csv_file`] persists the result.

pub mod csv;

pub use self::csv::convert_to_csv;

use crate::error::{ExplorerError, Result};
use chrono::NaiveDate;
use seabed_types::{ContractorId, CruiseId, MapData};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// What part of a snapshot to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    #[default]
    All,
    Contractor(ContractorId),
    /// One cruise plus the contractor that ran it
    Cruise(CruiseId),
}

/// Narrow a snapshot before flattening
pub fn export_scope(data: &MapData, scope: ExportScope) -> Result<MapData> {
    match scope {
        ExportScope::All => Ok(data.clone()),
        ExportScope::Contractor(id) => {
            let contractor = data
                .contractor(id)
                .ok_or_else(|| ExplorerError::Export(format!("contractor {} not loaded", id)))?;
            Ok(MapData {
                contractors: vec![contractor.clone()],
                cruises: data.cruises_for(id).cloned().collect(),
                library: data
                    .library
                    .iter()
                    .filter(|doc| doc.contractor_id == Some(id))
                    .cloned()
                    .collect(),
            })
        }
        ExportScope::Cruise(id) => {
            let cruise = data
                .cruise(id)
                .ok_or_else(|| ExplorerError::Export(format!("cruise {} not loaded", id)))?;
            Ok(MapData {
                contractors: data
                    .contractor(cruise.contractor_id)
                    .cloned()
                    .into_iter()
                    .collect(),
                cruises: vec![cruise.clone()],
                library: Vec::new(),
            })
        }
    }
}

/// `{base}-{YYYY-MM-DD}.csv`
pub fn export_filename(base: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", base, date.format("%Y-%m-%d"))
}

/// Render `data` and write it to `dir/{base}-{date}.csv`.
///
/// The whole document is rendered before anything touches the disk, and the
/// file only appears once fully written.
pub fn write_csv_file(dir: &Path, base: &str, date: NaiveDate, data: &MapData) -> Result<PathBuf> {
    let body = convert_to_csv(data)?;
    let target = dir.join(export_filename(base, date));

    let io_err = |e: std::io::Error| ExplorerError::Export(format!("{}: {}", target.display(), e));
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(body.as_bytes()).map_err(io_err)?;
    tmp.persist(&target).map_err(|e| io_err(e.error))?;

    info!(
        path = %target.display(),
        bytes = body.len(),
        contractors = data.contractors.len(),
        cruises = data.cruises.len(),
        "csv export written"
    );
    Ok(target)
}
