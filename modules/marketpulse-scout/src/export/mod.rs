pub mod briefing;
pub mod csv;
pub mod dates;
pub mod evidence;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use marketpulse_common::{DashboardData, PulseError};

pub use briefing::{render_briefing, write_briefing, BriefingMeta};
pub use csv::{csv_file_name, moves_to_csv, write_csv};
pub use dates::{rank_date, sort_moves_by_recency, DateRank};
pub use evidence::{evidence_index, EvidenceEntry, EVIDENCE_LIMIT};

pub fn write_json<P: AsRef<Path>, T: ?Sized + Serialize>(path: P, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .map(|_| ())
        .map_err(|e| e.into())
}

pub fn dataset_file_name(date: NaiveDate) -> String {
    format!("market_pulse_{}.json", date.format("%Y-%m-%d"))
}

/// Files produced by one [`export_all`] call.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// `None` when the dataset had no moves.
    pub csv: Option<PathBuf>,
    pub briefing: PathBuf,
    pub dataset: PathBuf,
}

/// Write the CSV, the briefing and the raw dataset into `dir`, creating it
/// if needed.
pub fn export_all(dir: &Path, data: &DashboardData, meta: &BriefingMeta) -> Result<ExportReport> {
    fs::create_dir_all(dir)
        .map_err(|e| PulseError::Export(format!("cannot create {}: {e}", dir.display())))?;

    let csv = write_csv(dir, data, meta.generated_on)?;
    let briefing = write_briefing(dir, data, meta)?;
    let dataset = dir.join(dataset_file_name(meta.generated_on));
    write_json(&dataset, data)?;

    info!(dir = %dir.display(), csv = csv.is_some(), "Exports written");
    Ok(ExportReport {
        csv,
        briefing,
        dataset,
    })
}
