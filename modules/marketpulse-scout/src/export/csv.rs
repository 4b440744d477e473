use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

use marketpulse_common::{CompetitorMove, DashboardData};

pub const CSV_HEADER: [&str; 5] = ["Company", "Sector", "Summary", "Date", "Link"];

/// Quote a field and double any quotes inside it.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn move_row(m: &CompetitorMove) -> String {
    [
        quote(&m.company),
        quote(m.sector.as_str()),
        quote(&m.summary),
        quote(&m.date),
        quote(&m.link),
    ]
    .join(",")
}

/// CSV body for the moves table, or `None` when there is nothing to export.
/// Rows are joined by `\n` with no trailing newline.
pub fn moves_to_csv(moves: &[CompetitorMove]) -> Option<String> {
    if moves.is_empty() {
        return None;
    }
    let mut lines = Vec::with_capacity(moves.len() + 1);
    lines.push(CSV_HEADER.join(","));
    lines.extend(moves.iter().map(move_row));
    Some(lines.join("\n"))
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("market_pulse_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the moves CSV into `dir`. Returns the path written, or `None` when
/// the dataset has no moves (no file is created in that case).
pub fn write_csv(dir: &Path, data: &DashboardData, date: NaiveDate) -> Result<Option<PathBuf>> {
    let Some(body) = moves_to_csv(&data.moves) else {
        debug!("No moves to export, skipping CSV");
        return Ok(None);
    };
    let path = dir.join(csv_file_name(date));
    fs::write(&path, body)?;
    info!(path = %path.display(), rows = data.moves.len(), "Wrote moves CSV");
    Ok(Some(path))
}
