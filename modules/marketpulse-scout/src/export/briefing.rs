//! Paginated Markdown briefing.
//!
//! One section per page, each rendered on its own from the dataset. Pages are
//! separated by a horizontal rule and carry a `Page n of m` footer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use marketpulse_common::{DashboardData, InsightType, RadarData, Sector};

use super::dates::sort_moves_by_recency;
use super::evidence::{evidence_index, EVIDENCE_LIMIT};

#[derive(Debug, Clone)]
pub struct BriefingMeta {
    pub client_name: String,
    pub generated_on: NaiveDate,
}

pub fn briefing_file_name(date: NaiveDate) -> String {
    format!("market_pulse_briefing_{}.md", date.format("%Y-%m-%d"))
}

pub fn render_briefing(data: &DashboardData, meta: &BriefingMeta) -> String {
    let pages = [
        render_pulse_metrics(data, meta),
        render_pestel_grid(data),
        render_radar_table(data),
        render_move_table(data),
        render_evidence_index(data),
    ];
    let total = pages.len();

    let mut md = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            md.push_str("\n---\n\n");
        }
        md.push_str(page);
        md.push_str(&format!("\n_Page {} of {}_\n", i + 1, total));
    }
    md
}

pub fn write_briefing(dir: &Path, data: &DashboardData, meta: &BriefingMeta) -> Result<PathBuf> {
    let path = dir.join(briefing_file_name(meta.generated_on));
    fs::write(&path, render_briefing(data, meta))?;
    info!(path = %path.display(), "Wrote briefing document");
    Ok(path)
}

// --- Pages ---

fn render_pulse_metrics(data: &DashboardData, meta: &BriefingMeta) -> String {
    let mut md = String::new();
    md.push_str(&format!("# {} Market Pulse Briefing\n\n", meta.client_name));
    md.push_str(&format!(
        "Generated {}\n\n",
        meta.generated_on.format("%Y-%m-%d")
    ));
    md.push_str("## Pulse Metrics\n\n");

    let sourced = data.moves.iter().filter(|m| m.has_source()).count();
    let count_kind = |kind: InsightType| data.insights.iter().filter(|i| i.kind == kind).count();

    md.push_str("| Metric | Value |\n|---|---|\n");
    md.push_str(&format!(
        "| Competitor moves | {} ({} sourced) |\n",
        data.moves.len(),
        sourced
    ));
    md.push_str(&format!("| Evidence links | {} |\n", data.links.len()));
    md.push_str(&format!("| Companies on radar | {} |\n", data.radar.len()));
    md.push_str(&format!(
        "| Avg innovation | {} |\n",
        average(&data.radar, |r| r.innovation)
    ));
    md.push_str(&format!("| Avg impact | {} |\n", average(&data.radar, |r| r.impact)));
    md.push_str(&format!("| Avg risk | {} |\n", average(&data.radar, |r| r.risk)));
    md.push_str(&format!(
        "| Insights | {} opportunities, {} threats, {} questions |\n",
        count_kind(InsightType::Opportunity),
        count_kind(InsightType::Threat),
        count_kind(InsightType::StrategicQuestion)
    ));
    if let Some(leader) = data
        .radar
        .iter()
        .max_by(|a, b| a.innovation.total_cmp(&b.innovation))
    {
        md.push_str(&format!(
            "| Innovation leader | {} ({:.0}) |\n",
            cell(&leader.company),
            leader.innovation
        ));
    }

    md.push_str("\n### Moves by sector\n\n");
    for sector in [Sector::Marketing, Sector::Sales, Sector::Digital, Sector::Other] {
        let n = data.moves.iter().filter(|m| m.sector == sector).count();
        md.push_str(&format!("- {sector}: {n}\n"));
    }
    md
}

fn render_pestel_grid(data: &DashboardData) -> String {
    let mut md = String::from("## PESTEL Analysis\n\n| Factor | Signals |\n|---|---|\n");
    for (label, items) in data.pestel.categories() {
        let signals = if items.is_empty() {
            "_None reported_".to_string()
        } else {
            items.iter().map(|s| cell(s)).collect::<Vec<_>>().join("; ")
        };
        md.push_str(&format!("| {label} | {signals} |\n"));
    }
    md
}

fn render_radar_table(data: &DashboardData) -> String {
    let mut md = String::from("## Competitive Radar\n\n");
    if data.radar.is_empty() {
        md.push_str("_No radar data._\n");
        return md;
    }
    md.push_str("| Company | Innovation | Impact | Risk |\n|---|---:|---:|---:|\n");
    for r in &data.radar {
        md.push_str(&format!(
            "| {} | {:.0} | {:.0} | {:.0} |\n",
            cell(&r.company),
            r.innovation,
            r.impact,
            r.risk
        ));
    }
    md
}

fn render_move_table(data: &DashboardData) -> String {
    let mut md = String::from("## Competitor Moves\n\n");
    if data.moves.is_empty() {
        md.push_str("_No moves recorded._\n");
        return md;
    }
    md.push_str("| Date | Company | Sector | Summary | Source |\n|---|---|---|---|---|\n");
    for m in sort_moves_by_recency(&data.moves) {
        let source = if m.has_source() {
            format!("[link]({})", m.link)
        } else {
            "No source".to_string()
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(&m.date),
            cell(&m.company),
            m.sector,
            cell(&m.summary),
            source
        ));
    }
    md
}

fn render_evidence_index(data: &DashboardData) -> String {
    let mut md = String::from("## Evidence Index\n\n");
    let entries = evidence_index(&data.links, EVIDENCE_LIMIT);
    if entries.is_empty() {
        md.push_str("_No evidence indexed yet._\n");
        return md;
    }
    for (i, entry) in entries.iter().enumerate() {
        md.push_str(&format!(
            "{}. [{}]({}) ({})\n",
            i + 1,
            entry.label.replace(['[', ']'], ""),
            entry.uri,
            entry.host.as_deref().unwrap_or("unknown host")
        ));
    }
    md
}

// --- Helpers ---

/// Table-safe cell text: no pipes, no line breaks.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn average(radar: &[RadarData], score: impl Fn(&RadarData) -> f64) -> String {
    if radar.is_empty() {
        return "n/a".to_string();
    }
    let total: f64 = radar.iter().map(score).sum();
    format!("{:.1}", total / radar.len() as f64)
}
