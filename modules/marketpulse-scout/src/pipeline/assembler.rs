//! Turns the parsed payload into typed dataset sections.
//!
//! Every section has a default. A section of the wrong JSON shape (a string
//! where an array belongs, an array where an object belongs) is treated as
//! absent. Entries of the wrong shape inside an array are dropped one by one.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use marketpulse_common::{
    CompetitorMove, DashboardData, InsightType, PestelData, RadarData, StrategicInsight,
    SwotData, DEFAULT_RISK,
};

use super::dedup::dedup_links;
use super::grounding::LinkSet;
use super::parser::json_kind;

const UNKNOWN_COMPANY: &str = "Unknown";
const DEFAULT_SUMMARY: &str = "No summary available";
const DEFAULT_DATE: &str = "Recent";

/// One entry of the payload's `moves` array, before link reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRecord {
    /// Position in the original `moves` array.
    pub index: usize,
    pub company: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub date: Option<String>,
    pub sector: Option<String>,
}

impl MoveRecord {
    pub fn company_or_default(&self) -> &str {
        self.company.as_deref().unwrap_or(UNKNOWN_COMPANY)
    }

    /// Finish the record with its reconciled link, applying field defaults.
    pub fn into_move(self, link: String) -> CompetitorMove {
        CompetitorMove {
            id: format!("move-{}", self.index),
            company: self
                .company
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            link,
            summary: self
                .summary
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            date: self.date.unwrap_or_else(|| DEFAULT_DATE.to_string()),
            sector: marketpulse_common::Sector::from_label(self.sector.as_deref()),
        }
    }
}

/// Entries of the `moves` array, in order. Non-object entries are skipped but
/// still consume their index, so ids keep matching array positions.
pub fn move_records(payload: &Map<String, Value>) -> Vec<MoveRecord> {
    section_array(payload, "moves")
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let Some(obj) = value.as_object() else {
                warn!(index, kind = json_kind(value), "Skipping non-object move entry");
                return None;
            };
            Some(MoveRecord {
                index,
                company: text_field(obj, "company"),
                link: text_field(obj, "link"),
                summary: text_field(obj, "summary"),
                date: text_field(obj, "date"),
                sector: text_field(obj, "sector"),
            })
        })
        .collect()
}

pub fn insights(payload: &Map<String, Value>) -> Vec<StrategicInsight> {
    section_array(payload, "insights")
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| StrategicInsight {
            title: text_field(obj, "title").unwrap_or_default(),
            description: text_field(obj, "description").unwrap_or_default(),
            kind: InsightType::from_label(text_field(obj, "type").as_deref()),
        })
        .collect()
}

/// Radar entries. Missing scores read as 0; a missing or zero `risk` reads
/// as [`DEFAULT_RISK`]. Out-of-range scores pass through unclamped.
pub fn radar(payload: &Map<String, Value>) -> Vec<RadarData> {
    section_array(payload, "radar")
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| RadarData {
            company: text_field(obj, "company").unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            innovation: number_field(obj, "innovation").unwrap_or(0.0),
            impact: number_field(obj, "impact").unwrap_or(0.0),
            risk: number_field(obj, "risk")
                .filter(|r| *r != 0.0)
                .unwrap_or(DEFAULT_RISK),
        })
        .collect()
}

pub fn pestel(payload: &Map<String, Value>) -> PestelData {
    let mut pestel = PestelData::default();
    let Some(obj) = section_object(payload, "pestel") else {
        return pestel;
    };
    for key in PestelData::KEYS {
        if let Some(items) = pestel.category_mut(key) {
            *items = string_list(obj.get(key));
        }
    }
    pestel
}

pub fn swot(payload: &Map<String, Value>) -> BTreeMap<String, SwotData> {
    let Some(obj) = section_object(payload, "swot") else {
        return BTreeMap::new();
    };
    obj.iter()
        .filter_map(|(company, value)| {
            let Some(quadrants) = value.as_object() else {
                debug!(company = company.as_str(), "Skipping non-object SWOT entry");
                return None;
            };
            let mut entry = SwotData::default();
            for key in SwotData::KEYS {
                if let Some(items) = entry.quadrant_mut(key) {
                    *items = string_list(quadrants.get(key));
                }
            }
            Some((company.clone(), entry))
        })
        .collect()
}

/// Build the final dataset. `payload` is `None` when parsing failed, in which
/// case only the moves and links that were passed in survive (normally none
/// and the grounding links respectively).
pub fn assemble(
    payload: Option<&Map<String, Value>>,
    moves: Vec<CompetitorMove>,
    links: LinkSet,
) -> DashboardData {
    let links = dedup_links(links.into_vec());
    let Some(payload) = payload else {
        return DashboardData {
            moves,
            links,
            ..DashboardData::default()
        };
    };
    DashboardData {
        moves,
        links,
        insights: insights(payload),
        radar: radar(payload),
        pestel: pestel(payload),
        swot: swot(payload),
    }
}

// --- Field helpers ---

fn section_array<'a>(payload: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match payload.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => {
            warn!(section = key, kind = json_kind(other), "Expected array, using default");
            &[]
        }
    }
}

fn section_object<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    match payload.get(key) {
        Some(Value::Object(obj)) => Some(obj),
        None | Some(Value::Null) => None,
        Some(other) => {
            warn!(section = key, kind = json_kind(other), "Expected object, using default");
            None
        }
    }
}

/// A non-blank string field. Other JSON types count as missing.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

/// String entries of an array; anything that is not an array yields empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
