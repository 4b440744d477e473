use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Link value for a move that has no usable source.
pub const NO_SOURCE_LINK: &str = "#";

/// Risk assumed for a radar entry that carries none.
pub const DEFAULT_RISK: f64 = 50.0;

// --- Producer input ---

/// Web citation inside a grounding chunk. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebCitation {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebCitation>,
}

impl GroundingChunk {
    pub fn web(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            web: Some(WebCitation {
                uri: Some(uri.into()),
                title: Some(title.into()),
            }),
        }
    }
}

/// What the producer hands back for one run: free text that should contain a
/// JSON report somewhere inside it, plus the search-grounding citations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawModelResponse {
    pub text: String,
    #[serde(default)]
    pub grounding: Vec<GroundingChunk>,
}

impl RawModelResponse {
    pub fn new(text: impl Into<String>, grounding: Vec<GroundingChunk>) -> Self {
        Self {
            text: text.into(),
            grounding,
        }
    }
}

// --- Dataset ---

/// A citation. Identity is the exact `uri`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundingLink {
    pub uri: String,
    pub title: String,
}

impl GroundingLink {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Marketing,
    Sales,
    Digital,
    Other,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Marketing => "Marketing",
            Sector::Sales => "Sales",
            Sector::Digital => "Digital",
            Sector::Other => "Other",
        }
    }

    /// Missing or blank labels mean `Digital`; unrecognized labels mean `Other`.
    pub fn from_label(label: Option<&str>) -> Self {
        let label = match label.map(str::trim) {
            Some(l) if !l.is_empty() => l,
            _ => return Sector::Digital,
        };
        match label.to_lowercase().as_str() {
            "marketing" => Sector::Marketing,
            "sales" => Sector::Sales,
            "digital" => Sector::Digital,
            _ => Sector::Other,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorMove {
    /// `move-<index>`; only stable within one normalization run.
    pub id: String,
    pub company: String,
    /// Absolute http(s) URL, or [`NO_SOURCE_LINK`].
    pub link: String,
    pub summary: String,
    pub date: String,
    pub sector: Sector,
}

impl CompetitorMove {
    pub fn has_source(&self) -> bool {
        self.link != NO_SOURCE_LINK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightType {
    Opportunity,
    Threat,
    #[serde(rename = "Strategic Question")]
    StrategicQuestion,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Opportunity => "Opportunity",
            InsightType::Threat => "Threat",
            InsightType::StrategicQuestion => "Strategic Question",
        }
    }

    /// Anything that is not clearly an opportunity or a threat is a question.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("opportunity") => InsightType::Opportunity,
            Some("threat") => InsightType::Threat,
            _ => InsightType::StrategicQuestion,
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicInsight {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
}

/// Radar position. Scores are nominally 0-100 but are not clamped here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarData {
    pub company: String,
    pub innovation: f64,
    pub impact: f64,
    pub risk: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PestelData {
    pub political: Vec<String>,
    pub economic: Vec<String>,
    pub social: Vec<String>,
    pub technological: Vec<String>,
    pub environmental: Vec<String>,
    pub legal: Vec<String>,
}

impl PestelData {
    /// Payload keys, in display order.
    pub const KEYS: [&'static str; 6] = [
        "political",
        "economic",
        "social",
        "technological",
        "environmental",
        "legal",
    ];

    /// `(label, items)` pairs in display order.
    pub fn categories(&self) -> [(&'static str, &[String]); 6] {
        [
            ("Political", self.political.as_slice()),
            ("Economic", self.economic.as_slice()),
            ("Social", self.social.as_slice()),
            ("Technological", self.technological.as_slice()),
            ("Environmental", self.environmental.as_slice()),
            ("Legal", self.legal.as_slice()),
        ]
    }

    pub fn category_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        match key {
            "political" => Some(&mut self.political),
            "economic" => Some(&mut self.economic),
            "social" => Some(&mut self.social),
            "technological" => Some(&mut self.technological),
            "environmental" => Some(&mut self.environmental),
            "legal" => Some(&mut self.legal),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|(_, items)| items.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotData {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl SwotData {
    pub const KEYS: [&'static str; 4] = ["strengths", "weaknesses", "opportunities", "threats"];

    pub fn quadrant_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        match key {
            "strengths" => Some(&mut self.strengths),
            "weaknesses" => Some(&mut self.weaknesses),
            "opportunities" => Some(&mut self.opportunities),
            "threats" => Some(&mut self.threats),
            _ => None,
        }
    }
}

/// The normalized result of one refresh. Every field is always present, even
/// when the producer returned nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub moves: Vec<CompetitorMove>,
    pub links: Vec<GroundingLink>,
    pub insights: Vec<StrategicInsight>,
    pub radar: Vec<RadarData>,
    pub pestel: PestelData,
    /// Keyed by company name as the producer wrote it.
    pub swot: BTreeMap<String, SwotData>,
}

impl DashboardData {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
            && self.links.is_empty()
            && self.insights.is_empty()
            && self.radar.is_empty()
            && self.pestel.is_empty()
            && self.swot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_labels_default_and_fallback() {
        assert_eq!(Sector::from_label(None), Sector::Digital);
        assert_eq!(Sector::from_label(Some("  ")), Sector::Digital);
        assert_eq!(Sector::from_label(Some("Marketing")), Sector::Marketing);
        assert_eq!(Sector::from_label(Some("sales")), Sector::Sales);
        assert_eq!(Sector::from_label(Some("R&D")), Sector::Other);
    }

    #[test]
    fn insight_type_serializes_with_space() {
        let insight = StrategicInsight {
            title: "t".into(),
            description: "d".into(),
            kind: InsightType::StrategicQuestion,
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "Strategic Question");
        assert_eq!(InsightType::from_label(Some("THREAT")), InsightType::Threat);
        assert_eq!(
            InsightType::from_label(Some("Risk")),
            InsightType::StrategicQuestion
        );
    }

    #[test]
    fn empty_dashboard_serializes_every_field() {
        let json = serde_json::to_value(DashboardData::default()).unwrap();
        for key in ["moves", "links", "insights", "radar"] {
            assert!(json[key].is_array(), "{key} should be an array");
        }
        for key in PestelData::KEYS {
            assert!(json["pestel"][key].is_array(), "pestel.{key} should be an array");
        }
        assert!(json["swot"].is_object());
    }

    #[test]
    fn grounding_chunk_without_web_deserializes() {
        let chunk: GroundingChunk = serde_json::from_str("{}").unwrap();
        assert!(chunk.web.is_none());
    }
}
