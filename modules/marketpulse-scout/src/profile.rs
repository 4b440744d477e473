use serde::Serialize;

use marketpulse_common::{CompetitorMove, DashboardData, GroundingLink, StrategicInsight, SwotData};

use crate::pipeline::CompanyNeedle;

/// Everything a dataset says about one competitor.
#[derive(Debug, Clone, Serialize)]
pub struct CompetitorProfile<'a> {
    pub company: String,
    pub moves: Vec<&'a CompetitorMove>,
    pub insights: Vec<&'a StrategicInsight>,
    pub links: Vec<&'a GroundingLink>,
    pub swot: Option<&'a SwotData>,
}

impl<'a> CompetitorProfile<'a> {
    /// Filter `data` down to `company`. Matching is case-insensitive
    /// substring matching throughout; a blank name yields an empty profile.
    pub fn for_company(data: &'a DashboardData, company: &str) -> Self {
        let Some(needle) = CompanyNeedle::new(company) else {
            return Self {
                company: company.to_string(),
                moves: Vec::new(),
                insights: Vec::new(),
                links: Vec::new(),
                swot: None,
            };
        };

        let swot = data.swot.get(company).or_else(|| {
            data.swot
                .iter()
                .find(|(key, _)| needle.matches_text(key))
                .map(|(_, entry)| entry)
        });

        Self {
            company: company.to_string(),
            moves: data
                .moves
                .iter()
                .filter(|m| needle.matches_text(&m.company))
                .collect(),
            insights: data
                .insights
                .iter()
                .filter(|i| needle.matches_text(&i.title) || needle.matches_text(&i.description))
                .collect(),
            links: data.links.iter().filter(|l| needle.matches_link(l)).collect(),
            swot,
        }
    }

    /// Whether the dataset knows this competitor at all. Links and SWOT alone
    /// do not count.
    pub fn is_found(&self) -> bool {
        !self.moves.is_empty() || !self.insights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use marketpulse_common::{InsightType, Sector};

    use super::*;

    fn dataset() -> DashboardData {
        let mv = |id: &str, company: &str| CompetitorMove {
            id: id.to_string(),
            company: company.to_string(),
            link: "#".to_string(),
            summary: "s".to_string(),
            date: "Recent".to_string(),
            sector: Sector::Digital,
        };
        let mut swot = BTreeMap::new();
        swot.insert(
            "Milwaukee Tool Corp".to_string(),
            SwotData {
                strengths: vec!["One-Key".to_string()],
                ..SwotData::default()
            },
        );
        DashboardData {
            moves: vec![mv("move-0", "Milwaukee Tool"), mv("move-1", "Makita")],
            links: vec![
                GroundingLink::new("https://www.milwaukeetool.com/news", "Press"),
                GroundingLink::new("https://news.com/1", "Makita robot"),
            ],
            insights: vec![StrategicInsight {
                title: "Fleet tracking".to_string(),
                description: "milwaukee tool leads fleet telematics".to_string(),
                kind: InsightType::Threat,
            }],
            swot,
            ..DashboardData::default()
        }
    }

    #[test]
    fn filters_every_section_by_company() {
        let data = dataset();
        let profile = CompetitorProfile::for_company(&data, "Milwaukee Tool");
        assert!(profile.is_found());
        assert_eq!(profile.moves.len(), 1);
        assert_eq!(profile.moves[0].id, "move-0");
        assert_eq!(profile.insights.len(), 1);
        assert_eq!(profile.links.len(), 1);
        assert_eq!(profile.links[0].uri, "https://www.milwaukeetool.com/news");
        assert_eq!(profile.swot.map(|s| s.strengths.len()), Some(1));
    }

    #[test]
    fn unknown_company_is_not_found() {
        let data = dataset();
        let profile = CompetitorProfile::for_company(&data, "Hitachi");
        assert!(!profile.is_found());
        assert!(profile.swot.is_none());
    }

    #[test]
    fn blank_company_yields_empty_profile() {
        let data = dataset();
        let profile = CompetitorProfile::for_company(&data, "   ");
        assert!(!profile.is_found());
        assert!(profile.links.is_empty());
    }
}
