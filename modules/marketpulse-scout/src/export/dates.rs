//! Ranking of the free-form `date` strings the model writes.
//!
//! `recent` (any case) outranks every real date, and anything unparseable
//! ranks below all of them.

use std::cmp::Reverse;

use chrono::{DateTime, Datelike, NaiveDate};

use marketpulse_common::CompetitorMove;

/// Sort key for a move date. Unparseable strings rank below every real date,
/// including pre-1970 ones; they are not treated as the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateRank {
    Unparsed,
    On(NaiveDate),
    Recent,
}

const FULL_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

pub fn rank_date(raw: &str) -> DateRank {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("recent") {
        return DateRank::Recent;
    }
    parse_loose_date(s).map_or(DateRank::Unparsed, DateRank::On)
}

/// Best-effort calendar date. Month-only and year-only inputs resolve to the
/// first day of the period. Years must have four digits.
pub fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    parse_any_shape(s).filter(|date| (1000..=9999).contains(&date.year()))
}

fn parse_any_shape(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // Period shapes go first: "%B %d %Y" would otherwise read "Mar 2025" as
    // day 20 of year 25.
    // "Mar 2025", "March 2025"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {s}"), "%d %B %Y") {
        return Some(date);
    }
    // "2025-03"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }
    for fmt in FULL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    // ISO date followed by a time part
    if s.len() > 10 {
        if let Some(prefix) = s.get(..10) {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(date);
            }
        }
    }
    None
}

/// Moves ordered newest first. Equal ranks keep their input order.
pub fn sort_moves_by_recency(moves: &[CompetitorMove]) -> Vec<&CompetitorMove> {
    let mut sorted: Vec<&CompetitorMove> = moves.iter().collect();
    sorted.sort_by_cached_key(|m| Reverse(rank_date(&m.date)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateRank {
        DateRank::On(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn recognizes_common_shapes() {
        assert_eq!(rank_date("2025-03-14"), ymd(2025, 3, 14));
        assert_eq!(rank_date("2025/03/14"), ymd(2025, 3, 14));
        assert_eq!(rank_date("03/14/2025"), ymd(2025, 3, 14));
        assert_eq!(rank_date("March 14, 2025"), ymd(2025, 3, 14));
        assert_eq!(rank_date("14 March 2025"), ymd(2025, 3, 14));
        assert_eq!(rank_date("2025-03-14T09:30:00Z"), ymd(2025, 3, 14));
        assert_eq!(rank_date("Mar 2025"), ymd(2025, 3, 1));
        assert_eq!(rank_date("2025-03"), ymd(2025, 3, 1));
        assert_eq!(rank_date("2024"), ymd(2024, 1, 1));
    }

    #[test]
    fn month_year_sorts_against_full_dates() {
        assert_eq!(rank_date("June 2024"), ymd(2024, 6, 1));
        assert!(rank_date("Mar 2025") > rank_date("2024-06-01"));

        let moves: Vec<CompetitorMove> = ["2024-06-01", "Mar 2025", "June 2024", "2024-05-31"]
            .iter()
            .enumerate()
            .map(|(i, date)| CompetitorMove {
                id: format!("move-{i}"),
                company: "Acme".to_string(),
                link: "#".to_string(),
                summary: "s".to_string(),
                date: date.to_string(),
                sector: marketpulse_common::Sector::Digital,
            })
            .collect();
        let order: Vec<&str> = sort_moves_by_recency(&moves)
            .iter()
            .map(|m| m.date.as_str())
            .collect();
        // "June 2024" is the same day as "2024-06-01"; input order breaks the tie.
        assert_eq!(order, vec!["Mar 2025", "2024-06-01", "June 2024", "2024-05-31"]);
    }

    #[test]
    fn short_years_are_unparsed() {
        assert_eq!(rank_date("03/14/25"), DateRank::Unparsed);
        assert_eq!(rank_date("0025-03-20"), DateRank::Unparsed);
    }

    #[test]
    fn recent_is_case_insensitive() {
        assert_eq!(rank_date("recent"), DateRank::Recent);
        assert_eq!(rank_date("  RECENT "), DateRank::Recent);
        assert_eq!(rank_date("recently"), DateRank::Unparsed);
    }

    #[test]
    fn garbage_ranks_lowest() {
        assert_eq!(rank_date("garbage"), DateRank::Unparsed);
        assert_eq!(rank_date(""), DateRank::Unparsed);
        assert!(DateRank::Unparsed < ymd(1900, 1, 1));
        assert!(ymd(2999, 12, 31) < DateRank::Recent);
    }
}
