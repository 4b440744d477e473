//! Move link reconciliation.
//!
//! Every move leaves this step with a link that is either an absolute http(s)
//! URL or [`NO_SOURCE_LINK`]. Resolution order per move:
//!
//! 1. the move's own link, if usable (optionally registered as a new citation)
//! 2. the first citation whose title or uri mentions the company
//! 3. `links[index % len]` under [`FallbackPolicy::Cyclic`]
//! 4. [`NO_SOURCE_LINK`]
//!
//! Moves are processed in array order. Registrations from earlier moves are
//! visible to later ones, so order changes the result.

use ai_client::truncate_to_char_boundary;
use tracing::{debug, info};
use url::Url;

use marketpulse_common::{CompetitorMove, GroundingLink, NO_SOURCE_LINK};

use super::assembler::MoveRecord;
use super::grounding::LinkSet;

/// Host fragment the model uses for made-up links.
pub const PLACEHOLDER_HOST: &str = "example.com";

/// Summary budget (bytes) for titles synthesized from registered move links.
const TITLE_SUMMARY_MAX_BYTES: usize = 60;

/// What to do when neither the move's own link nor a company match works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Assign `links[index % len]`. Some link beats none, but it may be
    /// unrelated to the move.
    #[default]
    Cyclic,
    /// Leave the move without a source.
    Sentinel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    /// Add usable move links that are not yet cited to the link set.
    pub register_move_links: bool,
    pub fallback: FallbackPolicy,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            register_move_links: true,
            fallback: FallbackPolicy::Cyclic,
        }
    }
}

/// How a move's link was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkResolution {
    Provided,
    CompanyMatch,
    Cyclic,
    Unsourced,
}

/// The move's own link as an absolute http(s) URL, or `None` if it is blank,
/// `#`, a placeholder, or uses another scheme. A schemeless link such as
/// `www.acme.com/news` is kept with `https://` in front.
pub fn usable_link(link: Option<&str>) -> Option<String> {
    let link = link?.trim();
    if link.is_empty() || link == NO_SOURCE_LINK {
        return None;
    }
    if link.to_lowercase().contains(PLACEHOLDER_HOST) {
        return None;
    }
    match Url::parse(link) {
        Ok(url) if is_web_url(&url) => Some(link.to_string()),
        Ok(_) => None,
        Err(_) => {
            let prefixed = format!("https://{link}");
            match Url::parse(&prefixed) {
                Ok(url) if is_web_url(&url) && url.host_str().is_some_and(|h| h.contains('.')) => {
                    Some(prefixed)
                }
                _ => None,
            }
        }
    }
}

fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host().is_some()
}

/// Case-insensitive company matcher. Titles are searched for the name as
/// written; uris for the name with whitespace removed.
#[derive(Debug, Clone)]
pub struct CompanyNeedle {
    plain: String,
    compact: String,
}

impl CompanyNeedle {
    /// `None` for a blank name, which would match everything.
    pub fn new(company: &str) -> Option<Self> {
        let plain = company.trim().to_lowercase();
        if plain.is_empty() {
            return None;
        }
        let compact = plain.chars().filter(|c| !c.is_whitespace()).collect();
        Some(Self { plain, compact })
    }

    pub fn matches_text(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.plain)
    }

    pub fn matches_link(&self, link: &GroundingLink) -> bool {
        self.matches_text(&link.title) || link.uri.to_lowercase().contains(&self.compact)
    }
}

/// First citation that mentions `company`.
pub fn find_company_link<'a>(links: &'a LinkSet, company: &str) -> Option<&'a GroundingLink> {
    let needle = CompanyNeedle::new(company)?;
    links.iter().find(|link| needle.matches_link(link))
}

/// Title for a registered move link: company plus a truncated summary.
pub fn synthesize_title(company: &str, summary: Option<&str>) -> String {
    let summary = summary.map(str::trim).unwrap_or_default();
    if summary.is_empty() {
        return company.to_string();
    }
    let truncated = truncate_to_char_boundary(summary, TITLE_SUMMARY_MAX_BYTES);
    if truncated.len() < summary.len() {
        format!("{company}: {}...", truncated.trim_end())
    } else {
        format!("{company}: {summary}")
    }
}

/// Decide one move's link, possibly growing `links`.
pub fn resolve_link(
    record: &MoveRecord,
    links: &mut LinkSet,
    policy: LinkPolicy,
) -> (String, LinkResolution) {
    if let Some(url) = usable_link(record.link.as_deref()) {
        if policy.register_move_links && !links.contains(&url) {
            let title = synthesize_title(record.company_or_default(), record.summary.as_deref());
            debug!(index = record.index, uri = url.as_str(), "Registering move link as citation");
            links.insert(GroundingLink::new(url.clone(), title));
        }
        return (url, LinkResolution::Provided);
    }

    if let Some(company) = record.company.as_deref() {
        if let Some(link) = find_company_link(links, company) {
            return (link.uri.clone(), LinkResolution::CompanyMatch);
        }
    }

    if policy.fallback == FallbackPolicy::Cyclic && !links.is_empty() {
        if let Some(link) = links.get(record.index % links.len()) {
            return (link.uri.clone(), LinkResolution::Cyclic);
        }
    }

    (NO_SOURCE_LINK.to_string(), LinkResolution::Unsourced)
}

/// Reconcile every move's link. Takes the run's link set and returns it,
/// possibly grown.
pub fn reconcile_moves(
    records: Vec<MoveRecord>,
    mut links: LinkSet,
    policy: LinkPolicy,
) -> (Vec<CompetitorMove>, LinkSet) {
    let grounded = links.len();
    let (mut provided, mut matched, mut cyclic, mut unsourced) = (0usize, 0usize, 0usize, 0usize);

    let moves: Vec<CompetitorMove> = records
        .into_iter()
        .map(|record| {
            let (link, resolution) = resolve_link(&record, &mut links, policy);
            match resolution {
                LinkResolution::Provided => provided += 1,
                LinkResolution::CompanyMatch => matched += 1,
                LinkResolution::Cyclic => cyclic += 1,
                LinkResolution::Unsourced => unsourced += 1,
            }
            record.into_move(link)
        })
        .collect();

    info!(
        moves = moves.len(),
        provided,
        matched,
        cyclic,
        unsourced,
        registered = links.len() - grounded,
        "Reconciled move links"
    );
    (moves, links)
}
