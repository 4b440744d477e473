use serde::Serialize;
use url::Url;

use marketpulse_common::GroundingLink;

/// Links shown in the evidence index.
pub const EVIDENCE_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceEntry {
    /// Link title, or the uri when the title is blank.
    pub label: String,
    pub uri: String,
    /// `None` when the uri does not parse as a URL with a host.
    pub host: Option<String>,
}

/// The first `limit` links, labelled and tagged with their host.
pub fn evidence_index(links: &[GroundingLink], limit: usize) -> Vec<EvidenceEntry> {
    links
        .iter()
        .take(limit)
        .map(|link| EvidenceEntry {
            label: if link.title.trim().is_empty() {
                link.uri.clone()
            } else {
                link.title.clone()
            },
            uri: link.uri.clone(),
            host: Url::parse(&link.uri)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string)),
        })
        .collect()
}
