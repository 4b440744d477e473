use std::collections::HashSet;

use marketpulse_common::GroundingLink;

/// Drop links whose uri already appeared earlier in the list. Keeps the first
/// occurrence and the original order. Idempotent.
pub fn dedup_links(links: Vec<GroundingLink>) -> Vec<GroundingLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.uri.clone()))
        .collect()
}
