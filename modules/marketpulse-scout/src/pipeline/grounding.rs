//! Grounding link collection.
//!
//! A [`LinkSet`] is owned by exactly one normalization run: the collector
//! creates it, the reconciler takes it by value and hands it back, and the
//! assembler consumes it.

use std::collections::HashSet;

use marketpulse_common::{GroundingChunk, GroundingLink};
use tracing::debug;

/// Insertion-ordered set of links, unique by exact `uri`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<GroundingLink>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the uri is already present. First title wins.
    /// Returns whether the link was added.
    pub fn insert(&mut self, link: GroundingLink) -> bool {
        if !self.seen.insert(link.uri.clone()) {
            return false;
        }
        self.links.push(link);
        true
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.seen.contains(uri)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GroundingLink> {
        self.links.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroundingLink> {
        self.links.iter()
    }

    pub fn into_vec(self) -> Vec<GroundingLink> {
        self.links
    }
}

impl FromIterator<GroundingLink> for LinkSet {
    fn from_iter<I: IntoIterator<Item = GroundingLink>>(iter: I) -> Self {
        let mut set = LinkSet::new();
        for link in iter {
            set.insert(link);
        }
        set
    }
}

/// Build the initial link set from the producer's grounding chunks.
///
/// Chunks without a web citation or with a blank uri are skipped. A missing
/// or blank title falls back to the uri.
pub fn collect_grounding_links(chunks: &[GroundingChunk]) -> LinkSet {
    let mut set = LinkSet::new();
    let mut skipped = 0usize;

    for chunk in chunks {
        let Some(web) = chunk.web.as_ref() else {
            skipped += 1;
            continue;
        };
        let uri = match web.uri.as_deref().map(str::trim) {
            Some(uri) if !uri.is_empty() => uri,
            _ => {
                skipped += 1;
                continue;
            }
        };
        let title = web
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(uri);
        set.insert(GroundingLink::new(uri, title));
    }

    debug!(
        chunks = chunks.len(),
        links = set.len(),
        skipped,
        "Collected grounding links"
    );
    set
}

#[cfg(test)]
mod tests {
    use marketpulse_common::WebCitation;

    use super::*;

    fn web(uri: Option<&str>, title: Option<&str>) -> GroundingChunk {
        GroundingChunk {
            web: Some(WebCitation {
                uri: uri.map(String::from),
                title: title.map(String::from),
            }),
        }
    }

    #[test]
    fn skips_chunks_without_usable_uri() {
        let chunks = vec![
            GroundingChunk { web: None },
            web(None, Some("No uri")),
            web(Some("   "), Some("Blank uri")),
            web(Some("https://a.com"), Some("A")),
        ];
        let links = collect_grounding_links(&chunks).into_vec();
        assert_eq!(links, vec![GroundingLink::new("https://a.com", "A")]);
    }

    #[test]
    fn first_title_wins_for_repeated_uri() {
        let chunks = vec![
            web(Some("https://a.com"), Some("First")),
            web(Some("https://b.com"), Some("B")),
            web(Some("https://a.com"), Some("Second")),
        ];
        let links = collect_grounding_links(&chunks).into_vec();
        assert_eq!(
            links,
            vec![
                GroundingLink::new("https://a.com", "First"),
                GroundingLink::new("https://b.com", "B"),
            ]
        );
    }

    #[test]
    fn missing_title_falls_back_to_uri() {
        let chunks = vec![web(Some("https://a.com/x"), None), web(Some("https://b.com"), Some(""))];
        let links = collect_grounding_links(&chunks).into_vec();
        assert_eq!(links[0].title, "https://a.com/x");
        assert_eq!(links[1].title, "https://b.com");
    }

    #[test]
    fn uri_identity_is_case_sensitive() {
        let mut set = LinkSet::new();
        assert!(set.insert(GroundingLink::new("https://a.com/X", "x")));
        assert!(set.insert(GroundingLink::new("https://a.com/x", "x")));
        assert!(!set.insert(GroundingLink::new("https://a.com/x", "again")));
        assert_eq!(set.len(), 2);
    }
}
