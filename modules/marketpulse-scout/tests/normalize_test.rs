//! End-to-end normalization: raw model response in, dashboard dataset out.

use std::collections::HashSet;

use marketpulse_common::{GroundingChunk, InsightType, RawModelResponse, Sector};
use marketpulse_scout::pipeline::{normalize, normalize_with, FallbackPolicy, LinkPolicy};
use marketpulse_scout::testing::{chatty_response, FULL_REPORT};

fn full_report_chunks() -> Vec<GroundingChunk> {
    vec![
        GroundingChunk::web("https://news.com/makita-ai", "Makita bets on AI"),
        GroundingChunk::web("https://construction.com/robots", "Robotics roundup"),
    ]
}

#[test]
fn placeholder_link_is_repaired_from_grounding() {
    let raw = chatty_response(
        r##"{"moves":[{"company":"Acme","link":"#","summary":"Shipped an AI estimator"}]}"##,
        vec![GroundingChunk::web("https://acme.com/news", "Acme News")],
    );
    let data = normalize(&raw);

    assert_eq!(data.moves.len(), 1);
    assert_eq!(data.moves[0].id, "move-0");
    assert_eq!(data.moves[0].link, "https://acme.com/news");
    assert_eq!(data.links.len(), 1);
}

#[test]
fn garbage_without_grounding_is_an_empty_dataset() {
    let data = normalize(&RawModelResponse::new("I could not find anything.", Vec::new()));
    assert!(data.is_empty());
}

#[test]
fn garbage_with_grounding_keeps_citations() {
    let raw = RawModelResponse::new("{ this is not json }", full_report_chunks());
    let data = normalize(&raw);
    assert!(data.moves.is_empty());
    assert!(data.insights.is_empty());
    assert_eq!(data.links.len(), 2);
    assert_eq!(data.links[0].uri, "https://news.com/makita-ai");
}

#[test]
fn full_report_with_cyclic_fallback() {
    let data = normalize(&chatty_response(FULL_REPORT, full_report_chunks()));

    let ids: Vec<&str> = data.moves.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["move-0", "move-1", "move-2", "move-3"]);

    // Own link kept and registered after the grounding links.
    assert_eq!(data.moves[0].link, "https://www.milwaukeetool.com/news/one-key-ai");
    // Company matched against a citation title.
    assert_eq!(data.moves[1].link, "https://news.com/makita-ai");
    // No match: links[index % 3].
    assert_eq!(data.moves[2].link, "https://www.milwaukeetool.com/news/one-key-ai");
    assert_eq!(data.moves[3].link, "https://news.com/makita-ai");

    assert_eq!(data.links.len(), 3);
    assert!(data.links[2].title.starts_with("Milwaukee Tool: "));

    assert_eq!(data.moves[3].sector, Sector::Digital);
    assert_eq!(data.moves[2].sector, Sector::Marketing);

    assert_eq!(data.insights.len(), 3);
    assert_eq!(data.insights[2].kind, InsightType::StrategicQuestion);
    assert_eq!(data.radar[1].risk, 50.0);
    assert_eq!(data.pestel.legal, vec!["EU AI Act obligations"]);
    assert_eq!(data.swot["Milwaukee Tool"].weaknesses, vec!["Premium pricing"]);
}

#[test]
fn full_report_with_sentinel_fallback() {
    let policy = LinkPolicy {
        fallback: FallbackPolicy::Sentinel,
        ..LinkPolicy::default()
    };
    let data = normalize_with(&chatty_response(FULL_REPORT, full_report_chunks()), policy);
    assert_eq!(data.moves[1].link, "https://news.com/makita-ai");
    assert_eq!(data.moves[2].link, "#");
    assert_eq!(data.moves[3].link, "#");
    assert!(!data.moves[3].has_source());
}

#[test]
fn registration_can_be_disabled() {
    let policy = LinkPolicy {
        register_move_links: false,
        ..LinkPolicy::default()
    };
    let data = normalize_with(&chatty_response(FULL_REPORT, full_report_chunks()), policy);
    assert_eq!(data.links.len(), 2);
    assert_eq!(data.moves[0].link, "https://www.milwaukeetool.com/news/one-key-ai");
    // links[2 % 2]
    assert_eq!(data.moves[2].link, "https://news.com/makita-ai");
}

#[test]
fn links_are_unique_and_never_placeholders() {
    let mut chunks = full_report_chunks();
    chunks.push(GroundingChunk::web("https://news.com/makita-ai", "Duplicate"));
    let data = normalize(&chatty_response(FULL_REPORT, chunks));

    let uris: HashSet<&str> = data.links.iter().map(|l| l.uri.as_str()).collect();
    assert_eq!(uris.len(), data.links.len());

    for m in &data.moves {
        assert!(!m.link.is_empty());
        assert!(!m.link.to_lowercase().contains("example.com"));
        assert_ne!(m.link, "#", "cyclic policy with citations never leaves a move unsourced");
    }
}

#[test]
fn any_input_yields_a_fully_shaped_dataset() {
    let inputs = [
        "",
        "{",
        "}{",
        "[1, 2, 3]",
        "{\"moves\": 5}",
        "{\"moves\": [null, 1, \"x\", {\"company\": 7}]}",
        "{\"radar\": [{\"innovation\": \"high\"}], \"pestel\": [], \"swot\": \"none\"}",
        "{\"insights\": {\"title\": \"not a list\"}}",
    ];
    for text in inputs {
        let data = normalize(&RawModelResponse::new(text, Vec::new()));
        for (i, m) in data.moves.iter().enumerate() {
            assert!(m.id.starts_with("move-"), "input {text:?}, move {i}");
            assert!(!m.company.is_empty());
            assert!(!m.summary.is_empty());
            assert!(!m.date.is_empty());
            assert_eq!(m.link, "#");
        }
        assert!(data.insights.is_empty(), "input {text:?}");
        assert!(data.swot.is_empty(), "input {text:?}");
    }
}

#[test]
fn non_object_moves_keep_positional_ids() {
    let raw = RawModelResponse::new(
        r#"{"moves": [null, {"company": "Acme"}]}"#,
        Vec::new(),
    );
    let data = normalize(&raw);
    assert_eq!(data.moves.len(), 1);
    assert_eq!(data.moves[0].id, "move-1");
    assert_eq!(data.moves[0].company, "Acme");
}

#[test]
fn dataset_serializes_in_wire_shape() {
    let data = normalize(&chatty_response(FULL_REPORT, full_report_chunks()));
    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(value["insights"][2]["type"], "Strategic Question");
    assert_eq!(value["moves"][0]["sector"], "Digital");
    assert!(value["pestel"]["political"].is_array());
    assert!(value["swot"]["Milwaukee Tool"]["strengths"].is_array());
}

#[test]
fn normalization_is_deterministic() {
    let raw = chatty_response(FULL_REPORT, full_report_chunks());
    assert_eq!(normalize(&raw), normalize(&raw));
}

#[test]
fn schemeless_move_link_is_kept() {
    let raw = chatty_response(
        r#"{"moves":[{"company":"Acme","link":"www.acme.com/news","summary":"Opened an AI lab"}]}"#,
        vec![GroundingChunk::web("https://other.com/a", "Other")],
    );
    let data = normalize(&raw);
    assert_eq!(data.moves[0].link, "https://www.acme.com/news");
    assert_eq!(data.links.len(), 2);
}
