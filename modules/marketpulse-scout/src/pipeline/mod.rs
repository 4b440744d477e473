//! Normalization pipeline: raw model response in, dashboard dataset out.
//!
//! ```text
//! RawModelResponse
//!   -> parser      (JSON payload or nothing)
//!   -> grounding   (LinkSet from citations)
//!   -> reconciler  (every move gets a link, LinkSet may grow)
//!   -> assembler   (typed sections with defaults, deduped links)
//!   -> DashboardData
//! ```
//!
//! The pipeline never fails. Whatever cannot be parsed degrades to defaults,
//! and the citations survive even when the text holds no usable payload.

pub mod assembler;
pub mod dedup;
pub mod grounding;
pub mod parser;
pub mod reconciler;

use marketpulse_common::{DashboardData, RawModelResponse};
use tracing::info;

pub use assembler::{assemble, MoveRecord};
pub use dedup::dedup_links;
pub use grounding::{collect_grounding_links, LinkSet};
pub use parser::{brace_span, extract_payload, parse_payload, PayloadMiss};
pub use reconciler::{
    reconcile_moves, usable_link, CompanyNeedle, FallbackPolicy, LinkPolicy, LinkResolution,
};

/// Normalize with the default [`LinkPolicy`].
pub fn normalize(raw: &RawModelResponse) -> DashboardData {
    normalize_with(raw, LinkPolicy::default())
}

pub fn normalize_with(raw: &RawModelResponse, policy: LinkPolicy) -> DashboardData {
    let payload = extract_payload(&raw.text);
    let links = collect_grounding_links(&raw.grounding);

    let records = payload
        .as_ref()
        .map(assembler::move_records)
        .unwrap_or_default();
    let (moves, links) = reconcile_moves(records, links, policy);

    let data = assemble(payload.as_ref(), moves, links);
    info!(
        parsed = payload.is_some(),
        moves = data.moves.len(),
        links = data.links.len(),
        insights = data.insights.len(),
        radar = data.radar.len(),
        swot = data.swot.len(),
        "Normalized intelligence response"
    );
    data
}
