pub mod gemini;

use anyhow::Result;
use marketpulse_common::RawModelResponse;

pub use gemini::{build_intelligence_prompt, GeminiSource};

// --- IntelligenceSource trait ---

/// Produces one raw intelligence response per call. Failures are fatal to the
/// run and are handed back unchanged.
#[async_trait::async_trait]
pub trait IntelligenceSource: Send + Sync {
    async fn fetch_intelligence(&self) -> Result<RawModelResponse>;
}
