// Test mocks for the pulse pipeline.
//
// - MockSource (IntelligenceSource): fixed response or failure, optional
//   delay, call counter
//
// Plus fixtures for building raw responses.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use marketpulse_common::{GroundingChunk, RawModelResponse};

use crate::producer::IntelligenceSource;

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

enum Outcome {
    Respond(RawModelResponse),
    Fail(String),
}

pub struct MockSource {
    outcome: Outcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Responds with `raw` on every call.
    pub fn new(raw: RawModelResponse) -> Self {
        Self {
            outcome: Outcome::Respond(raw),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails with `message` on every call.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Outcome::Fail(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering, to keep a refresh in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntelligenceSource for MockSource {
    async fn fetch_intelligence(&self) -> Result<RawModelResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Outcome::Respond(raw) => Ok(raw.clone()),
            Outcome::Fail(message) => bail!("{message}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Raw response whose text is `payload` wrapped in chatty prose.
pub fn chatty_response(payload: &str, chunks: Vec<GroundingChunk>) -> RawModelResponse {
    RawModelResponse::new(format!("Here is the result: {payload} Thanks!"), chunks)
}

/// A realistic full report touching every section.
pub const FULL_REPORT: &str = r##"{
  "moves": [
    {"company": "Milwaukee Tool", "link": "https://www.milwaukeetool.com/news/one-key-ai", "summary": "Added AI tool-tracking to One-Key", "date": "Mar 2025", "sector": "Digital"},
    {"company": "Makita", "link": "#", "summary": "Piloting AI demand forecasting with dealers", "date": "Jan 2024", "sector": "Sales"},
    {"company": "DeWalt", "link": "https://example.com/placeholder", "summary": "Launched a jobsite robotics program", "date": "recent", "sector": "Marketing"},
    {"company": "Trimble", "summary": "Released a generative design assistant", "date": "garbage"}
  ],
  "insights": [
    {"title": "Connected fleets", "description": "Milwaukee Tool is ahead on fleet telemetry", "type": "Threat"},
    {"title": "Dealer analytics", "description": "Room for a better dealer portal", "type": "Opportunity"},
    {"title": "Robotics timing", "description": "When does layout robotics pay off?", "type": "Strategic Question"}
  ],
  "radar": [
    {"company": "Milwaukee Tool", "innovation": 85, "impact": 75, "risk": 70},
    {"company": "Makita", "innovation": 60, "impact": 55}
  ],
  "pestel": {
    "political": ["Tariffs on imported batteries"],
    "economic": ["Higher rates slow housing starts"],
    "social": ["Skilled labour shortage"],
    "technological": ["On-device AI in power tools"],
    "environmental": ["Battery recycling rules"],
    "legal": ["EU AI Act obligations"]
  },
  "swot": {
    "Milwaukee Tool": {
      "strengths": ["One-Key ecosystem"],
      "weaknesses": ["Premium pricing"],
      "opportunities": ["Fleet services"],
      "threats": ["Platform lock-in backlash"]
    }
  }
}"##;
