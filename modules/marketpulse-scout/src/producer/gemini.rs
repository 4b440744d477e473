use std::time::Duration;

use ai_client::{Gemini, GroundedResponse};
use anyhow::{Context, Result};
use tracing::info;

use marketpulse_common::{AppConfig, GroundingChunk, RawModelResponse, WebCitation};

use super::IntelligenceSource;

/// Search-grounded Gemini producer.
pub struct GeminiSource {
    gemini: Gemini,
    temperature: f32,
    prompt: String,
}

impl GeminiSource {
    /// Build a producer with an explicit key. Blank keys are rejected here,
    /// before any request is made.
    pub fn new(
        api_key: &str,
        model: &str,
        client_name: &str,
        competitors: &[String],
    ) -> Result<Self> {
        let gemini = Gemini::try_new(api_key, model)?;
        Ok(Self {
            gemini,
            temperature: marketpulse_common::config::DEFAULT_TEMPERATURE,
            prompt: build_intelligence_prompt(client_name, competitors),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut source = Self::new(
            &config.gemini_api_key,
            &config.gemini_model,
            &config.client_name,
            &config.competitors,
        )?
        .with_temperature(config.temperature);
        source.gemini = source
            .gemini
            .with_timeout(Duration::from_secs(config.http_timeout_secs));
        if let Some(ref url) = config.gemini_base_url {
            source.gemini = source.gemini.with_base_url(url);
        }
        Ok(source)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[async_trait::async_trait]
impl IntelligenceSource for GeminiSource {
    async fn fetch_intelligence(&self) -> Result<RawModelResponse> {
        info!(model = self.gemini.model(), "Requesting competitor intelligence");
        let response = self
            .gemini
            .generate_grounded(self.prompt.as_str(), self.temperature)
            .await
            .context("Intelligence fetch failed")?;
        let raw = into_raw_response(response);
        info!(
            text_len = raw.text.len(),
            chunks = raw.grounding.len(),
            "Received intelligence response"
        );
        Ok(raw)
    }
}

fn into_raw_response(response: GroundedResponse) -> RawModelResponse {
    let grounding = response
        .chunks
        .into_iter()
        .map(|chunk| GroundingChunk {
            web: chunk.web.map(|web| WebCitation {
                uri: web.uri,
                title: web.title,
            }),
        })
        .collect();
    RawModelResponse::new(response.text, grounding)
}

/// The report request sent to the model. Names the client and the tracked
/// competitors and pins the JSON shape the pipeline reads.
pub fn build_intelligence_prompt(client_name: &str, competitors: &[String]) -> String {
    let competitors = competitors.join(", ");
    format!(
        r#"As a market intelligence analyst for {client_name}, perform a deep dive into AI-driven initiatives by: {competitors}.

REQUIRED OUTPUT STRUCTURE (JSON ONLY, no preamble):
{{
  "moves": [
    {{"company": "string", "link": "string", "summary": "string", "date": "string", "sector": "Marketing"|"Sales"|"Digital"|"Other"}}
  ],
  "insights": [
    {{"title": "string", "description": "string", "type": "Opportunity"|"Threat"|"Strategic Question"}}
  ],
  "radar": [
    {{"company": "string", "innovation": 0-100, "impact": 0-100, "risk": 0-100}}
  ],
  "pestel": {{
    "political": ["string"],
    "economic": ["string"],
    "social": ["string"],
    "technological": ["string"],
    "environmental": ["string"],
    "legal": ["string"]
  }},
  "swot": {{
    "CompanyName": {{
      "strengths": ["string"],
      "weaknesses": ["string"],
      "opportunities": ["string"],
      "threats": ["string"]
    }}
  }}
}}

Ensure moves include REAL verifiable URLs. Use search grounding for current facts."#
    )
}
