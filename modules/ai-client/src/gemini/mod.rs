mod client;
pub mod prompt_builder;
pub(crate) mod types;

pub use prompt_builder::GeminiPromptBuilder;

use std::time::Duration;

use anyhow::Result;

use crate::error::AiError;
use crate::traits::{Agent, GroundedPromptBuilder, GroundedResponse, PromptBuilder};
use client::GeminiClient;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

// =============================================================================
// Gemini Agent
// =============================================================================

/// Gemini `generateContent` agent. The API key is always supplied by the
/// caller; this type never reads process environment.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: None,
        }
    }

    /// Like [`Gemini::new`], but rejects a blank key up front so a missing
    /// credential fails at startup instead of on the first request.
    pub fn try_new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() || api_key == "undefined" {
            return Err(AiError::Config("Gemini API key is missing".to_string()).into());
        }
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> Result<GeminiClient> {
        let client = GeminiClient::new(&self.api_key, self.timeout)?;
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    // =========================================================================
    // Convenience methods
    // =========================================================================

    /// Single-prompt generation with web-search grounding enabled.
    pub async fn generate_grounded(
        &self,
        prompt: impl Into<String>,
        temperature: f32,
    ) -> Result<GroundedResponse> {
        self.prompt(prompt)
            .temperature(temperature)
            .search_grounding()
            .send_grounded()
            .await
    }
}

// =============================================================================
// Agent Implementation
// =============================================================================

impl Agent for Gemini {
    type PromptBuilder = GeminiPromptBuilder;

    fn prompt(&self, input: impl Into<String>) -> GeminiPromptBuilder {
        GeminiPromptBuilder::new(self.clone(), input.into())
    }
}
