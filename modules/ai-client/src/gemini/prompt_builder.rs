use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AiError;
use crate::traits::{GroundedPromptBuilder, GroundedResponse, Message, MessageRole, PromptBuilder};

use super::types::*;
use super::Gemini;

pub struct GeminiPromptBuilder {
    agent: Gemini,
    input: String,
    preamble: Option<String>,
    temperature: Option<f32>,
    grounded: bool,
    messages: Vec<Message>,
}

impl GeminiPromptBuilder {
    pub(crate) fn new(agent: Gemini, input: String) -> Self {
        Self {
            agent,
            input,
            preamble: None,
            temperature: None,
            grounded: false,
            messages: Vec::new(),
        }
    }

    pub(crate) fn build_request(&self) -> GenerateRequest {
        let mut request = GenerateRequest::new(&self.agent.model);

        if let Some(temp) = self.temperature {
            request = request.temperature(temp);
        }

        let mut system = self.preamble.clone().unwrap_or_default();

        for msg in &self.messages {
            match msg.role {
                MessageRole::System => {
                    // Gemini takes a single systemInstruction, merge into it
                    if system.is_empty() {
                        system = msg.content.clone();
                    } else {
                        system = format!("{}\n\n{}", system, msg.content);
                    }
                }
                MessageRole::User => request = request.content(Content::user(&msg.content)),
                MessageRole::Assistant => request = request.content(Content::model(&msg.content)),
            }
        }

        if !system.is_empty() {
            request = request.system(system);
        }

        if !self.input.is_empty() {
            request = request.content(Content::user(&self.input));
        }

        if self.grounded {
            request = request.google_search();
        }

        request
    }
}

#[async_trait]
impl PromptBuilder for GeminiPromptBuilder {
    fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    async fn send(self) -> Result<String> {
        let request = self.build_request();
        let response = self.agent.client()?.generate(&request).await?;

        response
            .text()
            .ok_or_else(|| AiError::EmptyResponse("no text from Gemini".to_string()).into())
    }
}

#[async_trait]
impl GroundedPromptBuilder for GeminiPromptBuilder {
    fn search_grounding(mut self) -> Self {
        self.grounded = true;
        self
    }

    async fn send_grounded(self) -> Result<GroundedResponse> {
        let request = self.build_request();
        let response = self.agent.client()?.generate(&request).await?;

        let chunks = response.grounding_chunks();
        let text = match response.text() {
            Some(text) => text,
            None => {
                // A grounded call with no text still returns its citations;
                // downstream normalization treats the empty text as "no data".
                warn!(
                    model = %self.agent.model,
                    chunks = chunks.len(),
                    "Gemini returned no text"
                );
                String::new()
            }
        };

        debug!(
            model = %self.agent.model,
            text_len = text.len(),
            chunks = chunks.len(),
            "Gemini grounded response"
        );

        Ok(GroundedResponse { text, chunks })
    }
}
