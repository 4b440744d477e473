use anyhow::Result;

use crate::error::PulseError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CLIENT: &str = "Hilti";

/// Competitors tracked when `PULSE_COMPETITORS` is not set.
pub const DEFAULT_COMPETITORS: &[&str] = &[
    "Bosch Professional",
    "DeWalt",
    "Makita",
    "Milwaukee Tool",
    "Stanley Black & Decker",
    "Caterpillar",
    "Trimble",
    "Autodesk",
];

/// Application configuration loaded from environment variables.
/// The API key is handed to the producer explicitly; nothing below the
/// binary reads the environment.
#[derive(Clone)]
pub struct AppConfig {
    // AI / LLM
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
    pub temperature: f32,
    pub http_timeout_secs: u64,

    // Report scope
    pub client_name: String,
    pub competitors: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &preview(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("temperature", &self.temperature)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("client_name", &self.client_name)
            .field("competitors", &self.competitors)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_vars(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build a config from any key lookup. `from_env` uses the process
    /// environment; tests pass a map.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let gemini_api_key = var("GEMINI_API_KEY")
            .or_else(|| var("API_KEY"))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != "undefined")
            .ok_or_else(|| {
                PulseError::Config("GEMINI_API_KEY environment variable is required".to_string())
            })?;

        let temperature = match var("PULSE_TEMPERATURE") {
            Some(raw) => raw.trim().parse::<f32>().map_err(|_| {
                PulseError::Config(format!("PULSE_TEMPERATURE must be a number, got {raw:?}"))
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        let http_timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                PulseError::Config(format!("HTTP_TIMEOUT_SECS must be an integer, got {raw:?}"))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let competitors: Vec<String> = var("PULSE_COMPETITORS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let competitors = if competitors.is_empty() {
            DEFAULT_COMPETITORS.iter().map(|s| s.to_string()).collect()
        } else {
            competitors
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: var("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL").filter(|u| !u.trim().is_empty()),
            temperature,
            http_timeout_secs,
            client_name: var("PULSE_CLIENT")
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CLIENT.to_string()),
            competitors,
        })
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  GEMINI_API_KEY: {}", preview(&self.gemini_api_key));
        tracing::info!("  GEMINI_MODEL: {}", self.gemini_model);
        tracing::info!(
            "  GEMINI_BASE_URL: {}",
            self.gemini_base_url.as_deref().unwrap_or("<default>")
        );
        tracing::info!("  PULSE_CLIENT: {}", self.client_name);
        tracing::info!("  PULSE_COMPETITORS: {} tracked", self.competitors.len());
    }
}

fn preview(val: &str) -> String {
    let n = val
        .char_indices()
        .nth(5)
        .map(|(i, _)| i)
        .unwrap_or(val.len());
    format!("{}...({} chars)", &val[..n], val.len())
}
