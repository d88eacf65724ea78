use crate::providers::GenerationParams;
use crate::responder::prompt::DEFAULT_SYSTEM_PROMPT;
use serde::{Deserialize, Serialize};

// ── Generation backend ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the chat-completions backend (env: `OPENAI_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default)]
    pub frequency_penalty: f64,
    #[serde(default)]
    pub presence_penalty: f64,
    /// Instructions placed first in every request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// IANA zone used for the "current date/time" grounding message
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// HTTP timeout for a single backend call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Open a pooled connection to the backend before serving
    #[serde(default)]
    pub warmup: bool,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_temperature() -> f64 {
    0.8
}

fn default_max_tokens() -> u32 {
    350
}

fn default_top_p() -> f64 {
    1.0
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

fn default_timezone() -> String {
    "America/Mexico_City".into()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            system_prompt: default_system_prompt(),
            timezone: default_timezone(),
            request_timeout_secs: default_request_timeout_secs(),
            warmup: false,
        }
    }
}

impl LlmConfig {
    /// Sampling parameters passed through to the backend unchanged.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
        }
    }
}
