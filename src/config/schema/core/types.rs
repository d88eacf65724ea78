use super::super::{
    BridgeConfig, GatewayConfig, LlmConfig, ObservabilityConfig, SessionConfig, TwilioConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path the config was loaded from - not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub twilio: TwilioConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

const REDACTED: &str = "***";

fn mask(secret: &mut Option<String>) {
    if secret.as_deref().is_some_and(|s| !s.is_empty()) {
        *secret = Some(REDACTED.into());
    }
}

impl Config {
    /// Copy safe to print: API key and gateway auth token are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        mask(&mut copy.llm.api_key);
        mask(&mut copy.twilio.auth_token);
        copy
    }
}
