use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── Bounded-wait reply bridge ────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// How long an inbound request waits for the generated reply
    #[serde(default = "default_reply_timeout_ms")]
    pub reply_timeout_ms: u64,
    /// Sent when the deadline passes first
    #[serde(default = "default_timeout_reply")]
    pub timeout_reply: String,
    /// Sent when the generation backend fails
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
    /// Sent when the inbound request itself cannot be handled
    #[serde(default = "default_fault_reply")]
    pub fault_reply: String,
}

fn default_reply_timeout_ms() -> u64 {
    15_000
}

fn default_timeout_reply() -> String {
    "Lo siento, el servidor está tardando en responder. \
     Por favor, intenta de nuevo más tarde."
        .into()
}

fn default_error_reply() -> String {
    "Lo siento, no pude procesar tu solicitud.".into()
}

fn default_fault_reply() -> String {
    default_error_reply()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: default_reply_timeout_ms(),
            timeout_reply: default_timeout_reply(),
            error_reply: default_error_reply(),
            fault_reply: default_fault_reply(),
        }
    }
}

impl BridgeConfig {
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}

// ── Session history bounds ───────────────────────────────────────

/// Both bounds are off (0) by default: history grows for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Keep at most this many turns per session, dropping the oldest exchanges
    #[serde(default)]
    pub max_turns: usize,
    /// Evict sessions untouched for this long
    #[serde(default)]
    pub idle_ttl_secs: u64,
    /// How often the idle sweeper runs when `idle_ttl_secs` is set
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_sweep_interval_secs() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: 0,
            idle_ttl_secs: 0,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}
