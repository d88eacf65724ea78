use crate::config::BridgeConfig;

/// How one bridged request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    Completed(String),
    Failed,
    TimedOut,
}

impl BridgeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        }
    }

    pub fn into_reply(self, fallbacks: &FallbackReplies) -> String {
        match self {
            Self::Completed(reply) => reply,
            Self::Failed => fallbacks.error.clone(),
            Self::TimedOut => fallbacks.timeout.clone(),
        }
    }
}

/// Fixed, non-generated replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackReplies {
    pub timeout: String,
    pub error: String,
    pub fault: String,
}

impl From<&BridgeConfig> for FallbackReplies {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            timeout: config.timeout_reply.clone(),
            error: config.error_reply.clone(),
            fault: config.fault_reply.clone(),
        }
    }
}

impl Default for FallbackReplies {
    fn default() -> Self {
        Self::from(&BridgeConfig::default())
    }
}
