use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 5000)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 0.0.0.0, Twilio must reach the webhook)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Floor for the whole-request deadline, body read included (default: 30)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_gateway_port() -> u16 {
    5000
}

fn default_gateway_host() -> String {
    "0.0.0.0".into()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Headroom kept between the reply deadline and the request deadline.
const REPLY_MARGIN: Duration = Duration::from_secs(1);

impl GatewayConfig {
    /// Whole-request deadline: never below the floor, always past `reply_timeout`.
    pub fn request_timeout(&self, reply_timeout: Duration) -> Duration {
        Duration::from_secs(self.request_timeout_secs).max(reply_timeout + REPLY_MARGIN)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
