mod bridge;
mod core;
mod gateway;
mod llm;
mod observability;
mod twilio;

pub use bridge::{BridgeConfig, SessionConfig};
pub use self::core::Config;
pub use gateway::GatewayConfig;
pub use llm::LlmConfig;
pub use observability::ObservabilityConfig;
pub use twilio::TwilioConfig;
