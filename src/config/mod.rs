pub mod schema;

pub use schema::{
    BridgeConfig, Config, GatewayConfig, LlmConfig, ObservabilityConfig, SessionConfig,
    TwilioConfig,
};
