//! Axum HTTP gateway for the Twilio WhatsApp webhook.
//!
//! - `POST /whatsapp`: form-encoded `Body` + `From`, answered with TwiML
//! - `GET /health`: liveness plus the number of live sessions
//!
//! The webhook always answers 200 with a TwiML message: generation failures,
//! timeouts, malformed or stalled payloads and handler panics all become
//! fallback text.

mod handlers;
mod server;
pub mod twiml;

pub use server::{build_app, build_state, run_gateway, run_gateway_with_listener};

use crate::bridge::AsyncBridge;
use crate::session::ConversationStore;
use std::sync::Arc;
use std::time::Duration;

/// Maximum request body size (64KB); Twilio payloads are a few hundred bytes
pub const MAX_BODY_SIZE: usize = 65_536;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<AsyncBridge>,
    pub store: Arc<ConversationStore>,
    pub reply_timeout: Duration,
    /// Covers reading the body as well as waiting for the reply.
    pub request_timeout: Duration,
}

/// Inbound webhook form. Twilio sends many more fields; only these two are read.
#[derive(Debug, Default, serde::Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
}
