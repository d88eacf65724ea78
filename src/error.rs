use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `chatbridge`.
///
/// None of these ever reach the messaging transport: the bridge and the
/// inbound handler turn each of them into a fixed fallback reply. They exist
/// so logs and tests can tell the failure paths apart. Startup plumbing keeps
/// using `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum BridgeError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generation backend ──────────────────────────────────────────────
    #[error("generation: {0}")]
    Generation(#[from] GenerationError),

    // ── Bounded wait ────────────────────────────────────────────────────
    #[error(transparent)]
    Timeout(#[from] TimeoutExceeded),

    // ── Inbound path ────────────────────────────────────────────────────
    #[error("handler: {0}")]
    Handler(#[from] HandlerFault),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Generation errors ──────────────────────────────────────────────────────

/// The generation backend call failed. No turns were appended.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned an empty reply")]
    EmptyReply { provider: String },

    #[error("provider {provider} authentication failed")]
    Auth { provider: String },
}

impl GenerationError {
    pub fn request(provider: &str, error: &anyhow::Error) -> Self {
        Self::Request {
            provider: provider.to_string(),
            message: format!("{error:#}"),
        }
    }
}

// ─── Timeout ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("no reply within {waited_ms}ms")]
pub struct TimeoutExceeded {
    pub waited_ms: u128,
}

// ─── Inbound handler faults ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum HandlerFault {
    #[error("malformed inbound payload: {0}")]
    MalformedPayload(String),

    #[error("handler panicked: {0}")]
    Panic(String),

    #[error("background task ended without a reply")]
    TaskLost,

    #[error("request not answered in time: {0}")]
    RequestTimeout(TimeoutExceeded),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;
