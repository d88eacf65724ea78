use super::response::{GenerationParams, ProviderMessage, ProviderResponse};
use async_trait::async_trait;

/// A chat-completion backend.
///
/// `messages` is the full transcript in replay order: system messages first,
/// then history, then the new user message.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    async fn chat(
        &self,
        messages: &[ProviderMessage],
        params: &GenerationParams,
    ) -> anyhow::Result<ProviderResponse>;

    /// Warm up the HTTP connection pool (TLS handshake, DNS, HTTP/2 setup).
    /// Default implementation is a no-op; providers with HTTP clients should override.
    async fn warmup(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
