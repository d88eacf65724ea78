pub mod http_client;
pub mod openai;
pub mod response;
pub mod scrub;
pub mod traits;

use crate::config::LlmConfig;

pub use openai::OpenAiProvider;
pub use response::{GenerationParams, MessageRole, ProviderMessage, ProviderResponse};
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::Provider;

/// Build the configured chat-completions backend.
pub fn create_provider(llm: &LlmConfig) -> OpenAiProvider {
    OpenAiProvider::new(
        llm.api_key.as_deref(),
        &llm.base_url,
        llm.request_timeout_secs,
    )
}
