use super::prompt::PromptTemplate;
use crate::error::GenerationError;
use crate::providers::{GenerationParams, Provider};
use crate::session::ConversationStore;
use crate::utils::text::truncate_with_ellipsis;
use chrono::Utc;
use std::sync::Arc;

/// Produces one reply per call from the session's accumulated history.
pub struct ResponseGenerator {
    store: Arc<ConversationStore>,
    provider: Arc<dyn Provider>,
    template: PromptTemplate,
    params: GenerationParams,
}

impl ResponseGenerator {
    pub fn new(
        store: Arc<ConversationStore>,
        provider: Arc<dyn Provider>,
        template: PromptTemplate,
        params: GenerationParams,
    ) -> Self {
        Self {
            store,
            provider,
            template,
            params,
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Generate the reply to `user_text` for `session_key`.
    ///
    /// The session's transcript stays locked from the history read until the
    /// exchange is appended, so calls for one session run one at a time. On
    /// success exactly one user and one assistant turn are appended; on
    /// failure none are.
    pub async fn generate(
        &self,
        session_key: &str,
        user_text: &str,
    ) -> Result<String, GenerationError> {
        let conversation = self.store.get_or_create(session_key);
        let mut transcript = conversation.lock().await;

        let messages = self
            .template
            .render(transcript.turns(), user_text, Utc::now());
        tracing::debug!(
            session = session_key,
            history_turns = transcript.len(),
            "calling generation backend"
        );

        let response = self
            .provider
            .chat(&messages, &self.params)
            .await
            .map_err(|error| classify_provider_error(self.provider.name(), &error))?;

        transcript.record_exchange(user_text, &response.text);
        drop(transcript);

        tracing::info!(
            session = session_key,
            model = response.model.as_deref().unwrap_or(self.params.model.as_str()),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "response for {session_key}: {}",
            truncate_with_ellipsis(&response.text, 50)
        );
        Ok(response.text)
    }
}

/// Keep the typed failure the provider reported; anything else is a request failure.
fn classify_provider_error(provider: &str, error: &anyhow::Error) -> GenerationError {
    match error.downcast_ref::<GenerationError>() {
        Some(GenerationError::Auth { provider }) => GenerationError::Auth {
            provider: provider.clone(),
        },
        Some(GenerationError::EmptyReply { provider }) => GenerationError::EmptyReply {
            provider: provider.clone(),
        },
        _ => GenerationError::request(provider, error),
    }
}
