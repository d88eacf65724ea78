use crate::error::GenerationError;
use crate::providers::{
    GenerationParams, ProviderMessage, ProviderResponse, http_client, scrub::api_error,
    traits::Provider,
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const PROVIDER_NAME: &str = "openai";

/// Chat-completions client for OpenAI and compatible servers.
pub struct OpenAiProvider {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>, base_url: &str, timeout_secs: u64) -> Self {
        Self {
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client::build_provider_client_with_timeout(timeout_secs),
        }
    }

    fn build_request<'a>(
        messages: &'a [ProviderMessage],
        params: &'a GenerationParams,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &params.model,
            messages: messages
                .iter()
                .map(|m| Message {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
        }
    }

    /// The first choice's content, verbatim. Only a missing choice or a
    /// null content counts as no reply; an empty string is a reply.
    fn extract_text(chat_response: &ChatResponse) -> anyhow::Result<String> {
        chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| {
                GenerationError::EmptyReply {
                    provider: PROVIDER_NAME.into(),
                }
                .into()
            })
    }

    fn auth_header(&self) -> anyhow::Result<&str> {
        self.cached_auth_header.as_deref().ok_or_else(|| {
            anyhow::Error::new(GenerationError::Auth {
                provider: PROVIDER_NAME.into(),
            })
            .context("OpenAI API key not set. Set OPENAI_API_KEY or edit config.toml.")
        })
    }

    async fn call_api(&self, request: &ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        let auth_header = self.auth_header()?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", auth_header)
            .json(request)
            .send()
            .await
            .context("OpenAI request failed")?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            let err = api_error("OpenAI", response).await;
            return Err(err.context(GenerationError::Auth {
                provider: PROVIDER_NAME.into(),
            }));
        }

        if !response.status().is_success() {
            return Err(api_error("OpenAI", response).await);
        }

        response
            .json()
            .await
            .context("OpenAI response JSON decode failed")
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn chat(
        &self,
        messages: &[ProviderMessage],
        params: &GenerationParams,
    ) -> anyhow::Result<ProviderResponse> {
        let request = Self::build_request(messages, params);
        let chat_response = self.call_api(&request).await?;
        let text = Self::extract_text(&chat_response)?;

        let mut provider_response = if let Some(usage) = chat_response.usage {
            ProviderResponse::with_usage(text, usage.prompt_tokens, usage.completion_tokens)
        } else {
            ProviderResponse::text_only(text)
        };
        if let Some(api_model) = chat_response.model {
            provider_response = provider_response.with_model(api_model);
        }
        Ok(provider_response)
    }

    async fn warmup(&self) -> anyhow::Result<()> {
        let auth_header = self.auth_header()?;
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("Authorization", auth_header)
            .send()
            .await
            .context("OpenAI warmup request failed")?;
        if !response.status().is_success() {
            return Err(api_error("OpenAI", response).await);
        }
        Ok(())
    }
}
