use chatbridge::config::Config;
use chatbridge::gateway::run_gateway_with_listener;
use chatbridge::providers::{self, Provider};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::MockServer;

pub struct GatewayTestServer {
    pub port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    /// Gateway on an ephemeral port, generating through `backend`.
    pub async fn start(backend: &MockServer, tweak: impl FnOnce(&mut Config)) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config::default();
        config.gateway.host = "127.0.0.1".into();
        config.gateway.port = port;
        config.llm.api_key = Some("sk-test-key".into());
        config.llm.base_url = backend.uri();
        config.llm.request_timeout_secs = 30;
        tweak(&mut config);

        let provider: Arc<dyn Provider> = Arc::new(providers::create_provider(&config.llm));
        let handle = tokio::spawn(run_gateway_with_listener(
            listener,
            Arc::new(config),
            provider,
        ));

        Self { port, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    /// POST a raw urlencoded body to the webhook.
    pub async fn post_form(&self, body: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url("/whatsapp"))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()
            .await
            .expect("webhook request should complete")
    }

    pub async fn health(&self) -> Value {
        reqwest::get(self.url("/health"))
            .await
            .expect("health request should complete")
            .json()
            .await
            .expect("health body should be json")
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
    })
}

/// Messages array of the `index`th request the backend received.
pub async fn sent_messages(backend: &MockServer, index: usize) -> Vec<Value> {
    let requests = backend
        .received_requests()
        .await
        .expect("request recording should be enabled");
    let body: Value = serde_json::from_slice(&requests[index].body)
        .expect("backend request body should be json");
    body["messages"]
        .as_array()
        .expect("messages should be an array")
        .clone()
}
