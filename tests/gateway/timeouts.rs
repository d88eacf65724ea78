use super::support::{GatewayTestServer, completion, sent_messages};
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT_FALLBACK: &str =
    "Lo siento, el servidor está tardando en responder. Por favor, intenta de nuevo más tarde.";

#[tokio::test]
async fn slow_backend_yields_timeout_fallback_at_deadline() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&backend)
        .await;
    let server = GatewayTestServer::start(&backend, |config| {
        config.bridge.reply_timeout_ms = 300;
    })
    .await;

    let started = Instant::now();
    let response = server.post_form("Body=hola&From=whatsapp%3A%2B1555").await;
    let waited = started.elapsed();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains(TIMEOUT_FALLBACK));
    assert!(waited >= Duration::from_millis(300));
    assert!(waited < Duration::from_millis(1_500));
}

#[tokio::test]
async fn abandoned_reply_still_lands_in_history() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("respuesta tardía"))
                .set_delay(Duration::from_millis(600)),
        )
        .up_to_n_times(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&backend)
        .await;
    let server = GatewayTestServer::start(&backend, |config| {
        config.bridge.reply_timeout_ms = 200;
    })
    .await;

    let first = server.post_form("Body=hola&From=whatsapp%3A%2B1555").await;
    assert!(first.text().await.unwrap().contains(TIMEOUT_FALLBACK));

    // the second turn waits on the session lock until the first exchange is recorded
    tokio::time::sleep(Duration::from_millis(800)).await;
    let second = server.post_form("Body=sigues+ahí&From=whatsapp%3A%2B1555").await;
    assert!(second.text().await.unwrap().contains("<Message>ok</Message>"));

    let replayed = sent_messages(&backend, 1).await;
    assert_eq!(replayed.len(), 5);
    assert_eq!(replayed[3]["content"], "respuesta tardía");
}

#[tokio::test]
async fn stalled_body_still_gets_twiml_200() {
    let backend = MockServer::start().await;
    let server = GatewayTestServer::start(&backend, |config| {
        config.gateway.request_timeout_secs = 1;
        config.bridge.reply_timeout_ms = 200;
        config.bridge.fault_reply = "fault text".into();
    })
    .await;

    let mut stream = TcpStream::connect(("127.0.0.1", server.port)).await.unwrap();
    // declares 30 bytes, sends 7, then goes quiet
    stream
        .write_all(
            b"POST /whatsapp HTTP/1.1\r\n\
              Host: localhost\r\n\
              Content-Type: application/x-www-form-urlencoded\r\n\
              Content-Length: 30\r\n\
              Connection: close\r\n\r\n\
              Body=hi",
        )
        .await
        .unwrap();

    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut raw))
        .await
        .expect("gateway should answer a stalled request")
        .unwrap();
    let raw = String::from_utf8_lossy(&raw);

    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");
    assert!(raw.contains("<Message>fault text</Message>"));
    assert!(backend.received_requests().await.unwrap().is_empty());
}
