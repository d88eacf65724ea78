use super::support::{GatewayTestServer, completion, sent_messages};
use reqwest::StatusCode;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ERROR_FALLBACK: &str = "Lo siento, no pude procesar tu solicitud.";

#[tokio::test]
async fn reply_comes_back_as_twiml() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("¡Hola! ¿En qué te ayudo?")))
        .expect(1)
        .mount(&backend)
        .await;
    let server = GatewayTestServer::start(&backend, |_| {}).await;

    let response = server
        .post_form("Body=hola&From=whatsapp%3A%2B5215512345678")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/xml"
    );
    assert_eq!(
        response.text().await.unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <Response><Message>¡Hola! ¿En qué te ayudo?</Message></Response>"
    );
}

#[tokio::test]
async fn follow_up_replays_previous_exchange() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Claro, dame tu número de pedido.")))
        .mount(&backend)
        .await;
    let server = GatewayTestServer::start(&backend, |_| {}).await;

    server
        .post_form("Body=I+want+to+track+my+order&From=whatsapp%3A%2B1555")
        .await;
    server
        .post_form("Body=It+is+order+123&From=whatsapp%3A%2B1555")
        .await;

    let first = sent_messages(&backend, 0).await;
    let second = sent_messages(&backend, 1).await;
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 5);

    assert_eq!(second[0]["role"], "system");
    assert_eq!(second[1]["role"], "system");
    assert!(
        second[1]["content"]
            .as_str()
            .unwrap()
            .starts_with("Current date/time: ")
    );
    assert_eq!(second[2]["role"], "user");
    assert_eq!(second[2]["content"], "I want to track my order");
    assert_eq!(second[3]["role"], "assistant");
    assert_eq!(second[3]["content"], "Claro, dame tu número de pedido.");
    assert_eq!(second[4]["role"], "user");
    assert_eq!(second[4]["content"], "It is order 123");

    assert_eq!(server.health().await["sessions"], 1);
}

#[tokio::test]
async fn empty_backend_reply_is_sent_and_recorded() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("")))
        .mount(&backend)
        .await;
    let server = GatewayTestServer::start(&backend, |_| {}).await;

    let response = server.post_form("Body=hola&From=whatsapp%3A%2B1555").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("<Message></Message>"));
    assert!(!body.contains(ERROR_FALLBACK));

    server.post_form("Body=hola%3F&From=whatsapp%3A%2B1555").await;
    let replayed = sent_messages(&backend, 1).await;
    assert_eq!(replayed.len(), 5);
    assert_eq!(replayed[3]["role"], "assistant");
    assert_eq!(replayed[3]["content"], "");
}

#[tokio::test]
async fn senders_get_separate_conversations() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&backend)
        .await;
    let server = GatewayTestServer::start(&backend, |_| {}).await;

    server.post_form("Body=uno&From=whatsapp%3A%2B1111").await;
    server.post_form("Body=dos&From=whatsapp%3A%2B2222").await;

    assert_eq!(sent_messages(&backend, 1).await.len(), 3);
    assert_eq!(server.health().await["sessions"], 2);
}

#[tokio::test]
async fn backend_error_yields_error_fallback() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&backend)
        .await;
    let server = GatewayTestServer::start(&backend, |_| {}).await;

    let response = server.post_form("Body=hola&From=whatsapp%3A%2B1555").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(ERROR_FALLBACK));
    assert!(!body.contains("upstream exploded"));
}

#[tokio::test]
async fn failed_turn_is_not_replayed() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&backend)
        .await;
    let server = GatewayTestServer::start(&backend, |_| {}).await;

    server.post_form("Body=primero&From=whatsapp%3A%2B1555").await;
    server.post_form("Body=segundo&From=whatsapp%3A%2B1555").await;

    // the failed first exchange left no turns behind
    assert_eq!(sent_messages(&backend, 1).await.len(), 3);
}

#[tokio::test]
async fn malformed_payload_still_gets_twiml_200() {
    let backend = MockServer::start().await;
    let server = GatewayTestServer::start(&backend, |config| {
        config.bridge.fault_reply = "fault text".into();
    })
    .await;

    let response = reqwest::Client::new()
        .post(server.url("/whatsapp"))
        .header("content-type", "application/json")
        .body(r#"{"Body":"hola"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("<Message>fault text</Message>"));
    assert!(backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_sender_still_gets_twiml_200() {
    let backend = MockServer::start().await;
    let server = GatewayTestServer::start(&backend, |config| {
        config.bridge.fault_reply = "fault text".into();
    })
    .await;

    let response = server.post_form("Body=hola").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("fault text"));
    assert_eq!(server.health().await["sessions"], 0);
}

#[tokio::test]
async fn oversized_payload_still_gets_twiml_200() {
    let backend = MockServer::start().await;
    let server = GatewayTestServer::start(&backend, |config| {
        config.bridge.fault_reply = "fault text".into();
    })
    .await;

    let body = format!("From=whatsapp%3A%2B1555&Body={}", "a".repeat(70_000));
    let response = server.post_form(&body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("fault text"));
}

#[tokio::test]
async fn health_starts_empty() {
    let backend = MockServer::start().await;
    let server = GatewayTestServer::start(&backend, |_| {}).await;

    let health = server.health().await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["sessions"], 0);
}
