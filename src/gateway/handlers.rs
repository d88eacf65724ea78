use super::{AppState, InboundMessage, twiml};
use crate::bridge::BridgeOutcome;
use crate::error::{HandlerFault, TimeoutExceeded};
use crate::utils::text::truncate_with_ellipsis;
use axum::{
    extract::{Form, FromRequest, Request, State},
    response::{IntoResponse, Json, Response},
};
use std::any::Any;

/// GET /health: liveness and live session count
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.store.len(),
    }))
}

fn fault_reply(state: &AppState, fault: &HandlerFault) -> Response {
    tracing::error!(stage = "replied", "inbound message not handled: {fault}");
    twiml::reply(&state.bridge.fallbacks().fault)
}

/// POST /whatsapp: incoming message webhook
///
/// RECEIVED -> DISPATCHED -> COMPLETED | TIMED_OUT | FAILED -> REPLIED.
///
/// The body is read inside the request deadline, so a client that stalls
/// mid-body still gets the fault reply with a 200.
pub(super) async fn handle_whatsapp_message(
    State(state): State<AppState>,
    request: Request,
) -> Response {
    let deadline = state.request_timeout;
    match tokio::time::timeout(deadline, answer_inbound(&state, request)).await {
        Ok(response) => response,
        Err(_elapsed) => fault_reply(
            &state,
            &HandlerFault::RequestTimeout(TimeoutExceeded {
                waited_ms: deadline.as_millis(),
            }),
        ),
    }
}

async fn answer_inbound(state: &AppState, request: Request) -> Response {
    let Form(inbound) = match Form::<InboundMessage>::from_request(request, state).await {
        Ok(form) => form,
        Err(rejection) => {
            return fault_reply(state, &HandlerFault::MalformedPayload(rejection.body_text()));
        }
    };

    let message = inbound.body.trim();
    let sender = inbound.from.trim();
    if sender.is_empty() {
        return fault_reply(
            state,
            &HandlerFault::MalformedPayload("missing From field".into()),
        );
    }

    // The raw sender address is the session key: no case or format folding.
    let session_key = sender;
    tracing::debug!(
        stage = "received",
        session = session_key,
        text = %truncate_with_ellipsis(message, 50)
    );

    tracing::debug!(stage = "dispatched", session = session_key);
    let outcome = state
        .bridge
        .submit_and_wait_outcome(session_key, message, sender, state.reply_timeout)
        .await;

    match &outcome {
        BridgeOutcome::Completed(_) => {
            tracing::info!(stage = outcome.label(), session = session_key, "reply ready");
        }
        BridgeOutcome::Failed | BridgeOutcome::TimedOut => {
            tracing::warn!(
                stage = outcome.label(),
                session = session_key,
                "replying with fallback"
            );
        }
    }

    let reply = outcome.into_reply(state.bridge.fallbacks());
    tracing::debug!(stage = "replied", session = session_key);
    twiml::reply(&reply)
}

/// Message carried by a caught panic, for the fault log line.
pub(super) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
