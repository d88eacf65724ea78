//! TwiML reply envelope.

use crate::utils::text::xml_escape;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// `<Response><Message>text</Message></Response>` with `text` escaped.
pub fn message_response(text: &str) -> String {
    format!(
        "{XML_DECLARATION}<Response><Message>{}</Message></Response>",
        xml_escape(text)
    )
}

/// 200 response carrying a single TwiML message.
pub fn reply(text: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        message_response(text),
    )
        .into_response()
}
