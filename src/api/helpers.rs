//! Response builders shared by the HTTP handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::slack::response_builder::create_text_payload;

/// Returns a 200 OK response with a `{"text": ...}` body.
#[must_use]
pub fn ok_text(text: &str) -> Response {
    (StatusCode::OK, Json(create_text_payload(text))).into_response()
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Plain-text 405 for any method an endpoint does not serve.
pub async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
}
