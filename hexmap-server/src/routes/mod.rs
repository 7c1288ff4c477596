//! HTTP route handlers

pub mod board;
pub mod editor;
pub mod files;
pub mod generate;
pub mod status;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Error reply: status code plus `{"success": false, "error": ...}`
pub type ApiError = (StatusCode, Json<Value>);

pub fn bad_request(message: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message.to_string() })),
    )
}
