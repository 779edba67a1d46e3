//! Application error type mapping to HTTP status codes and a structured
//! JSON body: `{ "error": { "code": "...", "message": "..." } }`.
//!
//! Raw provider/repository errors never cross this boundary; they are
//! translated here before anything is written to the wire. This mapping
//! only applies before the first streamed byte: once a chunked body has
//! started, a failure terminates the stream without a structured trailer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use helios_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request data.
    Validation(String),
    /// Missing or invalid API token.
    Unauthorized(String),
    /// Session absent or owned by someone else.
    NotFound(String),
    /// Provider rejected or failed the call before any output.
    Provider(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptySubmission | ChatError::UnsupportedModel(_) => {
                AppError::Validation(e.to_string())
            }
            ChatError::SessionNotFound => AppError::NotFound(
                "Session not found or you do not have permission to access it.".to_string(),
            ),
            ChatError::Provider(err) => AppError::Provider(err.to_string()),
            ChatError::Repository(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Provider(msg) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
