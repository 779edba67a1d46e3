//! Streaming chat endpoint.
//!
//! POST /api/v1/sessions/{id}/messages
//!
//! Accepts a multipart submission (`prompt` text field plus zero or more
//! `attachments` file parts) and responds with a chunked `text/plain`
//! stream of the model's answer. Validation, session lookup, and provider
//! rejection before the first fragment all produce structured JSON errors;
//! once the body has started, a failure simply terminates the stream and
//! nothing is persisted for that exchange.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use uuid::Uuid;

use helios_core::chat::assembler::UploadedAttachment;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::state::AppState;

/// POST /api/v1/sessions/{id}/messages - Run one streaming exchange.
pub async fn send_message(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(session_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (prompt, attachments) = read_submission(multipart).await?;

    let stream = state
        .chat_service
        .send_message(auth.user_id, session_id, prompt, attachments)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Parse the multipart submission into prompt text and uploaded files.
async fn read_submission(
    mut multipart: Multipart,
) -> Result<(String, Vec<UploadedAttachment>), AppError> {
    let mut prompt = String::new();
    let mut attachments = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("prompt") => {
                prompt = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid prompt field: {e}")))?;
            }
            Some("attachments") => {
                let file_name = field.file_name().unwrap_or("attachment").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid attachment: {e}")))?;
                attachments.push(UploadedAttachment {
                    file_name,
                    mime_type,
                    data: data.to_vec(),
                });
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    Ok((prompt, attachments))
}
