//! Session CRUD HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/sessions      - List the owner's sessions (no turns)
//! - POST   /api/v1/sessions      - Create a session
//! - GET    /api/v1/sessions/{id} - Get a full session with turns
//! - PUT    /api/v1/sessions/{id} - Rename a session
//! - DELETE /api/v1/sessions/{id} - Delete a session

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use helios_types::chat::{ChatSession, SessionSummary};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::state::AppState;

/// Request body for session creation.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Model identifier; defaults to the process default when absent.
    pub model: Option<String>,
}

/// Request body for renaming.
#[derive(Debug, Deserialize)]
pub struct RenameSessionRequest {
    pub title: String,
}

/// GET /api/v1/sessions - List the owner's sessions, newest-updated first.
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    let sessions = state.chat_service.list_sessions(auth.user_id).await?;
    Ok(Json(sessions))
}

/// POST /api/v1/sessions - Create an empty session with the default title.
pub async fn create_session(
    State(state): State<AppState>,
    auth: Authenticated,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<ChatSession>), AppError> {
    let model = body.and_then(|Json(b)| b.model);
    let session = state.chat_service.create_session(auth.user_id, model).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/sessions/{id} - Full session with turns.
pub async fn get_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ChatSession>, AppError> {
    let session = state
        .chat_service
        .get_session(session_id, auth.user_id)
        .await?;
    Ok(Json(session))
}

/// PUT /api/v1/sessions/{id} - Rename a session.
pub async fn rename_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(session_id): Path<Uuid>,
    Json(body): Json<RenameSessionRequest>,
) -> Result<Json<ChatSession>, AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }

    state
        .chat_service
        .rename_session(session_id, auth.user_id, body.title.trim())
        .await?;
    let session = state
        .chat_service
        .get_session(session_id, auth.user_id)
        .await?;
    Ok(Json(session))
}

/// DELETE /api/v1/sessions/{id} - Delete a session and its turns.
pub async fn delete_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(session_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .chat_service
        .delete_session(session_id, auth.user_id)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Session deleted" })))
}
