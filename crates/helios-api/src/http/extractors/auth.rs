//! Bearer-token authentication extractor.
//!
//! Extracting [`Authenticated`] resolves the `Authorization: Bearer <token>`
//! header to an owner identity via the token store. Handlers downstream
//! treat the identity as pre-authenticated.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated owner identity for the current request.
pub struct Authenticated {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;

        let user_id = state
            .token_store
            .verify(&token)
            .await
            .map_err(|e| AppError::Internal(format!("token lookup failed: {e}")))?
            .ok_or_else(|| AppError::Unauthorized("Not authorized, token failed".to_string()))?;

        Ok(Authenticated { user_id })
    }
}

/// Pull the bearer token out of the Authorization header.
fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Err(AppError::Unauthorized(
            "Not authorized, no token".to_string(),
        ));
    };

    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) => Ok(token.trim().to_string()),
        None => Err(AppError::Unauthorized(
            "Not authorized, no token".to_string(),
        )),
    }
}
