//! API token storage and verification.
//!
//! Tokens are bearer credentials mapping to an owner identity. Only the
//! SHA-256 hash of a token is stored; the plaintext is shown once, at mint
//! time. Credential issuance beyond this boundary (user accounts, password
//! hashing) is out of scope.

use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::Row;
use uuid::Uuid;

use helios_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed token store.
pub struct TokenStore {
    pool: DatabasePool,
}

impl TokenStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Resolve a presented token to its owner's user id.
    ///
    /// Updates `last_used_at` best-effort; a failed touch never fails the
    /// lookup.
    pub async fn verify(&self, token: &str) -> Result<Option<Uuid>, RepositoryError> {
        let token_hash = hash_token(token);

        let row = sqlx::query("SELECT id, user_id FROM api_tokens WHERE token_hash = ?")
            .bind(&token_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let _ = sqlx::query("UPDATE api_tokens SET last_used_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(&id)
            .execute(&self.pool.writer)
            .await;

        Uuid::parse_str(&user_id)
            .map(Some)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))
    }

    /// Mint a token for a fresh user on first boot when none exist.
    ///
    /// Returns the plaintext token, or `None` when a token already exists
    /// (it was shown at its own mint time).
    pub async fn ensure_default_token(&self) -> Result<Option<String>, RepositoryError> {
        let existing = sqlx::query("SELECT id FROM api_tokens LIMIT 1")
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if existing.is_some() {
            return Ok(None);
        }

        let plaintext = format!(
            "helios_{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        let user_id = Uuid::now_v7();

        sqlx::query(
            "INSERT INTO api_tokens (id, token_hash, user_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(hash_token(&plaintext))
        .bind(user_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Some(plaintext))
    }
}

/// SHA-256 hash of a token (lowercase hex).
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}
