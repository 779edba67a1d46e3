//! SessionRepository trait definition.
//!
//! Persistence operations for chat sessions, all keyed by session id plus
//! owner identity. Uses native async fn in traits (RPITIT, Rust 2024
//! edition); the implementation lives in helios-infra
//! (`SqliteSessionRepository`).

use helios_types::chat::{ChatSession, SessionSummary, Turn};
use helios_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat session persistence.
pub trait SessionRepository: Send + Sync {
    /// Persist a freshly created session.
    fn create(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch a full session (turns included) by id, scoped to its owner.
    /// Returns `None` when the session is absent or owned by someone else.
    fn find(
        &self,
        session_id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// List an owner's sessions without turn bodies, newest-updated first.
    fn list(
        &self,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, RepositoryError>> + Send;

    /// Set a session's title. Returns false when no owned session matched.
    fn rename(
        &self,
        session_id: &Uuid,
        owner_id: &Uuid,
        title: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete a session and its turns. Returns false when no owned session
    /// matched.
    fn delete(
        &self,
        session_id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Durably record one completed exchange: append `new_turns` (already
    /// present at the tail of `session.turns`) and update the session's
    /// title/updated_at, as a single atomic write.
    fn commit_exchange(
        &self,
        session: &ChatSession,
        new_turns: &[Turn],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
