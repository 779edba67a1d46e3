//! SQLite session repository implementation.
//!
//! Implements `SessionRepository` from helios-core using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECTs,
//! writer for mutations. Attachment metadata is stored as a JSON text
//! column on the turn row.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use helios_core::chat::repository::SessionRepository;
use helios_types::chat::{Attachment, ChatSession, SessionSummary, Turn, TurnRole};
use helios_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    id: String,
    owner_id: String,
    title: String,
    model: String,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            model: row.try_get("model")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_summary(self) -> Result<SessionSummary, RepositoryError> {
        Ok(SessionSummary {
            id: parse_uuid(&self.id, "session id")?,
            owner_id: parse_uuid(&self.owner_id, "owner_id")?,
            title: self.title,
            model: self.model,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }

    fn into_session(self, turns: Vec<Turn>) -> Result<ChatSession, RepositoryError> {
        Ok(ChatSession {
            id: parse_uuid(&self.id, "session id")?,
            owner_id: parse_uuid(&self.owner_id, "owner_id")?,
            title: self.title,
            model: self.model,
            turns,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct TurnRow {
    role: String,
    content: String,
    attachments: String,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            attachments: row.try_get("attachments")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<Turn, RepositoryError> {
        let role: TurnRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let attachments: Vec<Attachment> = serde_json::from_str(&self.attachments)
            .map_err(|e| RepositoryError::Query(format!("invalid attachments json: {e}")))?;

        Ok(Turn {
            role,
            content: self.content,
            attachments,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {what}: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn attachments_json(attachments: &[Attachment]) -> Result<String, RepositoryError> {
    serde_json::to_string(attachments)
        .map_err(|e| RepositoryError::Query(format!("attachments serialization: {e}")))
}

// ---------------------------------------------------------------------------
// SessionRepository implementation
// ---------------------------------------------------------------------------

impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO sessions (id, owner_id, title, model, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.owner_id.to_string())
        .bind(&session.title)
        .bind(&session.model)
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find(
        &self,
        session_id: &Uuid,
        owner_id: &Uuid,
    ) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ? AND owner_id = ?")
            .bind(session_id.to_string())
            .bind(owner_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let session_row =
            SessionRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;

        let turn_rows = sqlx::query(
            "SELECT role, content, attachments, created_at FROM turns WHERE session_id = ? ORDER BY seq ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let turns = turn_rows
            .iter()
            .map(|row| {
                TurnRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_turn()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(session_row.into_session(turns)?))
    }

    async fn list(&self, owner_id: &Uuid) -> Result<Vec<SessionSummary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM sessions WHERE owner_id = ? ORDER BY updated_at DESC",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                SessionRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_summary()
            })
            .collect()
    }

    async fn rename(
        &self,
        session_id: &Uuid,
        owner_id: &Uuid,
        title: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE sessions SET title = ?, updated_at = ? WHERE id = ? AND owner_id = ?",
        )
        .bind(title)
        .bind(format_datetime(&Utc::now()))
        .bind(session_id.to_string())
        .bind(owner_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, session_id: &Uuid, owner_id: &Uuid) -> Result<bool, RepositoryError> {
        // Turn rows cascade via the foreign key.
        let result = sqlx::query("DELETE FROM sessions WHERE id = ? AND owner_id = ?")
            .bind(session_id.to_string())
            .bind(owner_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit_exchange(
        &self,
        session: &ChatSession,
        new_turns: &[Turn],
    ) -> Result<(), RepositoryError> {
        // New turns must already sit at the tail of session.turns.
        let base_seq = session
            .turns
            .len()
            .checked_sub(new_turns.len())
            .ok_or_else(|| {
                RepositoryError::Query(format!(
                    "exchange has {} new turns but session holds only {}",
                    new_turns.len(),
                    session.turns.len()
                ))
            })?;

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        for (offset, turn) in new_turns.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO turns (id, session_id, seq, role, content, attachments, created_at)
                   VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(Uuid::now_v7().to_string())
            .bind(session.id.to_string())
            .bind((base_seq + offset) as i64)
            .bind(turn.role.to_string())
            .bind(&turn.content)
            .bind(attachments_json(&turn.attachments)?)
            .bind(format_datetime(&turn.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        sqlx::query("UPDATE sessions SET title = ?, updated_at = ? WHERE id = ?")
            .bind(&session.title)
            .bind(format_datetime(&session.updated_at))
            .bind(session.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> (tempfile::TempDir, SqliteSessionRepository) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteSessionRepository::new(pool))
    }

    fn sample_session(owner: Uuid) -> ChatSession {
        ChatSession::new(owner, "gemini-2.5-flash".to_string())
    }

    #[tokio::test]
    async fn test_create_and_find_roundtrip() {
        let (_dir, repo) = test_repo().await;
        let owner = Uuid::now_v7();
        let session = sample_session(owner);
        repo.create(&session).await.unwrap();

        let found = repo.find(&session.id, &owner).await.unwrap().unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.title, session.title);
        assert_eq!(found.model, "gemini-2.5-flash");
        assert!(found.turns.is_empty());
    }

    #[tokio::test]
    async fn test_find_is_owner_scoped() {
        let (_dir, repo) = test_repo().await;
        let owner = Uuid::now_v7();
        let session = sample_session(owner);
        repo.create(&session).await.unwrap();

        let stranger = Uuid::now_v7();
        assert!(repo.find(&session.id, &stranger).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_exchange_appends_turns_in_order() {
        let (_dir, repo) = test_repo().await;
        let owner = Uuid::now_v7();
        let mut session = sample_session(owner);
        repo.create(&session).await.unwrap();

        let user_turn = Turn::user(
            "Hello".to_string(),
            vec![Attachment {
                file_name: "a.png".to_string(),
                mime_type: "image/png".to_string(),
            }],
        );
        let model_turn = Turn::model("Hi there!".to_string());
        session.turns.push(user_turn.clone());
        session.turns.push(model_turn.clone());
        session.title = "First Chat".to_string();
        session.updated_at = Utc::now();

        repo.commit_exchange(&session, &[user_turn, model_turn])
            .await
            .unwrap();

        let found = repo.find(&session.id, &owner).await.unwrap().unwrap();
        assert_eq!(found.turns.len(), 2);
        assert_eq!(found.turns[0].role, TurnRole::User);
        assert_eq!(found.turns[0].content, "Hello");
        assert_eq!(found.turns[0].attachments[0].file_name, "a.png");
        assert_eq!(found.turns[1].role, TurnRole::Model);
        assert_eq!(found.turns[1].content, "Hi there!");
        assert_eq!(found.title, "First Chat");
    }

    #[tokio::test]
    async fn test_commit_exchange_rejects_turns_not_in_session() {
        let (_dir, repo) = test_repo().await;
        let owner = Uuid::now_v7();
        let session = sample_session(owner);
        repo.create(&session).await.unwrap();

        // The session holds zero turns, so these two cannot be its tail.
        let user_turn = Turn::user("hi".to_string(), vec![]);
        let model_turn = Turn::model("hello".to_string());
        let err = repo
            .commit_exchange(&session, &[user_turn, model_turn])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));

        let found = repo.find(&session.id, &owner).await.unwrap().unwrap();
        assert!(found.turns.is_empty());
    }

    #[tokio::test]
    async fn test_second_exchange_continues_sequence() {
        let (_dir, repo) = test_repo().await;
        let owner = Uuid::now_v7();
        let mut session = sample_session(owner);
        repo.create(&session).await.unwrap();

        for (prompt, answer) in [("one", "1"), ("two", "2")] {
            let user_turn = Turn::user(prompt.to_string(), vec![]);
            let model_turn = Turn::model(answer.to_string());
            session.turns.push(user_turn.clone());
            session.turns.push(model_turn.clone());
            session.updated_at = Utc::now();
            repo.commit_exchange(&session, &[user_turn, model_turn])
                .await
                .unwrap();
        }

        let found = repo.find(&session.id, &owner).await.unwrap().unwrap();
        let contents: Vec<&str> = found.turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "1", "two", "2"]);
    }

    #[tokio::test]
    async fn test_list_orders_by_updated_desc_and_scopes_owner() {
        let (_dir, repo) = test_repo().await;
        let owner = Uuid::now_v7();

        let mut older = sample_session(owner);
        older.updated_at = Utc::now() - chrono::Duration::minutes(5);
        repo.create(&older).await.unwrap();

        let newer = sample_session(owner);
        repo.create(&newer).await.unwrap();

        let foreign = sample_session(Uuid::now_v7());
        repo.create(&foreign).await.unwrap();

        let listed = repo.list(&owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn test_rename_and_delete() {
        let (_dir, repo) = test_repo().await;
        let owner = Uuid::now_v7();
        let session = sample_session(owner);
        repo.create(&session).await.unwrap();

        assert!(repo.rename(&session.id, &owner, "Renamed").await.unwrap());
        let found = repo.find(&session.id, &owner).await.unwrap().unwrap();
        assert_eq!(found.title, "Renamed");

        let stranger = Uuid::now_v7();
        assert!(!repo.delete(&session.id, &stranger).await.unwrap());
        assert!(repo.delete(&session.id, &owner).await.unwrap());
        assert!(repo.find(&session.id, &owner).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_turns() {
        let (_dir, repo) = test_repo().await;
        let owner = Uuid::now_v7();
        let mut session = sample_session(owner);
        repo.create(&session).await.unwrap();

        let user_turn = Turn::user("hi".to_string(), vec![]);
        let model_turn = Turn::model("hello".to_string());
        session.turns.push(user_turn.clone());
        session.turns.push(model_turn.clone());
        repo.commit_exchange(&session, &[user_turn, model_turn])
            .await
            .unwrap();

        repo.delete(&session.id, &owner).await.unwrap();

        let remaining: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM turns")
            .fetch_one(&repo.pool.reader)
            .await
            .unwrap();
        assert_eq!(remaining.0, 0);
    }
}
