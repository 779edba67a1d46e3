//! Chat session and turn types for Helios.
//!
//! A `ChatSession` owns an ordered sequence of `Turn`s. Turns are
//! append-only: within the current design a session is mutated only by
//! appending a user/model turn pair or by renaming its title.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Default title assigned to a freshly created session.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Role of a turn within a chat session.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'model'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Model => write!(f, "model"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "model" => Ok(TurnRole::Model),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// Descriptive metadata for a file submitted with a user turn.
///
/// The binary payload is sent inline to the provider at submission time and
/// is not retained; only this metadata survives in the session document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
}

/// One role-tagged message within a session.
///
/// Role and content are immutable once created; turns are never reordered
/// or individually deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Build a user turn carrying attachment metadata.
    pub fn user(content: String, attachments: Vec<Attachment>) -> Self {
        Self {
            role: TurnRole::User,
            content,
            attachments,
            created_at: Utc::now(),
        }
    }

    /// Build a model turn (model turns never carry attachments).
    pub fn model(content: String) -> Self {
        Self {
            role: TurnRole::Model,
            content,
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A persisted, owned conversation.
///
/// Visible and mutable only by its owning user; deleted explicitly, never
/// expired. Serializes to the document layout
/// `{ id, owner, title, model, turns, createdAt, updatedAt }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub title: String,
    pub model: String,
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session metadata without turn bodies, as returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub title: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create an empty session with the default title.
    pub fn new(owner_id: Uuid, model: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner_id,
            title: DEFAULT_TITLE.to_string(),
            model,
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_roundtrip() {
        for role in [TurnRole::User, TurnRole::Model] {
            let s = role.to_string();
            let parsed: TurnRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_turn_role_rejects_unknown() {
        assert!("assistant".parse::<TurnRole>().is_err());
    }

    #[test]
    fn test_attachment_serializes_camel_case() {
        let att = Attachment {
            file_name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
        };
        let json = serde_json::to_string(&att).unwrap();
        assert!(json.contains("\"fileName\":\"a.png\""));
        assert!(json.contains("\"mimeType\":\"image/png\""));
    }

    #[test]
    fn test_session_document_layout() {
        let session = ChatSession::new(Uuid::now_v7(), "gemini-2.5-flash".to_string());
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("owner").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["title"], DEFAULT_TITLE);
        assert_eq!(json["turns"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_model_turn_has_no_attachments() {
        let turn = Turn::model("Hi there!".to_string());
        assert_eq!(turn.role, TurnRole::Model);
        assert!(turn.attachments.is_empty());
    }
}
