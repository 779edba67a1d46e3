//! Infrastructure implementations for Helios.
//!
//! Concrete backends for the traits defined in helios-core: SQLite
//! persistence via sqlx, the Gemini provider client, API-token storage,
//! and the configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
