//! Business logic for Helios: turn assembly, the streaming exchange
//! pipeline, title synthesis, and the traits the infrastructure layer
//! implements.
//!
//! Nothing in this crate touches SQLite or the network directly; it is
//! generic over [`chat::repository::SessionRepository`] and
//! [`llm::provider::GenerativeProvider`].

pub mod chat;
pub mod llm;
