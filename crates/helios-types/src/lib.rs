//! Shared domain types for Helios.
//!
//! This crate holds the data shapes used across all layers: persisted chat
//! sessions and turns, the transient provider content types, and the error
//! enums. It performs no I/O.

pub mod chat;
pub mod error;
pub mod provider;
