//! Chat session domain logic.
//!
//! - [`assembler`] builds the provider request from stored turns plus the
//!   new submission, enforcing the no-adjacent-user-blocks invariant.
//! - [`service`] orchestrates session lifecycle and the streaming exchange.
//! - [`title`] produces a short session label from the first prompt.
//! - [`repository`] is the persistence trait the infra layer implements.

pub mod assembler;
pub mod prompt;
pub mod repository;
pub mod service;
pub mod title;
