//! Generative provider abstraction.
//!
//! The [`provider::GenerativeProvider`] trait is implemented by the
//! infrastructure layer (e.g. the Gemini client in helios-infra).

pub mod provider;
