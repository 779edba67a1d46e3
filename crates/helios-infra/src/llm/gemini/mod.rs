//! Gemini provider: client, SSE streaming adapter, and wire types.

mod client;
mod streaming;
mod types;

pub use client::GeminiProvider;
