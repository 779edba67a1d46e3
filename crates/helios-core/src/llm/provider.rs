//! GenerativeProvider trait definition.
//!
//! The core abstraction over an upstream generative-language API. Uses
//! native async fn in traits (RPITIT, Rust 2024 edition) for `generate`,
//! and `Pin<Box<dyn Stream>>` for `stream_generate` so the fragment stream
//! can be moved into the exchange pipeline's response stream.

use std::pin::Pin;

use futures_util::Stream;

use helios_types::error::ProviderError;
use helios_types::provider::Content;

/// A streaming fragment sequence: lazy, finite, non-restartable.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>>;

/// Request for a streaming generation call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    /// Ordered content blocks, already adjacency-normalized.
    pub contents: Vec<Content>,
    /// Process-wide behavioral instruction, not part of the conversation.
    pub system_instruction: Option<String>,
}

/// Trait for generative-language provider backends.
///
/// Implementations live in helios-infra (e.g. `GeminiProvider`).
pub trait GenerativeProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Open a streaming generation call yielding incremental text fragments
    /// in emission order. The stream is consumed exactly once.
    fn stream_generate(&self, request: GenerateRequest) -> FragmentStream;

    /// Non-streaming single-prompt call, used for title synthesis.
    fn generate(
        &self,
        prompt: &str,
        model: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;
}
