//! SSE stream adapter for `streamGenerateContent`.
//!
//! With `alt=sse` the API emits one `data:` event per incremental
//! `GenerateContentResponse`; each carries a slice of the answer text.
//! Events with no text (safety metadata, usage) are skipped. The stream
//! ends when the server closes the connection.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use helios_core::llm::provider::FragmentStream;
use helios_types::error::ProviderError;

use super::types::{GeminiRequest, GenerateContentResponse};

/// Open a streaming SSE connection and adapt it to text fragments.
pub fn create_gemini_stream(
    client: &reqwest::Client,
    url: &str,
    body: GeminiRequest,
    api_key: &SecretString,
) -> FragmentStream {
    let client = client.clone();
    let url = url.to_string();
    let api_key = api_key.expose_secret().to_string();

    Box::pin(async_stream::try_stream! {
        let response = client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, "Gemini stream API error response");
            let err = match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationFailed,
                s => ProviderError::Rejected {
                    status: s,
                    message: error_body,
                },
            };
            Err(err)?;
            return;
        }

        let mut events = response.bytes_stream().eventsource();

        while let Some(event) = events.next().await {
            let event =
                event.map_err(|e| ProviderError::Stream(format!("SSE framing: {e}")))?;

            let chunk: GenerateContentResponse = serde_json::from_str(&event.data)
                .map_err(|e| ProviderError::Deserialization(format!("stream chunk: {e}")))?;

            let text = chunk.text();
            if !text.is_empty() {
                yield text;
            }
        }
    })
}
