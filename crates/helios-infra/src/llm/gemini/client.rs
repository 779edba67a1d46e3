//! GeminiProvider -- concrete [`GenerativeProvider`] implementation for the
//! Google Generative Language API.
//!
//! Sends requests to `models/{model}:generateContent` (non-streaming) and
//! `models/{model}:streamGenerateContent?alt=sse` (streaming) with the API
//! key in the `x-goog-api-key` header.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use helios_core::llm::provider::{FragmentStream, GenerateRequest, GenerativeProvider};
use helios_types::error::ProviderError;

use super::streaming::create_gemini_stream;
use super::types::{GeminiRequest, GenerateContentResponse};

/// Gemini generative-language provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{model}:{method}", self.base_url)
    }
}

// GeminiProvider intentionally does NOT derive Debug; the SecretString
// field keeps the API key out of any formatted output.

impl GenerativeProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn stream_generate(&self, request: GenerateRequest) -> FragmentStream {
        let body = GeminiRequest::from_contents(
            &request.contents,
            request.system_instruction.as_deref(),
        );
        let url = format!("{}?alt=sse", self.url(&request.model, "streamGenerateContent"));

        create_gemini_stream(&self.client, &url, body, &self.api_key)
    }

    async fn generate(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let body = GeminiRequest::from_prompt(prompt);
        let url = self.url(model, "generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationFailed,
                s => ProviderError::Rejected {
                    status: s,
                    message: error_body,
                },
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(format!("response body: {e}")))?;

        let text = parsed.text();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}
