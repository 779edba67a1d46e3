//! Session title synthesis via the provider.
//!
//! Best-effort secondary call that labels a session after its first
//! exchange. Failure is absorbed: any provider error or empty result
//! yields [`FALLBACK_TITLE`], never an error to the enclosing exchange.

use helios_types::error::ProviderError;

use crate::llm::provider::GenerativeProvider;

/// Title used when synthesis fails or returns nothing.
pub const FALLBACK_TITLE: &str = "Untitled Chat";

/// Request a compact label (4 words max) for a session's first prompt.
///
/// The provider's answer is returned verbatim apart from trimming
/// leading/trailing whitespace and one pair of surrounding quotes (models
/// often echo the title quoted).
#[tracing::instrument(name = "synthesize_title", skip(provider, first_message), fields(model = %model))]
pub async fn synthesize_title<P: GenerativeProvider>(
    provider: &P,
    first_message: &str,
    model: &str,
) -> String {
    let prompt = format!(
        "Generate a very short, concise title (4 words max) for the following user query. \
         Respond with only the title and nothing else:\n\n\"{first_message}\""
    );

    match provider.generate(&prompt, model).await {
        Ok(text) => {
            let title = strip_quotes(text.trim());
            if title.is_empty() {
                tracing::warn!("title synthesis returned an empty result, using fallback");
                FALLBACK_TITLE.to_string()
            } else {
                title.to_string()
            }
        }
        Err(err) => {
            log_failure(&err);
            FALLBACK_TITLE.to_string()
        }
    }
}

fn log_failure(err: &ProviderError) {
    tracing::warn!(error = %err, "title synthesis failed, using fallback");
}

/// Remove one pair of matching surrounding quotes, then re-trim.
fn strip_quotes(title: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = title
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    title
}
