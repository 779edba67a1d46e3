//! Chat service: session lifecycle plus the streaming exchange pipeline.
//!
//! `send_message` is the orchestrator for one exchange. It validates the
//! submission, assembles the provider request, opens the provider stream,
//! and hands back a lazy fragment stream. Driving that stream relays each
//! fragment to the caller while accumulating the full text; when the
//! provider signals end of stream the new user and model turns are
//! committed in a single repository write, with the title synthesized on a
//! session's first exchange.
//!
//! Durability policy: an exchange is persisted only when the provider
//! stream completes. A mid-stream provider failure, or the caller dropping
//! the stream (disconnect), leaves the session unchanged even though
//! partial output may already have been delivered.

use std::sync::Arc;

use chrono::Utc;
use futures_util::{Stream, StreamExt};
use tracing::{error, info, warn};
use uuid::Uuid;

use helios_types::chat::{ChatSession, SessionSummary, Turn};
use helios_types::error::ChatError;

use crate::chat::assembler::{assemble_contents, UploadedAttachment};
use crate::chat::prompt::SYSTEM_INSTRUCTION;
use crate::chat::repository::SessionRepository;
use crate::chat::title::synthesize_title;
use crate::llm::provider::{GenerateRequest, GenerativeProvider};

/// Models a session may be created with.
pub const SUPPORTED_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-pro"];

/// Model used when session creation names none.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Process-wide exchange configuration, loaded once at startup and passed
/// in at construction.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Static behavioral prompt sent with every streaming call.
    pub system_instruction: String,
    /// Model used for title synthesis calls.
    pub title_model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            title_model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Orchestrates session lifecycle and streaming exchanges.
///
/// Generic over [`SessionRepository`] and [`GenerativeProvider`] so the
/// pipeline can be exercised without SQLite or the network.
pub struct ChatService<R, P> {
    repo: Arc<R>,
    provider: Arc<P>,
    config: Arc<ChatConfig>,
}

impl<R, P> Clone for ChatService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            provider: Arc::clone(&self.provider),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R, P> ChatService<R, P>
where
    R: SessionRepository + 'static,
    P: GenerativeProvider + 'static,
{
    pub fn new(repo: R, provider: P, config: ChatConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            provider: Arc::new(provider),
            config: Arc::new(config),
        }
    }

    // --- Session lifecycle ---

    /// Create an empty session with the default title.
    pub async fn create_session(
        &self,
        owner_id: Uuid,
        model: Option<String>,
    ) -> Result<ChatSession, ChatError> {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if !SUPPORTED_MODELS.contains(&model.as_str()) {
            return Err(ChatError::UnsupportedModel(model));
        }

        let session = ChatSession::new(owner_id, model);
        self.repo.create(&session).await?;
        info!(session_id = %session.id, model = %session.model, "session created");
        Ok(session)
    }

    /// List the owner's sessions without turn bodies.
    pub async fn list_sessions(&self, owner_id: Uuid) -> Result<Vec<SessionSummary>, ChatError> {
        Ok(self.repo.list(&owner_id).await?)
    }

    /// Fetch a full session scoped to its owner.
    pub async fn get_session(
        &self,
        session_id: Uuid,
        owner_id: Uuid,
    ) -> Result<ChatSession, ChatError> {
        self.repo
            .find(&session_id, &owner_id)
            .await?
            .ok_or(ChatError::SessionNotFound)
    }

    /// Set a session's display title.
    pub async fn rename_session(
        &self,
        session_id: Uuid,
        owner_id: Uuid,
        title: &str,
    ) -> Result<(), ChatError> {
        if self.repo.rename(&session_id, &owner_id, title).await? {
            Ok(())
        } else {
            Err(ChatError::SessionNotFound)
        }
    }

    /// Delete a session and its turns.
    pub async fn delete_session(&self, session_id: Uuid, owner_id: Uuid) -> Result<(), ChatError> {
        if self.repo.delete(&session_id, &owner_id).await? {
            Ok(())
        } else {
            Err(ChatError::SessionNotFound)
        }
    }

    // --- Streaming exchange ---

    /// Run one exchange: returns a stream of answer fragments in provider
    /// emission order.
    ///
    /// Errors returned here (invalid submission, unknown session, provider
    /// rejection before the first fragment) arrive before any output and map
    /// to structured responses. Once the stream is handed back, a provider
    /// failure is yielded as the final item and nothing is persisted;
    /// dropping the stream mid-flight likewise discards the exchange.
    pub async fn send_message(
        &self,
        owner_id: Uuid,
        session_id: Uuid,
        prompt: String,
        attachments: Vec<UploadedAttachment>,
    ) -> Result<impl Stream<Item = Result<String, ChatError>> + Send + 'static, ChatError> {
        if prompt.is_empty() && attachments.is_empty() {
            return Err(ChatError::EmptySubmission);
        }

        let mut session = self
            .repo
            .find(&session_id, &owner_id)
            .await?
            .ok_or(ChatError::SessionNotFound)?;

        let contents = assemble_contents(&session.turns, &prompt, &attachments);
        let request = GenerateRequest {
            model: session.model.clone(),
            contents,
            system_instruction: Some(self.config.system_instruction.clone()),
        };

        let mut fragments = self.provider.stream_generate(request);

        // Pull the first fragment eagerly so a provider rejection surfaces
        // as a structured error instead of an aborted response body.
        let head = fragments.next().await.transpose().map_err(ChatError::Provider)?;

        let repo = Arc::clone(&self.repo);
        let provider = Arc::clone(&self.provider);
        let config = Arc::clone(&self.config);

        Ok(async_stream::stream! {
            let mut accumulated = String::new();
            let mut head = head;

            loop {
                let item = match head.take() {
                    Some(fragment) => Some(Ok(fragment)),
                    None => fragments.next().await,
                };
                let Some(item) = item else { break };

                match item {
                    Ok(fragment) => {
                        if !fragment.is_empty() {
                            accumulated.push_str(&fragment);
                            yield Ok(fragment);
                        }
                    }
                    Err(err) => {
                        warn!(
                            session_id = %session.id,
                            error = %err,
                            "provider stream failed mid-exchange, partial output discarded"
                        );
                        yield Err(ChatError::Provider(err));
                        return;
                    }
                }
            }

            // Stream ended cleanly: persist the exchange. User turn first,
            // then the model turn, one repository write for both.
            let first_exchange = session.turns.is_empty();
            let user_turn = Turn::user(
                prompt.clone(),
                attachments.iter().map(UploadedAttachment::metadata).collect(),
            );
            session.turns.push(user_turn.clone());

            if first_exchange && !prompt.is_empty() {
                session.title =
                    synthesize_title(provider.as_ref(), &prompt, &config.title_model).await;
            }

            let model_turn = Turn::model(accumulated);
            session.turns.push(model_turn.clone());
            session.updated_at = Utc::now();

            if let Err(err) = repo.commit_exchange(&session, &[user_turn, model_turn]).await {
                // The caller already has the full answer; the exchange is
                // lost from durable state. Log it, do not retry.
                error!(
                    session_id = %session.id,
                    error = %err,
                    "exchange streamed to caller but commit failed"
                );
            }
        })
    }
}
