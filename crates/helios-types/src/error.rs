use thiserror::Error;

/// Errors from repository operations (used by trait definitions in helios-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from generative provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("provider returned an empty response")]
    EmptyResponse,
}

/// Errors surfaced by the chat exchange pipeline.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("a message requires a prompt or at least one attachment")]
    EmptySubmission,

    #[error("session not found")]
    SessionNotFound,

    #[error("unsupported model: '{0}'")]
    UnsupportedModel(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
