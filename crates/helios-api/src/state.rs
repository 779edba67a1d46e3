//! Application state wiring the services together.
//!
//! `ChatService` is generic over repository/provider traits; `AppState`
//! pins it to the concrete infra implementations (SQLite + Gemini).

use std::path::Path;
use std::sync::Arc;

use secrecy::SecretString;

use helios_core::chat::service::{ChatConfig, ChatService};
use helios_infra::config::HeliosConfig;
use helios_infra::llm::gemini::GeminiProvider;
use helios_infra::sqlite::pool::DatabasePool;
use helios_infra::sqlite::session::SqliteSessionRepository;
use helios_infra::sqlite::token::TokenStore;

/// Concrete service type pinned to the infra implementations.
pub type ConcreteChatService = ChatService<SqliteSessionRepository, GeminiProvider>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub token_store: Arc<TokenStore>,
}

impl AppState {
    /// Connect to the database, wire the provider and services, and make
    /// sure at least one API token exists.
    pub async fn init(
        data_dir: &Path,
        config: &HeliosConfig,
        api_key: SecretString,
    ) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("helios.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        let repo = SqliteSessionRepository::new(db_pool.clone());
        let provider = GeminiProvider::new(api_key);
        let chat_config = ChatConfig {
            title_model: config.title_model.clone(),
            ..ChatConfig::default()
        };
        let chat_service = ChatService::new(repo, provider, chat_config);

        let token_store = TokenStore::new(db_pool);
        if let Some(token) = token_store.ensure_default_token().await? {
            // Shown once; only the hash is stored.
            tracing::info!("minted initial API token: {token}");
        }

        Ok(Self {
            chat_service: Arc::new(chat_service),
            token_store: Arc::new(token_store),
        })
    }
}
