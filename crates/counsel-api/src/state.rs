//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! `ChatService` is generic over its repository; AppState pins it to SQLite.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use counsel_core::chat::assembler::{ContextWindow, ConversationAssembler};
use counsel_core::chat::service::{ChatService, GenerationSettings};
use counsel_infra::config::{load_global_config, resolve_data_dir, resolve_database_url};
use counsel_infra::llm::provider_from_env;
use counsel_infra::sqlite::chat::SqliteChatRepository;
use counsel_infra::sqlite::pool::DatabasePool;
use counsel_types::config::{ContextConfig, GlobalConfig};
use counsel_types::llm::ProviderCapabilities;

/// Chat service pinned to the SQLite repository.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to the DB,
    /// build the provider and wire the chat service.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;

        let db_url = resolve_database_url(&data_dir);
        let db_pool = DatabasePool::new(&db_url)
            .await
            .context("failed to open the session database")?;

        // A missing key only fails generation, not startup
        let provider = provider_from_env(&config.provider)
            .with_context(|| format!("failed to create provider '{}'", config.provider.name))?;

        tracing::debug!(
            provider = provider.name(),
            model = %config.provider.model,
            data_dir = %data_dir.display(),
            "Application state initialized"
        );

        let window = context_window(&config.context, provider.capabilities());

        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool),
            provider,
            ConversationAssembler::new(window),
            GenerationSettings::from_config(&config.provider, &config.generation),
        );

        Ok(Self::from_parts(chat_service, config, data_dir))
    }

    /// Assemble state from an already-wired service.
    pub fn from_parts(
        chat_service: ConcreteChatService,
        config: GlobalConfig,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
        }
    }
}

/// The configured window, narrowed to what the provider can take.
fn context_window(config: &ContextConfig, capabilities: &ProviderCapabilities) -> ContextWindow {
    let window = ContextWindow::from(config.clone()).fit_to(capabilities);
    if window.max_chars != config.max_chars {
        tracing::info!(
            configured = config.max_chars,
            fitted = window.max_chars,
            "Context window narrowed to the provider's context size"
        );
    }
    window
}

#[cfg(test)]
mod tests {
    use counsel_core::llm::box_provider::BoxLlmProvider;
    use counsel_infra::llm::unconfigured::UnconfiguredProvider;

    use super::*;

    #[test]
    fn test_context_window_follows_provider_size() {
        let config = ContextConfig::default();
        let small = ProviderCapabilities {
            max_context_tokens: 8_192,
            max_output_tokens: 4_096,
        };
        assert_eq!(context_window(&config, &small).max_chars, 16_384);
        assert_eq!(context_window(&config, &small).max_turns, config.max_turns);

        let unknown = ProviderCapabilities {
            max_context_tokens: 0,
            max_output_tokens: 0,
        };
        assert_eq!(context_window(&config, &unknown).max_chars, config.max_chars);
    }

    #[tokio::test]
    async fn test_from_parts_keeps_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("state.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        let service = ChatService::new(
            SqliteChatRepository::new(pool),
            BoxLlmProvider::new(UnconfiguredProvider::new("gemini")),
            ConversationAssembler::default(),
            GenerationSettings::default(),
        );

        let state = AppState::from_parts(service, GlobalConfig::default(), dir.path().to_path_buf());
        assert_eq!(state.data_dir, dir.path());
        assert_eq!(state.config.server.port, 3000);
    }
}
