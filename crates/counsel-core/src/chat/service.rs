//! Chat service orchestrating session lifecycle and message exchange.
//!
//! `ChatService` is the single authority for session and message mutation
//! and the only component that calls the generation provider. A send is a
//! strictly sequential chain of single-write steps:
//!
//! 1. persist the user message
//! 2. load the session's full history
//! 3. assemble instruction and turns
//! 4. call the provider (bounded by the generation timeout)
//! 5. persist the assistant message
//! 6. bump the session's `updated_at`
//!
//! A failure at step 4 leaves the user message persisted without a reply;
//! `retry_last_exchange` re-runs steps 2-6 for it without duplicating it.
//! Mutations on the same session are serialized through [`SessionLocks`].

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use counsel_types::chat::{
    ChatMessage, ChatSession, Exchange, MessageRole, NewSession, ServiceType, SessionFilter,
    SessionSummary, timestamp,
};
use counsel_types::config::GenerationConfig;
use counsel_types::error::ChatError;
use counsel_types::llm::{CompletionRequest, LlmError, ProviderConfig};
use counsel_types::user::User;

use crate::chat::assembler::ConversationAssembler;
use crate::chat::locks::SessionLocks;
use crate::chat::repository::ChatRepository;
use crate::chat::validation;
use crate::llm::box_provider::BoxLlmProvider;

/// Per-call generation parameters.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl GenerationSettings {
    pub fn from_config(provider: &ProviderConfig, generation: &GenerationConfig) -> Self {
        Self {
            model: provider.model.clone(),
            temperature: provider.temperature,
            max_tokens: provider.max_tokens,
            timeout: Duration::from_secs(generation.timeout_secs),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default(), &GenerationConfig::default())
    }
}

/// Orchestrates sessions, message persistence and generation.
///
/// Generic over `ChatRepository` to maintain clean architecture
/// (counsel-core never depends on counsel-infra).
pub struct ChatService<C: ChatRepository> {
    chat_repo: C,
    provider: BoxLlmProvider,
    assembler: ConversationAssembler,
    settings: GenerationSettings,
    locks: SessionLocks,
}

impl<C: ChatRepository> ChatService<C> {
    pub fn new(
        chat_repo: C,
        provider: BoxLlmProvider,
        assembler: ConversationAssembler,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            chat_repo,
            provider,
            assembler,
            settings,
            locks: SessionLocks::new(),
        }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    // --- Session lifecycle ---

    /// Create a session owned by `input.user_id`, creating the user record
    /// on first sight.
    ///
    /// The user upsert never modifies an existing record. If the session
    /// insert fails afterwards, the user row is left behind; it is invisible
    /// until the user owns a session.
    #[tracing::instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_session(&self, input: NewSession) -> Result<ChatSession, ChatError> {
        let user_id = validation::validate_user_id(&input.user_id)?;
        let title = validation::validate_title(&input.title)?;
        let service_type = input
            .service_type
            .as_deref()
            .map(ServiceType::from_key)
            .unwrap_or_default();

        self.chat_repo.upsert_user(&User::placeholder(&user_id)).await?;

        let now = timestamp();
        let session = ChatSession {
            id: Uuid::now_v7(),
            title,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            user_id: Some(user_id),
            service_type,
            created_at: now,
            updated_at: now,
        };

        let session = self.chat_repo.create_session(&session).await?;
        info!(session_id = %session.id, service_type = %session.service_type, "Session created");
        Ok(session)
    }

    /// Get a session by ID.
    pub async fn get_session(&self, session_id: &Uuid) -> Result<ChatSession, ChatError> {
        self.chat_repo
            .get_session(session_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    /// List sessions with a preview of their latest message, most recently
    /// active first.
    pub async fn list_sessions(
        &self,
        filter: &SessionFilter,
    ) -> Result<Vec<SessionSummary>, ChatError> {
        Ok(self.chat_repo.list_sessions(filter).await?)
    }

    /// All messages of a session in insertion order. Unknown sessions yield
    /// an empty list.
    pub async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.chat_repo.get_messages(session_id).await?)
    }

    /// Change a session's title. Does not affect recency ordering.
    #[tracing::instrument(skip(self, title), fields(session_id = %session_id))]
    pub async fn rename_session(
        &self,
        session_id: Uuid,
        title: &str,
    ) -> Result<ChatSession, ChatError> {
        let title = validation::validate_title(title)?;
        let _guard = self.locks.acquire(session_id).await;

        let mut session = self.locked_session(&session_id).await?;
        session.title = title;
        self.chat_repo.update_session(&session).await?;
        info!("Session renamed");
        Ok(session)
    }

    /// Delete a session and all of its messages.
    #[tracing::instrument(skip(self), fields(session_id = %session_id))]
    pub async fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        let guard = self.locks.acquire(session_id).await;
        let result = self.chat_repo.delete_session(&session_id).await;
        drop(guard);
        self.locks.remove(&session_id);
        result?;
        info!("Session deleted");
        Ok(())
    }

    // --- Exchanges ---

    /// Persist a user message, generate the assistant reply and persist it.
    ///
    /// Content is validated before anything is written. If generation
    /// fails, the user message stays persisted, no assistant message is
    /// written, `updated_at` is unchanged, and `ChatError::Generation` is
    /// returned.
    #[tracing::instrument(skip(self, content), fields(session_id = %session_id, content_chars = content.chars().count()))]
    pub async fn send_message(
        &self,
        session_id: Uuid,
        content: &str,
    ) -> Result<Exchange, ChatError> {
        validation::validate_content(content)?;
        let _guard = self.locks.acquire(session_id).await;

        let session = self.locked_session(&session_id).await?;

        let user_message = self
            .chat_repo
            .append_message(&ChatMessage::new(session_id, MessageRole::User, content))
            .await?;
        debug!(sequence = user_message.sequence, "User message persisted");

        self.complete_exchange(&session, user_message).await
    }

    /// Generate a reply for a trailing user message that never got one.
    ///
    /// Fails with `Validation` when the session is empty or already ends
    /// with an assistant message.
    #[tracing::instrument(skip(self), fields(session_id = %session_id))]
    pub async fn retry_last_exchange(&self, session_id: Uuid) -> Result<Exchange, ChatError> {
        let _guard = self.locks.acquire(session_id).await;

        let session = self.locked_session(&session_id).await?;
        let last = self.chat_repo.latest_message(&session_id).await?;

        match last {
            Some(message) if message.role == MessageRole::User => {
                self.complete_exchange(&session, message).await
            }
            _ => Err(ChatError::Validation(
                "nothing to retry: the session does not end with an unanswered user message"
                    .to_string(),
            )),
        }
    }

    /// Look up a session while holding its lock, dropping the lock entry
    /// again if the id is unknown.
    async fn locked_session(&self, session_id: &Uuid) -> Result<ChatSession, ChatError> {
        let result = self.get_session(session_id).await;
        if matches!(result, Err(ChatError::NotFound)) {
            self.locks.remove(session_id);
        }
        result
    }

    /// Steps 2-6 of an exchange. Caller holds the session lock and has
    /// already persisted `user_message`.
    async fn complete_exchange(
        &self,
        session: &ChatSession,
        user_message: ChatMessage,
    ) -> Result<Exchange, ChatError> {
        let history = self.chat_repo.get_messages(&session.id).await?;
        let assembled = self.assembler.assemble(session.service_type, &history);
        if assembled.dropped > 0 {
            debug!(dropped = assembled.dropped, "Context window truncated history");
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: assembled.turns,
            system: Some(assembled.system_instruction),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        };

        let content = match self.generate(&request).await {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    session_id = %session.id,
                    user_message_id = %user_message.id,
                    error = %e,
                    "Generation failed; user message retained without reply"
                );
                return Err(ChatError::Generation(e));
            }
        };

        let assistant_message = self
            .chat_repo
            .append_message(&ChatMessage::new(session.id, MessageRole::Assistant, content))
            .await
            .inspect_err(|e| {
                warn!(session_id = %session.id, error = %e, "Generated reply could not be persisted");
            })?;

        self.chat_repo
            .touch_session(&session.id, next_updated_at(session.updated_at))
            .await?;

        info!(
            session_id = %session.id,
            turns = request.messages.len(),
            reply_chars = assistant_message.content.chars().count(),
            "Exchange completed"
        );

        Ok(Exchange {
            user_message,
            assistant_message,
        })
    }

    /// Call the provider under the configured timeout and reject blank
    /// replies.
    async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
        );

        let response = tokio::time::timeout(
            self.settings.timeout,
            self.provider.complete(request).instrument(span),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.settings.timeout.as_secs()))??;

        if response.content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(response.content)
    }
}

/// The new `updated_at` after an exchange: now, but always strictly after
/// the previous value so recency never stalls on coarse clocks.
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    timestamp().max(previous + TimeDelta::microseconds(1))
}
