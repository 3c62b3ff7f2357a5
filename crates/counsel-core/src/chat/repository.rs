//! ChatRepository trait definition.
//!
//! Provides persistence for users, chat sessions and their message logs.

use chrono::{DateTime, Utc};
use counsel_types::chat::{ChatMessage, ChatSession, SessionFilter, SessionSummary};
use counsel_types::error::RepositoryError;
use counsel_types::user::User;
use uuid::Uuid;

/// Repository trait for user, session and message persistence.
///
/// Implementations live in counsel-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Every method is a single atomic write or read.
pub trait ChatRepository: Send + Sync {
    /// Insert the user if no record with that id exists. Existing records
    /// are returned unchanged.
    fn upsert_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Create a new chat session.
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Get a chat session by its unique ID.
    fn get_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Overwrite title, description and service type. `updated_at` is left
    /// alone; only [`touch_session`](Self::touch_session) moves it.
    ///
    /// Returns `NotFound` if the session does not exist.
    fn update_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Set `updated_at` to `at`, never moving it backwards.
    ///
    /// Returns `NotFound` if the session does not exist.
    fn touch_session(
        &self,
        session_id: &Uuid,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List sessions with their latest message, most recently updated first
    /// (ties broken by `created_at` DESC).
    fn list_sessions(
        &self,
        filter: &SessionFilter,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, RepositoryError>> + Send;

    /// Delete a chat session and its messages in one transaction.
    ///
    /// Returns `NotFound` if the session does not exist.
    fn delete_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message to its session's log.
    ///
    /// The store assigns the next per-session `sequence`; the returned
    /// message carries it.
    fn append_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Get all messages for a session, ordered by `sequence` ASC.
    fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The highest-sequence message of a session, if any.
    fn latest_message(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;
}
