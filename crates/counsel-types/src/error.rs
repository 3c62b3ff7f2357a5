use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in counsel-core).
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the chat orchestrator.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Input rejected before any side effect.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("session not found")]
    NotFound,

    /// The store failed; see the inner error.
    #[error("persistence error: {0}")]
    Persistence(RepositoryError),

    /// The generation provider failed. Any user turn written before the
    /// call stays persisted.
    #[error("generation error: {0}")]
    Generation(#[from] LlmError),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::NotFound,
            other => ChatError::Persistence(other),
        }
    }
}
