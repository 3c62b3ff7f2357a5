//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use counsel_types::error::ChatError;
use counsel_types::llm::LlmError;

use crate::http::response::{ApiResponse, RequestTimer};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the chat orchestrator.
    Chat(ChatError),
    /// Malformed request (bad path id, unparseable body).
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::Validation(msg)) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::NotFound) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            AppError::Chat(ChatError::Persistence(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                format!("Failed to read or write conversation data: {e}"),
            ),
            AppError::Chat(ChatError::Generation(LlmError::Timeout(secs))) => (
                StatusCode::GATEWAY_TIMEOUT,
                "GENERATION_TIMEOUT",
                format!("The counselor did not answer within {secs}s; your message was saved"),
            ),
            AppError::Chat(ChatError::Generation(e)) => (
                StatusCode::BAD_GATEWAY,
                "GENERATION_ERROR",
                format!("Failed to generate a reply ({e}); your message was saved"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::warn!(code, %message, "request failed");
        }

        let body = ApiResponse::error(code, &message, &RequestTimer::start());
        (status, Json(body)).into_response()
    }
}
