//! Input checks applied before any side effect.

use counsel_types::chat::{MAX_MESSAGE_CHARS, MAX_TITLE_CHARS};
use counsel_types::error::ChatError;

/// Validate user message content: non-empty after trimming and at most
/// [`MAX_MESSAGE_CHARS`] characters.
pub fn validate_content(content: &str) -> Result<(), ChatError> {
    if content.trim().is_empty() {
        return Err(ChatError::Validation(
            "message content cannot be empty".to_string(),
        ));
    }
    let len = content.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(ChatError::Validation(format!(
            "message content is {len} characters; the limit is {MAX_MESSAGE_CHARS}"
        )));
    }
    Ok(())
}

/// Validate a session title, returning it trimmed.
pub fn validate_title(title: &str) -> Result<String, ChatError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Validation("session title cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(ChatError::Validation(format!(
            "session title cannot exceed {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an opaque user id, returning it trimmed.
pub fn validate_user_id(user_id: &str) -> Result<String, ChatError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Validation("user id cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
