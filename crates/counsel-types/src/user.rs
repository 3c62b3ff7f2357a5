//! User records.
//!
//! Users are identified by an opaque id issued by the external identity
//! provider. Records are created lazily the first time a session is started.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::timestamp;

/// Display name given to users created implicitly on first session.
pub const DEFAULT_USER_NAME: &str = "Anonymous User";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fresh record for an identity seen for the first time.
    pub fn placeholder(id: impl Into<String>) -> Self {
        let now = timestamp();
        Self {
            id: id.into(),
            name: Some(DEFAULT_USER_NAME.to_string()),
            email: None,
            created_at: now,
            updated_at: now,
        }
    }
}
