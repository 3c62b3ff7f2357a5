//! Chat session and message types for Counsel.
//!
//! These types model counseling conversations: sessions owned by a user,
//! the ordered message log inside each session, and the list-view summary
//! that pairs a session with its most recent message.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Maximum length of a user message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Maximum length of a session title, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Current time at the microsecond precision the store keeps.
pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Counseling service a session is focused on.
///
/// Selects the system instruction used for every exchange in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    CareerStrategy,
    ResumeReview,
    InterviewPrep,
    SalaryGuidance,
    General,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        ServiceType::CareerStrategy,
        ServiceType::ResumeReview,
        ServiceType::InterviewPrep,
        ServiceType::SalaryGuidance,
        ServiceType::General,
    ];

    /// Resolve a free-form service key, falling back to `General` for
    /// anything unrecognized.
    ///
    /// Matching ignores case and treats spaces and hyphens as underscores,
    /// so `"Career Strategy"`, `"career-strategy"` and `"career_strategy"`
    /// all select the same service.
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_default()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::CareerStrategy => write!(f, "career_strategy"),
            ServiceType::ResumeReview => write!(f, "resume_review"),
            ServiceType::InterviewPrep => write!(f, "interview_prep"),
            ServiceType::SalaryGuidance => write!(f, "salary_guidance"),
            ServiceType::General => write!(f, "general"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "career_strategy" => Ok(ServiceType::CareerStrategy),
            "resume_review" => Ok(ServiceType::ResumeReview),
            "interview_prep" => Ok(ServiceType::InterviewPrep),
            "salary_guidance" => Ok(ServiceType::SalaryGuidance),
            "general" => Ok(ServiceType::General),
            _ => Err(format!("invalid service type: '{s}'")),
        }
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        ServiceType::General
    }
}

/// A counseling conversation.
///
/// `updated_at` tracks the last completed exchange and drives recency
/// ordering in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Owning user; `None` for unowned (legacy or demo) sessions.
    pub user_id: Option<String>,
    pub service_type: ServiceType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single message within a chat session.
///
/// Messages are ordered by `sequence`, a per-session counter assigned by the
/// store on insert. `created_at` is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sequence: i64,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build an unsaved message. The store assigns `sequence` on append.
    pub fn new(session_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            sequence: 0,
            role,
            content: content.into(),
            created_at: timestamp(),
        }
    }
}

/// A session as shown in a listing: the session plus a preview of its
/// latest message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: ChatSession,
    pub latest_message: Option<ChatMessage>,
    pub message_count: i64,
}

/// One user turn and the assistant turn generated for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

/// Input for creating a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSession {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub service_type: Option<String>,
}

/// Which sessions a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionFilter {
    /// Sessions owned by the given user.
    Owner(String),
    /// Sessions with no owner.
    Unowned,
    /// Every session (operator use only).
    Any,
}

impl SessionFilter {
    /// Map an optional caller identity onto a filter.
    ///
    /// Anonymous callers see unowned sessions only, never other users' data.
    pub fn for_caller(user_id: Option<&str>) -> Self {
        match user_id.map(str::trim) {
            Some(id) if !id.is_empty() => SessionFilter::Owner(id.to_string()),
            _ => SessionFilter::Unowned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_roundtrip() {
        for st in ServiceType::ALL {
            let s = st.to_string();
            let parsed: ServiceType = s.parse().unwrap();
            assert_eq!(st, parsed);
        }
    }

    #[test]
    fn test_service_type_lenient_keys() {
        assert_eq!(ServiceType::from_key("Career Strategy"), ServiceType::CareerStrategy);
        assert_eq!(ServiceType::from_key("resume-review"), ServiceType::ResumeReview);
        assert_eq!(ServiceType::from_key("  INTERVIEW_PREP "), ServiceType::InterviewPrep);
        assert_eq!(ServiceType::from_key("salary guidance"), ServiceType::SalaryGuidance);
    }

    #[test]
    fn test_service_type_unknown_falls_back_to_general() {
        assert_eq!(ServiceType::from_key("astrology"), ServiceType::General);
        assert_eq!(ServiceType::from_key(""), ServiceType::General);
        assert!("astrology".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_service_type_default() {
        assert_eq!(ServiceType::default(), ServiceType::General);
    }

    #[test]
    fn test_chat_message_new_is_unsequenced() {
        let sid = Uuid::now_v7();
        let msg = ChatMessage::new(sid, MessageRole::User, "hello");
        assert_eq!(msg.session_id, sid);
        assert_eq!(msg.sequence, 0);
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "hello");
    }

    #[test]
    fn test_session_summary_serializes_flat() {
        let now = Utc::now();
        let summary = SessionSummary {
            session: ChatSession {
                id: Uuid::now_v7(),
                title: "Career Chat".to_string(),
                description: None,
                user_id: Some("user-1".to_string()),
                service_type: ServiceType::General,
                created_at: now,
                updated_at: now,
            },
            latest_message: None,
            message_count: 0,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["title"], "Career Chat");
        assert_eq!(json["service_type"], "general");
        assert_eq!(json["message_count"], 0);
        assert!(json["latest_message"].is_null());
    }

    #[test]
    fn test_session_filter_for_caller() {
        assert_eq!(
            SessionFilter::for_caller(Some("user-1")),
            SessionFilter::Owner("user-1".to_string())
        );
        assert_eq!(SessionFilter::for_caller(Some("   ")), SessionFilter::Unowned);
        assert_eq!(SessionFilter::for_caller(None), SessionFilter::Unowned);
    }
}
