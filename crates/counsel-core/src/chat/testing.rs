//! In-memory repository and scripted providers for orchestrator tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use counsel_types::chat::{ChatMessage, ChatSession, MessageRole, SessionFilter, SessionSummary};
use counsel_types::error::RepositoryError;
use counsel_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};
use counsel_types::user::User;

use crate::chat::repository::ChatRepository;
use crate::llm::provider::LlmProvider;

#[derive(Default)]
struct State {
    users: HashMap<String, User>,
    sessions: HashMap<Uuid, ChatSession>,
    messages: Vec<ChatMessage>,
}

/// `ChatRepository` backed by a mutex-guarded map, with switches to inject
/// write failures.
#[derive(Clone, Default)]
pub struct MemoryChatRepository {
    state: Arc<Mutex<State>>,
    pub fail_user_appends: Arc<AtomicBool>,
    pub fail_assistant_appends: Arc<AtomicBool>,
}

impl MemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().unwrap().messages.len()
    }
}

impl ChatRepository for MemoryChatRepository {
    fn upsert_user(&self, user: &User) -> impl Future<Output = Result<User, RepositoryError>> + Send {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .users
            .entry(user.id.clone())
            .or_insert_with(|| user.clone())
            .clone();
        async move { Ok(stored) }
    }

    fn get_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send {
        let user = self.state.lock().unwrap().users.get(user_id).cloned();
        async move { Ok(user) }
    }

    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl Future<Output = Result<ChatSession, RepositoryError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = if state.sessions.contains_key(&session.id) {
            Err(RepositoryError::Conflict(format!("session {} exists", session.id)))
        } else {
            state.sessions.insert(session.id, session.clone());
            Ok(session.clone())
        };
        async move { result }
    }

    fn get_session(
        &self,
        session_id: &Uuid,
    ) -> impl Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send {
        let session = self.state.lock().unwrap().sessions.get(session_id).cloned();
        async move { Ok(session) }
    }

    fn update_session(
        &self,
        session: &ChatSession,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match state.sessions.get_mut(&session.id) {
            Some(existing) => {
                existing.title = session.title.clone();
                existing.description = session.description.clone();
                existing.service_type = session.service_type;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        };
        async move { result }
    }

    fn touch_session(
        &self,
        session_id: &Uuid,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match state.sessions.get_mut(session_id) {
            Some(existing) => {
                existing.updated_at = existing.updated_at.max(at);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        };
        async move { result }
    }

    fn list_sessions(
        &self,
        filter: &SessionFilter,
    ) -> impl Future<Output = Result<Vec<SessionSummary>, RepositoryError>> + Send {
        let state = self.state.lock().unwrap();
        let mut summaries: Vec<SessionSummary> = state
            .sessions
            .values()
            .filter(|s| match filter {
                SessionFilter::Owner(id) => s.user_id.as_deref() == Some(id.as_str()),
                SessionFilter::Unowned => s.user_id.is_none(),
                SessionFilter::Any => true,
            })
            .map(|s| {
                let log: Vec<&ChatMessage> =
                    state.messages.iter().filter(|m| m.session_id == s.id).collect();
                SessionSummary {
                    session: s.clone(),
                    latest_message: log.iter().max_by_key(|m| m.sequence).map(|m| (*m).clone()),
                    message_count: log.len() as i64,
                }
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.session
                .updated_at
                .cmp(&a.session.updated_at)
                .then(b.session.created_at.cmp(&a.session.created_at))
                .then(b.session.id.cmp(&a.session.id))
        });
        async move { Ok(summaries) }
    }

    fn delete_session(
        &self,
        session_id: &Uuid,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match state.sessions.remove(session_id) {
            Some(_) => {
                state.messages.retain(|m| m.session_id != *session_id);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        };
        async move { result }
    }

    fn append_message(
        &self,
        message: &ChatMessage,
    ) -> impl Future<Output = Result<ChatMessage, RepositoryError>> + Send {
        let failing = match message.role {
            MessageRole::User => self.fail_user_appends.load(Ordering::SeqCst),
            MessageRole::Assistant => self.fail_assistant_appends.load(Ordering::SeqCst),
        };
        let mut state = self.state.lock().unwrap();
        let result = if failing {
            Err(RepositoryError::Query("injected write failure".to_string()))
        } else if !state.sessions.contains_key(&message.session_id) {
            Err(RepositoryError::Query("FOREIGN KEY constraint failed".to_string()))
        } else {
            let next = state
                .messages
                .iter()
                .filter(|m| m.session_id == message.session_id)
                .map(|m| m.sequence)
                .max()
                .unwrap_or(0)
                + 1;
            let mut stored = message.clone();
            stored.sequence = next;
            state.messages.push(stored.clone());
            Ok(stored)
        };
        async move { result }
    }

    fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send {
        let state = self.state.lock().unwrap();
        let mut messages: Vec<ChatMessage> = state
            .messages
            .iter()
            .filter(|m| m.session_id == *session_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.sequence);
        async move { Ok(messages) }
    }

    fn latest_message(
        &self,
        session_id: &Uuid,
    ) -> impl Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send {
        let state = self.state.lock().unwrap();
        let latest = state
            .messages
            .iter()
            .filter(|m| m.session_id == *session_id)
            .max_by_key(|m| m.sequence)
            .cloned();
        async move { Ok(latest) }
    }
}

/// Provider returning a fixed result, recording every request it sees.
#[derive(Clone)]
pub struct ScriptedProvider {
    result: Result<String, LlmError>,
    delay: Option<Duration>,
    capabilities: ProviderCapabilities,
    pub calls: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self::with_result(Ok(text.to_string()))
    }

    pub fn failing(error: LlmError) -> Self {
        Self::with_result(Err(error))
    }

    pub fn slow(text: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying(text)
        }
    }

    fn with_result(result: Result<String, LlmError>) -> Self {
        Self {
            result,
            delay: None,
            capabilities: ProviderCapabilities {
                max_context_tokens: 1_000_000,
                max_output_tokens: 8192,
            },
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let result = self.result.clone();
        let delay = self.delay;
        let model = request.model.clone();
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result.map(|content| CompletionResponse {
                id: "resp-1".to_string(),
                content,
                model,
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }
}
