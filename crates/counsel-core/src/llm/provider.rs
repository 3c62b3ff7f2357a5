//! LlmProvider trait definition.
//!
//! This is the core abstraction that all generation providers implement.
//! Uses RPITIT for `complete`.

use counsel_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Trait for LLM provider backends (Gemini, OpenAI, Anthropic, etc.).
///
/// Providers are stateless: each call receives the full instruction and
/// turn list and returns exactly one new assistant turn.
///
/// Implementations live in counsel-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "anthropic").
    fn name(&self) -> &str;

    /// Context and output limits of the configured model.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
