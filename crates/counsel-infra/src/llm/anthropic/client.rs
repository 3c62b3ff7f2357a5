//! AnthropicProvider -- concrete [`LlmProvider`] implementation for Anthropic Claude.
//!
//! Sends non-streaming requests to the Anthropic Messages API (`/v1/messages`)
//! with the required authentication headers.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use counsel_core::llm::provider::LlmProvider;
use counsel_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use super::types::{
    AnthropicContentBlock, AnthropicMessage, AnthropicNonStreamResponse, AnthropicRequest,
    ErrorPayload,
};

/// Anthropic Claude LLM provider.
///
/// The API key is only exposed when building request headers.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";

    /// Create a new Anthropic provider.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Provider`] if the HTTP client cannot be built.
    pub fn new(api_key: SecretString, model: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        let capabilities = Self::capabilities_for_model(&model);

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model,
            capabilities,
        })
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        let max_output_tokens = if model.contains("opus") {
            32_000
        } else if model.contains("sonnet") || model.contains("haiku") {
            8_192
        } else {
            4_096
        };

        ProviderCapabilities {
            max_context_tokens: 200_000,
            max_output_tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
        }
    }
}

/// Map a non-success HTTP status and its body to an [`LlmError`].
fn map_status_error(status: reqwest::StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorPayload>(body)
        .map(|p| p.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        529 => LlmError::Overloaded(message),
        400 if message.contains("prompt is too long") => LlmError::ContextLengthExceeded {
            max: 0,
            requested: 0,
        },
        400 => LlmError::InvalidRequest(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_anthropic_request(request);
        let url = self.url("/v1/messages");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &error_body));
        }

        let anthropic_resp: AnthropicNonStreamResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = anthropic_resp
            .content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let stop_reason = match anthropic_resp.stop_reason.as_deref() {
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            Some("refusal") => StopReason::ContentFilter,
            _ => StopReason::EndTurn,
        };

        Ok(CompletionResponse {
            id: anthropic_resp.id,
            content,
            model: anthropic_resp.model,
            stop_reason,
            usage: Usage {
                input_tokens: anthropic_resp.usage.input_tokens,
                output_tokens: anthropic_resp.usage.output_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_types::llm::{Message, MessageRole};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_provider(base_url: &str) -> AnthropicProvider {
        AnthropicProvider::new(
            SecretString::from("test-key-not-real"),
            "claude-3-5-haiku-latest".to_string(),
        )
        .unwrap()
        .with_base_url(base_url)
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "claude-3-5-haiku-latest".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Review my resume summary".to_string(),
            }],
            system: Some("You are a resume reviewer.".to_string()),
            max_tokens: 1024,
            temperature: Some(0.7),
        }
    }

    #[test]
    fn test_provider_name_and_capabilities() {
        let provider = make_provider(AnthropicProvider::DEFAULT_BASE_URL);
        assert_eq!(provider.name(), "anthropic");
        assert_eq!(provider.capabilities().max_context_tokens, 200_000);
        assert_eq!(provider.capabilities().max_output_tokens, 8_192);
    }

    #[test]
    fn test_to_anthropic_request() {
        let provider = make_provider(AnthropicProvider::DEFAULT_BASE_URL);
        let anthropic_req = provider.to_anthropic_request(&request());
        assert_eq!(anthropic_req.model, "claude-3-5-haiku-latest");
        assert_eq!(anthropic_req.messages.len(), 1);
        assert_eq!(anthropic_req.messages[0].role, "user");
        assert_eq!(anthropic_req.system.as_deref(), Some("You are a resume reviewer."));
    }

    #[test]
    fn test_base_url_override() {
        let provider = make_provider("http://localhost:8080/");
        assert_eq!(provider.url("/v1/messages"), "http://localhost:8080/v1/messages");
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key-not-real"))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "model": "claude-3-5-haiku-latest",
                "content": [{"type": "text", "text": "## Strengths\n- Clear impact"}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 25, "output_tokens": 8}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = make_provider(&server.uri()).complete(&request()).await.unwrap();
        assert_eq!(response.id, "msg_01");
        assert_eq!(response.content, "## Strengths\n- Clear impact");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 25);
    }

    #[tokio::test]
    async fn test_complete_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            })))
            .mount(&server)
            .await;

        let result = make_provider(&server.uri()).complete(&request()).await;
        assert!(matches!(result, Err(LlmError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let result = make_provider(&server.uri()).complete(&request()).await;
        assert!(matches!(result, Err(LlmError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_complete_overloaded_uses_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_json(serde_json::json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })))
            .mount(&server)
            .await;

        let result = make_provider(&server.uri()).complete(&request()).await;
        assert!(matches!(result, Err(LlmError::Overloaded(ref m)) if m == "Overloaded"));
    }

    #[tokio::test]
    async fn test_complete_without_text_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_02",
                "model": "claude-3-5-haiku-latest",
                "content": [],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 25, "output_tokens": 0}
            })))
            .mount(&server)
            .await;

        let result = make_provider(&server.uri()).complete(&request()).await;
        assert!(matches!(result, Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_map_status_error_prompt_too_long() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"prompt is too long: 250000 tokens > 200000 maximum"}}"#;
        let err = map_status_error(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, LlmError::ContextLengthExceeded { .. }));
    }
}
