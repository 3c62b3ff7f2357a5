//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves Google Gemini (the default
//! counselor backend), OpenAI, Mistral and any self-hosted endpoint that
//! speaks the chat completions protocol, via configurable base URLs.
//!
//! Uses [`async_openai`] for type-safe request/response handling.

pub mod config;

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, FinishReason,
};

use counsel_core::llm::provider::LlmProvider;
use counsel_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, ProviderCapabilities,
    StopReason, Usage,
};

use self::config::OpenAiCompatConfig;

/// Unified provider for any OpenAI-compatible API.
///
/// Does NOT derive Debug: the `async_openai::Client` holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        // The first upstream error is returned; retries are the caller's call
        let no_retry = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: Client::with_config(openai_config).with_backoff(no_retry),
            provider_name: config.provider_name,
            model: config.model,
            capabilities: config.capabilities,
        }
    }

    /// Create a Google Gemini provider (OpenAI-compatible beta endpoint).
    pub fn gemini(api_key: &str, model: &str) -> Self {
        Self::new(config::gemini_defaults(api_key, model))
    }

    /// Create an OpenAI provider.
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self::new(config::openai_defaults(api_key, model))
    }

    /// Create a Mistral AI provider.
    pub fn mistral(api_key: &str, model: &str) -> Self {
        Self::new(config::mistral_defaults(api_key, model))
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref system) = request.system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }

        for msg in &request.messages {
            let oai_msg = match msg.role {
                MessageRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                        name: None,
                    })
                }
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    })
                }
            };
            messages.push(oai_msg);
        }

        // Request model wins; empty means the configured default
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let choice = response.choices.first().ok_or(LlmError::EmptyResponse)?;

        let content = choice.message.content.clone().unwrap_or_default();
        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let stop_reason = choice
            .finish_reason
            .as_ref()
            .map(|fr| match fr {
                FinishReason::Stop => StopReason::EndTurn,
                FinishReason::Length => StopReason::MaxTokens,
                FinishReason::ContentFilter => StopReason::ContentFilter,
                FinishReason::ToolCalls | FinishReason::FunctionCall => StopReason::EndTurn,
            })
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        // 5xx bodies arrive unparsed, with no type or code
        OpenAIError::ApiError(api_err) if api_err.r#type.is_none() && api_err.code.is_none() => {
            classify_error_body(&api_err.message).unwrap_or_else(|| LlmError::Provider {
                message: format!("upstream server error: {}", api_err.message),
            })
        }
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("API key not valid")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded"
                || error_type == "rate_limit_error"
                || error_type == "insufficient_quota"
            {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "context_length_exceeded"
                || api_err.message.contains("maximum context length")
            {
                LlmError::ContextLengthExceeded {
                    max: 0,
                    requested: 0,
                }
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            Some(503) | Some(529) => LlmError::Overloaded(err.to_string()),
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        // Gemini sends numeric error codes, which the OpenAI error type rejects
        OpenAIError::JSONDeserialize(_, content) => classify_error_body(content)
            .unwrap_or_else(|| {
                LlmError::Deserialization(format!("failed to parse response: {content}"))
            }),
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

/// Classify a raw `{"error": {...}}` body by its code, status or type.
///
/// Handles both the OpenAI shape (string `code`/`type`) and the Google
/// shape (numeric `code`, string `status`). Returns `None` for anything
/// else.
fn classify_error_body(body: &str) -> Option<LlmError> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;

    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or(body)
        .to_string();
    let numeric_code = error.get("code").and_then(|c| c.as_u64());
    let code = error.get("code").and_then(|c| c.as_str()).unwrap_or("");
    let status = error.get("status").and_then(|s| s.as_str()).unwrap_or("");
    let error_type = error.get("type").and_then(|t| t.as_str()).unwrap_or("");

    if numeric_code == Some(429)
        || status == "RESOURCE_EXHAUSTED"
        || code == "rate_limit_exceeded"
        || error_type == "rate_limit_error"
    {
        Some(LlmError::RateLimited {
            retry_after_ms: None,
        })
    } else if matches!(numeric_code, Some(401) | Some(403))
        || status == "UNAUTHENTICATED"
        || status == "PERMISSION_DENIED"
        || message.contains("API key not valid")
    {
        Some(LlmError::AuthenticationFailed)
    } else if matches!(numeric_code, Some(500) | Some(503))
        || status == "UNAVAILABLE"
        || status == "INTERNAL"
        || code == "server_error"
        || error_type == "server_error"
    {
        Some(LlmError::Overloaded(message))
    } else if status == "INVALID_ARGUMENT" || numeric_code == Some(400) {
        Some(LlmError::InvalidRequest(message))
    } else {
        None
    }
}
