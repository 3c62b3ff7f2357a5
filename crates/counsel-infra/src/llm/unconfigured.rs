//! Stand-in provider used when no API key is available.
//!
//! Lets read-only commands and the server start without credentials; every
//! generation attempt fails with [`LlmError::AuthenticationFailed`].

use counsel_core::llm::provider::LlmProvider;
use counsel_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

pub struct UnconfiguredProvider {
    name: String,
    capabilities: ProviderCapabilities,
}

impl UnconfiguredProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: ProviderCapabilities {
                max_context_tokens: 0,
                max_output_tokens: 0,
            },
        }
    }
}

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_always_fails_authentication() {
        let provider = UnconfiguredProvider::new("gemini");
        let request = CompletionRequest {
            model: "gemini-1.5-flash".to_string(),
            messages: vec![],
            system: None,
            max_tokens: 16,
            temperature: None,
        };
        assert_eq!(provider.name(), "gemini");
        assert!(matches!(
            provider.complete(&request).await,
            Err(LlmError::AuthenticationFailed)
        ));
    }
}
