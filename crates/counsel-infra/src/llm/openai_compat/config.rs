//! Configuration types and per-provider defaults for OpenAI-compatible providers.
//!
//! Each provider that speaks the OpenAI chat completions protocol gets a factory
//! function returning an [`OpenAiCompatConfig`] with the correct base URL and
//! limits.

use counsel_types::llm::ProviderCapabilities;

/// Google Gemini's OpenAI-compatible endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "gemini").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g., "gemini-1.5-flash").
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

/// Google Gemini default configuration (OpenAI-compatible beta endpoint).
///
/// 1M context, 8K output.
pub fn gemini_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: GEMINI_BASE_URL.into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            max_context_tokens: 1_000_000,
            max_output_tokens: 8_192,
        },
    }
}

/// OpenAI default configuration.
///
/// 128K context, 16K output.
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Mistral AI default configuration.
///
/// 128K context, 32K output.
pub fn mistral_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "mistral".into(),
        base_url: MISTRAL_BASE_URL.into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            max_context_tokens: 128_000,
            max_output_tokens: 32_768,
        },
    }
}

/// Configuration for a self-hosted or otherwise unknown endpoint.
///
/// Limits are conservative since nothing is known about the backend.
pub fn custom(name: &str, base_url: &str, api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: name.into(),
        base_url: base_url.trim_end_matches('/').into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            max_context_tokens: 32_000,
            max_output_tokens: 4_096,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_defaults() {
        let config = gemini_defaults("key", "gemini-1.5-flash");
        assert_eq!(config.provider_name, "gemini");
        assert_eq!(config.base_url, GEMINI_BASE_URL);
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.capabilities.max_context_tokens, 1_000_000);
    }

    #[test]
    fn test_custom_trims_trailing_slash() {
        let config = custom("local", "http://localhost:11434/v1/", "none", "llama3");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.capabilities.max_output_tokens, 4_096);
    }
}
