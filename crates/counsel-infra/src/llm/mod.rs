//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `counsel-core`, plus a factory ([`create_provider`]) that builds the
//! configured provider and [`resolve_api_key`] for reading its key from the
//! environment.
//!
//! [`LlmProvider`]: counsel_core::llm::provider::LlmProvider

pub mod anthropic;
pub mod openai_compat;
pub mod unconfigured;

use secrecy::{ExposeSecret, SecretString};

use counsel_core::llm::box_provider::BoxLlmProvider;
use counsel_types::llm::{LlmError, ProviderConfig, ProviderType};

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::unconfigured::UnconfiguredProvider;

/// Read the API key from the environment variable named in the config.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] if the variable is unset or blank.
pub fn resolve_api_key(config: &ProviderConfig) -> Result<SecretString, LlmError> {
    match std::env::var(&config.api_key_env) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        _ => {
            tracing::warn!(
                provider = %config.name,
                env = %config.api_key_env,
                "API key environment variable is not set"
            );
            Err(LlmError::AuthenticationFailed)
        }
    }
}

/// Create a [`BoxLlmProvider`] from a [`ProviderConfig`].
///
/// For OpenAI-compatible backends an explicit `base_url` wins; otherwise the
/// well-known endpoint for `config.name` is used, falling back to Gemini.
pub fn create_provider(
    config: &ProviderConfig,
    api_key: SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    match config.provider_type {
        ProviderType::Anthropic => {
            let mut provider = AnthropicProvider::new(api_key, config.model.clone())?;
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAiCompatible => {
            let key = api_key.expose_secret();
            let provider = match config.base_url.as_deref() {
                Some(base_url) => OpenAiCompatibleProvider::new(openai_compat::config::custom(
                    &config.name,
                    base_url,
                    key,
                    &config.model,
                )),
                None => match config.name.as_str() {
                    "openai" => OpenAiCompatibleProvider::openai(key, &config.model),
                    "mistral" => OpenAiCompatibleProvider::mistral(key, &config.model),
                    "gemini" => OpenAiCompatibleProvider::gemini(key, &config.model),
                    other => {
                        tracing::warn!(
                            provider = other,
                            "unknown provider without base_url, using the Gemini endpoint"
                        );
                        OpenAiCompatibleProvider::gemini(key, &config.model)
                    }
                },
            };
            Ok(BoxLlmProvider::new(provider))
        }
    }
}

/// Build the configured provider, or an [`UnconfiguredProvider`] when its
/// API key is missing so that commands which never generate still work.
pub fn provider_from_env(config: &ProviderConfig) -> Result<BoxLlmProvider, LlmError> {
    match resolve_api_key(config) {
        Ok(api_key) => create_provider(config, api_key),
        Err(LlmError::AuthenticationFailed) => {
            Ok(BoxLlmProvider::new(UnconfiguredProvider::new(config.name.clone())))
        }
        Err(e) => Err(e),
    }
}
