//! Global configuration types for Counsel.
//!
//! `GlobalConfig` represents the top-level `config.toml` that selects the
//! generation provider, bounds the conversation context, and sets server
//! defaults.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderConfig;

/// Top-level configuration.
///
/// Loaded from `~/.counsel/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Limits applied to each provider call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Upper bound on a single provider call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Bounds on the history forwarded to the provider. `0` disables a bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_max_turns() -> usize {
    40
}

fn default_max_chars() -> usize {
    48_000
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            max_chars: default_max_chars(),
        }
    }
}

/// REST API bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderType;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.generation.timeout_secs, 60);
        assert_eq!(config.context.max_turns, 40);
        assert_eq!(config.context.max_chars, 48_000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.provider.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.generation.timeout_secs, 60);
        assert_eq!(config.context.max_turns, 40);
        assert_eq!(config.provider.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
[provider]
name = "anthropic"
provider_type = "anthropic"
model = "claude-sonnet-4-20250514"
api_key_env = "ANTHROPIC_API_KEY"
temperature = 0.3

[generation]
timeout_secs = 15

[context]
max_turns = 10

[server]
port = 8080
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.provider_type, ProviderType::Anthropic);
        assert_eq!(config.provider.api_key_env, "ANTHROPIC_API_KEY");
        assert!((config.provider.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.provider.max_tokens, 2048);
        assert_eq!(config.generation.timeout_secs, 15);
        assert_eq!(config.context.max_turns, 10);
        assert_eq!(config.context.max_chars, 48_000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_global_config_rejects_unknown_provider_type() {
        let toml_str = r#"
[provider]
provider_type = "carrier_pigeon"
"#;
        let parsed: Result<GlobalConfig, _> = toml::from_str(toml_str);
        assert!(parsed.is_err());
    }
}
