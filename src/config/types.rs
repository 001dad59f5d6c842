//! Configuration types for Atelier
//!
//! Defines the structure of `.atelier.toml` configuration.

use crate::llm::CustomProviderDraft;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtelierConfig {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

/// LLM configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Default provider to use (openrouter, openai, anthropic, groq, or a custom id)
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Model override for the default provider; the provider's first catalog
    /// model is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// Per-read timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// API keys by provider id (supports ${ENV_VAR} syntax)
    #[serde(default)]
    pub api_keys: HashMap<String, String>,

    /// User-declared OpenAI-compatible providers
    #[serde(default)]
    pub custom_providers: Vec<CustomProviderDraft>,
}

fn default_provider() -> String {
    "openrouter".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_model: None,
            timeout: default_timeout(),
            api_keys: HashMap::new(),
            custom_providers: Vec::new(),
        }
    }
}

impl AtelierConfig {
    /// API key configured for a provider, if any
    pub fn api_key_for(&self, provider_id: &str) -> Option<&str> {
        self.llm
            .api_keys
            .get(provider_id)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Store an API key for a provider
    pub fn set_api_key(&mut self, provider_id: &str, key: &str) {
        self.llm
            .api_keys
            .insert(provider_id.to_string(), key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AtelierConfig::default();
        assert_eq!(config.llm.default_provider, "openrouter");
        assert_eq!(config.llm.timeout, 120);
        assert!(config.llm.api_keys.is_empty());
        assert!(config.llm.custom_providers.is_empty());
    }

    #[test]
    fn test_api_key_lookup_ignores_empty() {
        let mut config = AtelierConfig::default();
        config.set_api_key("openai", "");
        assert_eq!(config.api_key_for("openai"), None);

        config.set_api_key("openai", "sk-1");
        assert_eq!(config.api_key_for("openai"), Some("sk-1"));
        assert_eq!(config.api_key_for("groq"), None);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AtelierConfig = toml::from_str(
            r#"
            [llm]
            default_provider = "anthropic"

            [llm.api_keys]
            anthropic = "sk-ant"
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.default_provider, "anthropic");
        assert_eq!(config.llm.timeout, 120);
        assert_eq!(config.api_key_for("anthropic"), Some("sk-ant"));
    }

    #[test]
    fn test_custom_providers_toml_shape() {
        let config: AtelierConfig = toml::from_str(
            r#"
            [[llm.custom_providers]]
            id = "gw"
            name = "Gateway"
            base_url = "http://localhost:8080/v1"
            models = "a, b"
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.custom_providers.len(), 1);
        assert_eq!(config.llm.custom_providers[0].id, "gw");
    }
}
