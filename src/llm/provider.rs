//! Provider descriptors and wire protocols

use serde::{Deserialize, Serialize};

/// Wire protocol spoken by a provider
///
/// A closed set: each variant owns its request-builder and response-parser
/// pair in the client. Adding a provider type means adding one variant and
/// its pair, never touching the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    /// OpenRouter's OpenAI-style API, plus app-identifying headers
    OpenRouter,

    /// OpenAI chat completions
    OpenAi,

    /// Groq's OpenAI-compatible API
    Groq,

    /// Anthropic messages API with typed SSE events
    Anthropic,

    /// Generic OpenAI-compatible endpoint (all custom providers)
    OpenAiCompatible,
}

impl Protocol {
    /// Path appended to the provider's base URL
    pub fn endpoint_suffix(&self) -> &'static str {
        match self {
            Protocol::Anthropic => "/messages",
            _ => "/chat/completions",
        }
    }
}

/// A model offered by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Exact model identifier sent on the wire
    pub value: String,

    /// Human-readable name
    pub label: String,

    /// Optional description shown in selectors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModelInfo {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            description: None,
        }
    }
}

/// Static description of a completion provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique slug, the stable key used everywhere downstream
    pub id: String,

    /// Display name
    pub name: String,

    /// Wire protocol
    pub protocol: Protocol,

    /// Absolute endpoint root, no trailing slash
    pub base_url: String,

    /// Whether requests must carry an API key
    pub requires_api_key: bool,

    /// Models in display order; first entry is the default
    pub models: Vec<ModelInfo>,
}

impl ProviderDescriptor {
    /// Default model identifier, if the provider lists any models
    pub fn default_model(&self) -> Option<&str> {
        self.models.first().map(|m| m.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint_suffix_per_protocol() {
        assert_eq!(Protocol::OpenRouter.endpoint_suffix(), "/chat/completions");
        assert_eq!(Protocol::OpenAi.endpoint_suffix(), "/chat/completions");
        assert_eq!(Protocol::Groq.endpoint_suffix(), "/chat/completions");
        assert_eq!(Protocol::OpenAiCompatible.endpoint_suffix(), "/chat/completions");
        assert_eq!(Protocol::Anthropic.endpoint_suffix(), "/messages");
    }

    #[test]
    fn test_protocol_serde_kebab_case() {
        let json = serde_json::to_string(&Protocol::OpenAiCompatible).unwrap();
        assert_eq!(json, "\"open-ai-compatible\"");
        let back: Protocol = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Protocol::OpenAiCompatible);
    }

    #[test]
    fn test_default_model() {
        let descriptor = ProviderDescriptor {
            id: "test".to_string(),
            name: "Test".to_string(),
            protocol: Protocol::OpenAi,
            base_url: "https://example.com/v1".to_string(),
            requires_api_key: true,
            models: vec![ModelInfo::new("m-1", "M1"), ModelInfo::new("m-2", "M2")],
        };
        assert_eq!(descriptor.default_model(), Some("m-1"));
    }
}
