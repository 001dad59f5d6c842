//! Built-in provider catalog
//!
//! The hardcoded set of hosted providers the app knows out of the box.
//! Order matters: the first catalog entry is the default provider, and the
//! first model of each entry is that provider's default model.

use super::provider::{ModelInfo, Protocol, ProviderDescriptor};

/// Build the ordered list of built-in providers
pub fn builtin_providers() -> Vec<ProviderDescriptor> {
    vec![openrouter(), openai(), anthropic(), groq()]
}

fn openrouter() -> ProviderDescriptor {
    ProviderDescriptor {
        id: "openrouter".to_string(),
        name: "OpenRouter".to_string(),
        protocol: Protocol::OpenRouter,
        base_url: "https://openrouter.ai/api/v1".to_string(),
        requires_api_key: true,
        models: vec![
            ModelInfo::new("openai/gpt-4o", "GPT-4o"),
            ModelInfo::new("openai/gpt-4o-mini", "GPT-4o Mini"),
            ModelInfo::new("anthropic/claude-3.5-sonnet", "Claude 3.5 Sonnet"),
            ModelInfo::new("anthropic/claude-3-haiku", "Claude 3 Haiku"),
            ModelInfo::new("deepseek/deepseek-chat", "DeepSeek Chat"),
            ModelInfo::new("google/gemini-pro", "Gemini Pro"),
            ModelInfo::new("meta-llama/llama-3.1-405b-instruct", "Llama 3.1 405B"),
            ModelInfo::new("meta-llama/llama-3.1-70b-instruct", "Llama 3.1 70B"),
            ModelInfo::new("qwen/qwen-2.5-72b-instruct", "Qwen 2.5 72B"),
        ],
    }
}

fn openai() -> ProviderDescriptor {
    ProviderDescriptor {
        id: "openai".to_string(),
        name: "OpenAI".to_string(),
        protocol: Protocol::OpenAi,
        base_url: "https://api.openai.com/v1".to_string(),
        requires_api_key: true,
        models: vec![
            ModelInfo::new("gpt-4o", "GPT-4o"),
            ModelInfo::new("gpt-4o-mini", "GPT-4o Mini"),
            ModelInfo::new("gpt-4-turbo", "GPT-4 Turbo"),
        ],
    }
}

fn anthropic() -> ProviderDescriptor {
    ProviderDescriptor {
        id: "anthropic".to_string(),
        name: "Anthropic".to_string(),
        protocol: Protocol::Anthropic,
        base_url: "https://api.anthropic.com/v1".to_string(),
        requires_api_key: true,
        models: vec![
            ModelInfo::new("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet"),
            ModelInfo::new("claude-3-5-haiku-20241022", "Claude 3.5 Haiku"),
            ModelInfo::new("claude-3-opus-20240229", "Claude 3 Opus"),
        ],
    }
}

fn groq() -> ProviderDescriptor {
    ProviderDescriptor {
        id: "groq".to_string(),
        name: "Groq".to_string(),
        protocol: Protocol::Groq,
        base_url: "https://api.groq.com/openai/v1".to_string(),
        requires_api_key: true,
        models: vec![
            ModelInfo::new("llama-3.3-70b-versatile", "Llama 3.3 70B"),
            ModelInfo::new("llama-3.1-8b-instant", "Llama 3.1 8B"),
            ModelInfo::new("mixtral-8x7b-32768", "Mixtral 8x7B"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_are_unique() {
        let providers = builtin_providers();
        let mut ids: Vec<_> = providers.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), providers.len());
    }

    #[test]
    fn test_builtins_have_models_and_urls() {
        for provider in builtin_providers() {
            assert!(!provider.models.is_empty(), "{} has no models", provider.id);
            assert!(
                provider.base_url.starts_with("https://"),
                "{} base_url not absolute",
                provider.id
            );
            assert!(!provider.base_url.ends_with('/'));
        }
    }

    #[test]
    fn test_anthropic_uses_messages_protocol() {
        let providers = builtin_providers();
        let anthropic = providers.iter().find(|p| p.id == "anthropic").unwrap();
        assert_eq!(anthropic.protocol, Protocol::Anthropic);
        assert_eq!(anthropic.protocol.endpoint_suffix(), "/messages");
    }

    #[test]
    fn test_openrouter_is_default_and_first() {
        let providers = builtin_providers();
        assert_eq!(providers[0].id, "openrouter");
        assert_eq!(providers[0].default_model(), Some("openai/gpt-4o"));
    }
}
