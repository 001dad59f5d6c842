//! Provider registry
//!
//! Holds the built-in catalog plus user-registered custom providers. Lookup
//! checks built-ins first, so a custom provider can never shadow a built-in id.

use super::catalog::builtin_providers;
use super::provider::{ModelInfo, Protocol, ProviderDescriptor};
use serde::{Deserialize, Serialize};

/// Custom provider registration error
///
/// Caller-visible and non-fatal: on any failure nothing is registered.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Provider id must not be empty")]
    EmptyId,

    #[error("Provider name must not be empty")]
    EmptyName,

    #[error("Base URL must not be empty")]
    EmptyBaseUrl,

    #[error("Base URL is not a valid URL: {0}")]
    InvalidBaseUrl(String),

    #[error("At least one model is required")]
    NoModels,
}

/// User-supplied custom provider, as entered in settings
///
/// `models` is a comma-separated list of model identifiers; blanks and
/// duplicates are dropped during validation. Custom providers always speak
/// the generic OpenAI-compatible protocol and always require an API key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomProviderDraft {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub models: String,
}

/// Registry over built-in and custom providers
pub struct ProviderRegistry {
    builtins: Vec<ProviderDescriptor>,
    custom: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    /// Create a registry holding only the built-in catalog
    pub fn new() -> Self {
        Self {
            builtins: builtin_providers(),
            custom: Vec::new(),
        }
    }

    /// Create a registry seeded with persisted custom providers
    ///
    /// Drafts that fail validation are skipped rather than aborting startup.
    pub fn with_custom(drafts: &[CustomProviderDraft]) -> Self {
        let mut registry = Self::new();
        for draft in drafts {
            if let Err(e) = registry.register_custom(draft.clone()) {
                tracing::warn!(id = %draft.id, error = %e, "skipping invalid custom provider");
            }
        }
        registry
    }

    /// Exact-match lookup, built-ins before custom providers
    pub fn resolve(&self, id: &str) -> Option<&ProviderDescriptor> {
        self.builtins
            .iter()
            .find(|p| p.id == id)
            .or_else(|| self.custom.iter().find(|p| p.id == id))
    }

    /// Ordered model descriptors for a provider, empty when unknown
    pub fn list_models(&self, id: &str) -> &[ModelInfo] {
        self.resolve(id).map(|p| p.models.as_slice()).unwrap_or(&[])
    }

    /// Register a custom provider after validating the draft
    ///
    /// A draft whose id collides with an existing id is a caller error; it is
    /// accepted here but a built-in with the same id always wins resolution.
    pub fn register_custom(&mut self, draft: CustomProviderDraft) -> Result<ProviderDescriptor, RegistryError> {
        let descriptor = validate_draft(&draft)?;
        self.custom.push(descriptor.clone());
        Ok(descriptor)
    }

    /// Remove a custom provider by id; no-op when absent
    pub fn unregister_custom(&mut self, id: &str) {
        self.custom.retain(|p| p.id != id);
    }

    /// All providers in display order, built-ins first
    pub fn all(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.builtins.iter().chain(self.custom.iter())
    }

    /// Currently registered custom providers, for persistence
    pub fn custom_providers(&self) -> &[ProviderDescriptor] {
        &self.custom
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a draft and lower it to a descriptor
fn validate_draft(draft: &CustomProviderDraft) -> Result<ProviderDescriptor, RegistryError> {
    let id = draft.id.trim();
    if id.is_empty() {
        return Err(RegistryError::EmptyId);
    }

    let name = draft.name.trim();
    if name.is_empty() {
        return Err(RegistryError::EmptyName);
    }

    let base_url = draft.base_url.trim().trim_end_matches('/');
    if base_url.is_empty() {
        return Err(RegistryError::EmptyBaseUrl);
    }
    url::Url::parse(base_url).map_err(|_| RegistryError::InvalidBaseUrl(base_url.to_string()))?;

    let mut models: Vec<ModelInfo> = Vec::new();
    for entry in draft.models.split(',') {
        let value = entry.trim();
        if value.is_empty() {
            continue;
        }
        if models.iter().any(|m| m.value == value) {
            continue;
        }
        models.push(ModelInfo::new(value, value));
    }
    if models.is_empty() {
        return Err(RegistryError::NoModels);
    }

    Ok(ProviderDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        protocol: Protocol::OpenAiCompatible,
        base_url: base_url.to_string(),
        requires_api_key: true,
        models,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_draft() -> CustomProviderDraft {
        CustomProviderDraft {
            id: "local".to_string(),
            name: "Local Gateway".to_string(),
            base_url: "http://localhost:8080/v1".to_string(),
            models: "llama-3.1-8b, qwen-2.5".to_string(),
        }
    }

    #[test]
    fn test_resolve_builtin() {
        let registry = ProviderRegistry::new();
        let provider = registry.resolve("anthropic").unwrap();
        assert_eq!(provider.name, "Anthropic");
        assert!(registry.resolve("nonexistent").is_none());
    }

    #[test]
    fn test_list_models_unknown_is_empty() {
        let registry = ProviderRegistry::new();
        assert!(registry.list_models("nonexistent").is_empty());
        assert!(!registry.list_models("openrouter").is_empty());
    }

    #[test]
    fn test_register_custom_roundtrip() {
        let mut registry = ProviderRegistry::new();
        registry.register_custom(valid_draft()).unwrap();

        let provider = registry.resolve("local").unwrap();
        assert_eq!(provider.protocol, Protocol::OpenAiCompatible);
        assert!(provider.requires_api_key);
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.models.len(), 2);
        assert_eq!(provider.models[0].value, "llama-3.1-8b");
    }

    #[test]
    fn test_register_custom_empty_id_leaves_registry_unchanged() {
        let mut registry = ProviderRegistry::new();
        let mut draft = valid_draft();
        draft.id = "".to_string();

        assert_eq!(registry.register_custom(draft), Err(RegistryError::EmptyId));
        assert!(registry.resolve("local").is_none());
        assert!(registry.custom_providers().is_empty());
    }

    #[test]
    fn test_register_custom_empty_models_leaves_registry_unchanged() {
        let mut registry = ProviderRegistry::new();
        let mut draft = valid_draft();
        draft.models = "".to_string();

        assert_eq!(registry.register_custom(draft), Err(RegistryError::NoModels));
        assert!(registry.resolve("local").is_none());

        // Blanks-only input is treated the same as empty
        let mut draft = valid_draft();
        draft.models = " , ,, ".to_string();
        assert_eq!(registry.register_custom(draft), Err(RegistryError::NoModels));
        assert!(registry.custom_providers().is_empty());
    }

    #[test]
    fn test_register_custom_rejects_bad_url() {
        let mut registry = ProviderRegistry::new();
        let mut draft = valid_draft();
        draft.base_url = "not a url".to_string();
        assert!(matches!(
            registry.register_custom(draft),
            Err(RegistryError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_model_list_drops_duplicates_and_blanks() {
        let mut registry = ProviderRegistry::new();
        let mut draft = valid_draft();
        draft.models = "a, b, , a, b, c".to_string();
        let provider = registry.register_custom(draft).unwrap();
        let values: Vec<_> = provider.models.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_builtin_shadow_resolves_to_builtin() {
        let mut registry = ProviderRegistry::new();
        let mut draft = valid_draft();
        draft.id = "openai".to_string();
        registry.register_custom(draft).unwrap();

        // Built-ins take precedence in resolution
        let provider = registry.resolve("openai").unwrap();
        assert_eq!(provider.protocol, Protocol::OpenAi);
    }

    #[test]
    fn test_unregister_custom() {
        let mut registry = ProviderRegistry::new();
        registry.register_custom(valid_draft()).unwrap();
        assert!(registry.resolve("local").is_some());

        registry.unregister_custom("local");
        assert!(registry.resolve("local").is_none());

        // No-op when absent
        registry.unregister_custom("local");
    }

    #[test]
    fn test_with_custom_skips_invalid_drafts() {
        let bad = CustomProviderDraft::default();
        let registry = ProviderRegistry::with_custom(&[valid_draft(), bad]);
        assert_eq!(registry.custom_providers().len(), 1);
    }
}
