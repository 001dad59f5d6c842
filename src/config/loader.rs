//! Configuration loader with environment variable expansion
//!
//! Loads configuration from `.atelier.toml` in the project root or the user
//! config directory, expanding `${VAR}` references in secrets.

use super::types::AtelierConfig;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Load configuration from various sources
///
/// Priority order:
/// 1. Project-level `.atelier.toml`
/// 2. User-level `~/.config/atelier/config.toml`
/// 3. Default configuration
pub fn load_config(project_dir: &Path) -> Result<AtelierConfig, ConfigError> {
    let project_config = project_dir.join(".atelier.toml");
    if project_config.exists() {
        return load_from_file(&project_config);
    }

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            return load_from_file(&user_config);
        }
    }

    Ok(apply_env_overrides(AtelierConfig::default()))
}

/// User-level config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("atelier").join("config.toml"))
}

/// Load configuration from a specific file
pub fn load_from_file(path: &Path) -> Result<AtelierConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: AtelierConfig = toml::from_str(&content)?;

    expand_env_vars(&mut config);
    Ok(apply_env_overrides(config))
}

/// Expand ${VAR} patterns in string values
fn expand_env_vars(config: &mut AtelierConfig) {
    let env_regex = match Regex::new(r"\$\{([^}]+)\}") {
        Ok(regex) => regex,
        Err(_) => return,
    };

    for key in config.llm.api_keys.values_mut() {
        *key = expand_string(key, &env_regex);
    }
    for custom in &mut config.llm.custom_providers {
        custom.base_url = expand_string(&custom.base_url, &env_regex);
    }
}

/// Expand environment variables in a single string
///
/// Unset variables are left as-is so the failure is visible downstream.
fn expand_string(s: &str, regex: &Regex) -> String {
    regex
        .replace_all(s, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
}

/// Apply direct environment variable overrides
///
/// - OPENROUTER_API_KEY -> api_keys.openrouter
/// - OPENAI_API_KEY -> api_keys.openai
/// - ANTHROPIC_API_KEY -> api_keys.anthropic
/// - GROQ_API_KEY -> api_keys.groq
fn apply_env_overrides(mut config: AtelierConfig) -> AtelierConfig {
    for (env_var, provider) in [
        ("OPENROUTER_API_KEY", "openrouter"),
        ("OPENAI_API_KEY", "openai"),
        ("ANTHROPIC_API_KEY", "anthropic"),
        ("GROQ_API_KEY", "groq"),
    ] {
        if let Ok(key) = std::env::var(env_var) {
            if !key.is_empty() {
                config.llm.api_keys.insert(provider.to_string(), key);
            }
        }
    }
    config
}

/// Sample configuration written on first run
pub fn sample_config() -> &'static str {
    r#"# Atelier configuration

[llm]
default_provider = "openrouter"
# default_model = "openai/gpt-4o"
timeout = 120

[llm.api_keys]
# openrouter = "${OPENROUTER_API_KEY}"
# anthropic = "${ANTHROPIC_API_KEY}"

# [[llm.custom_providers]]
# id = "local"
# name = "Local Gateway"
# base_url = "http://localhost:8080/v1"
# models = "llama-3.1-8b, qwen-2.5"
"#
}
