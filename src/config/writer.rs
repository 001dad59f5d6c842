//! Configuration persistence
//!
//! Writes the user-level config file back after settings mutations
//! (API keys, custom providers, provider/model selection).

use super::types::AtelierConfig;
use std::path::{Path, PathBuf};

/// Configuration write error
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No config directory available")]
    NoConfigDir,
}

/// Path the user-level config is written to
pub fn config_path() -> Result<PathBuf, WriteError> {
    dirs::config_dir()
        .map(|d| d.join("atelier").join("config.toml"))
        .ok_or(WriteError::NoConfigDir)
}

/// Serialize and write a config to the given path, creating parent dirs
pub fn save_config(config: &AtelierConfig, path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
