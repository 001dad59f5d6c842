//! Configuration module for Atelier
//!
//! Handles loading and parsing of `.atelier.toml` configuration files
//! with support for environment variable expansion, plus persistence of
//! user settings (API keys, custom providers).

mod loader;
mod types;
mod writer;

pub use loader::{load_config, load_from_file, sample_config, user_config_path, ConfigError};
pub use types::{AtelierConfig, LlmConfig};
pub use writer::{config_path, save_config, WriteError};
