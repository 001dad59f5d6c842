//! Virtual file store
//!
//! Keyed text blobs with create/update/delete and a "last file" pointer.
//! The store seeds itself with a small welcome workspace and can snapshot
//! itself to JSON in the user data directory. Durability is best-effort;
//! a failed save is reported, never fatal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File store error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VfsError {
    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Cannot delete the last file")]
    LastFile,
}

/// Snapshot persistence error
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// In-memory file store with an active-file pointer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStore {
    files: BTreeMap<String, String>,
    current: String,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FileStore {
    /// Create a store seeded with the default welcome files
    pub fn with_defaults() -> Self {
        let mut files = BTreeMap::new();
        files.insert("README.md".to_string(), DEFAULT_README.to_string());
        files.insert("index.js".to_string(), DEFAULT_INDEX_JS.to_string());
        files.insert("styles.css".to_string(), DEFAULT_STYLES_CSS.to_string());
        Self {
            files,
            current: "index.js".to_string(),
        }
    }

    /// File names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Content of a file, if present
    pub fn read(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(|s| s.as_str())
    }

    /// Name of the active file
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Content of the active file, empty when the pointer is stale
    pub fn current_content(&self) -> &str {
        self.read(&self.current).unwrap_or("")
    }

    /// Point at a different file
    pub fn set_current(&mut self, name: &str) -> Result<(), VfsError> {
        if !self.files.contains_key(name) {
            return Err(VfsError::NotFound(name.to_string()));
        }
        self.current = name.to_string();
        Ok(())
    }

    /// Create an empty file and make it current
    pub fn create(&mut self, name: &str) -> Result<(), VfsError> {
        if self.files.contains_key(name) {
            return Err(VfsError::AlreadyExists(name.to_string()));
        }
        self.files.insert(name.to_string(), String::new());
        self.current = name.to_string();
        Ok(())
    }

    /// Replace a file's content
    pub fn update(&mut self, name: &str, content: &str) -> Result<(), VfsError> {
        match self.files.get_mut(name) {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(VfsError::NotFound(name.to_string())),
        }
    }

    /// Delete a file
    ///
    /// Refuses to remove the last remaining file; repoints the active file
    /// when it was the one deleted.
    pub fn delete(&mut self, name: &str) -> Result<(), VfsError> {
        if !self.files.contains_key(name) {
            return Err(VfsError::NotFound(name.to_string()));
        }
        if self.files.len() == 1 {
            return Err(VfsError::LastFile);
        }
        self.files.remove(name);
        if self.current == name {
            if let Some(next) = self.files.keys().next() {
                self.current = next.clone();
            }
        }
        Ok(())
    }

    /// Load a snapshot from disk, falling back to defaults when absent
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<FileStore>(&content) {
                Ok(mut store) => {
                    if store.files.is_empty() {
                        return Self::with_defaults();
                    }
                    // Stale pointer from a hand-edited snapshot
                    if !store.files.contains_key(&store.current) {
                        if let Some(first) = store.files.keys().next() {
                            store.current = first.clone();
                        }
                    }
                    store
                }
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt file store snapshot, starting fresh");
                    Self::with_defaults()
                }
            },
            Err(_) => Self::with_defaults(),
        }
    }

    /// Write a snapshot to disk, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Default snapshot location in the user data directory
pub fn snapshot_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("atelier").join("files.json"))
}

/// Display language for a filename, from its extension
pub fn language_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "json" => "json",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "md" => "markdown",
        "py" => "python",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "sh" => "shell",
        "yml" | "yaml" => "yaml",
        "xml" => "xml",
        "sql" => "sql",
        "txt" => "plaintext",
        _ => "plaintext",
    }
}

const DEFAULT_README: &str = r#"# Welcome to Atelier

A terminal workbench with AI-powered development tools.

## Features
- Multi-provider AI chat (OpenRouter, OpenAI, Anthropic, Groq)
- Virtual file workspace
- Expression evaluator
- AI agents for code analysis

## Getting Started
1. Add an API key to your atelier config
2. Start chatting or create a new file
3. Use the agents to analyze and improve your code
"#;

const DEFAULT_INDEX_JS: &str = r#"// Welcome to Atelier
console.log('Hello, World!');

function greet(name) {
  return `Hello, ${name}!`;
}

greet('Developer');
"#;

const DEFAULT_STYLES_CSS: &str = r#"body {
  margin: 0;
  padding: 0;
  font-family: system-ui, sans-serif;
}

.container {
  max-width: 1200px;
  margin: 0 auto;
  padding: 20px;
}
"#;
