//! Atelier - a terminal workbench with AI integration
//!
//! Featuring:
//! - Multi-provider AI chat with streaming (OpenRouter, OpenAI, Anthropic, Groq,
//!   plus user-added OpenAI-compatible endpoints)
//! - Virtual file workspace with AI agents for code analysis
//! - A capability-scoped expression evaluator

pub mod agents;
pub mod config;
pub mod core;
pub mod eval;
pub mod events;
pub mod llm;
pub mod ui;
pub mod vfs;

// Re-export commonly used types
pub use crate::core::{AtelierError, LlmError, Result};
pub use crate::events::{Event, EventBus};
pub use crate::llm::{CompletionClient, CompletionRequest, ProviderRegistry};
