//! LLM integration module
//!
//! Normalizes wire-incompatible chat-completion APIs behind one client:
//! a provider registry (built-in catalog plus user-added custom providers)
//! and a unified completion client with incremental streaming delivery.

pub mod anthropic;
mod catalog;
mod client;
mod message;
pub mod openai;
mod provider;
mod registry;
mod sse;

pub use catalog::builtin_providers;
pub use client::{
    api_error_from_body, build_plan, extract_error_message, ChunkSink, CompletionClient,
    CompletionRequest, RequestPlan,
};
pub use message::{ChatMessage, Role};
pub use provider::{ModelInfo, Protocol, ProviderDescriptor};
pub use registry::{CustomProviderDraft, ProviderRegistry, RegistryError};
pub use sse::{CancelToken, DeltaStream};
