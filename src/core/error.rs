//! Error types for atelier using thiserror
//!
//! All errors are typed - no .unwrap() or .expect() in production code.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AtelierError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File store error: {0}")]
    Vfs(String),

    #[error("Channel send error")]
    ChannelSend,

    #[error("Channel receive error")]
    ChannelRecv,
}

/// Completion client errors
///
/// Four caller-visible kinds: `NotConfigured` is raised before any network
/// I/O, `Api` carries the provider's own error text for a non-2xx response,
/// `Network` is a transport failure, and `Stream` means the response body
/// could not be read as a stream at all. A single malformed event line inside
/// an otherwise healthy stream is never an error; it is skipped.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Api { provider: String, message: String },

    #[error("Streaming error: {0}")]
    Stream(String),
}

impl LlmError {
    /// Generic API failure naming the provider, used when the response body
    /// yields no extractable error message.
    pub fn api_generic(provider: &str) -> Self {
        LlmError::Api {
            provider: provider.to_string(),
            message: format!("{} request failed", provider),
        }
    }
}

/// Convenience Result type for atelier
pub type Result<T> = std::result::Result<T, AtelierError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_atelier_error_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AtelierError = io_err.into();
        assert!(matches!(err, AtelierError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_atelier_error_llm_conversion() {
        let llm_err = LlmError::NotConfigured("openrouter".to_string());
        let err: AtelierError = llm_err.into();
        assert!(matches!(err, AtelierError::Llm(_)));
        assert!(err.to_string().contains("LLM error"));
    }

    #[test]
    fn test_atelier_error_config_display() {
        let err = AtelierError::Config("invalid setting".to_string());
        assert_eq!(err.to_string(), "Configuration error: invalid setting");
    }

    #[test]
    fn test_llm_error_variants() {
        let not_configured = LlmError::NotConfigured("groq".to_string());
        assert_eq!(not_configured.to_string(), "Provider not configured: groq");

        let network = LlmError::Network("connection refused".to_string());
        assert_eq!(network.to_string(), "Network error: connection refused");

        let stream = LlmError::Stream("body is not readable".to_string());
        assert_eq!(stream.to_string(), "Streaming error: body is not readable");
    }

    #[test]
    fn test_llm_error_api_displays_provider_message_verbatim() {
        let err = LlmError::Api {
            provider: "openai".to_string(),
            message: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "bad key");
    }

    #[test]
    fn test_llm_error_api_generic_names_provider() {
        let err = LlmError::api_generic("anthropic");
        assert!(err.to_string().contains("anthropic"));
    }

    #[test]
    fn test_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "underlying error");
        let err = AtelierError::Io(io_err);
        assert!(err.source().is_some());
    }
}
