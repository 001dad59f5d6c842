//! Core infrastructure module
//!
//! Foundational types used throughout the application:
//! - **Error Handling**: Unified error types (`AtelierError`, `Result`).

mod error;

pub use error::{AtelierError, LlmError, Result};
