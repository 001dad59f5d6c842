//! Anthropic wire shape
//!
//! `POST {base}/messages` with `x-api-key` auth and a pinned version header.
//! The stream carries typed events; only `content_block_delta` events hold
//! text, in `delta.text`. Every other event type is ignored.

use crate::llm::message::ChatMessage;
use serde_json::Value;

/// Pinned Anthropic API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Output cap sent with every request
pub const MAX_TOKENS: u32 = 4096;

/// Build the request body for a messages call
pub fn build_body(model: &str, messages: &[ChatMessage], stream: bool) -> Value {
    serde_json::json!({
        "model": model,
        "messages": messages.iter().map(|m| m.to_json()).collect::<Vec<_>>(),
        "max_tokens": MAX_TOKENS,
        "stream": stream,
    })
}

/// Extract the text delta from one streaming event
pub fn extract_delta(event: &Value) -> Option<String> {
    if event.get("type")?.as_str()? != "content_block_delta" {
        return None;
    }
    event
        .get("delta")?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

/// Extract the assistant text from a non-streaming response body
pub fn extract_message(body: &Value) -> String {
    body.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(|t| t.as_str())
        .unwrap_or("")
        .to_string()
}
