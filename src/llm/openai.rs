//! OpenAI-family wire shape
//!
//! Shared by OpenAI, Groq, OpenRouter, and every generic OpenAI-compatible
//! custom provider: `POST {base}/chat/completions` with a bearer token,
//! deltas in `choices[0].delta.content`, full replies in
//! `choices[0].message.content`.

use crate::llm::message::ChatMessage;
use serde_json::Value;

/// Build the request body for a chat completion
pub fn build_body(model: &str, messages: &[ChatMessage], stream: bool) -> Value {
    serde_json::json!({
        "model": model,
        "messages": messages.iter().map(|m| m.to_json()).collect::<Vec<_>>(),
        "stream": stream,
    })
}

/// Extract the text delta from one streaming event
pub fn extract_delta(event: &Value) -> Option<String> {
    event
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .map(|s| s.to_string())
}

/// Extract the assistant text from a non-streaming response body
pub fn extract_message(body: &Value) -> String {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::ChatMessage;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_body_shape() {
        let messages = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let body = build_body("gpt-4o", &messages, true);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_extract_delta() {
        let event: Value =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"tok"}}]}"#).unwrap();
        assert_eq!(extract_delta(&event), Some("tok".to_string()));
    }

    #[test]
    fn test_extract_delta_missing_field() {
        let event: Value = serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert_eq!(extract_delta(&event), None);

        let event: Value = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(extract_delta(&event), None);
    }

    #[test]
    fn test_extract_message() {
        let body: Value =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"full reply"}}]}"#).unwrap();
        assert_eq!(extract_message(&body), "full reply");
    }

    #[test]
    fn test_extract_message_missing_is_empty() {
        let body: Value = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(extract_message(&body), "");
    }
}
