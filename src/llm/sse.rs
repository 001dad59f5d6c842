//! Server-Sent-Events delta decoding
//!
//! Turns a streaming response body into a lazy, single-pass sequence of text
//! deltas. Only lines carrying the `data: ` prefix are considered; the
//! `[DONE]` sentinel is swallowed without ending the pass, and a line that
//! fails JSON parsing is skipped rather than aborting the stream - one vendor
//! hiccup must not kill an otherwise-good response. Skips are counted and
//! logged at debug level so provider API drift stays visible.

use crate::core::LlmError;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// SSE data line prefix
const DATA_PREFIX: &str = "data: ";

/// End-of-stream sentinel used by OpenAI-style APIs
const DONE_SENTINEL: &str = "[DONE]";

/// Extracts the text delta from one parsed SSE event, if it carries one
pub type DeltaExtractor = fn(&serde_json::Value) -> Option<String>;

/// Cooperative cancellation flag, checked before each body read
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Lazy stream of text deltas decoded from an SSE body
///
/// Finite and single-pass: iterate it once, in order. Concatenating every
/// yielded delta reproduces the full response text.
pub struct DeltaStream<R: BufRead> {
    lines: std::io::Lines<R>,
    extract: DeltaExtractor,
    cancel: Option<CancelToken>,
    skipped: usize,
    read_any: bool,
    finished: bool,
}

impl<R: BufRead> DeltaStream<R> {
    pub fn new(reader: R, extract: DeltaExtractor) -> Self {
        Self {
            lines: reader.lines(),
            extract,
            cancel: None,
            skipped: 0,
            read_any: false,
            finished: false,
        }
    }

    /// Attach a cancellation token honored before each read
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Number of `data:` lines skipped because they failed to parse
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// Whether any line was successfully read from the transport
    pub fn read_any(&self) -> bool {
        self.read_any
    }
}

impl<R: BufRead> Iterator for DeltaStream<R> {
    type Item = Result<String, LlmError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    self.finished = true;
                    return None;
                }
            }

            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(LlmError::Network(e.to_string())));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };
            self.read_any = true;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Some(data) = trimmed.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            if data == DONE_SENTINEL {
                continue;
            }

            match serde_json::from_str::<serde_json::Value>(data) {
                Ok(event) => {
                    if let Some(delta) = (self.extract)(&event) {
                        if !delta.is_empty() {
                            return Some(Ok(delta));
                        }
                    }
                }
                Err(_) => {
                    self.skipped += 1;
                    tracing::debug!(skipped = self.skipped, "skipping unparsable SSE line");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::openai;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn collect(body: &str) -> (Vec<String>, usize) {
        let mut stream = DeltaStream::new(Cursor::new(body.to_string()), openai::extract_delta);
        let deltas: Vec<String> = stream.by_ref().map(|r| r.unwrap()).collect();
        (deltas, stream.skipped_lines())
    }

    fn chunk_line(text: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{}\"}}}}]}}\n",
            text
        )
    }

    #[test]
    fn test_deltas_concatenate_in_order() {
        let body = format!(
            "{}{}{}data: [DONE]\n",
            chunk_line("Hel"),
            chunk_line("lo, "),
            chunk_line("world")
        );
        let (deltas, skipped) = collect(&body);
        assert_eq!(deltas, vec!["Hel", "lo, ", "world"]);
        assert_eq!(deltas.concat(), "Hello, world");
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_malformed_line_is_skipped_not_fatal() {
        let body = format!(
            "{}data: {{not valid json\n{}",
            chunk_line("foo"),
            chunk_line("bar")
        );
        let (deltas, skipped) = collect(&body);
        assert_eq!(deltas.concat(), "foobar");
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_done_sentinel_is_swallowed_not_terminal() {
        // Events after [DONE] keep flowing until the transport ends
        let body = format!("{}data: [DONE]\n{}", chunk_line("a"), chunk_line("b"));
        let (deltas, _) = collect(&body);
        assert_eq!(deltas.concat(), "ab");
    }

    #[test]
    fn test_non_data_and_blank_lines_ignored() {
        let body = format!(
            "event: message_start\n\n: keep-alive\n{}",
            chunk_line("hi")
        );
        let (deltas, skipped) = collect(&body);
        assert_eq!(deltas, vec!["hi"]);
        assert_eq!(skipped, 0, "non-data lines are not counted as skips");
    }

    #[test]
    fn test_event_without_delta_field_yields_nothing() {
        let body = "data: {\"choices\":[{\"finish_reason\":\"stop\"}]}\n";
        let (deltas, skipped) = collect(body);
        assert!(deltas.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_empty_delta_is_not_delivered() {
        let body = format!("{}{}", chunk_line(""), chunk_line("x"));
        let (deltas, _) = collect(&body);
        assert_eq!(deltas, vec!["x"]);
    }

    #[test]
    fn test_cancel_token_ends_stream() {
        let token = CancelToken::new();
        token.cancel();
        let body = chunk_line("never seen");
        let mut stream = DeltaStream::new(Cursor::new(body), openai::extract_delta)
            .with_cancel(token);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_stream_is_finite_after_end() {
        let (deltas, _) = collect("data: [DONE]\n");
        assert!(deltas.is_empty());

        let mut stream = DeltaStream::new(Cursor::new(String::new()), openai::extract_delta);
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }
}
