//! Unified completion client
//!
//! Dispatches one chat request to the provider's wire protocol and exposes a
//! single normalized result: the full assistant text, with an optional sink
//! receiving each incremental delta as it arrives. Each call is independent;
//! the accumulator and sink live on the call's own stack, so concurrent calls
//! share no state.

use super::anthropic;
use super::message::ChatMessage;
use super::openai;
use super::provider::{Protocol, ProviderDescriptor};
use super::registry::ProviderRegistry;
use super::sse::{CancelToken, DeltaStream};
use crate::core::LlmError;
use serde_json::Value;
use std::io::{BufRead, BufReader};
use std::thread::JoinHandle;
use std::time::Duration;

/// App-identifying headers sent to OpenRouter
const APP_REFERER: &str = "https://github.com/atelier-workbench/atelier";
const APP_TITLE: &str = "Atelier";

/// Per-chunk sink invoked with each delta, never with accumulated text
pub type ChunkSink<'a> = &'a mut dyn FnMut(&str);

/// One chat completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub provider_id: String,
    pub model: String,
    pub api_key: String,
    pub messages: Vec<ChatMessage>,
}

/// Everything needed to put one request on the wire
///
/// Built as a pure value so dispatch is testable without a network.
#[derive(Debug, Clone)]
pub struct RequestPlan {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

/// Build the wire plan for a request against a resolved provider
pub fn build_plan(provider: &ProviderDescriptor, request: &CompletionRequest, stream: bool) -> RequestPlan {
    let url = format!("{}{}", provider.base_url, provider.protocol.endpoint_suffix());

    let mut headers: Vec<(&'static str, String)> = Vec::new();
    let body = match provider.protocol {
        Protocol::Anthropic => {
            headers.push(("x-api-key", request.api_key.clone()));
            headers.push(("anthropic-version", anthropic::API_VERSION.to_string()));
            anthropic::build_body(&request.model, &request.messages, stream)
        }
        Protocol::OpenRouter => {
            headers.push(("Authorization", format!("Bearer {}", request.api_key)));
            headers.push(("HTTP-Referer", APP_REFERER.to_string()));
            headers.push(("X-Title", APP_TITLE.to_string()));
            openai::build_body(&request.model, &request.messages, stream)
        }
        Protocol::OpenAi | Protocol::Groq | Protocol::OpenAiCompatible => {
            headers.push(("Authorization", format!("Bearer {}", request.api_key)));
            openai::build_body(&request.model, &request.messages, stream)
        }
    };

    RequestPlan { url, headers, body }
}

/// Delta extractor for a protocol's streaming events
fn delta_extractor(protocol: Protocol) -> fn(&Value) -> Option<String> {
    match protocol {
        Protocol::Anthropic => anthropic::extract_delta,
        _ => openai::extract_delta,
    }
}

/// Assistant-text extractor for a protocol's non-streaming response
fn message_extractor(protocol: Protocol) -> fn(&Value) -> String {
    match protocol {
        Protocol::Anthropic => anthropic::extract_message,
        _ => openai::extract_message,
    }
}

/// Pull `error.message` out of an error response body, when present
pub fn extract_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

/// Classify a non-2xx response body
///
/// The provider's own error text when extractable, otherwise a generic
/// failure naming the provider. Never raises on an unparsable body.
pub fn api_error_from_body(provider_name: &str, body: &str) -> LlmError {
    match extract_error_message(body) {
        Some(message) => LlmError::Api {
            provider: provider_name.to_string(),
            message,
        },
        None => LlmError::api_generic(provider_name),
    }
}

/// Multi-provider completion client
#[derive(Debug, Clone)]
pub struct CompletionClient {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Default for CompletionClient {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(120),
        }
    }
}

impl CompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-read deadline (a hung connection otherwise stalls
    /// a call for this long before failing)
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Run one completion, resolving the provider through the registry
    ///
    /// With a sink the call streams: every delta is handed to the sink in
    /// arrival order and their concatenation equals the returned text.
    /// Without one, a single non-streaming exchange is made.
    pub fn complete(
        &self,
        registry: &ProviderRegistry,
        request: &CompletionRequest,
        on_chunk: Option<ChunkSink<'_>>,
    ) -> Result<String, LlmError> {
        let provider = registry
            .resolve(&request.provider_id)
            .ok_or_else(|| LlmError::NotConfigured(format!("unknown provider: {}", request.provider_id)))?;
        self.complete_with(provider, request, on_chunk, None)
    }

    /// Like [`complete`](Self::complete) with a cancellation token honored
    /// at each body-read point; cancelling ends the stream early and returns
    /// the text accumulated so far.
    pub fn complete_cancellable(
        &self,
        registry: &ProviderRegistry,
        request: &CompletionRequest,
        on_chunk: Option<ChunkSink<'_>>,
        cancel: &CancelToken,
    ) -> Result<String, LlmError> {
        let provider = registry
            .resolve(&request.provider_id)
            .ok_or_else(|| LlmError::NotConfigured(format!("unknown provider: {}", request.provider_id)))?;
        self.complete_with(provider, request, on_chunk, Some(cancel.clone()))
    }

    /// Run one completion against an already-resolved provider
    pub fn complete_with(
        &self,
        provider: &ProviderDescriptor,
        request: &CompletionRequest,
        mut on_chunk: Option<ChunkSink<'_>>,
        cancel: Option<CancelToken>,
    ) -> Result<String, LlmError> {
        if provider.requires_api_key && request.api_key.trim().is_empty() {
            return Err(LlmError::NotConfigured(format!(
                "{} requires an API key",
                provider.name
            )));
        }

        let streaming = on_chunk.is_some();
        let plan = build_plan(provider, request, streaming);
        tracing::debug!(
            provider = %provider.id,
            model = %request.model,
            streaming,
            url = %plan.url,
            "dispatching completion"
        );

        let agent = ureq::AgentBuilder::new()
            .timeout_connect(self.connect_timeout)
            .timeout_read(self.read_timeout)
            .build();

        let mut http = agent.post(&plan.url).set("Content-Type", "application/json");
        for (name, value) in &plan.headers {
            http = http.set(name, value);
        }

        let response = match http.send_json(&plan.body) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                tracing::warn!(provider = %provider.id, status, "completion request rejected");
                return Err(api_error_from_body(&provider.name, &body));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(LlmError::Network(transport.to_string()));
            }
        };

        if streaming {
            let reader = BufReader::new(response.into_reader());
            let mut stream = DeltaStream::new(reader, delta_extractor(provider.protocol));
            if let Some(token) = cancel {
                stream = stream.with_cancel(token);
            }
            drain_stream(stream, &mut on_chunk)
        } else {
            let body: Value = response
                .into_json()
                .map_err(|e| LlmError::Network(e.to_string()))?;
            Ok(message_extractor(provider.protocol)(&body))
        }
    }

    /// Run a streaming completion on a worker thread, forwarding deltas into
    /// the event bus as `LlmChunk` events followed by `LlmDone` or `LlmError`.
    pub fn spawn(
        &self,
        provider: ProviderDescriptor,
        request: CompletionRequest,
        event_tx: crossbeam_channel::Sender<crate::events::Event>,
        cancel: CancelToken,
    ) -> JoinHandle<()> {
        use crate::events::Event;

        let client = self.clone();
        std::thread::spawn(move || {
            let chunk_tx = event_tx.clone();
            let mut sink = move |delta: &str| {
                let _ = chunk_tx.send(Event::LlmChunk(delta.to_string()));
            };
            let outcome = client.complete_with(&provider, &request, Some(&mut sink), Some(cancel));
            let _ = match outcome {
                Ok(full) => event_tx.send(Event::LlmDone(full)),
                Err(e) => event_tx.send(Event::LlmError(e.to_string())),
            };
        })
    }
}

/// Drive a delta stream to completion, feeding the sink and accumulating
///
/// A transport failure before anything could be read is a stream error (the
/// body was never readable); one after is a network error. Text already
/// handed to the sink is never retracted.
fn drain_stream<R: BufRead>(
    mut stream: DeltaStream<R>,
    on_chunk: &mut Option<ChunkSink<'_>>,
) -> Result<String, LlmError> {
    let mut full = String::new();

    while let Some(item) = stream.next() {
        match item {
            Ok(delta) => {
                full.push_str(&delta);
                if let Some(sink) = on_chunk.as_mut() {
                    sink(&delta);
                }
            }
            Err(e) => {
                if !stream.read_any() {
                    return Err(LlmError::Stream(format!("response body is not readable: {}", e)));
                }
                return Err(e);
            }
        }
    }

    if stream.skipped_lines() > 0 {
        tracing::debug!(skipped = stream.skipped_lines(), "stream finished with skipped lines");
    }
    Ok(full)
}
