//! Event system with bounded channels
//!
//! Uses crossbeam bounded channels for backpressure to prevent memory bloat.
//! LLM worker threads produce events; the REPL loop consumes them.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::time::Duration;

/// Application events - unified event type
#[derive(Debug, Clone)]
pub enum Event {
    /// LLM streaming chunk
    LlmChunk(String),

    /// LLM response complete, carrying the full accumulated text
    LlmDone(String),

    /// LLM error occurred
    LlmError(String),

    /// Tick event for periodic updates
    Tick,
}

/// Bounded event bus
///
/// A full channel applies backpressure to producers instead of growing
/// without bound while the consumer is busy.
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }

    /// Get a sender clone for spawning event producers
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Receive next event, blocking until available or timeout
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Event> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Try to receive without blocking
    pub fn try_recv(&self) -> Option<Event> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain up to max events from the queue
    ///
    /// Useful for batch processing to prevent event starvation.
    pub fn drain(&self, max: usize) -> Vec<Event> {
        let mut events = Vec::with_capacity(max);
        while events.len() < max {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(_) => break,
            }
        }
        events
    }
}
