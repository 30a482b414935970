//! Port for structured run logging.
//!
//! Defines the [`RunLogger`] trait for recording run events (prompts,
//! completions, scores, fallbacks, validation failures) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full run
//! transcript in a machine-readable format (JSONL).

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A structured run event for logging.
pub struct RunEvent {
    /// Event type identifier (e.g., "completion", "score", "fallback").
    pub event_type: &'static str,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl RunEvent {
    /// Create a new run event with the current UTC timestamp.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Port for logging run events to a structured log.
///
/// `log` is synchronous and non-fallible; implementations swallow their own
/// write failures so logging never interrupts a run.
pub trait RunLogger: Send + Sync {
    /// Record a run event.
    fn log(&self, event: RunEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoRunLogger;

impl RunLogger for NoRunLogger {
    fn log(&self, _event: RunEvent) {}
}
