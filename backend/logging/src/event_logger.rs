//! Analysis Event Logger
//!
//! Structured events (request, completed, failed) written through `tracing`
//! so they land in the rolling NDJSON log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    Request {
        action: String,
        origin: String,
        payload_bytes: usize,
    },
    Completed {
        action: String,
        verdict: String,
        confidence: u8,
        latency_ms: u64,
    },
    Failed {
        action: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: AnalysisEvent,
}

impl EventLogEntry {
    /// Builds an entry, redacting any free-form text it carries.
    pub fn new(request_id: &str, mut event: AnalysisEvent) -> Self {
        if let AnalysisEvent::Failed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        Self {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Logs one analysis event. Payload content is never logged, only its size.
    pub fn log_event(request_id: &str, event: AnalysisEvent) {
        let entry = EventLogEntry::new(request_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "analysis_events", event = %json, "Analysis event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_event_is_redacted() {
        let entry = EventLogEntry::new(
            "req-1",
            AnalysisEvent::Failed {
                action: "analyzeText".into(),
                error_msg: "upstream said Bearer abc.def.ghi".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "failed");
        assert_eq!(json["request_id"], "req-1");
        assert!(!json["event"]["error_msg"].as_str().unwrap().contains("abc.def.ghi"));
    }

    #[test]
    fn completed_event_serializes_flat_fields() {
        let entry = EventLogEntry::new(
            "req-2",
            AnalysisEvent::Completed {
                action: "analyzeImage".into(),
                verdict: "fake".into(),
                confidence: 83,
                latency_ms: 12,
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["confidence"], 83);
        assert_eq!(json["event"]["verdict"], "fake");
    }
}
