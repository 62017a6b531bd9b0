//! Scan Event Logger
//!
//! Structured per-request scan events, emitted on the `scan_events` target so
//! they can be routed to the NDJSON file layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ScanEvent {
    Extracted {
        text: String,
    },
    Recognized {
        drug_name: Option<String>,
    },
    Matched {
        medicine_name: String,
        score: f64,
    },
    Failed {
        stage: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct ScanLogEntry {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: ScanEvent,
}

impl ScanLogEntry {
    pub fn new(request_id: Uuid, mut event: ScanEvent) -> Self {
        match &mut event {
            ScanEvent::Extracted { text } => *text = redact_sensitive_data(text),
            ScanEvent::Failed { error_msg, .. } => *error_msg = redact_sensitive_data(error_msg),
            ScanEvent::Recognized { .. } | ScanEvent::Matched { .. } => {}
        }
        Self {
            request_id,
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct ScanEventLogger;

impl ScanEventLogger {
    pub fn log_event(request_id: Uuid, event: ScanEvent) {
        let entry = ScanLogEntry::new(request_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "scan_events", request_id = %entry.request_id, entry = %json, "Scan event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_are_redacted() {
        let entry = ScanLogEntry::new(
            Uuid::new_v4(),
            ScanEvent::Failed {
                stage: "extracting".into(),
                error_msg: "request to https://host/annotate?key=abc failed".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "Failed");
        assert!(!json["event"]["error_msg"].as_str().unwrap().contains("abc"));
    }
}
