//! Telemetry and structured logging for PillScan.
//!
//! Console/NDJSON subscriber setup, credential redaction, and per-request
//! scan event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{ScanEvent, ScanEventLogger, ScanLogEntry};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
