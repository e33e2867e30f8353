//! Structured logging for TruthLens.
//!
//! Handles log redaction, console plus rolling JSON file output, and analysis event records.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, EventLogEntry, EventLogger};
pub use logger::{init_console_logger, init_logger, LOG_FILE_NAME};
pub use redact::redact_sensitive_data;
