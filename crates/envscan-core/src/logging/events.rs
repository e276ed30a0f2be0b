//! Stable event names and per-run correlation.

use serde::{Deserialize, Serialize};

/// Standard event names used in logging.
pub mod event_names {
    // Config stage
    pub const CONFIG_RESOLVED: &str = "config.resolved";
    pub const RULES_OVERLAY_LOADED: &str = "rules.overlay_loaded";

    // Scan stage
    pub const SCAN_STARTED: &str = "scan.started";
    pub const SCAN_FILE_READ: &str = "scan.file_read";
    pub const SCAN_FILE_SKIPPED: &str = "scan.file_skipped";
    pub const SCAN_FILE_UNREADABLE: &str = "scan.file_unreadable";
    pub const SCAN_FINISHED: &str = "scan.finished";

    // Resolve stage
    pub const RESOLVE_FINISHED: &str = "resolve.finished";

    // Errors
    pub const COMMAND_FAILED: &str = "command.failed";
}

/// Correlation data shared by every event of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogContext {
    pub run_id: String,
    pub command: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>, command: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            command: command.into(),
        }
    }

    /// Span carrying the correlation fields; enter it for the whole command.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("envscan", run_id = %self.run_id, command = %self.command)
    }
}
