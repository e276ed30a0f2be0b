//! Error types for envscan.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! Validation failures of individual variables are *not* errors; they are
//! data attached to the resolved state. The variants here cover the cases
//! where a command cannot produce a result at all.
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Discovery Error
//!   Reason: cannot read applications directory ./apps: permission denied
//!   Fix: Check that --root points at the monorepo root and that apps/ is readable.
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for envscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Tool configuration errors (flags, env vars, config files).
    Config,
    /// Rule model errors (overlay files, descriptor tables).
    Rules,
    /// Application directory discovery errors.
    Discovery,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Rules => write!(f, "rules"),
            ErrorCategory::Discovery => write!(f, "discovery"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for envscan.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid mode: {0}")]
    InvalidMode(String),

    // Discovery errors (20-29)
    #[error("cannot read applications directory {}: {source}", path.display())]
    AppsDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("application not found: {app}")]
    AppNotFound { app: String },

    // Rule model errors (30-39)
    #[error("invalid rules: {0}")]
    InvalidRules(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Discovery errors
    /// - 30-39: Rule model errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidMode(_) => 11,
            Error::AppsDirUnreadable { .. } => 20,
            Error::AppNotFound { .. } => 21,
            Error::InvalidRules(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidMode(_) => ErrorCategory::Config,
            Error::InvalidRules(_) => ErrorCategory::Rules,
            Error::AppsDirUnreadable { .. } | Error::AppNotFound { .. } => {
                ErrorCategory::Discovery
            }
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether the user can fix this without changing envscan itself.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidMode(_) | Error::InvalidRules(_) => true,
            Error::AppsDirUnreadable { .. } | Error::AppNotFound { .. } => true,
            Error::Io(_) => true,
            // Serialization of our own payloads failing is a bug.
            Error::Json(_) => false,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Check the --root/--app/--rules flags and the ENVSCAN_* environment variables.",
            Error::InvalidMode(_) => "Use --mode development or --mode production (or set ENVSCAN_MODE).",
            Error::InvalidRules(_) => {
                "Fix the rule overlay file, or run 'envscan rules' without --rules to see the built-in catalog."
            }
            Error::AppsDirUnreadable { .. } => {
                "Check that --root points at the monorepo root and that apps/ is readable."
            }
            Error::AppNotFound { .. } => "Run 'envscan apps' to list the applications that were discovered.",
            Error::Io(_) => "Check permissions on the files involved and retry.",
            Error::Json(_) => "Internal serialization failure. Please report it with the command that triggered it.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidMode(_) => "Invalid Mode",
            Error::InvalidRules(_) => "Invalid Rule Model",
            Error::AppsDirUnreadable { .. } => "Discovery Error",
            Error::AppNotFound { .. } => "Application Not Found",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Remediation hint.
    pub remediation: String,

    /// Additional structured context (e.g., app name, path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::AppsDirUnreadable { path, .. } => {
                context.insert(
                    "path".to_string(),
                    serde_json::json!(path.display().to_string()),
                );
            }
            Error::AppNotFound { app } => {
                context.insert("app".to_string(), serde_json::json!(app));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            remediation: err.remediation().to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
