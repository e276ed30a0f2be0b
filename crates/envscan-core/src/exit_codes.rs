//! Exit codes for the envscan CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes (clean, or at least one invalid variable)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use envscan_common::Error;

/// Exit codes for envscan operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-1)
    // ========================================================================
    /// Every resolved variable is valid.
    Clean = 0,

    /// At least one variable failed validation (`check`, `--format exitcode`).
    Invalid = 1,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Bad tool configuration or rule overlay
    ConfigError = 11,

    /// The apps directory or a requested application cannot be found
    DiscoveryError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates an operational outcome.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::Invalid => "OK_INVALID",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::DiscoveryError => "ERR_DISCOVERY",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::InvalidMode(_) | Error::InvalidRules(_) => {
                ExitCode::ConfigError
            }
            Error::AppsDirUnreadable { .. } | Error::AppNotFound { .. } => {
                ExitCode::DiscoveryError
            }
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_operational());
        assert!(ExitCode::Invalid.is_operational());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert!(!ExitCode::DiscoveryError.is_internal_error());
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ExitCode::from(&Error::InvalidMode("staging".into())),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::from(&Error::AppNotFound { app: "web".into() }),
            ExitCode::DiscoveryError
        );
        let unreadable = Error::AppsDirUnreadable {
            path: PathBuf::from("/x/apps"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(ExitCode::from(&unreadable), ExitCode::DiscoveryError);
        assert_eq!(
            ExitCode::from(&Error::Io(std::io::Error::other("disk"))),
            ExitCode::IoError
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::Invalid.to_string(), "OK_INVALID (1)");
        assert_eq!(i32::from(ExitCode::DiscoveryError), 12);
    }
}
