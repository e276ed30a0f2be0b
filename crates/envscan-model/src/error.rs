//! Rule model construction errors.

use thiserror::Error;

/// Result type for rule model operations.
pub type RuleResult<T> = Result<T, RuleError>;

/// Errors raised while building a `RuleModel` or decoding an overlay.
///
/// These never arise from env file contents; they mean the rule
/// configuration itself is broken.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate descriptor: {0}")]
    DuplicateDescriptor(String),

    #[error("{variable} depends on unknown variable {dependency}")]
    UnknownDependency {
        variable: String,
        dependency: String,
    },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid pattern for {variable}: {message}")]
    InvalidPattern { variable: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl RuleError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            RuleError::IoError(_) => 30,
            RuleError::ParseError(_) => 31,
            RuleError::DuplicateDescriptor(_) => 32,
            RuleError::UnknownDependency { .. } => 33,
            RuleError::InvalidValue { .. } => 34,
            RuleError::InvalidPattern { .. } => 35,
            RuleError::VersionMismatch { .. } => 36,
        }
    }
}

impl From<RuleError> for envscan_common::Error {
    fn from(err: RuleError) -> Self {
        envscan_common::Error::InvalidRules(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            RuleError::DuplicateDescriptor("A".into()),
            RuleError::UnknownDependency {
                variable: "A".into(),
                dependency: "B".into(),
            },
            RuleError::InvalidValue {
                field: "x".into(),
                message: "y".into(),
            },
            RuleError::InvalidPattern {
                variable: "A".into(),
                message: "bad".into(),
            },
            RuleError::VersionMismatch {
                expected: "1.0.0".into(),
                actual: "2.0.0".into(),
            },
        ];
        let mut codes: Vec<u32> = errors.iter().map(RuleError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_into_common_error() {
        let err: envscan_common::Error = RuleError::DuplicateDescriptor("FOO".into()).into();
        assert_eq!(err.code(), 30);
        assert!(err.to_string().contains("FOO"));
    }
}
