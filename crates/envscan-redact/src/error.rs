//! Error types for secret masking.

use thiserror::Error;

/// Result type for masking operations.
pub type Result<T> = std::result::Result<T, MaskError>;

#[derive(Error, Debug)]
pub enum MaskError {
    /// Policy values out of range or unparsable.
    #[error("policy error: {0}")]
    PolicyError(String),

    /// Could not obtain fingerprint key material.
    #[error("key error: {0}")]
    KeyError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}
