//! Shared vocabulary for the envscan workspace.
//!
//! This crate provides foundational types used by every other envscan crate:
//! - Environment modes and their fixed file precedence tables
//! - The unified error type with stable codes
//! - Output format selection for CLI payloads
//! - The schema version stamped on JSON output

pub mod error;
pub mod mode;
pub mod output;
pub mod schema;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use mode::Mode;
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
