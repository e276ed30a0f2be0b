//! Schema versioning for JSON payloads.

/// Version of the JSON envelope emitted by `envscan` commands.
///
/// Bumped whenever a field is removed or changes meaning. Additive
/// changes keep the version.
pub const SCHEMA_VERSION: &str = "1.0.0";
