//! Output formats.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON (default for machine consumption)
    #[default]
    Json,

    /// Human-readable Markdown tables
    Md,

    /// One-line summary per application
    Summary,

    /// Minimal output (exit code only)
    Exitcode,
}

impl OutputFormat {
    /// Whether this format is meant for machines rather than people.
    pub fn is_machine(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Md => write!(f, "md"),
            OutputFormat::Summary => write!(f, "summary"),
            OutputFormat::Exitcode => write!(f, "exitcode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Md.to_string(), "md");
        assert_eq!(OutputFormat::Summary.to_string(), "summary");
        assert_eq!(OutputFormat::Exitcode.to_string(), "exitcode");
    }

    #[test]
    fn test_output_format_serde() {
        assert_eq!(serde_json::to_string(&OutputFormat::Md).unwrap(), "\"md\"");
        let parsed: OutputFormat = serde_json::from_str("\"summary\"").unwrap();
        assert_eq!(parsed, OutputFormat::Summary);
    }

    #[test]
    fn test_machine_formats() {
        assert!(OutputFormat::Json.is_machine());
        assert!(!OutputFormat::Md.is_machine());
    }
}
