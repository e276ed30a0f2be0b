//! Logging configuration.
//!
//! Supports configuration via:
//! - Environment variables (ENVSCAN_LOG, RUST_LOG, ENVSCAN_LOG_FORMAT)
//! - CLI flags (-v, -q)

use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Default: only problems with individual files surface.
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Level after `verbose` steps towards `Trace` and `quiet` steps towards `Off`.
    pub fn adjusted(self, verbose: u8, quiet: u8) -> LogLevel {
        const ORDER: [LogLevel; 6] = [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Off,
        ];
        let current = ORDER.iter().position(|l| *l == self).unwrap_or(3) as i32;
        let target = (current - verbose as i32 + quiet as i32).clamp(0, ORDER.len() as i32 - 1);
        ORDER[target as usize]
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Off => tracing_subscriber::filter::LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Whether to include timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
            timestamps: false,
        }
    }
}

impl LogConfig {
    /// Create config from the process environment and CLI verbosity.
    pub fn from_env(verbose: u8, quiet: u8) -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), verbose, quiet)
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F, verbose: u8, quiet: u8) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LogConfig::default();

        // ENVSCAN_LOG takes precedence over RUST_LOG
        if let Some(val) = lookup("ENVSCAN_LOG") {
            if let Ok(level) = val.parse::<LogLevel>() {
                config.level = level;
            }
        } else if let Some(val) = lookup("RUST_LOG") {
            if val.contains("trace") {
                config.level = LogLevel::Trace;
            } else if val.contains("debug") {
                config.level = LogLevel::Debug;
            } else if val.contains("info") {
                config.level = LogLevel::Info;
            } else if val.contains("error") {
                config.level = LogLevel::Error;
            }
        }

        if let Some(val) = lookup("ENVSCAN_LOG_FORMAT") {
            if let Ok(format) = val.parse::<LogFormat>() {
                config.format = format;
            }
        }

        config.level = config.level.adjusted(verbose, quiet);
        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_adjusted_clamps() {
        assert_eq!(LogLevel::Warn.adjusted(1, 0), LogLevel::Info);
        assert_eq!(LogLevel::Warn.adjusted(9, 0), LogLevel::Trace);
        assert_eq!(LogLevel::Warn.adjusted(0, 1), LogLevel::Error);
        assert_eq!(LogLevel::Warn.adjusted(0, 9), LogLevel::Off);
        assert_eq!(LogLevel::Warn.adjusted(1, 1), LogLevel::Warn);
    }

    #[test]
    fn test_envscan_log_beats_rust_log() {
        let config = LogConfig::from_lookup(
            lookup(&[("ENVSCAN_LOG", "error"), ("RUST_LOG", "debug")]),
            0,
            0,
        );
        assert_eq!(config.level, LogLevel::Error);
    }

    #[test]
    fn test_rust_log_and_format() {
        let config = LogConfig::from_lookup(
            lookup(&[("RUST_LOG", "envscan_core=debug"), ("ENVSCAN_LOG_FORMAT", "jsonl")]),
            0,
            0,
        );
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_cli_verbosity_applies_last() {
        let config = LogConfig::from_lookup(lookup(&[("ENVSCAN_LOG", "info")]), 1, 0);
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn test_defaults() {
        let config = LogConfig::from_lookup(lookup(&[]), 0, 0);
        assert_eq!(config, LogConfig::default());
        let config = config.with_format(LogFormat::Jsonl).with_level(LogLevel::Info).with_timestamps(true);
        assert_eq!(config.format, LogFormat::Jsonl);
        assert!(config.timestamps);
    }
}
