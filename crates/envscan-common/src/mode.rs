//! Environment modes and their file precedence tables.
//!
//! Each mode reads a fixed, ordered list of env files. Later entries win
//! over earlier ones when the same key is defined in several files:
//!
//! | Mode        | Order (low → high)                                              |
//! |-------------|-----------------------------------------------------------------|
//! | development | `.env`, `.env.development`, `.env.local`, `.env.development.local` |
//! | production  | `.env`, `.env.production`, `.env.local`, `.env.production.local`   |

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const DEVELOPMENT_FILES: &[&str] = &[
    ".env",
    ".env.development",
    ".env.local",
    ".env.development.local",
];

const PRODUCTION_FILES: &[&str] = &[
    ".env",
    ".env.production",
    ".env.local",
    ".env.production.local",
];

/// The environment a resolution is computed for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// All modes, in declaration order.
    pub const ALL: [Mode; 2] = [Mode::Development, Mode::Production];

    /// Env file names read for this mode, lowest precedence first.
    pub fn env_files(self) -> &'static [&'static str] {
        match self {
            Mode::Development => DEVELOPMENT_FILES,
            Mode::Production => PRODUCTION_FILES,
        }
    }

    /// Precedence index of `source` for this mode.
    ///
    /// Returns `None` for files that are never read in this mode.
    pub fn precedence_of(self, source: &str) -> Option<usize> {
        self.env_files().iter().position(|name| *name == source)
    }

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    pub fn is_production(self) -> bool {
        self == Mode::Production
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}
