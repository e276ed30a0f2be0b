//! envscan core library
//!
//! This library provides the core functionality for env file analysis:
//! - File discovery and `.env` parsing for every application under `apps/`
//! - Precedence resolution and two-phase validation against a rule model
//! - A query facade for single-key lookups
//! - Tool configuration, structured logging and exit codes
//! - Masked, filtered report rendering
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod facade;
pub mod fs;
pub mod logging;
pub mod output;
pub mod parse;
pub mod resolve;
pub mod scanner;

pub use facade::{get_variable, EnvQuery, DEFAULT_APP};
pub use resolve::{resolve, AppEnvState, EnvSummary, Resolver, Source, VariableState};
pub use scanner::{AppFileInfo, EnvScanner, RawDefinition};
