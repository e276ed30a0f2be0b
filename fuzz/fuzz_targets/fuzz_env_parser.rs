//! Fuzz target for env file parsing and resolution.
//!
//! Arbitrary file contents must parse without panicking, and whatever the
//! parser yields must resolve without panicking in either mode.

#![no_main]

use arbitrary::Arbitrary;
use envscan_common::Mode;
use envscan_core::parse::parse_env;
use envscan_core::resolve::Resolver;
use envscan_core::scanner::AppFileInfo;
use libfuzzer_sys::fuzz_target;
use std::path::PathBuf;

#[derive(Debug, Arbitrary)]
struct Input {
    base: String,
    local: String,
    production: bool,
}

fuzz_target!(|input: Input| {
    let mode = if input.production {
        Mode::Production
    } else {
        Mode::Development
    };

    let mut variables = parse_env(&input.base, ".env");
    variables.extend(parse_env(&input.local, ".env.local"));
    for d in &variables {
        assert!(!d.key.is_empty());
        assert_eq!(d.key, d.key.trim());
        assert_eq!(d.value, d.value.trim());
    }

    let info = AppFileInfo {
        app_name: "fuzz".to_string(),
        file_path: PathBuf::from("apps/fuzz"),
        variables,
    };
    let state = Resolver::builtin().resolve(&info, mode);
    for var in state.variables.values() {
        assert!(var.validation.is_valid() || !var.validation.issues().is_empty());
    }
});
