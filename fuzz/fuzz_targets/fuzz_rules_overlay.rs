//! Fuzz target for rule overlay decoding.
//!
//! Overlay files are user input: decoding and merging must return errors,
//! never panic.

#![no_main]

use envscan_model::{RuleModel, RuleOverlay};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(overlay) = RuleOverlay::parse_json(text) else {
        return;
    };
    if let Ok(descriptors) = overlay.into_descriptors() {
        let _ = RuleModel::builtin_owned().merge(descriptors);
    }
});
