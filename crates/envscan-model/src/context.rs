//! Read-only view of the effective values a validator may consult.

use envscan_common::Mode;
use std::collections::BTreeMap;

/// Effective value of every resolved key, by name.
pub type EffectiveValues = BTreeMap<String, String>;

/// Everything a validator or dependency condition can see.
///
/// Built once per resolution pass after every effective value is known,
/// so cross-variable lookups see the same data regardless of key order.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    variables: &'a EffectiveValues,
    mode: Mode,
}

impl<'a> ValidationContext<'a> {
    pub fn new(variables: &'a EffectiveValues, mode: Mode) -> Self {
        ValidationContext { variables, mode }
    }

    /// Effective value of `key`, or `""` when no file defines it.
    pub fn value(&self, key: &str) -> &'a str {
        self.variables.get(key).map(String::as_str).unwrap_or("")
    }

    /// Whether `key` has a non-empty effective value.
    pub fn is_set(&self, key: &str) -> bool {
        !self.value(key).is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn variables(&self) -> &'a EffectiveValues {
        self.variables
    }
}
