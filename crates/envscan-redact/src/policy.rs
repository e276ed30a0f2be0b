//! Masking policy.
//!
//! Decides how declared secrets, detected secrets, and ordinary values are
//! rendered. `MaskPolicy::reveal()` turns masking off for `--reveal`.

use crate::{MaskAction, MaskError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskPolicy {
    /// Action for values whose descriptor is marked `secret`.
    #[serde(default = "default_secret_action")]
    pub secret_action: MaskAction,

    /// Action for values nobody declared secret and detection did not flag.
    #[serde(default = "default_plain_action")]
    pub plain_action: MaskAction,

    /// Whether undeclared keys are run through the detector.
    #[serde(default = "default_true")]
    pub detection_enabled: bool,

    #[serde(default = "default_entropy_threshold")]
    pub entropy_threshold: f64,

    /// Characters kept at the start for `partial`.
    #[serde(default = "default_keep_prefix")]
    pub keep_prefix: usize,

    /// Characters kept at the end for `partial`.
    #[serde(default = "default_keep_suffix")]
    pub keep_suffix: usize,

    /// Bytes of HMAC output kept in fingerprints.
    #[serde(default = "default_fingerprint_bytes")]
    pub fingerprint_bytes: usize,
}

fn default_secret_action() -> MaskAction {
    MaskAction::Partial
}

fn default_plain_action() -> MaskAction {
    MaskAction::Allow
}

fn default_true() -> bool {
    true
}

fn default_entropy_threshold() -> f64 {
    4.5
}

fn default_keep_prefix() -> usize {
    4
}

fn default_keep_suffix() -> usize {
    4
}

fn default_fingerprint_bytes() -> usize {
    crate::hash::DEFAULT_FINGERPRINT_BYTES
}

impl Default for MaskPolicy {
    fn default() -> Self {
        Self {
            secret_action: default_secret_action(),
            plain_action: default_plain_action(),
            detection_enabled: true,
            entropy_threshold: default_entropy_threshold(),
            keep_prefix: default_keep_prefix(),
            keep_suffix: default_keep_suffix(),
            fingerprint_bytes: default_fingerprint_bytes(),
        }
    }
}

impl MaskPolicy {
    /// Show every value unmasked.
    pub fn reveal() -> Self {
        Self {
            secret_action: MaskAction::Allow,
            plain_action: MaskAction::Allow,
            detection_enabled: false,
            ..Self::default()
        }
    }

    /// Only opaque masking, for reports that leave the machine.
    pub fn strict() -> Self {
        Self {
            secret_action: MaskAction::Fingerprint,
            ..Self::default()
        }
    }

    pub fn is_reveal(&self) -> bool {
        self.secret_action == MaskAction::Allow && !self.detection_enabled
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let policy: MaskPolicy = serde_json::from_str(&content)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=8.0).contains(&self.entropy_threshold) {
            return Err(MaskError::PolicyError(format!(
                "entropy_threshold must be within 0..=8, got {}",
                self.entropy_threshold
            )));
        }
        if self.keep_prefix.saturating_add(self.keep_suffix) > 16 {
            return Err(MaskError::PolicyError(
                "keep_prefix + keep_suffix must not exceed 16".to_string(),
            ));
        }
        Ok(())
    }
}
