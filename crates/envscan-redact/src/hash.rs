//! Keyed fingerprints for masked values.
//!
//! Uses HMAC-SHA256 with truncated output. The key is random per process
//! unless supplied, so fingerprints are comparable within one report but
//! cannot be looked up in a precomputed table.

use crate::error::{MaskError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Default number of bytes kept from the HMAC output (12 hex chars).
pub const DEFAULT_FINGERPRINT_BYTES: usize = 6;

/// Key material for HMAC-SHA256.
#[derive(Clone)]
pub struct FingerprintKey {
    key: [u8; 32],
}

impl FingerprintKey {
    /// A fresh random key.
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; 32];
        getrandom::getrandom(&mut key).map_err(|e| {
            MaskError::KeyError(format!("failed to generate random key: {}", e))
        })?;
        Ok(Self { key })
    }

    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Fingerprint `input` as `[HASH:<hex>]`.
    ///
    /// Returns `None` only if the MAC cannot be initialised; callers must
    /// then redact.
    pub fn fingerprint(&self, input: &str, truncation_bytes: usize) -> Option<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key).ok()?;
        mac.update(input.as_bytes());
        let result = mac.finalize().into_bytes();

        let trunc = truncation_bytes.clamp(4, 32);
        Some(format!("[HASH:{}]", hex::encode(&result[..trunc])))
    }
}

impl std::fmt::Debug for FingerprintKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FingerprintKey([REDACTED])")
    }
}
