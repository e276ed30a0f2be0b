//! Secret masking for envscan reports.
//!
//! Resolved environment values end up in terminal output, JSON reports and
//! CI logs. This crate decides, per value, whether it may be shown as-is
//! and how to mask it otherwise.
//!
//! # Key Features
//!
//! - **Declared secrets**: descriptors flagged `secret` are always masked.
//! - **Detection**: undeclared keys are masked when their name or value
//!   looks like a credential (Stripe keys, JWTs, private keys, high entropy).
//! - **Fingerprints**: keyed HMAC-SHA256 fingerprints let a reader see that
//!   two files hold the same secret without seeing the secret.
//! - **Fail-closed**: if a fingerprint cannot be computed the value is
//!   redacted outright.
//!
//! # Example
//!
//! ```
//! use envscan_redact::{Masker, MaskPolicy};
//!
//! let masker = Masker::new(MaskPolicy::default()).unwrap();
//! let masked = masker.mask("STRIPE_SECRET_KEY", "sk_test_4eC39HqLyjWDarjtT1zdp7dc", true);
//! assert!(!masked.output.contains("4eC39HqLyjWDarjtT1zdp7dc"));
//! ```

pub mod action;
pub mod detect;
pub mod engine;
pub mod error;
pub mod hash;
pub mod policy;

pub use action::MaskAction;
pub use detect::{SecretDetector, SecretType};
pub use engine::{MaskedValue, Masker};
pub use error::{MaskError, Result};
pub use hash::FingerprintKey;
pub use policy::MaskPolicy;
