//! Masking actions.

use serde::{Deserialize, Serialize};

/// What to do with a value before it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskAction {
    /// Show as-is.
    Allow,
    /// Replace entirely with `[REDACTED]`.
    #[default]
    Redact,
    /// Keep a short prefix and suffix, e.g. `sk_t…p7dc`.
    Partial,
    /// Replace with a keyed fingerprint, e.g. `[HASH:3f2a…]`.
    Fingerprint,
}

impl MaskAction {
    /// Parse an action name as written in policy files.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Some(MaskAction::Allow),
            "redact" => Some(MaskAction::Redact),
            "partial" => Some(MaskAction::Partial),
            "fingerprint" | "hash" => Some(MaskAction::Fingerprint),
            _ => None,
        }
    }

    pub fn is_modifying(&self) -> bool {
        !matches!(self, MaskAction::Allow)
    }

    /// Whether the output reveals no characters of the original value.
    pub fn is_opaque(&self) -> bool {
        matches!(self, MaskAction::Redact | MaskAction::Fingerprint)
    }
}

impl std::fmt::Display for MaskAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MaskAction::Allow => "allow",
            MaskAction::Redact => "redact",
            MaskAction::Partial => "partial",
            MaskAction::Fingerprint => "fingerprint",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_display() {
        for action in [
            MaskAction::Allow,
            MaskAction::Redact,
            MaskAction::Partial,
            MaskAction::Fingerprint,
        ] {
            assert_eq!(MaskAction::parse_str(&action.to_string()), Some(action));
        }
        assert_eq!(MaskAction::parse_str("hash"), Some(MaskAction::Fingerprint));
        assert_eq!(MaskAction::parse_str("shred"), None);
    }

    #[test]
    fn test_default_is_fail_closed() {
        assert_eq!(MaskAction::default(), MaskAction::Redact);
        assert!(MaskAction::default().is_opaque());
        assert!(!MaskAction::Partial.is_opaque());
    }
}
