//! Validation outcomes attached to resolved variables.

use serde::{Deserialize, Serialize};

/// Outcome of validating one variable.
///
/// Serializes as `{"success": true}` or
/// `{"success": false, "error": {"issues": [...]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationIssues>,
}

/// Human-readable problems found with a value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationIssues {
    pub issues: Vec<String>,
}

impl Validation {
    pub fn valid() -> Self {
        Validation {
            success: true,
            error: None,
        }
    }

    /// A failure carrying a single issue.
    pub fn invalid(issue: impl Into<String>) -> Self {
        Validation {
            success: false,
            error: Some(ValidationIssues {
                issues: vec![issue.into()],
            }),
        }
    }

    /// Valid when `issues` is empty, invalid otherwise.
    ///
    /// A failing result therefore always carries at least one issue.
    pub fn from_issues(issues: Vec<String>) -> Self {
        if issues.is_empty() {
            Validation::valid()
        } else {
            Validation {
                success: false,
                error: Some(ValidationIssues { issues }),
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.success
    }

    pub fn issues(&self) -> &[String] {
        self.error.as_ref().map(|e| e.issues.as_slice()).unwrap_or(&[])
    }

    /// Combine two outcomes, keeping every issue from both.
    pub fn and(self, other: Validation) -> Validation {
        let mut issues = self.into_issues();
        issues.extend(other.into_issues());
        Validation::from_issues(issues)
    }

    fn into_issues(self) -> Vec<String> {
        self.error.map(|e| e.issues).unwrap_or_default()
    }
}

impl Default for Validation {
    fn default() -> Self {
        Validation::valid()
    }
}
