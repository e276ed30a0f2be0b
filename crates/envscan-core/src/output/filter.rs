//! Visibility filtering for rendered reports.
//!
//! Resolved state carries no display flags. A `VisibilityFilter` computes a
//! separate `key -> visible` map so the same state can be shown several ways.

use crate::resolve::{AppEnvState, VariableState};
use std::collections::BTreeMap;

/// Which variables a report shows. Every criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityFilter {
    category: Option<String>,
    invalid_only: bool,
    overridden_only: bool,
    search: Option<String>,
}

impl VisibilityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keys in `category` (case-insensitive).
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn invalid_only(mut self, enabled: bool) -> Self {
        self.invalid_only = enabled;
        self
    }

    pub fn overridden_only(mut self, enabled: bool) -> Self {
        self.overridden_only = enabled;
        self
    }

    /// Only keys containing `needle` (case-insensitive). Values are never
    /// searched, so a filter cannot be used to probe secrets.
    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.search = (!needle.is_empty()).then(|| needle.to_lowercase());
        self
    }

    /// Whether any criterion is set.
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.invalid_only || self.overridden_only || self.search.is_some()
    }

    pub fn matches(&self, state: &VariableState) -> bool {
        if let Some(category) = &self.category {
            if !state.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if self.invalid_only && state.is_valid() {
            return false;
        }
        if self.overridden_only && !state.is_overridden {
            return false;
        }
        if let Some(needle) = &self.search {
            if !state.key.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        true
    }

    /// Visibility of every key in `state`.
    pub fn visibility(&self, state: &AppEnvState) -> BTreeMap<String, bool> {
        state
            .variables
            .iter()
            .map(|(key, var)| (key.clone(), self.matches(var)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Source;
    use envscan_common::Mode;
    use envscan_model::Validation;
    use std::path::PathBuf;

    fn var(key: &str, category: &str, valid: bool, overridden: bool) -> VariableState {
        VariableState {
            key: key.to_string(),
            category: category.to_string(),
            definitions: Vec::new(),
            effective_value: "secret-value".to_string(),
            effective_source: Source::File(".env".to_string()),
            is_overridden: overridden,
            validation: if valid {
                Validation::valid()
            } else {
                Validation::invalid("bad")
            },
        }
    }

    fn state() -> AppEnvState {
        let vars = [
            var("NEXT_PUBLIC_SITE_URL", "Site", true, true),
            var("STRIPE_SECRET_KEY", "Billing", false, false),
            var("MY_FLAG", "Custom", true, false),
        ];
        AppEnvState {
            app_name: "web".to_string(),
            file_path: PathBuf::from("/repo/apps/web"),
            mode: Mode::Development,
            variables: vars.into_iter().map(|v| (v.key.clone(), v)).collect(),
            deprecations: Vec::new(),
        }
    }

    fn visible(filter: &VisibilityFilter) -> Vec<String> {
        filter
            .visibility(&state())
            .into_iter()
            .filter(|(_, shown)| *shown)
            .map(|(key, _)| key)
            .collect()
    }

    #[test]
    fn test_default_shows_everything() {
        let filter = VisibilityFilter::new();
        assert!(!filter.is_active());
        assert_eq!(visible(&filter).len(), 3);
    }

    #[test]
    fn test_category_and_flags() {
        assert_eq!(
            visible(&VisibilityFilter::new().with_category("billing")),
            vec!["STRIPE_SECRET_KEY"]
        );
        assert_eq!(
            visible(&VisibilityFilter::new().invalid_only(true)),
            vec!["STRIPE_SECRET_KEY"]
        );
        assert_eq!(
            visible(&VisibilityFilter::new().overridden_only(true)),
            vec!["NEXT_PUBLIC_SITE_URL"]
        );
    }

    #[test]
    fn test_search_matches_keys_not_values() {
        assert_eq!(
            visible(&VisibilityFilter::new().with_search("flag")),
            vec!["MY_FLAG"]
        );
        assert!(visible(&VisibilityFilter::new().with_search("secret-value")).is_empty());
        assert!(!VisibilityFilter::new().with_search("").is_active());
    }

    #[test]
    fn test_criteria_combine() {
        let filter = VisibilityFilter::new().with_category("Site").invalid_only(true);
        assert!(visible(&filter).is_empty());
        // Every key still has an entry.
        assert_eq!(filter.visibility(&state()).len(), 3);
    }
}
