//! Name-indexed registry of variable descriptors.

use crate::catalog;
use crate::descriptor::VariableDescriptor;
use crate::error::{RuleError, RuleResult};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// An ordered collection of descriptors with lookup by variable name.
///
/// Declaration order is preserved for display; lookups go through an index.
#[derive(Debug, Default)]
pub struct RuleModel {
    descriptors: Vec<VariableDescriptor>,
    index: HashMap<String, usize>,
}

static BUILTIN: OnceLock<RuleModel> = OnceLock::new();

impl RuleModel {
    /// Build a model, rejecting duplicate names and dependencies on
    /// variables that have no descriptor.
    pub fn new(descriptors: Vec<VariableDescriptor>) -> RuleResult<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (i, descriptor) in descriptors.iter().enumerate() {
            if index.insert(descriptor.name.clone(), i).is_some() {
                return Err(RuleError::DuplicateDescriptor(descriptor.name.clone()));
            }
        }

        let model = RuleModel { descriptors, index };
        model.check_dependencies()?;
        Ok(model)
    }

    /// The built-in catalog, constructed on first use.
    pub fn builtin() -> &'static RuleModel {
        BUILTIN.get_or_init(|| RuleModel::from_catalog(catalog::builtin_descriptors()))
    }

    /// A fresh, owned copy of the built-in catalog, for extending with overlays.
    pub fn builtin_owned() -> RuleModel {
        RuleModel::from_catalog(catalog::builtin_descriptors())
    }

    // The catalog is checked by tests; later duplicates win.
    fn from_catalog(descriptors: Vec<VariableDescriptor>) -> Self {
        let mut model = RuleModel::default();
        for descriptor in descriptors {
            model.upsert(descriptor);
        }
        model
    }

    /// Add descriptors, replacing any existing descriptor of the same name
    /// in place. Dependencies are re-checked afterwards.
    pub fn merge(mut self, overlay: Vec<VariableDescriptor>) -> RuleResult<Self> {
        let mut seen = BTreeSet::new();
        for descriptor in &overlay {
            if !seen.insert(descriptor.name.clone()) {
                return Err(RuleError::DuplicateDescriptor(descriptor.name.clone()));
            }
        }
        for descriptor in overlay {
            self.upsert(descriptor);
        }
        self.check_dependencies()?;
        Ok(self)
    }

    fn upsert(&mut self, descriptor: VariableDescriptor) {
        match self.index.get(&descriptor.name) {
            Some(&i) => self.descriptors[i] = descriptor,
            None => {
                self.index
                    .insert(descriptor.name.clone(), self.descriptors.len());
                self.descriptors.push(descriptor);
            }
        }
    }

    fn check_dependencies(&self) -> RuleResult<()> {
        for descriptor in &self.descriptors {
            for dependency in descriptor.dependency_names() {
                if !self.index.contains_key(dependency) {
                    return Err(RuleError::UnknownDependency {
                        variable: descriptor.name.clone(),
                        dependency: dependency.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VariableDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.descriptors
            .iter()
            .map(|d| d.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ContextualValidation, Dependency, VariableType};
    use crate::validation::Validation;
    use crate::validator::from_fn;

    fn plain(name: &str) -> VariableDescriptor {
        VariableDescriptor::new(name, "Test", VariableType::String)
    }

    fn depends_on(name: &str, dependency: &str) -> VariableDescriptor {
        plain(name).contextual(ContextualValidation::new(
            vec![Dependency::when_set(dependency, "needed")],
            from_fn(|_, _| Validation::valid()),
        ))
    }

    #[test]
    fn test_lookup_and_order() {
        let model = RuleModel::new(vec![plain("B"), plain("A")]).unwrap();
        assert_eq!(model.len(), 2);
        assert!(model.get("A").is_some());
        assert!(model.get("C").is_none());
        let names: Vec<&str> = model.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = RuleModel::new(vec![plain("A"), plain("A")]).unwrap_err();
        assert!(matches!(err, RuleError::DuplicateDescriptor(ref n) if n == "A"));
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let err = RuleModel::new(vec![depends_on("KEY", "PROVIDER")]).unwrap_err();
        assert!(matches!(err, RuleError::UnknownDependency { .. }));
        assert!(RuleModel::new(vec![plain("PROVIDER"), depends_on("KEY", "PROVIDER")]).is_ok());
    }

    #[test]
    fn test_merge_replaces_in_place() {
        let model = RuleModel::new(vec![plain("A"), plain("B")]).unwrap();
        let merged = model
            .merge(vec![plain("A").required(), plain("C")])
            .unwrap();
        let names: Vec<&str> = merged.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(merged.get("A").unwrap().required);
    }

    #[test]
    fn test_merge_checks_dependencies() {
        let model = RuleModel::new(vec![plain("A")]).unwrap();
        assert!(model.merge(vec![depends_on("B", "MISSING")]).is_err());
    }

    #[test]
    fn test_builtin_catalog_is_consistent() {
        // Strict construction must accept the shipped catalog.
        let strict = RuleModel::new(crate::catalog::builtin_descriptors()).unwrap();
        assert_eq!(strict.len(), RuleModel::builtin().len());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let model = RuleModel::new(vec![
            VariableDescriptor::new("A", "Site", VariableType::String),
            VariableDescriptor::new("B", "Billing", VariableType::String),
            VariableDescriptor::new("C", "Site", VariableType::String),
        ])
        .unwrap();
        assert_eq!(model.categories(), vec!["Site", "Billing"]);
    }
}
