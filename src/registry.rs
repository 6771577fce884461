//! Rename registry — undoes cosmetic flag-name transformations.
//!
//! The dispatcher renames flags in two places: plural container parameters
//! lose their trailing `s`, and true-by-default booleans gain a `no_` prefix.
//! Each rename records replacement → original here so that parsed values can
//! be translated back to the names the callable actually declares.

use std::collections::BTreeMap;

use crate::value::Value;

/// Mapping from external flag name back to the original parameter name.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    mapping: BTreeMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rename and return the replacement name.
    ///
    /// Registering the same rename twice is a no-op. Renames strictly
    /// transform the string, so chains never cycle.
    pub fn register(&mut self, original: &str, replacement: &str) -> String {
        tracing::debug!("registering substitution for {original} with {replacement}");
        self.mapping
            .entry(replacement.to_string())
            .or_insert_with(|| original.to_string());
        replacement.to_string()
    }

    /// Walk the mapping transitively to the ultimate original name.
    pub fn resolve(&self, name: &str) -> String {
        let mut current = name;
        while let Some(original) = self.mapping.get(current) {
            current = original;
        }
        current.to_string()
    }

    /// Translate every parsed flag name back to its original parameter name.
    pub fn unmap(&self, parsed: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
        parsed
            .into_iter()
            .map(|(name, value)| (self.resolve(&name), value))
            .collect()
    }
}
