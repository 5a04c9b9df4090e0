use serde::{Deserialize, Serialize};

/// Categories the tracker starts with when nothing is stored yet
pub const DEFAULT_CATEGORIES: [&str; 5] = ["General", "Work", "Personal", "Shopping", "Health"];

/// Ordered set of category names.
///
/// Registry order is the order sections are shown in. Names are unique and
/// never empty; the mutating operations live in `ops::category_ops`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from names, skipping blanks and duplicates
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = CategoryRegistry::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !registry.contains(name) {
                registry.names.push(name.to_string());
            }
        }
        registry
    }

    /// The seeded registry
    pub fn defaults() -> Self {
        Self::from_names(DEFAULT_CATEGORIES)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in registry order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Names in alphabetical (code point) order, for selection lists.
    /// The registry itself is left untouched.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut sorted = self.names.clone();
        sorted.sort();
        sorted
    }

    pub(crate) fn push(&mut self, name: String) {
        self.names.push(name);
    }

    pub(crate) fn replace_at(&mut self, index: usize, name: String) {
        self.names[index] = name;
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> String {
        self.names.remove(index)
    }
}
