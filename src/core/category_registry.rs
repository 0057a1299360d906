//! Ordered set of valid transaction categories.

use tracing::debug;

use crate::domain::{DEFAULT_CATEGORIES, UNCATEGORIZED};

/// Insertion-ordered, case-sensitive set of category names.
///
/// [`UNCATEGORIZED`] is always a member: constructors add it when missing and
/// [`CategoryRegistry::remove`] refuses to drop it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::from_names(DEFAULT_CATEGORIES)
    }
}

impl CategoryRegistry {
    /// A registry holding only the fallback category.
    pub fn new() -> Self {
        Self {
            names: vec![UNCATEGORIZED.to_string()],
        }
    }

    /// Builds a registry from `names`, skipping blanks and duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self { names: Vec::new() };
        for name in names {
            registry.add(name.as_ref());
        }
        if !registry.is_valid(UNCATEGORIZED) {
            registry.names.push(UNCATEGORIZED.to_string());
        }
        registry
    }

    /// Appends `name` unless it is blank or already present. Returns whether it was added.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.is_valid(name) {
            return false;
        }
        debug!(category = name, "category added");
        self.names.push(name.to_string());
        true
    }

    /// Removes `name`. The fallback category and unknown names are left alone.
    pub fn remove(&mut self, name: &str) -> bool {
        if name == UNCATEGORIZED {
            return false;
        }
        let before = self.names.len();
        self.names.retain(|existing| existing != name);
        let removed = self.names.len() != before;
        if removed {
            debug!(category = name, "category removed");
        }
        removed
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    /// Category a transaction is counted under: its own when registered, else the fallback.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        if self.is_valid(name) {
            name
        } else {
            UNCATEGORIZED
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
