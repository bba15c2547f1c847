//! Case-insensitive, insertion-ordered name sets

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

/// Normalize a name for lookups: trimmed and case-folded
#[inline]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A set of names with case-insensitive membership
///
/// Keeps the first spelling inserted for each key and iterates in insertion
/// order, so expansions and token lists come out deterministic.
#[derive(Debug, Clone, Default)]
pub struct VariantSet {
    items: Vec<String>,
    keys: HashSet<String>,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name, trimmed. Returns false for blanks and duplicates.
    pub fn insert(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        if !self.keys.insert(trimmed.to_lowercase()) {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.insert(name.as_ref());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl PartialEq for VariantSet {
    /// Same members, ignoring case and order
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl Eq for VariantSet {}

impl<S: AsRef<str>> FromIterator<S> for VariantSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = VariantSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for VariantSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl Serialize for VariantSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VariantSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<String>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}
