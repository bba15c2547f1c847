//! In-memory expansion cache

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::names::{normalize, VariantSet};

/// Case-insensitive name -> expansion map for the process lifetime
///
/// Every read and write goes through one mutex. Entries are whole sets that
/// get replaced, never edited, so a reader only clones an `Arc` under the lock.
#[derive(Default)]
pub struct ExpansionCache {
    entries: Mutex<HashMap<String, Arc<VariantSet>>>,
}

impl ExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<VariantSet> {
        let key = normalize(name);
        let hit = self.entries.lock().get(&key).cloned();
        hit.map(|set| (*set).clone())
    }

    pub fn insert(&self, name: &str, names: VariantSet) {
        let key = normalize(name);
        if key.is_empty() {
            return;
        }
        self.entries.lock().insert(key, Arc::new(names));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let cache = ExpansionCache::new();
        cache.insert("  Liz ", ["liz", "elizabeth"].into_iter().collect());
        assert!(cache.get("LIZ").unwrap().contains("elizabeth"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_replaces_wholesale() {
        let cache = ExpansionCache::new();
        cache.insert("bob", ["bob", "rob"].into_iter().collect());
        cache.insert("Bob", ["bob"].into_iter().collect());
        assert_eq!(cache.get("bob").unwrap().len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_blank_keys_ignored() {
        let cache = ExpansionCache::new();
        cache.insert("  ", VariantSet::new());
        assert!(cache.is_empty());
        assert!(cache.get("").is_none());
    }
}
