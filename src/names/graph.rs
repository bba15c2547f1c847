//! Nickname equivalence graph
//!
//! Nodes are normalized names; every canonical/nickname pair in the seed is an
//! undirected edge. Built once at startup and read-only afterwards, so it can
//! be shared across tasks behind an `Arc` without locking.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use tracing::{debug, warn};

use super::dictionary::{self, SeedEntry};
use super::variants::{normalize, VariantSet};

#[derive(Debug, Clone, Default)]
pub struct NameEquivalenceGraph {
    edges: HashMap<String, Vec<String>>,
}

impl NameEquivalenceGraph {
    /// Build from seed entries. Pairs with an empty side are skipped.
    pub fn from_seed(seed: &[SeedEntry]) -> Self {
        let mut graph = Self::default();
        for entry in seed {
            let canonical = normalize(&entry.canonical);
            if canonical.is_empty() {
                continue;
            }
            for nickname in &entry.nicknames {
                let nickname = normalize(nickname);
                if nickname.is_empty() {
                    continue;
                }
                graph.link(&canonical, &nickname);
            }
        }
        graph
    }

    /// Graph over the built-in default dictionary
    pub fn builtin() -> Self {
        Self::from_seed(&dictionary::builtin())
    }

    /// Load from a dictionary file, falling back to the built-in set
    ///
    /// Never fails: a missing or corrupt file is logged and replaced.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("No nickname dictionary configured, using built-in defaults");
            return Self::builtin();
        };

        match dictionary::load(path) {
            Ok(seed) => {
                let graph = Self::from_seed(&seed);
                debug!(
                    path = %path.display(),
                    nodes = graph.node_count(),
                    "Loaded nickname dictionary"
                );
                graph
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load nickname dictionary, using built-in defaults"
                );
                Self::builtin()
            }
        }
    }

    fn link(&mut self, a: &str, b: &str) {
        // Both nodes exist even for a self-link
        self.edges.entry(a.to_string()).or_default();
        self.edges.entry(b.to_string()).or_default();
        if a == b {
            return;
        }
        Self::push_unique(self.edges.entry(a.to_string()).or_default(), b);
        Self::push_unique(self.edges.entry(b.to_string()).or_default(), a);
    }

    fn push_unique(neighbors: &mut Vec<String>, name: &str) {
        if !neighbors.iter().any(|n| n == name) {
            neighbors.push(name.to_string());
        }
    }

    /// Transitive closure of `name` over the graph
    ///
    /// Empty for blank input; otherwise always contains the trimmed input,
    /// whether or not it is a known node.
    pub fn expand(&self, name: &str) -> VariantSet {
        let start = name.trim();
        let mut result = VariantSet::new();
        if start.is_empty() {
            return result;
        }
        result.insert(start);

        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        let start_key = normalize(start);
        seen.insert(start_key.clone());
        queue.push_back(start_key);

        while let Some(current) = queue.pop_front() {
            let Some(neighbors) = self.edges.get(&current) else {
                continue;
            };
            for neighbor in neighbors {
                if seen.insert(neighbor.clone()) {
                    result.insert(neighbor);
                    queue.push_back(neighbor.clone());
                }
            }
        }

        result
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(&normalize(name))
    }

    /// Direct neighbors of a node (empty for unknown names)
    pub fn neighbors(&self, name: &str) -> &[String] {
        self.edges
            .get(&normalize(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(canonical: &str, nicknames: &[&str]) -> SeedEntry {
        SeedEntry {
            canonical: canonical.to_string(),
            nicknames: nicknames.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_expand_liz() {
        let graph =
            NameEquivalenceGraph::from_seed(&[entry("elizabeth", &["liz", "beth", "lizzy", "eliza"])]);
        let result = graph.expand("Liz");
        for expected in ["liz", "elizabeth", "beth", "lizzy", "eliza"] {
            assert!(result.contains(expected), "missing {}", expected);
        }
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_reflexive_for_unknown_names() {
        let graph = NameEquivalenceGraph::builtin();
        let result = graph.expand("  Zebediah ");
        assert_eq!(result.as_slice(), &["Zebediah".to_string()]);
    }

    #[test]
    fn test_blank_input_is_empty() {
        let graph = NameEquivalenceGraph::builtin();
        assert!(graph.expand("").is_empty());
        assert!(graph.expand(" \t\n").is_empty());
    }

    #[test]
    fn test_symmetric_for_every_seeded_pair() {
        let seed = dictionary::builtin();
        let graph = NameEquivalenceGraph::from_seed(&seed);
        for e in &seed {
            for nick in &e.nicknames {
                assert!(graph.expand(&e.canonical).contains(nick));
                assert!(graph.expand(nick).contains(&e.canonical));
            }
        }
    }

    #[test]
    fn test_transitive_across_entries() {
        // katherine - kat and kathy - cathy share no direct edge with each other
        let graph = NameEquivalenceGraph::from_seed(&[
            entry("katherine", &["kat"]),
            entry("kathy", &["cathy", "kat"]),
        ]);
        let result = graph.expand("Katherine");
        assert!(result.contains("cathy"));
        assert!(graph.expand("cathy").contains("katherine"));
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let graph = NameEquivalenceGraph::from_seed(&[
            entry("", &["ghost"]),
            entry("henry", &["", "  ", "harry"]),
        ]);
        assert!(!graph.contains("ghost"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.neighbors("HENRY"), &["harry".to_string()]);
    }

    #[test]
    fn test_first_spelling_is_the_input() {
        let graph = NameEquivalenceGraph::builtin();
        let result = graph.expand("ROBERT");
        assert_eq!(result.iter().next(), Some("ROBERT"));
        assert!(result.contains("bobby"));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_load_falls_back_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let graph = NameEquivalenceGraph::load(Some(&path));
        assert!(graph.expand("bill").contains("william"));

        let missing = NameEquivalenceGraph::load(Some(&dir.path().join("nope.json")));
        assert!(missing.expand("harry").contains("henry"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.json");
        std::fs::write(&path, r#"{"theodore": ["ted", "teddy"]}"#).unwrap();

        let graph = NameEquivalenceGraph::load(Some(&path));
        assert!(graph.expand("teddy").contains("theodore"));
        assert!(!graph.contains("william"));
    }
}
