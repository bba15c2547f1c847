//! Nickname expansion providers
//!
//! A provider turns one name into its variant set. The nickname graph is the
//! local provider; `RemoteExpansionProvider` layers a model call and a cache
//! on top of it with the graph as fallback.

pub mod cache;
pub mod remote;

pub use cache::ExpansionCache;
pub use remote::{HybridProvider, RemoteExpander, RemoteExpansionProvider};

use std::future::{self, Future};

use crate::ai::InferenceTransport;
use crate::names::{NameEquivalenceGraph, VariantSet};

/// Expands a name into nicknames and equivalents
///
/// Implementations are total: a failure inside the provider degrades to a
/// smaller result, never an error. The returned set always contains the
/// trimmed input unless the input is blank.
pub trait ExpansionProvider: Send + Sync {
    fn expand(&self, name: &str) -> impl Future<Output = VariantSet> + Send;
}

impl ExpansionProvider for NameEquivalenceGraph {
    fn expand(&self, name: &str) -> impl Future<Output = VariantSet> + Send {
        future::ready(NameEquivalenceGraph::expand(self, name))
    }
}

impl<T: InferenceTransport> ExpansionProvider for RemoteExpansionProvider<T> {
    fn expand(&self, name: &str) -> impl Future<Output = VariantSet> + Send {
        RemoteExpansionProvider::expand(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn through_trait<P: ExpansionProvider>(provider: &P, name: &str) -> VariantSet {
        provider.expand(name).await
    }

    #[tokio::test]
    async fn test_graph_as_provider() {
        let graph = NameEquivalenceGraph::builtin();
        let names = through_trait(&graph, "Liz").await;
        assert_eq!(names, graph.expand("Liz"));
        assert!(names.contains("elizabeth"));
    }
}
