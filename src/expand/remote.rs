//! Hybrid expansion: cache, then remote model, then nickname graph
//!
//! @module expand/remote

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::cache::ExpansionCache;
use crate::ai::extract::{extract_json, parse_names};
use crate::ai::{CloudflareClient, InferencePayload, InferenceTransport, RemoteFailure};
use crate::core::config::{RemoteConfig, RetryShape};
use crate::names::{NameEquivalenceGraph, VariantSet};

/// The provider wired to Workers AI
pub type HybridProvider = RemoteExpansionProvider<CloudflareClient>;

// =============================================================================
// REMOTE EXPANDER
// =============================================================================

/// One fallible remote expansion: request, single retry, parse
pub struct RemoteExpander<T> {
    transport: T,
    timeout: Duration,
    retry_shape: RetryShape,
}

impl<T: InferenceTransport> RemoteExpander<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            retry_shape: RetryShape::Prompt,
        }
    }

    pub fn with_retry_shape(mut self, retry_shape: RetryShape) -> Self {
        self.retry_shape = retry_shape;
        self
    }

    /// Ask the model for `name`'s nicknames
    ///
    /// A transient failure of the chat request is retried once with the
    /// prompt shape. A reply that carries no names is a `Parse` failure and
    /// is not retried.
    pub async fn try_expand(&self, name: &str) -> Result<VariantSet, RemoteFailure> {
        let text = match self.call(InferencePayload::chat(name)).await {
            Ok(text) => text,
            Err(e) if e.is_transient() && self.retry_shape == RetryShape::Prompt => {
                debug!(name, error = %e, "Retrying remote expansion with prompt shape");
                self.call(InferencePayload::prompt(name)).await?
            }
            Err(e) => return Err(e),
        };

        let value = extract_json(&text)
            .ok_or_else(|| RemoteFailure::Parse("no JSON in model reply".to_string()))?;

        parse_names(&value, name)
            .ok_or_else(|| RemoteFailure::Parse("model reply contained no names".to_string()))
    }

    async fn call(&self, payload: InferencePayload) -> Result<String, RemoteFailure> {
        match tokio::time::timeout(self.timeout, self.transport.run(&payload)).await {
            Ok(result) => result,
            Err(_) => Err(RemoteFailure::Timeout(self.timeout)),
        }
    }
}

// =============================================================================
// PROVIDER
// =============================================================================

/// Cached remote expansion with the nickname graph as the fallback
///
/// Every outcome is cached under the normalized input, including graph
/// fallbacks after a remote failure, so a name costs one remote attempt
/// (two calls at most, counting the retry) per process. Concurrent misses
/// on the same name may each go remote; the last write wins.
pub struct RemoteExpansionProvider<T> {
    graph: Arc<NameEquivalenceGraph>,
    remote: Option<RemoteExpander<T>>,
    cache: ExpansionCache,
}

impl<T: InferenceTransport> RemoteExpansionProvider<T> {
    pub fn new(graph: Arc<NameEquivalenceGraph>, remote: Option<RemoteExpander<T>>) -> Self {
        Self {
            graph,
            remote,
            cache: ExpansionCache::new(),
        }
    }

    /// Graph-only provider; equivalent to having no credentials
    pub fn local(graph: Arc<NameEquivalenceGraph>) -> Self {
        Self::new(graph, None)
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn graph(&self) -> &NameEquivalenceGraph {
        &self.graph
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub async fn expand(&self, name: &str) -> VariantSet {
        let name = name.trim();
        if name.is_empty() {
            return VariantSet::new();
        }

        if let Some(cached) = self.cache.get(name) {
            debug!(name, "Expansion cache hit");
            return cached;
        }

        let names = match &self.remote {
            None => self.graph.expand(name),
            Some(remote) => match remote.try_expand(name).await {
                Ok(names) => {
                    debug!(name, count = names.len(), "Remote expansion succeeded");
                    names
                }
                Err(e) => {
                    warn!(name, error = %e, "Remote expansion failed, using nickname graph");
                    self.graph.expand(name)
                }
            },
        };

        self.cache.insert(name, names.clone());
        names
    }
}

impl HybridProvider {
    /// Remote tier is enabled only when both credentials are present
    pub fn from_config(config: &RemoteConfig, graph: Arc<NameEquivalenceGraph>) -> Self {
        let remote = CloudflareClient::from_config(config).map(|client| {
            info!(url = %client.url(), "Remote nickname expansion enabled");
            RemoteExpander::new(client, Duration::from_secs(config.timeout_secs))
                .with_retry_shape(config.retry_shape)
        });

        if remote.is_none() {
            debug!("No Workers AI credentials, expanding from the nickname graph only");
        }

        Self::new(graph, remote)
    }
}

// =============================================================================
// TESTS
// =============================================================================
