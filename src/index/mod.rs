//! Full-text search backend

pub mod reader;
pub mod schema;
pub mod tantivy_index;
pub mod writer;

pub use schema::IndexSchema;
pub use tantivy_index::{TantivyBackend, TantivyIndex};

use crate::core::error::Result;
use crate::pipeline::EnrichedDocument;
use crate::search::SearchHit;

/// The narrow interface the search service needs from a backend
pub trait SearchBackend: Send + Sync {
    /// Create or open an index; calling it again is a no-op
    fn ensure_index(&self, name: &str, primary_key: &str) -> Result<()>;

    /// Add documents, replacing existing ones with the same primary key
    fn add_documents(&self, index: &str, docs: &[EnrichedDocument]) -> Result<usize>;

    /// OR-match against the tokens field, best first
    fn search(&self, index: &str, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}
