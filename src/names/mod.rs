//! Name equivalence: seed dictionaries, the nickname graph and name sets

pub mod dictionary;
pub mod graph;
pub mod variants;

pub use graph::NameEquivalenceGraph;
pub use variants::{normalize, VariantSet};
