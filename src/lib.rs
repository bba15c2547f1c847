//! nameseek - nickname- and sound-aware person name search
//!
//! Names are expanded through a nickname equivalence graph (optionally backed
//! by a remote model) and encoded with Double Metaphone. The same expansion
//! runs over records at index time and over queries at search time, then an
//! OR-query against a tantivy index matches the two.

pub mod ai;
pub mod cli;
pub mod core;
pub mod expand;
pub mod index;
pub mod names;
pub mod output;
pub mod phonetic;
pub mod pipeline;
pub mod sample;
pub mod search;
pub mod service;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
pub use expand::{ExpansionProvider, HybridProvider};
pub use names::{NameEquivalenceGraph, VariantSet};
pub use phonetic::{PhoneticCode, PhoneticEncoder};
pub use pipeline::{EnrichedDocument, EnrichmentPipeline, NameRecord};
pub use service::NameSearchService;
