//! Enrichment pipeline
//!
//! Turns records into index documents and free-text queries into OR-term
//! strings. Both paths use the same expansion provider and phonetic encoder,
//! so a query token and an indexed name meet on a shared variant or code.

pub mod document;

pub use document::{EnrichedDocument, NameRecord};

use std::sync::Arc;
use tracing::debug;

use crate::expand::ExpansionProvider;
use crate::names::VariantSet;
use crate::phonetic::{PhoneticCode, PhoneticEncoder};

pub struct EnrichmentPipeline<P> {
    provider: Arc<P>,
    encoder: PhoneticEncoder,
}

impl<P: ExpansionProvider> EnrichmentPipeline<P> {
    pub fn new(provider: Arc<P>, encoder: PhoneticEncoder) -> Self {
        Self { provider, encoder }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn encoder(&self) -> &PhoneticEncoder {
        &self.encoder
    }

    pub async fn expand_name(&self, name: &str) -> VariantSet {
        self.provider.expand(name).await
    }

    pub fn encode_phonetic(&self, term: &str) -> PhoneticCode {
        self.encoder.encode(term)
    }

    /// Build the searchable document for one record
    pub async fn build_document(&self, record: &NameRecord) -> EnrichedDocument {
        let first_variants = self.provider.expand(&record.first_name).await;
        let last_variants = self.provider.expand(&record.last_name).await;

        let phonetic_first = self.phonetic_union(&first_variants);
        let phonetic_last = self.phonetic_union(&last_variants);

        let mut tokens = VariantSet::new();
        tokens.extend(first_variants.iter());
        tokens.extend(last_variants.iter());
        tokens.extend(phonetic_first.iter());
        tokens.extend(phonetic_last.iter());

        for literal in [&record.middle_name, &record.city, &record.state]
            .into_iter()
            .flatten()
        {
            tokens.insert(literal);
        }

        debug!(id = %record.id, tokens = tokens.len(), "Built index document");

        EnrichedDocument {
            record: record.clone(),
            first_variants,
            last_variants,
            phonetic_first,
            phonetic_last,
            tokens,
        }
    }

    /// Expand a free-text query into one space-separated OR-term string
    ///
    /// Returns an empty string when the query has no alphanumeric tokens.
    pub async fn build_search_terms(&self, query: &str) -> String {
        let words = tokenize(query);
        if words.is_empty() {
            return String::new();
        }

        let mut terms = VariantSet::new();
        for word in words {
            terms.insert(word);
            let variants = self.provider.expand(word).await;
            terms.extend(variants.iter());
            terms.extend(self.encoder.encode(word).iter());
        }

        terms.into_vec().join(" ")
    }

    /// Deduplicated primary and alternate codes across every variant
    fn phonetic_union(&self, variants: &VariantSet) -> VariantSet {
        let mut codes = VariantSet::new();
        for variant in variants.iter() {
            codes.extend(self.encoder.encode(variant).iter());
        }
        codes
    }
}

/// Split text into runs of alphanumeric characters
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameEquivalenceGraph;

    fn pipeline() -> EnrichmentPipeline<NameEquivalenceGraph> {
        EnrichmentPipeline::new(
            Arc::new(NameEquivalenceGraph::builtin()),
            PhoneticEncoder::new(),
        )
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Bob  O'Neil, jr."), vec!["Bob", "O", "Neil", "jr"]);
        assert_eq!(tokenize("Anne-Marie 2nd"), vec!["Anne", "Marie", "2nd"]);
        assert!(tokenize("  -- ,, ").is_empty());
    }

    #[tokio::test]
    async fn test_document_for_bob_smith() {
        let record = NameRecord::new("p1", "Bob", "Smith").with_location("Austin", "TX");
        let doc = pipeline().build_document(&record).await;

        assert!(doc.first_variants.contains("robert"));
        assert!(doc.first_variants.contains("bobby"));
        assert_eq!(doc.last_variants.as_slice(), &["Smith"]);

        for token in ["bob", "rob", "robert", "bobby", "smith", "SM0", "XMT", "RPRT", "austin", "tx"] {
            assert!(doc.has_token(token), "missing token {}", token);
        }
        assert!(doc.phonetic_last.contains("SM0"));
        assert!(doc.phonetic_last.contains("XMT"));
        assert_eq!(doc.record, record);
    }

    #[tokio::test]
    async fn test_tokens_have_no_case_duplicates() {
        let record = NameRecord::new("p2", "Liz", "LIZ").with_middle_name("liz");
        let doc = pipeline().build_document(&record).await;

        let mut lowered: Vec<String> = doc.tokens.iter().map(str::to_lowercase).collect();
        let total = lowered.len();
        lowered.sort();
        lowered.dedup();
        assert_eq!(lowered.len(), total);
    }

    #[tokio::test]
    async fn test_search_terms_expand_each_token() {
        let terms = pipeline().build_search_terms("liz morrison").await;
        let terms: Vec<&str> = terms.split(' ').collect();

        assert_eq!(terms[0], "liz");
        assert!(terms.contains(&"elizabeth"));
        assert!(terms.contains(&"morrison"));
        assert!(terms.contains(&"MRSN"));
    }

    #[tokio::test]
    async fn test_unknown_word_keeps_literal() {
        let terms = pipeline().build_search_terms("Zebediah").await;
        assert!(terms.starts_with("Zebediah "));
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        assert_eq!(pipeline().build_search_terms("").await, "");
        assert_eq!(pipeline().build_search_terms(" ?! ").await, "");
    }
}
