use rayon::prelude::*;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::tokenizer::TokenStream;
use tantivy::{TantivyDocument, Term};

use crate::core::error::{Error, Result};
use crate::index::tantivy_index::TantivyIndex;
use crate::names::VariantSet;
use crate::pipeline::EnrichedDocument;
use crate::search::SearchHit;

/// OR-match `query_text` against the tokens field, best first
pub fn search(index: &TantivyIndex, query_text: &str, limit: usize) -> Result<Vec<SearchHit>> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let schema = &index.schema;
    let mut tokenizer = index.index.tokenizer_for_field(schema.tokens)?;

    // Same analyzer as indexing, so "SM0" and "sm0" meet
    let mut tokens = VariantSet::new();
    let mut stream = tokenizer.token_stream(query_text);
    while stream.advance() {
        tokens.insert(&stream.token().text);
    }

    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let subqueries: Vec<(Occur, Box<dyn Query>)> = tokens
        .iter()
        .map(|token| {
            let term = Term::from_field_text(schema.tokens, token);
            let query: Box<dyn Query> = Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs));
            (Occur::Should, query)
        })
        .collect();

    let searcher = index.reader.searcher();
    let top_docs = searcher.search(&BooleanQuery::new(subqueries), &TopDocs::with_limit(limit))?;

    // Stored JSON decode in parallel
    top_docs
        .par_iter()
        .map(|(score, doc_address)| {
            let doc: TantivyDocument = searcher.doc(*doc_address)?;
            let json = doc
                .get_first(schema.document)
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::SearchError {
                    message: "Stored document missing".to_string(),
                })?;
            let document: EnrichedDocument = serde_json::from_str(json)?;

            Ok(SearchHit {
                id: document.record.id.clone(),
                score: *score,
                record: document.record,
            })
        })
        .collect()
}
