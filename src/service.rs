//! Record indexing and name search on top of the pipeline and a backend

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::core::config::{SearchConfig, DEFAULT_PRIMARY_KEY};
use crate::core::error::Result;
use crate::expand::ExpansionProvider;
use crate::index::SearchBackend;
use crate::pipeline::{EnrichmentPipeline, NameRecord};
use crate::sample;
use crate::search::SearchResponse;

pub struct NameSearchService<P, B> {
    pipeline: EnrichmentPipeline<P>,
    backend: Arc<B>,
    index_name: String,
    primary_key: String,
}

impl<P: ExpansionProvider, B: SearchBackend> NameSearchService<P, B> {
    pub fn new(pipeline: EnrichmentPipeline<P>, backend: Arc<B>, config: &SearchConfig) -> Self {
        Self {
            pipeline,
            backend,
            index_name: config.index_name.clone(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
        }
    }

    pub fn pipeline(&self) -> &EnrichmentPipeline<P> {
        &self.pipeline
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Enrich and index a batch; records without an id get a fresh one
    pub async fn index_records(&self, records: &[NameRecord]) -> Result<usize> {
        let start = Instant::now();

        let mut docs = Vec::with_capacity(records.len());
        for record in records {
            let mut record = record.clone();
            if record.id.trim().is_empty() {
                record.id = uuid::Uuid::new_v4().to_string();
            }
            docs.push(self.pipeline.build_document(&record).await);
        }

        self.backend.ensure_index(&self.index_name, &self.primary_key)?;
        let count = self.backend.add_documents(&self.index_name, &docs)?;

        info!(
            index = %self.index_name,
            records = count,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Indexed records"
        );
        Ok(count)
    }

    /// Generate `count` synthetic records and index them
    pub async fn index_sample(&self, count: usize) -> Result<usize> {
        let records = sample::generate(count, &mut rand::thread_rng())?;
        debug!(count = records.len(), "Generated sample records");
        self.index_records(&records).await
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<SearchResponse> {
        let start = Instant::now();

        let terms = self.pipeline.build_search_terms(query).await;
        if terms.is_empty() {
            debug!(query = %query, "Empty query, skipping backend");
            return Ok(SearchResponse::empty(query, elapsed_ms(start)));
        }

        self.backend.ensure_index(&self.index_name, &self.primary_key)?;
        let hits = self.backend.search(&self.index_name, &terms, limit)?;

        let mut response = SearchResponse {
            hits,
            query: query.to_string(),
            terms,
            elapsed_ms: elapsed_ms(start),
        };
        response.sort();

        info!(
            query = %query,
            results = response.hits.len(),
            elapsed_ms = response.elapsed_ms,
            "Search complete"
        );
        Ok(response)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
