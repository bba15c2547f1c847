use tantivy::{IndexWriter as TantivyWriter, TantivyDocument, Term};

use crate::core::error::Result;
use crate::index::schema::IndexSchema;
use crate::index::tantivy_index::TantivyIndex;
use crate::pipeline::EnrichedDocument;

/// Writer heap size - 50MB bounds Tantivy's internal buffers
const WRITER_HEAP_SIZE: usize = 50_000_000;

pub struct IndexWriter {
    writer: TantivyWriter,
    schema: IndexSchema,
}

impl IndexWriter {
    pub fn new(index: &TantivyIndex) -> Result<Self> {
        let writer = index.index.writer_with_num_threads(1, WRITER_HEAP_SIZE)?;

        Ok(Self {
            writer,
            schema: index.schema.clone(),
        })
    }

    /// Add a document, replacing any with the same primary key
    ///
    /// The delete is ordered before the add, so it also removes an earlier
    /// copy added in the same batch.
    pub fn upsert(&mut self, doc: &EnrichedDocument) -> Result<()> {
        let id = doc.id();
        self.writer
            .delete_term(Term::from_field_text(self.schema.primary_key, id));

        let mut tantivy_doc = TantivyDocument::default();
        tantivy_doc.add_text(self.schema.primary_key, id);
        for token in doc.tokens.iter() {
            tantivy_doc.add_text(self.schema.tokens, token);
        }
        tantivy_doc.add_text(self.schema.document, serde_json::to_string(doc)?);

        self.writer.add_document(tantivy_doc)?;
        Ok(())
    }

    pub fn commit(mut self) -> Result<()> {
        self.writer.commit()?;
        Ok(())
    }
}
