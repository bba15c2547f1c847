use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING,
};

use crate::core::error::{Error, Result};

pub const TOKENS_FIELD: &str = "tokens";
pub const DOCUMENT_FIELD: &str = "document";

#[derive(Clone)]
pub struct IndexSchema {
    pub schema: Schema,
    pub primary_key: Field,
    pub primary_key_name: String,
    pub tokens: Field,
    pub document: Field,
}

impl IndexSchema {
    pub fn new(primary_key: &str) -> Result<Self> {
        check_primary_key(primary_key)?;
        let mut builder = Schema::builder();

        // Exact-match key, used to replace documents on re-index
        let primary_key_field = builder.add_text_field(primary_key, STRING | STORED);

        // Variants, codes and literals; the only matched field
        let tokens_opts = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer("default")
                .set_index_option(IndexRecordOption::WithFreqs),
        );
        let tokens = builder.add_text_field(TOKENS_FIELD, tokens_opts);

        // Full EnrichedDocument as JSON
        let document = builder.add_text_field(DOCUMENT_FIELD, STORED);

        Ok(Self {
            schema: builder.build(),
            primary_key: primary_key_field,
            primary_key_name: primary_key.to_string(),
            tokens,
            document,
        })
    }

    /// Resolve fields of an index opened from disk
    pub fn from_schema(schema: Schema, primary_key: &str) -> Result<Self> {
        check_primary_key(primary_key)?;
        let field = |name: &str| {
            schema.get_field(name).map_err(|_| Error::IndexError {
                message: format!("Index schema has no '{}' field", name),
            })
        };

        Ok(Self {
            primary_key: field(primary_key)?,
            primary_key_name: primary_key.to_string(),
            tokens: field(TOKENS_FIELD)?,
            document: field(DOCUMENT_FIELD)?,
            schema,
        })
    }
}

fn check_primary_key(primary_key: &str) -> Result<()> {
    if primary_key.trim().is_empty() || primary_key == TOKENS_FIELD || primary_key == DOCUMENT_FIELD {
        return Err(Error::IndexError {
            message: format!("Invalid primary key field name: '{}'", primary_key),
        });
    }
    Ok(())
}
