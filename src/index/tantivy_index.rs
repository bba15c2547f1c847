//! Tantivy-backed search backend

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tantivy::{Index, IndexReader, ReloadPolicy};
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::index::reader;
use crate::index::schema::IndexSchema;
use crate::index::writer::IndexWriter;
use crate::index::SearchBackend;
use crate::pipeline::EnrichedDocument;
use crate::search::SearchHit;

/// One open tantivy index
pub struct TantivyIndex {
    pub index: Index,
    pub schema: IndexSchema,
    pub reader: IndexReader,
    write_lock: Mutex<()>,
}

impl TantivyIndex {
    /// Open the index in `dir`, creating it when absent
    pub fn open_or_create(dir: &Path, primary_key: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let (index, schema) = if dir.join("meta.json").exists() {
            let index = Index::open_in_dir(dir).map_err(|e| Error::IndexError {
                message: format!("Failed to open index: {}", e),
            })?;
            let schema = IndexSchema::from_schema(index.schema(), primary_key)?;
            (index, schema)
        } else {
            let schema = IndexSchema::new(primary_key)?;
            let index = Index::create_in_dir(dir, schema.schema.clone()).map_err(|e| {
                Error::IndexError {
                    message: format!("Failed to create index: {}", e),
                }
            })?;
            (index, schema)
        };

        Self::with_index(index, schema)
    }

    pub fn create_in_ram(primary_key: &str) -> Result<Self> {
        let schema = IndexSchema::new(primary_key)?;
        let index = Index::create_in_ram(schema.schema.clone());
        Self::with_index(index, schema)
    }

    fn with_index(index: Index, schema: IndexSchema) -> Result<Self> {
        // Reloaded by hand after each commit so writes are visible at once
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| Error::IndexError {
                message: format!("Failed to create reader: {}", e),
            })?;

        Ok(Self {
            index,
            schema,
            reader,
            write_lock: Mutex::new(()),
        })
    }

    /// Upsert a batch and make it searchable
    pub fn add_documents(&self, docs: &[EnrichedDocument]) -> Result<usize> {
        if docs.is_empty() {
            return Ok(0);
        }

        let _guard = self.write_lock.lock();
        let mut writer = IndexWriter::new(self)?;
        for doc in docs {
            writer.upsert(doc)?;
        }
        writer.commit()?;
        self.reader.reload()?;

        Ok(docs.len())
    }

    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        reader::search(self, query, limit)
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}

/// Named tantivy indexes, on disk under one root or all in RAM
pub struct TantivyBackend {
    root: Option<PathBuf>,
    indexes: RwLock<HashMap<String, Arc<TantivyIndex>>>,
}

impl TantivyBackend {
    /// Indexes live in `<root>/<xxh3(name)>`
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            indexes: RwLock::new(HashMap::new()),
        }
    }

    pub fn in_ram() -> Self {
        Self {
            root: None,
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Backend rooted at the nameseek home
    pub fn from_home() -> Result<Self> {
        Ok(Self::open(Config::indexes_dir()?))
    }

    pub fn index_dir(&self, name: &str) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(format!("{:016x}", xxh3_64(name.as_bytes()))))
    }

    /// Forget an index and remove its files
    pub fn delete_index(&self, name: &str) -> Result<()> {
        self.indexes.write().remove(name);

        if let Some(dir) = self.index_dir(name) {
            if dir.exists() {
                std::fs::remove_dir_all(&dir)?;
                info!(index = name, "Deleted index");
            }
        }
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Arc<TantivyIndex>> {
        self.indexes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::IndexNotFound {
                name: name.to_string(),
            })
    }
}

impl SearchBackend for TantivyBackend {
    fn ensure_index(&self, name: &str, primary_key: &str) -> Result<()> {
        let check = |open: &TantivyIndex| {
            if open.schema.primary_key_name == primary_key {
                Ok(())
            } else {
                Err(Error::IndexError {
                    message: format!(
                        "Index '{}' is keyed by '{}', not '{}'",
                        name, open.schema.primary_key_name, primary_key
                    ),
                })
            }
        };

        if let Some(open) = self.indexes.read().get(name) {
            return check(&**open);
        }

        let mut indexes = self.indexes.write();
        if let Some(open) = indexes.get(name) {
            return check(&**open);
        }

        let open = match self.index_dir(name) {
            Some(dir) => TantivyIndex::open_or_create(&dir, primary_key)?,
            None => TantivyIndex::create_in_ram(primary_key)?,
        };
        debug!(index = name, docs = open.num_docs(), "Opened index");
        indexes.insert(name.to_string(), Arc::new(open));

        Ok(())
    }

    fn add_documents(&self, index: &str, docs: &[EnrichedDocument]) -> Result<usize> {
        let count = self.get(index)?.add_documents(docs)?;
        info!(index, documents = count, "Indexed documents");
        Ok(count)
    }

    fn search(&self, index: &str, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.get(index)?.search(query, limit)
    }
}
