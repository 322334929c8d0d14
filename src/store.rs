//! The document store service: the external operation surface.
//!
//! [`DocumentStore`] composes the index registry, the document write
//! operations and the query facade behind one synchronous API. All state
//! lives for the process lifetime only; backing storage is allocated in
//! temp directories and erased on close.
//!
//! # Examples
//!
//! ```no_run
//! use salvia::store::DocumentStore;
//!
//! # fn main() -> salvia::error::Result<()> {
//! let store = DocumentStore::new();
//! store.new_index("articles")?;
//! store.save_doc("articles", "intro", "hello full-text world")?;
//! let hits = store.search_doc("articles", "hello")?;
//! assert_eq!(hits.len(), 1);
//! store.close_all()?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::document::Document;
use crate::engine::EngineFactory;
use crate::engine::tantivy::TantivyEngineFactory;
use crate::error::Result;
use crate::identity::{NameHasher, UuidNameHasher};
use crate::ops::DocumentOps;
use crate::query::{DEFAULT_SEARCH_LIMIT, QueryFacade};
use crate::registry::IndexRegistry;

/// Configuration for a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Default cap on search hits.
    pub search_limit: usize,

    /// Base directory for index storage. `None` uses the system temp dir.
    pub base_dir: Option<PathBuf>,

    /// Factory producing engine instances for new indices.
    pub engine_factory: Arc<dyn EngineFactory>,

    /// Hasher deriving stable document ids from names.
    pub name_hasher: Arc<dyn NameHasher>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            search_limit: DEFAULT_SEARCH_LIMIT,
            base_dir: None,
            engine_factory: Arc::new(TantivyEngineFactory::new()),
            name_hasher: Arc::new(UuidNameHasher::new()),
        }
    }
}

/// A multi-index document store.
#[derive(Debug)]
pub struct DocumentStore {
    registry: IndexRegistry,
    ops: DocumentOps,
    queries: QueryFacade,
}

impl DocumentStore {
    /// Create a store with the default configuration: tantivy engine,
    /// UUIDv5 identity, search limit of 10, storage in the system temp dir.
    pub fn new() -> Self {
        DocumentStore::with_config(StoreConfig::default())
    }

    /// Create a store from an explicit configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        DocumentStore {
            registry: IndexRegistry::new(config.engine_factory, config.base_dir),
            ops: DocumentOps::new(config.name_hasher),
            queries: QueryFacade::new(config.search_limit),
        }
    }

    /// Create a new named index.
    pub fn new_index(&self, name: &str) -> Result<()> {
        self.registry.create(name)
    }

    /// Close an index and delete its backing storage.
    pub fn close(&self, name: &str) -> Result<()> {
        self.registry.close(name)
    }

    /// Close every index, best-effort, aggregating failures.
    pub fn close_all(&self) -> Result<()> {
        self.registry.close_all()
    }

    /// Add a document. Repeated adds with the same name duplicate it.
    pub fn add_doc(&self, index_name: &str, doc_name: &str, content: &str) -> Result<()> {
        self.ops.add(&self.registry, index_name, doc_name, content)
    }

    /// Insert or replace a document, keyed by name.
    pub fn save_doc(&self, index_name: &str, doc_name: &str, content: &str) -> Result<()> {
        self.ops.save(&self.registry, index_name, doc_name, content)
    }

    /// Delete a document by name. Idempotent.
    pub fn del_doc(&self, index_name: &str, doc_name: &str) -> Result<()> {
        self.ops.delete(&self.registry, index_name, doc_name)
    }

    /// Search an index, returning ranked hits up to the configured limit.
    pub fn search_doc(&self, index_name: &str, keywords: &str) -> Result<Vec<Document>> {
        self.queries.search(&self.registry, index_name, keywords)
    }

    /// Search an index with an explicit hit limit.
    pub fn search_doc_with_limit(
        &self,
        index_name: &str,
        keywords: &str,
        limit: usize,
    ) -> Result<Vec<Document>> {
        self.queries
            .search_with_limit(&self.registry, index_name, keywords, limit)
    }

    /// Return every live document of an index, unordered.
    pub fn all_docs(&self, index_name: &str) -> Result<Vec<Document>> {
        self.queries.all(&self.registry, index_name)
    }

    /// Check if an index is registered.
    pub fn has_index(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Names of all registered indices, sorted.
    pub fn index_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Storage location of a registered index, if any.
    pub fn index_path(&self, name: &str) -> Option<PathBuf> {
        self.registry.path_of(name)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        DocumentStore::new()
    }
}
