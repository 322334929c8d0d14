//! Read-side queries: ranked keyword search and full dumps.
//!
//! Every call opens a fresh read snapshot, so results reflect the latest
//! committed state and are isolated from in-flight writes. Engine rows are
//! materialized into plain [`Document`] values before they leave the
//! facade; no engine-specific result type reaches callers.

use crate::document::{Document, FIELD_CONTENT, FIELD_NAME};
use crate::error::Result;
use crate::registry::IndexRegistry;

/// Default cap on the number of hits a search returns.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Read-side facade over engine snapshots.
#[derive(Debug, Clone)]
pub struct QueryFacade {
    default_limit: usize,
}

impl QueryFacade {
    /// Create a facade with the given default hit limit.
    pub fn new(default_limit: usize) -> Self {
        QueryFacade { default_limit }
    }

    /// The default hit limit.
    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Search an index with the default hit limit.
    pub fn search(
        &self,
        registry: &IndexRegistry,
        index_name: &str,
        keywords: &str,
    ) -> Result<Vec<Document>> {
        self.search_with_limit(registry, index_name, keywords, self.default_limit)
    }

    /// Search an index, returning at most `limit` hits in descending
    /// relevance order.
    ///
    /// `keywords` is parsed over the searchable fields (name and content)
    /// with the engine's own analysis. The index is never mutated.
    pub fn search_with_limit(
        &self,
        registry: &IndexRegistry,
        index_name: &str,
        keywords: &str,
        limit: usize,
    ) -> Result<Vec<Document>> {
        registry.with_index(index_name, |handle| {
            let reader = handle.engine().reader()?;
            let hits = reader.search(keywords, &[FIELD_NAME, FIELD_CONTENT], limit)?;
            Ok(hits
                .into_iter()
                .map(|hit| Document::from_stored(hit.fields))
                .collect())
        })
    }

    /// Return every live document of an index, in engine-internal order.
    pub fn all(&self, registry: &IndexRegistry, index_name: &str) -> Result<Vec<Document>> {
        registry.with_index(index_name, |handle| {
            let reader = handle.engine().reader()?;
            let rows = reader.all_documents()?;
            Ok(rows.into_iter().map(Document::from_stored).collect())
        })
    }
}

impl Default for QueryFacade {
    fn default() -> Self {
        QueryFacade::new(DEFAULT_SEARCH_LIMIT)
    }
}
