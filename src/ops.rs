//! Document write operations: add, upsert and delete.
//!
//! Every operation resolves the target index through the registry, derives
//! the stable document id from the document name and runs one writer
//! transaction against the engine. Upsert is delete-then-add across two
//! transactions; the window between them is a documented, accepted failure
//! mode for this non-durable store.

use std::sync::Arc;

use crate::document::{FIELD_CONTENT, FIELD_ID, FIELD_INDEX, FIELD_NAME};
use crate::error::Result;
use crate::identity::NameHasher;
use crate::registry::IndexRegistry;

/// Write-side orchestration over registry, identity and engine.
#[derive(Debug)]
pub struct DocumentOps {
    hasher: Arc<dyn NameHasher>,
}

impl DocumentOps {
    /// Create document operations using the given identity hasher.
    pub fn new(hasher: Arc<dyn NameHasher>) -> Self {
        DocumentOps { hasher }
    }

    /// The identity hasher in use.
    pub fn hasher(&self) -> &dyn NameHasher {
        self.hasher.as_ref()
    }

    /// Add a document record to an index.
    ///
    /// No existing-id check is made: adding the same name repeatedly
    /// produces duplicate records. Use [`save`](DocumentOps::save) for
    /// insert-or-replace semantics.
    pub fn add(
        &self,
        registry: &IndexRegistry,
        index_name: &str,
        doc_name: &str,
        content: &str,
    ) -> Result<()> {
        let id = self.hasher.hash(doc_name);
        registry.with_index(index_name, |handle| {
            let mut writer = handle.engine().writer()?;
            writer.add_document(&[
                (FIELD_INDEX, index_name),
                (FIELD_ID, &id),
                (FIELD_NAME, doc_name),
                (FIELD_CONTENT, content),
            ])?;
            writer.commit()
        })
    }

    /// Insert or replace a document, keyed by its name.
    ///
    /// Runs delete then add as two separate transactions; a failure in
    /// between loses the document. Net effect on success: the index holds
    /// exactly one record for the name, with the latest content.
    pub fn save(
        &self,
        registry: &IndexRegistry,
        index_name: &str,
        doc_name: &str,
        content: &str,
    ) -> Result<()> {
        self.delete(registry, index_name, doc_name)?;
        self.add(registry, index_name, doc_name, content)
    }

    /// Delete every record whose id matches the document name.
    ///
    /// Deleting a name with no matching records is a no-op, not an error.
    pub fn delete(&self, registry: &IndexRegistry, index_name: &str, doc_name: &str) -> Result<()> {
        let id = self.hasher.hash(doc_name);
        registry.with_index(index_name, |handle| {
            let mut writer = handle.engine().writer()?;
            writer.delete_documents(FIELD_ID, &id)?;
            writer.commit()
        })
    }
}
