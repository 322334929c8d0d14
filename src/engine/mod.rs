//! The text search engine collaborator interface.
//!
//! The store does not analyze text, build inverted indexes, score hits or
//! parse query strings itself. All of that belongs to an external engine
//! reached through the traits in this module:
//!
//! - [`EngineFactory`] - opens or creates an engine over a storage path
//! - [`TextEngine`] - one open engine instance bound to one storage location
//! - [`EngineWriter`] - a write transaction (add, delete-by-term, commit)
//! - [`EngineReader`] - a read snapshot (ranked search, full iteration)
//!
//! The default implementation in [`tantivy`](crate::engine::tantivy) wraps
//! the Tantivy search library.
//!
//! Writer transactions on a single engine are serialized: opening a writer
//! blocks while another transaction is in flight. Readers are snapshots
//! taken at open time and are isolated from concurrent writes.

pub mod tantivy;

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

use crate::error::Result;

/// A stored document pulled out of the engine, as a flat field/value map.
pub type StoredFields = HashMap<String, String>;

/// One ranked search hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Relevance score assigned by the engine.
    pub score: f32,

    /// Stored fields of the matching document.
    pub fields: StoredFields,
}

/// Factory for opening engine instances over backing storage.
pub trait EngineFactory: Send + Sync + Debug {
    /// Open the engine at `path`, creating fresh storage if none exists.
    fn open_or_create(&self, path: &Path) -> Result<Box<dyn TextEngine>>;
}

/// Trait for an open text search engine bound to one storage location.
pub trait TextEngine: Send + Sync + Debug {
    /// Begin a write transaction.
    ///
    /// Blocks while another transaction on this engine is in flight.
    fn writer(&self) -> Result<Box<dyn EngineWriter + '_>>;

    /// Open a fresh read snapshot of the current committed state.
    fn reader(&self) -> Result<Box<dyn EngineReader>>;

    /// Close the engine and release its resources.
    ///
    /// Fails if a write transaction is still in flight; the engine stays
    /// usable in that case.
    fn close(&mut self) -> Result<()>;

    /// Check if the engine has been closed.
    fn is_closed(&self) -> bool;
}

/// Trait for a single write transaction against an engine.
///
/// A transaction that is dropped without [`commit`](EngineWriter::commit)
/// is rolled back. A failed commit rolls the writer back before the error
/// surfaces, so no transaction leaves the engine half-committed.
pub trait EngineWriter: Debug {
    /// Stage a document given as field/value pairs.
    fn add_document(&mut self, fields: &[(&str, &str)]) -> Result<()>;

    /// Stage deletion of every document whose `field` exactly equals `value`.
    fn delete_documents(&mut self, field: &str, value: &str) -> Result<()>;

    /// Commit all staged changes and finish the transaction.
    fn commit(&mut self) -> Result<()>;

    /// Discard all staged changes and finish the transaction.
    fn rollback(&mut self) -> Result<()>;
}

/// Trait for a read snapshot of an engine.
pub trait EngineReader: Debug {
    /// Parse `keywords` over the given fields and return up to `limit` hits
    /// in descending relevance order.
    fn search(&self, keywords: &str, fields: &[&str], limit: usize) -> Result<Vec<SearchHit>>;

    /// Enumerate every live document in engine-internal order.
    fn all_documents(&self) -> Result<Vec<StoredFields>>;
}
