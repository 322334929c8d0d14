//! Tantivy-backed implementation of the engine collaborator traits.
//!
//! One [`TantivyEngine`] wraps one `tantivy::Index` living in one storage
//! directory. The schema is fixed to the store's reserved fields: `_id` is
//! an exact-match keyword (so delete-by-term is precise), the others are
//! analyzed text. Tantivy allows a single live writer per index; the
//! engine keeps it behind a mutex and hands out one transaction at a time.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};
use tantivy::collector::{DocSetCollector, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, QueryParser, QueryParserError};
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{
    Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, TantivyError, Term,
};

use crate::document::{FIELD_CONTENT, FIELD_ID, FIELD_INDEX, FIELD_NAME};
use crate::engine::{EngineFactory, EngineReader, EngineWriter, SearchHit, StoredFields, TextEngine};
use crate::error::{Result, SalviaError};

/// Default heap budget for the tantivy index writer.
const DEFAULT_WRITER_HEAP_BYTES: usize = 50_000_000;

impl From<TantivyError> for SalviaError {
    fn from(err: TantivyError) -> Self {
        SalviaError::Engine(err.to_string())
    }
}

impl From<QueryParserError> for SalviaError {
    fn from(err: QueryParserError) -> Self {
        SalviaError::QuerySyntax(err.to_string())
    }
}

/// Build the fixed document schema.
fn document_schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field(FIELD_INDEX, TEXT | STORED);
    builder.add_text_field(FIELD_ID, STRING | STORED);
    builder.add_text_field(FIELD_NAME, TEXT | STORED);
    builder.add_text_field(FIELD_CONTENT, TEXT | STORED);
    builder.build()
}

/// Factory opening [`TantivyEngine`] instances.
#[derive(Debug, Clone)]
pub struct TantivyEngineFactory {
    /// Heap budget handed to each index writer.
    pub writer_heap_bytes: usize,
}

impl TantivyEngineFactory {
    /// Create a factory with the default writer heap budget.
    pub fn new() -> Self {
        TantivyEngineFactory {
            writer_heap_bytes: DEFAULT_WRITER_HEAP_BYTES,
        }
    }
}

impl Default for TantivyEngineFactory {
    fn default() -> Self {
        TantivyEngineFactory::new()
    }
}

impl EngineFactory for TantivyEngineFactory {
    fn open_or_create(&self, path: &Path) -> Result<Box<dyn TextEngine>> {
        let engine = TantivyEngine::open_or_create(path, self.writer_heap_bytes)?;
        Ok(Box::new(engine))
    }
}

/// A tantivy index bound to one storage directory.
pub struct TantivyEngine {
    index: Index,
    schema: Schema,
    path: PathBuf,
    // Tantivy permits one live writer per index; transactions take turns on it.
    writer: Option<Mutex<IndexWriter>>,
}

impl TantivyEngine {
    /// Open the engine at `path`, creating the index if none exists.
    pub fn open_or_create(path: &Path, writer_heap_bytes: usize) -> Result<Self> {
        let directory = MmapDirectory::open(path)
            .map_err(|e| SalviaError::storage(format!("failed to open {}: {e}", path.display())))?;
        let index = Index::open_or_create(directory, document_schema())?;
        let writer: IndexWriter = index.writer(writer_heap_bytes)?;

        Ok(TantivyEngine {
            schema: index.schema(),
            index,
            path: path.to_path_buf(),
            writer: Some(Mutex::new(writer)),
        })
    }

    fn resolve_field(&self, name: &str) -> Result<Field> {
        Ok(self.schema.get_field(name)?)
    }
}

impl fmt::Debug for TantivyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TantivyEngine")
            .field("path", &self.path)
            .field("closed", &self.writer.is_none())
            .finish()
    }
}

impl TextEngine for TantivyEngine {
    fn writer(&self) -> Result<Box<dyn EngineWriter + '_>> {
        let writer = self
            .writer
            .as_ref()
            .ok_or_else(|| SalviaError::engine("engine is closed"))?;
        Ok(Box::new(TantivyWriter {
            engine: self,
            guard: writer.lock(),
            finished: false,
        }))
    }

    fn reader(&self) -> Result<Box<dyn EngineReader>> {
        if self.writer.is_none() {
            return Err(SalviaError::engine("engine is closed"));
        }
        let reader: IndexReader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(Box::new(TantivySnapshot {
            index: self.index.clone(),
            schema: self.schema.clone(),
            searcher: reader.searcher(),
        }))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.into_inner().wait_merging_threads()?;
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

/// A single write transaction holding the engine's writer lock.
pub struct TantivyWriter<'a> {
    engine: &'a TantivyEngine,
    guard: MutexGuard<'a, IndexWriter>,
    finished: bool,
}

impl fmt::Debug for TantivyWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TantivyWriter")
            .field("path", &self.engine.path)
            .field("finished", &self.finished)
            .finish()
    }
}

impl EngineWriter for TantivyWriter<'_> {
    fn add_document(&mut self, fields: &[(&str, &str)]) -> Result<()> {
        let mut doc = TantivyDocument::default();
        for (name, value) in fields.iter().copied() {
            doc.add_text(self.engine.resolve_field(name)?, value);
        }
        self.guard.add_document(doc)?;
        Ok(())
    }

    fn delete_documents(&mut self, field: &str, value: &str) -> Result<()> {
        let field = self.engine.resolve_field(field)?;
        self.guard.delete_term(Term::from_field_text(field, value));
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.finished = true;
        if let Err(err) = self.guard.commit() {
            // Leave nothing half-committed behind a failed commit.
            let _ = self.guard.rollback();
            return Err(err.into());
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.finished = true;
        self.guard.rollback()?;
        Ok(())
    }
}

impl Drop for TantivyWriter<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.guard.rollback();
        }
    }
}

/// A point-in-time snapshot of a tantivy index.
pub struct TantivySnapshot {
    index: Index,
    schema: Schema,
    searcher: Searcher,
}

impl TantivySnapshot {
    fn stored_fields(&self, doc: &TantivyDocument) -> StoredFields {
        let mut fields = HashMap::new();
        for (field, entry) in self.schema.fields() {
            if let Some(value) = doc.get_first(field).and_then(|v| v.as_str()) {
                fields.insert(entry.name().to_string(), value.to_string());
            }
        }
        fields
    }
}

impl fmt::Debug for TantivySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TantivySnapshot")
            .field("num_docs", &self.searcher.num_docs())
            .finish()
    }
}

impl EngineReader for TantivySnapshot {
    fn search(&self, keywords: &str, fields: &[&str], limit: usize) -> Result<Vec<SearchHit>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let fields = fields
            .iter()
            .map(|name| Ok(self.schema.get_field(name)?))
            .collect::<Result<Vec<Field>>>()?;
        let parser = QueryParser::for_index(&self.index, fields);
        let query = parser.parse_query(keywords)?;

        let top_docs = self.searcher.search(&query, &TopDocs::with_limit(limit))?;
        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = self.searcher.doc(address)?;
            hits.push(SearchHit {
                score,
                fields: self.stored_fields(&doc),
            });
        }
        Ok(hits)
    }

    fn all_documents(&self) -> Result<Vec<StoredFields>> {
        let addresses = self.searcher.search(&AllQuery, &DocSetCollector)?;
        let mut documents = Vec::with_capacity(addresses.len());
        for address in addresses {
            let doc: TantivyDocument = self.searcher.doc(address)?;
            documents.push(self.stored_fields(&doc));
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_engine(dir: &tempfile::TempDir) -> TantivyEngine {
        TantivyEngine::open_or_create(dir.path(), DEFAULT_WRITER_HEAP_BYTES).unwrap()
    }

    fn doc_fields<'a>(id: &'a str, name: &'a str, content: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            (FIELD_INDEX, "idx"),
            (FIELD_ID, id),
            (FIELD_NAME, name),
            (FIELD_CONTENT, content),
        ]
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let engine = open_engine(&dir);

        let mut writer = engine.writer().unwrap();
        writer.add_document(&doc_fields("id-1", "first", "hello world")).unwrap();
        writer.add_document(&doc_fields("id-2", "second", "goodbye world")).unwrap();
        writer.commit().unwrap();
        drop(writer);

        let reader = engine.reader().unwrap();
        assert_eq!(reader.all_documents().unwrap().len(), 2);

        let hits = reader.search("hello", &[FIELD_CONTENT], 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields[FIELD_NAME], "first");
    }

    #[test]
    fn test_uncommitted_writes_roll_back_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let engine = open_engine(&dir);

        {
            let mut writer = engine.writer().unwrap();
            writer.add_document(&doc_fields("id-1", "orphan", "never committed")).unwrap();
            // Dropped without commit.
        }

        let reader = engine.reader().unwrap();
        assert!(reader.all_documents().unwrap().is_empty());
    }

    #[test]
    fn test_delete_documents_by_exact_term() {
        let dir = tempfile::tempdir().unwrap();
        let engine = open_engine(&dir);

        let mut writer = engine.writer().unwrap();
        writer.add_document(&doc_fields("id-1", "keep", "alpha")).unwrap();
        writer.add_document(&doc_fields("id-2", "drop", "beta")).unwrap();
        writer.commit().unwrap();
        drop(writer);

        let mut writer = engine.writer().unwrap();
        writer.delete_documents(FIELD_ID, "id-2").unwrap();
        writer.commit().unwrap();
        drop(writer);

        let reader = engine.reader().unwrap();
        let docs = reader.all_documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0][FIELD_ID], "id-1");
    }

    #[test]
    fn test_malformed_query_is_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = open_engine(&dir);

        let reader = engine.reader().unwrap();
        let result = reader.search("(alpha", &[FIELD_CONTENT], 10);
        match result {
            Err(SalviaError::QuerySyntax(_)) => {}
            other => panic!("Expected query syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_limit_returns_no_hits() {
        let dir = tempfile::tempdir().unwrap();
        let engine = open_engine(&dir);

        let mut writer = engine.writer().unwrap();
        writer.add_document(&doc_fields("id-1", "first", "hello")).unwrap();
        writer.commit().unwrap();
        drop(writer);

        let reader = engine.reader().unwrap();
        assert!(reader.search("hello", &[FIELD_CONTENT], 0).unwrap().is_empty());
    }

    #[test]
    fn test_closed_engine_rejects_operations() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = open_engine(&dir);

        engine.close().unwrap();
        assert!(engine.is_closed());
        assert!(engine.writer().is_err());
        assert!(engine.reader().is_err());
    }
}
