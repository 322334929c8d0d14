//! Registry of named indices and their lifecycles.
//!
//! The registry owns one [`IndexHandle`] per registered name: the backing
//! storage directory plus the open engine handle bound to it. It governs
//! creation and teardown; document and query operations borrow handles
//! through [`IndexRegistry::with_index`].
//!
//! Teardown policy: `close` first releases the engine handle, then erases
//! the storage directory. If the engine close fails the handle is
//! re-registered so the caller may retry. Once the engine is released the
//! entry stays unregistered even if directory removal fails; the failure
//! surfaces as a storage error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;
use rayon::prelude::*;
use tempfile::{Builder, TempDir};

use crate::engine::{EngineFactory, TextEngine};
use crate::error::{Result, SalviaError};

/// One registered index: its name, backing storage and engine handle.
pub struct IndexHandle {
    name: String,
    dir: TempDir,
    engine: Box<dyn TextEngine>,
}

impl IndexHandle {
    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the backing storage directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The engine handle bound to this index.
    pub fn engine(&self) -> &dyn TextEngine {
        self.engine.as_ref()
    }

    /// Release the engine, then erase the backing storage. Consumes the
    /// handle; on engine failure it is handed back for re-registration.
    fn teardown(mut self) -> std::result::Result<(), (SalviaError, Option<IndexHandle>)> {
        if let Err(err) = self.engine.close() {
            return Err((err, Some(self)));
        }
        let IndexHandle { name, dir, .. } = self;
        dir.close().map_err(|err| {
            let err = SalviaError::storage(format!(
                "failed to remove storage for index '{name}': {err}"
            ));
            (err, None)
        })
    }
}

impl std::fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexHandle")
            .field("name", &self.name)
            .field("path", &self.dir.path())
            .finish()
    }
}

/// Registry mapping index names to live handles.
///
/// The registry holds at most one handle per name. It is an explicit,
/// owned object injected into the store rather than a hidden singleton;
/// mutations are protected by a single read/write lock.
#[derive(Debug)]
pub struct IndexRegistry {
    factory: Arc<dyn EngineFactory>,
    base_dir: Option<PathBuf>,
    indices: RwLock<HashMap<String, IndexHandle>>,
}

impl IndexRegistry {
    /// Create an empty registry.
    ///
    /// Backing directories are allocated under `base_dir` when given,
    /// otherwise under the system temp directory.
    pub fn new(factory: Arc<dyn EngineFactory>, base_dir: Option<PathBuf>) -> Self {
        IndexRegistry {
            factory,
            base_dir,
            indices: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate storage, open an engine and register the index under `name`.
    ///
    /// Redefinition is not allowed: a name that is already registered is
    /// rejected with [`SalviaError::IndexAlreadyExists`].
    pub fn create(&self, name: &str) -> Result<()> {
        let mut indices = self.indices.write();
        if indices.contains_key(name) {
            return Err(SalviaError::index_already_exists(name));
        }

        let dir = match &self.base_dir {
            Some(base) => Builder::new().prefix(name).tempdir_in(base)?,
            None => Builder::new().prefix(name).tempdir()?,
        };
        let engine = self.factory.open_or_create(dir.path())?;
        debug!("created index '{}' at {}", name, dir.path().display());

        indices.insert(
            name.to_string(),
            IndexHandle {
                name: name.to_string(),
                dir,
                engine,
            },
        );
        Ok(())
    }

    /// Close the engine, erase the storage and unregister the index.
    ///
    /// Storage removal is irreversible.
    pub fn close(&self, name: &str) -> Result<()> {
        let handle = self
            .indices
            .write()
            .remove(name)
            .ok_or_else(|| SalviaError::index_not_found(name))?;

        debug!("closing index '{name}'");
        handle.teardown().map_err(|(err, handle)| {
            if let Some(handle) = handle {
                warn!("engine close failed for index '{name}', keeping it registered");
                self.indices.write().insert(name.to_string(), handle);
            }
            err
        })
    }

    /// Close every registered index, best-effort.
    ///
    /// Teardown runs across indices in parallel and continues past
    /// individual failures. Failures are aggregated into a single
    /// [`SalviaError::Teardown`]; afterwards the registry contains only the
    /// entries whose engine close failed.
    pub fn close_all(&self) -> Result<()> {
        let handles: Vec<(String, IndexHandle)> = self.indices.write().drain().collect();
        if handles.is_empty() {
            return Ok(());
        }
        debug!("closing all {} registered indices", handles.len());

        let failures: Vec<(String, SalviaError, Option<IndexHandle>)> = handles
            .into_par_iter()
            .filter_map(|(name, handle)| match handle.teardown() {
                Ok(()) => None,
                Err((err, handle)) => Some((name, err, handle)),
            })
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        let mut indices = self.indices.write();
        let mut errors = Vec::with_capacity(failures.len());
        for (name, err, handle) in failures {
            warn!("failed to close index '{name}': {err}");
            if let Some(handle) = handle {
                indices.insert(name.clone(), handle);
            }
            errors.push((name, err));
        }
        Err(SalviaError::Teardown(errors))
    }

    /// Run `f` against the handle registered under `name`.
    ///
    /// The handle stays registered (and cannot be torn down) for the
    /// duration of the call.
    pub fn with_index<T>(
        &self,
        name: &str,
        f: impl FnOnce(&IndexHandle) -> Result<T>,
    ) -> Result<T> {
        let indices = self.indices.read();
        let handle = indices
            .get(name)
            .ok_or_else(|| SalviaError::index_not_found(name))?;
        f(handle)
    }

    /// Check if an index is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.indices.read().contains_key(name)
    }

    /// Storage location of a registered index, if any.
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        self.indices.read().get(name).map(|h| h.path().to_path_buf())
    }

    /// Names of all registered indices, sorted for stable output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.indices.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered indices.
    pub fn len(&self) -> usize {
        self.indices.read().len()
    }

    /// Check if no index is registered.
    pub fn is_empty(&self) -> bool {
        self.indices.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tantivy::TantivyEngineFactory;

    fn registry() -> IndexRegistry {
        IndexRegistry::new(Arc::new(TantivyEngineFactory::new()), None)
    }

    #[test]
    fn test_create_registers_index() {
        let registry = registry();
        registry.create("articles").unwrap();

        assert!(registry.contains("articles"));
        assert_eq!(registry.len(), 1);
        assert!(registry.path_of("articles").unwrap().exists());
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let registry = registry();
        registry.create("articles").unwrap();

        match registry.create("articles") {
            Err(SalviaError::IndexAlreadyExists(name)) => assert_eq!(name, "articles"),
            other => panic!("Expected IndexAlreadyExists, got {other:?}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_close_erases_storage_and_unregisters() {
        let registry = registry();
        registry.create("articles").unwrap();
        let path = registry.path_of("articles").unwrap();

        registry.close("articles").unwrap();
        assert!(!registry.contains("articles"));
        assert!(!path.exists());
    }

    #[test]
    fn test_close_unknown_index_is_error() {
        let registry = registry();
        match registry.close("missing") {
            Err(SalviaError::IndexNotFound(name)) => assert_eq!(name, "missing"),
            other => panic!("Expected IndexNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_close_all_empties_registry() {
        let registry = registry();
        registry.create("a").unwrap();
        registry.create("b").unwrap();
        registry.create("c").unwrap();
        let paths: Vec<_> = registry.names().iter().map(|n| registry.path_of(n).unwrap()).collect();

        registry.close_all().unwrap();
        assert!(registry.is_empty());
        for path in paths {
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = registry();
        registry.create("zulu").unwrap();
        registry.create("alpha").unwrap();
        assert_eq!(registry.names(), vec!["alpha".to_string(), "zulu".to_string()]);
    }
}
