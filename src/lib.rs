//! # Salvia
//!
//! An embeddable multi-index document store for Rust.
//!
//! ## Features
//!
//! - Independently lifecycled named indices with safe create/teardown
//! - Stable document identity decoupled from mutable content
//! - Add, upsert and delete orchestrated over a search backend
//! - Ranked keyword search and full dumps as plain document values
//! - Pluggable engine and identity seams (tantivy backend included)
//!
//! ## Quick start
//!
//! ```no_run
//! use salvia::DocumentStore;
//!
//! # fn main() -> salvia::Result<()> {
//! let store = DocumentStore::new();
//! store.new_index("notes")?;
//! store.save_doc("notes", "day-1", "met the new team")?;
//! for doc in store.search_doc("notes", "team")? {
//!     println!("{}: {}", doc.name, doc.content);
//! }
//! store.close_all()?;
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod engine;
pub mod error;
pub mod identity;
pub mod ops;
pub mod query;
pub mod registry;
pub mod store;

// Re-exports for the public API
pub use document::{Document, FIELD_CONTENT, FIELD_ID, FIELD_INDEX, FIELD_NAME};
pub use error::{Result, SalviaError};
pub use identity::{NameHasher, UuidNameHasher};
pub use query::DEFAULT_SEARCH_LIMIT;
pub use registry::IndexRegistry;
pub use store::{DocumentStore, StoreConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
