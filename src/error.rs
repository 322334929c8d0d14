//! Error types for the Salvia library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SalviaError`] enum. The enum mirrors the failure taxonomy of the store:
//! registry lookups, storage I/O, query parsing, and opaque engine failures.
//!
//! # Examples
//!
//! ```
//! use salvia::error::{SalviaError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SalviaError::index_not_found("articles"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Salvia operations.
#[derive(Error, Debug)]
pub enum SalviaError {
    /// No index is registered under the given name.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// An index is already registered under the given name.
    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    /// Failure while creating, removing or accessing backing storage.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors (file operations, directory handling, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The keyword query string could not be parsed.
    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    /// Opaque failure surfaced from the text search engine collaborator.
    #[error("Engine error: {0}")]
    Engine(String),

    /// Aggregate failure from a best-effort teardown of all indices.
    ///
    /// Each entry carries the index name and the error that prevented its
    /// close. Indices whose engine handle could not be released stay
    /// registered so the caller may retry.
    #[error("Failed to close {} of the registered indices", .0.len())]
    Teardown(Vec<(String, SalviaError)>),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SalviaError.
pub type Result<T> = std::result::Result<T, SalviaError>;

impl SalviaError {
    /// Create a new index-not-found error.
    pub fn index_not_found<S: Into<String>>(name: S) -> Self {
        SalviaError::IndexNotFound(name.into())
    }

    /// Create a new index-already-exists error.
    pub fn index_already_exists<S: Into<String>>(name: S) -> Self {
        SalviaError::IndexAlreadyExists(name.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SalviaError::Storage(msg.into())
    }

    /// Create a new query syntax error.
    pub fn query_syntax<S: Into<String>>(msg: S) -> Self {
        SalviaError::QuerySyntax(msg.into())
    }

    /// Create a new engine error.
    pub fn engine<S: Into<String>>(msg: S) -> Self {
        SalviaError::Engine(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SalviaError::index_not_found("articles");
        assert_eq!(error.to_string(), "Index not found: articles");

        let error = SalviaError::index_already_exists("articles");
        assert_eq!(error.to_string(), "Index already exists: articles");

        let error = SalviaError::storage("disk full");
        assert_eq!(error.to_string(), "Storage error: disk full");

        let error = SalviaError::query_syntax("unbalanced parenthesis");
        assert_eq!(error.to_string(), "Query syntax error: unbalanced parenthesis");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let salvia_error = SalviaError::from(io_error);

        match salvia_error {
            SalviaError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_teardown_error_display() {
        let error = SalviaError::Teardown(vec![
            ("a".to_string(), SalviaError::storage("gone")),
            ("b".to_string(), SalviaError::engine("busy")),
        ]);
        assert_eq!(error.to_string(), "Failed to close 2 of the registered indices");
    }
}
