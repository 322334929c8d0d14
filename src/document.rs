//! The document value type and its engine field layout.
//!
//! A [`Document`] is the plain, engine-independent record the store accepts
//! and returns: the owning index name, a derived stable id, the document
//! name and its text content. Inside the engine the four values are stored
//! under the reserved field names [`FIELD_INDEX`], [`FIELD_ID`],
//! [`FIELD_NAME`] and [`FIELD_CONTENT`].
//!
//! # Examples
//!
//! ```
//! use salvia::document::Document;
//!
//! let doc = Document::new("articles", "8c0e...", "intro", "hello world");
//! assert_eq!(doc.name, "intro");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Engine field holding the name of the owning index.
pub const FIELD_INDEX: &str = "_index";

/// Engine field holding the stable document id derived from the name.
///
/// Indexed as an exact-match keyword so deletion by id term is precise.
pub const FIELD_ID: &str = "_id";

/// Engine field holding the document name. Searchable.
pub const FIELD_NAME: &str = "_name";

/// Engine field holding the document content. Searchable.
pub const FIELD_CONTENT: &str = "_content";

/// A single stored document, materialized as plain field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Name of the index this document lives in.
    pub index: String,

    /// Stable id derived from the document name.
    pub id: String,

    /// The document name. Unique per index only when documents are written
    /// through upsert; plain adds may duplicate it.
    pub name: String,

    /// The document text content.
    pub content: String,
}

impl Document {
    /// Create a new document value.
    pub fn new<S1, S2, S3, S4>(index: S1, id: S2, name: S3, content: S4) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
    {
        Document {
            index: index.into(),
            id: id.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    /// Materialize a document from the flat field map an engine snapshot
    /// returns. Fields absent from the map come back empty.
    pub fn from_stored(mut fields: HashMap<String, String>) -> Self {
        Document {
            index: fields.remove(FIELD_INDEX).unwrap_or_default(),
            id: fields.remove(FIELD_ID).unwrap_or_default(),
            name: fields.remove(FIELD_NAME).unwrap_or_default(),
            content: fields.remove(FIELD_CONTENT).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored_maps_reserved_fields() {
        let mut fields = HashMap::new();
        fields.insert(FIELD_INDEX.to_string(), "articles".to_string());
        fields.insert(FIELD_ID.to_string(), "abc123".to_string());
        fields.insert(FIELD_NAME.to_string(), "intro".to_string());
        fields.insert(FIELD_CONTENT.to_string(), "hello world".to_string());

        let doc = Document::from_stored(fields);
        assert_eq!(doc, Document::new("articles", "abc123", "intro", "hello world"));
    }

    #[test]
    fn test_from_stored_tolerates_missing_fields() {
        let doc = Document::from_stored(HashMap::new());
        assert!(doc.index.is_empty());
        assert!(doc.id.is_empty());
        assert!(doc.name.is_empty());
        assert!(doc.content.is_empty());
    }
}
