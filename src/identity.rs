//! Stable document identity derived from document names.
//!
//! The store never trusts a document's mutable content for identity.
//! Instead each document gets a surrogate id computed from its name by a
//! [`NameHasher`]: deterministic, fixed-length and free of side effects, so
//! upsert and delete are well-defined across calls. The hash function sits
//! behind a trait so it can be strengthened later without touching the
//! operations built on top of it.

use std::fmt::Debug;

use uuid::Uuid;

/// Trait for deriving a stable document id from a document name.
///
/// Implementations must be pure: the same name always hashes to the same
/// id, with no internal state. Collision risk must be negligible for
/// non-adversarial workloads.
pub trait NameHasher: Send + Sync + Debug {
    /// Derive the id for the given document name.
    fn hash(&self, name: &str) -> String;
}

/// Default hasher producing a UUIDv5 (namespaced SHA-1) of the name.
///
/// The id is rendered as 32 lowercase hex characters and is stable across
/// processes and library versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNameHasher;

impl UuidNameHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        UuidNameHasher
    }
}

impl NameHasher for UuidNameHasher {
    fn hash(&self, name: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
            .simple()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let hasher = UuidNameHasher::new();
        let first = hasher.hash("文档1的名称");
        let second = hasher.hash("文档1的名称");
        assert_eq!(first, second);
    }

    #[test]
    fn test_hash_is_fixed_length_hex() {
        let hasher = UuidNameHasher::new();
        for name in ["a", "a much longer document name", ""] {
            let id = hasher.hash(name);
            assert_eq!(id.len(), 32);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_distinct_names_hash_differently() {
        let hasher = UuidNameHasher::new();
        assert_ne!(hasher.hash("doc-1"), hasher.hash("doc-2"));
    }
}
