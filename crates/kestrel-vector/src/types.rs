//! Common types for kestrel-vector.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Free-form metadata attached to a stored record.
///
/// Arbitrary JSON key-value pairs; an empty map when the caller supplied none.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One nearest-neighbor hit returned by [`VectorStore::search`](crate::VectorStore::search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Position of the record in insertion order.
    pub position: usize,
    /// The stored chunk text.
    pub text: String,
    /// Squared Euclidean distance to the query (smaller = more similar).
    pub distance: f32,
    /// Metadata stored alongside the text.
    pub metadata: Metadata,
}

/// Text and metadata half of a stored record.
///
/// Lives in the metadata artifact; its vector lives at the same position in
/// the index artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredText {
    /// The chunk text.
    pub text: String,
    /// Per-record metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: Metadata,
}

impl StoredText {
    /// Create a record with no metadata.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Create a record with metadata.
    pub fn with_metadata<S: Into<String>>(text: S, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

impl From<String> for StoredText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for StoredText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Statistics about a store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    /// Number of stored records.
    pub record_count: usize,
    /// Dimensionality of stored vectors.
    pub dimensions: usize,
    /// Approximate in-memory size of vectors and texts in bytes.
    pub memory_bytes: usize,
    /// Path of the vector index artifact.
    pub index_path: PathBuf,
    /// Path of the metadata artifact.
    pub metadata_path: PathBuf,
}
