//! Configuration for kestrel-vector.

use std::path::{Path, PathBuf};

/// Default file name of the vector index artifact.
pub const DEFAULT_INDEX_FILE: &str = "index.bin";

/// Default file name of the metadata artifact.
pub const DEFAULT_METADATA_FILE: &str = "metadata.json";

/// Configuration for a [`VectorStore`](crate::VectorStore).
///
/// The two artifact paths always travel together: the store pairs vectors with
/// texts purely by position, so one artifact is meaningless without the other.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Dimensionality every stored vector must have.
    pub dimensions: usize,

    /// Path of the binary vector index artifact.
    pub index_path: PathBuf,

    /// Path of the JSON metadata artifact holding texts and per-record metadata.
    pub metadata_path: PathBuf,
}

impl StoreConfig {
    /// Create a configuration with explicit artifact paths.
    pub fn new<P, Q>(dimensions: usize, index_path: P, metadata_path: Q) -> Self
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        Self {
            dimensions,
            index_path: index_path.into(),
            metadata_path: metadata_path.into(),
        }
    }

    /// Create a configuration that keeps both artifacts under `dir` with the
    /// default file names.
    pub fn in_dir<P: AsRef<Path>>(dimensions: usize, dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dimensions,
            dir.join(DEFAULT_INDEX_FILE),
            dir.join(DEFAULT_METADATA_FILE),
        )
    }

    /// Override the index artifact path.
    pub fn with_index_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.index_path = path.into();
        self
    }

    /// Override the metadata artifact path.
    pub fn with_metadata_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.metadata_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_uses_default_names() {
        let config = StoreConfig::in_dir(384, "/tmp/vectors");
        assert_eq!(config.dimensions, 384);
        assert_eq!(config.index_path, PathBuf::from("/tmp/vectors/index.bin"));
        assert_eq!(config.metadata_path, PathBuf::from("/tmp/vectors/metadata.json"));
    }

    #[test]
    fn test_path_overrides() {
        let config = StoreConfig::in_dir(8, "/data")
            .with_index_path("/elsewhere/vec.idx")
            .with_metadata_path("/elsewhere/texts.json");
        assert_eq!(config.index_path, PathBuf::from("/elsewhere/vec.idx"));
        assert_eq!(config.metadata_path, PathBuf::from("/elsewhere/texts.json"));
    }
}
