//! Persistence layer for kestrel-vector.
//!
//! A store lives in two artifacts that are always written and read together:
//!
//! - the **index artifact** (`index.bin` by default): a postcard-encoded
//!   header plus every vector as one flat `f32` buffer;
//! - the **metadata artifact** (`metadata.json` by default): the ordered list
//!   of texts and their metadata.
//!
//! Record `i` of one artifact belongs to record `i` of the other. Both carry
//! the dimension and record count so a torn write (one artifact updated, the
//! other not) is detected on load as [`Error::CorruptState`].

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::index::FlatIndex;
use crate::types::StoredText;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Leading bytes of every index artifact.
const INDEX_MAGIC: [u8; 4] = *b"KVIX";

/// Version of both artifact layouts.
const FORMAT_VERSION: u32 = 1;

/// On-disk layout of the index artifact.
#[derive(Debug, Serialize, Deserialize)]
struct IndexArtifact {
    magic: [u8; 4],
    version: u32,
    dimensions: u64,
    count: u64,
    vectors: Vec<f32>,
}

/// On-disk layout of the metadata artifact.
#[derive(Debug, Serialize, Deserialize)]
struct MetadataArtifact {
    version: u32,
    dimensions: usize,
    records: Vec<StoredText>,
}

/// Borrowed view used when writing the metadata artifact.
#[derive(Serialize)]
struct MetadataArtifactRef<'a> {
    version: u32,
    dimensions: usize,
    records: &'a [StoredText],
}

/// Save the full store state to both artifacts.
///
/// Both artifacts are encoded before anything touches disk; each is then
/// written to a temporary sibling and renamed into place.
pub async fn save(config: &StoreConfig, index: &FlatIndex, texts: &[StoredText]) -> Result<()> {
    if index.len() != texts.len() {
        return Err(Error::CorruptState(format!(
            "Refusing to persist {} vectors with {} texts",
            index.len(),
            texts.len()
        )));
    }

    let index_bytes = postcard::to_allocvec(&IndexArtifact {
        magic: INDEX_MAGIC,
        version: FORMAT_VERSION,
        dimensions: index.dimensions() as u64,
        count: index.len() as u64,
        vectors: index.as_slice().to_vec(),
    })
    .map_err(|e| Error::CorruptState(format!("Failed to encode index artifact: {}", e)))?;

    let metadata_bytes = serde_json::to_vec(&MetadataArtifactRef {
        version: FORMAT_VERSION,
        dimensions: index.dimensions(),
        records: texts,
    })
    .map_err(|e| Error::CorruptState(format!("Failed to encode metadata artifact: {}", e)))?;

    write_atomic(&config.index_path, &index_bytes).await?;
    write_atomic(&config.metadata_path, &metadata_bytes).await?;

    debug!(
        records = texts.len(),
        index = ?config.index_path,
        metadata = ?config.metadata_path,
        "Persisted store"
    );
    Ok(())
}

/// Load the store state from both artifacts.
///
/// Returns `None` when there is nothing to load. If only one of the two
/// artifacts exists it cannot be paired with anything, so it is ignored (with
/// a warning) and the store starts empty.
pub async fn load(config: &StoreConfig) -> Result<Option<(FlatIndex, Vec<StoredText>)>> {
    let index_exists = tokio::fs::try_exists(&config.index_path).await?;
    let metadata_exists = tokio::fs::try_exists(&config.metadata_path).await?;

    match (index_exists, metadata_exists) {
        (false, false) => return Ok(None),
        (true, false) | (false, true) => {
            warn!(
                index = ?config.index_path,
                index_exists,
                metadata = ?config.metadata_path,
                metadata_exists,
                "Only one store artifact present, starting empty"
            );
            return Ok(None);
        }
        (true, true) => {}
    }

    let index_bytes = tokio::fs::read(&config.index_path).await?;
    let artifact: IndexArtifact = postcard::from_bytes(&index_bytes).map_err(|e| {
        Error::CorruptState(format!(
            "Failed to decode index artifact {}: {}",
            config.index_path.display(),
            e
        ))
    })?;

    if artifact.magic != INDEX_MAGIC {
        return Err(Error::CorruptState(format!(
            "{} is not a vector index artifact",
            config.index_path.display()
        )));
    }
    if artifact.version != FORMAT_VERSION {
        return Err(Error::CorruptState(format!(
            "Unsupported index artifact version {}",
            artifact.version
        )));
    }
    if artifact.dimensions != config.dimensions as u64 {
        return Err(Error::CorruptState(format!(
            "Index artifact holds {}-dimensional vectors, store expects {}",
            artifact.dimensions, config.dimensions
        )));
    }
    let expected_floats = artifact.count.checked_mul(artifact.dimensions).ok_or_else(|| {
        Error::CorruptState(format!(
            "Index artifact declares an impossible record count {}",
            artifact.count
        ))
    })?;
    if artifact.vectors.len() as u64 != expected_floats {
        return Err(Error::CorruptState(format!(
            "Index artifact declares {} vectors but holds {} floats",
            artifact.count,
            artifact.vectors.len()
        )));
    }

    let metadata_bytes = tokio::fs::read(&config.metadata_path).await?;
    let metadata: MetadataArtifact = serde_json::from_slice(&metadata_bytes).map_err(|e| {
        Error::CorruptState(format!(
            "Failed to parse metadata artifact {}: {}",
            config.metadata_path.display(),
            e
        ))
    })?;

    if metadata.version != FORMAT_VERSION {
        return Err(Error::CorruptState(format!(
            "Unsupported metadata artifact version {}",
            metadata.version
        )));
    }
    if metadata.dimensions != config.dimensions {
        return Err(Error::CorruptState(format!(
            "Metadata artifact written for {} dimensions, store expects {}",
            metadata.dimensions, config.dimensions
        )));
    }
    if metadata.records.len() as u64 != artifact.count {
        return Err(Error::CorruptState(format!(
            "Index artifact has {} vectors but metadata artifact has {} texts",
            artifact.count,
            metadata.records.len()
        )));
    }

    let index = FlatIndex::from_flat(config.dimensions, artifact.vectors)?;
    info!(
        records = index.len(),
        dimensions = config.dimensions,
        "Loaded store from disk"
    );
    Ok(Some((index, metadata.records)))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, bytes).await;
    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            debug!(path = ?tmp, error = %e, "Could not remove temporary artifact");
        }
    }
    result
}

async fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(tmp, path).await?;
    Ok(())
}
