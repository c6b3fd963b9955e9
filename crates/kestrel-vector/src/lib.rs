//! # kestrel-vector
//!
//! An append-only, embedded vector store with exact nearest-neighbor search
//! and write-through persistence.
//!
//! ## Features
//!
//! - **Exact search**: linear scan over squared Euclidean distance, ties broken
//!   by insertion order
//! - **Write-through**: every successful [`VectorStore::add`] is on disk before
//!   it returns
//! - **Reader/writer locking**: searches run concurrently, an add excludes
//!   everything else until its state is persisted
//! - **Positional pairing**: record `i` of the vector index and record `i` of
//!   the text list always belong together
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kestrel_vector::{StoreConfig, VectorStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kestrel_vector::Error> {
//!     let store = VectorStore::open_or_create(StoreConfig::in_dir(3, "./data/vectors")).await?;
//!
//!     store
//!         .add(&[vec![1.0, 0.0, 0.0]], vec!["SGFD is an AI defence company.".into()])
//!         .await?;
//!
//!     let hits = store.search(&[1.0, 0.0, 0.0], 3).await?;
//!     assert_eq!(hits[0].distance, 0.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 VectorStore                  │
//! │   RwLock ┌──────────────┐ ┌───────────────┐  │
//! │          │  FlatIndex   │ │   Text list   │  │
//! │          │ (vectors, i) │ │ (text+meta,i) │  │
//! │          └──────┬───────┘ └───────┬───────┘  │
//! │                 │   persistence   │          │
//! │          ┌──────▼───────┐ ┌───────▼───────┐  │
//! │          │  index.bin   │ │ metadata.json │  │
//! │          └──────────────┘ └───────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod distance;
pub mod error;
pub mod index;
pub mod persistence;
pub mod types;

// Re-exports for convenience
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use index::FlatIndex;
pub use types::{Metadata, SearchResult, StoreStats, StoredText};

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// The durable, append-only vector store.
///
/// Owns the vector index, the positionally aligned text list, and their two
/// on-disk artifacts.
///
/// # Thread Safety
///
/// State sits behind a `tokio::sync::RwLock`. [`search`](Self::search) takes
/// the read side, so searches proceed in parallel. [`add`](Self::add) takes the
/// write side and holds it across both the in-memory append and the disk
/// write, so no reader ever sees a half-applied batch.
pub struct VectorStore {
    config: StoreConfig,
    state: RwLock<StoreState>,
}

struct StoreState {
    index: FlatIndex,
    texts: Vec<StoredText>,
}

impl VectorStore {
    /// Open the store described by `config`, loading both artifacts when they
    /// exist and starting empty otherwise.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `config.dimensions` is zero.
    /// - [`Error::CorruptState`] if the artifacts cannot be decoded, were
    ///   written for a different dimension, or disagree on the record count.
    #[instrument(skip(config), fields(dimensions = config.dimensions, index = ?config.index_path))]
    pub async fn open_or_create(config: StoreConfig) -> Result<Self> {
        let state = match persistence::load(&config).await? {
            Some((index, texts)) => StoreState { index, texts },
            None => {
                info!("Creating empty vector store");
                StoreState {
                    index: FlatIndex::new(config.dimensions)?,
                    texts: Vec::new(),
                }
            }
        };

        Ok(Self {
            config,
            state: RwLock::new(state),
        })
    }

    /// Get the vector dimensions.
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the number of stored records.
    pub async fn len(&self) -> usize {
        self.state.read().await.texts.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Append `vectors[i]` paired with `texts[i]` for every `i`, then persist.
    ///
    /// Accepts anything convertible into [`StoredText`], so plain strings work
    /// as well as text-plus-metadata records.
    ///
    /// The whole batch is validated before the store is touched: on
    /// [`Error::LengthMismatch`], [`Error::DimensionMismatch`] or
    /// [`Error::InvalidArgument`] nothing is appended. If the disk write
    /// fails the in-memory append is rolled back before the error is
    /// returned.
    #[instrument(skip(self, vectors, texts), fields(count = vectors.len()))]
    pub async fn add<V, T>(&self, vectors: &[V], texts: Vec<T>) -> Result<()>
    where
        V: AsRef<[f32]>,
        T: Into<StoredText>,
    {
        if vectors.len() != texts.len() {
            return Err(Error::LengthMismatch {
                vectors: vectors.len(),
                texts: texts.len(),
            });
        }
        if vectors.is_empty() {
            return Ok(());
        }

        let texts: Vec<StoredText> = texts.into_iter().map(Into::into).collect();

        let mut state = self.state.write().await;
        let previous_len = state.texts.len();

        // FlatIndex::extend validates every vector before appending any.
        state.index.extend(vectors)?;
        state.texts.extend(texts);

        if let Err(e) = persistence::save(&self.config, &state.index, &state.texts).await {
            warn!(error = %e, "Persisting store failed, rolling back batch");
            state.index.truncate(previous_len);
            state.texts.truncate(previous_len);
            return Err(e);
        }

        debug!(total = state.texts.len(), "Added batch");
        Ok(())
    }

    /// Find the `k` stored records nearest to `query`, best first.
    ///
    /// Returns every record when fewer than `k` are stored and an empty list
    /// for an empty store.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `query` has the wrong length.
    #[instrument(skip(self, query), fields(k, dim = query.len()))]
    pub async fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        let state = self.state.read().await;
        let neighbors = state.index.search(query, k)?;

        let mut results = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            // Index and text list share a length, but a stale position must
            // never take the process down.
            let Some(stored) = state.texts.get(neighbor.position) else {
                warn!(position = neighbor.position, "Skipping out-of-range search hit");
                continue;
            };
            results.push(SearchResult {
                position: neighbor.position,
                text: stored.text.clone(),
                distance: neighbor.distance,
                metadata: stored.metadata.clone(),
            });
        }

        debug!(count = results.len(), "Search completed");
        Ok(results)
    }

    /// Get store statistics.
    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        let text_bytes: usize = state.texts.iter().map(|t| t.text.capacity()).sum();
        StoreStats {
            record_count: state.texts.len(),
            dimensions: self.config.dimensions,
            memory_bytes: state.index.memory_usage() + text_bytes,
            index_path: self.config.index_path.clone(),
            metadata_path: self.config.metadata_path.clone(),
        }
    }
}
