//! # Kestrel - local retrieval core
//!
//! Kestrel turns a directory of `.txt` and `.pdf` files into a persistent
//! vector index, retrieves the chunks closest to a question, and assembles a
//! grounded prompt for an external text generator.
//!
//! ## Overview
//!
//! Kestrel can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `kestrel-server` binary
//! 2. **As a library** - Build a [`RagService`] and call it from your own code
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use kestrel::{KestrelConfig, RagService};
//!
//! #[tokio::main]
//! async fn main() -> kestrel::Result<()> {
//!     let config = KestrelConfig::load("kestrel.toml")?;
//!     let service = RagService::from_config(&config).await?;
//!
//!     service.bootstrap().await?;
//!
//!     let prompt = service.prompt_for("Who founded the company?", None).await?;
//!     println!("{}", prompt);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-embeddings` | fastembed / ONNX sentence-embedding models |
//!
//! ## Modules
//!
//! - [`rag`] - Chunking, loading, embedding, ingestion, retrieval, prompting
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration
//!
//! Vector storage lives in the `kestrel-vector` workspace crate.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line interface definitions and terminal output.
pub mod cli;
/// Retrieval pipeline components.
pub mod rag;
/// Core types and errors.
pub mod types;
/// Configuration loading.
pub mod utils;

pub use rag::{build_prompt, Embedder, Ingestor, Retriever, TextChunker};
pub use types::{AppError, IngestReport, Result, RetrievedChunk, SourceDocument};
pub use utils::config::KestrelConfig;

use kestrel_vector::{StoreConfig, StoreStats, VectorStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Root handle wiring the store, embedder, ingestor and retriever together.
///
/// Everything is shared behind `Arc`, so clones are cheap and can be handed
/// to concurrent tasks.
#[derive(Clone)]
pub struct RagService {
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    ingestor: Ingestor,
    retriever: Retriever,
    documents_dir: PathBuf,
}

impl RagService {
    /// Build the embedder selected in `config` and open (or create) the store
    /// it writes to.
    ///
    /// The store dimension is taken from the embedder, so switching models
    /// against an existing index fails with [`AppError::CorruptState`].
    pub async fn from_config(config: &KestrelConfig) -> Result<Self> {
        let embedder = rag::build_embedder(&config.embedding)?;

        let store_config = StoreConfig::new(
            embedder.dimensions(),
            config.rag.index_path(),
            config.rag.metadata_path(),
        );
        let store = Arc::new(VectorStore::open_or_create(store_config).await?);

        let chunker = TextChunker::new(config.rag.chunk_size, config.rag.chunk_overlap)?;

        info!(
            model = %embedder.model_name(),
            dimensions = embedder.dimensions(),
            records = store.len().await,
            "RAG service ready"
        );

        Ok(Self::new(
            store,
            embedder,
            chunker,
            config.rag.top_k,
            config.rag.embed_batch_size,
            config.rag.documents_dir.clone(),
        ))
    }

    /// Assemble a service from already-built parts.
    pub fn new(
        store: Arc<VectorStore>,
        embedder: Arc<dyn Embedder>,
        chunker: TextChunker,
        top_k: usize,
        embed_batch_size: usize,
        documents_dir: PathBuf,
    ) -> Self {
        let ingestor = Ingestor::new(store.clone(), embedder.clone(), chunker, embed_batch_size);
        let retriever = Retriever::new(store.clone(), embedder.clone(), top_k);
        Self {
            store,
            embedder,
            ingestor,
            retriever,
            documents_dir,
        }
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Ingest the configured documents directory if the store is empty.
    pub async fn bootstrap(&self) -> Result<Option<IngestReport>> {
        self.ingestor.bootstrap(&self.documents_dir).await
    }

    /// Retrieve context for `question` and wrap it in a grounded prompt.
    pub async fn prompt_for(&self, question: &str, k: Option<usize>) -> Result<String> {
        let context = self.retriever.retrieve(question, k).await?;
        Ok(build_prompt(&context, question))
    }

    pub async fn stats(&self) -> StoreStats {
        self.store.stats().await
    }
}
