//! Ingestion: chunk, embed, append.
//!
//! Embedding happens in batches before the store is touched, so the store's
//! write lock is only held for the append and the persistence write that
//! follows it.

use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::Embedder;
use crate::rag::loader::DocumentLoader;
use crate::types::{AppError, IngestReport, Result, SourceDocument};
use kestrel_vector::{StoredText, VectorStore};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct Ingestor {
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    chunker: TextChunker,
    batch_size: usize,
}

impl Ingestor {
    pub fn new(
        store: Arc<VectorStore>,
        embedder: Arc<dyn Embedder>,
        chunker: TextChunker,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            chunker,
            batch_size: batch_size.max(1),
        }
    }

    /// Chunk and store documents arriving through the ingest boundary.
    ///
    /// Each chunk keeps its document's metadata plus a `chunk_index`.
    /// Returns the number of chunks added.
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub async fn ingest(&self, documents: Vec<SourceDocument>) -> Result<usize> {
        let mut records = Vec::new();
        for document in documents {
            for (chunk_index, text) in self.chunker.chunk(&document.text).into_iter().enumerate() {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), Value::from(chunk_index));
                records.push(StoredText::with_metadata(text, metadata));
            }
        }
        self.add_records(records).await
    }

    /// Load, chunk and store every supported file in `dir`.
    #[instrument(skip(self))]
    pub async fn ingest_directory(&self, dir: &Path) -> Result<IngestReport> {
        let loaded = DocumentLoader::new(self.chunker).load(dir).await?;

        let records = loaded
            .chunks
            .into_iter()
            .map(|chunk| {
                let mut metadata = kestrel_vector::Metadata::new();
                metadata.insert("source".to_string(), Value::from(chunk.source));
                metadata.insert("chunk_index".to_string(), Value::from(chunk.chunk_index));
                StoredText::with_metadata(chunk.text, metadata)
            })
            .collect();
        let chunks_added = self.add_records(records).await?;

        Ok(IngestReport {
            files_loaded: loaded.files_loaded,
            chunks_added,
            skipped: loaded.skipped,
        })
    }

    /// Ingest `dir` only if the store is empty. Returns `None` when the store
    /// already had data and nothing was done.
    pub async fn bootstrap(&self, dir: &Path) -> Result<Option<IngestReport>> {
        if !self.store.is_empty().await {
            info!(records = self.store.len().await, "Store already populated, skipping ingestion");
            return Ok(None);
        }
        let report = self.ingest_directory(dir).await?;
        Ok(Some(report))
    }

    async fn add_records(&self, records: Vec<StoredText>) -> Result<usize> {
        let total = records.len();
        let mut records = records.into_iter().peekable();

        while records.peek().is_some() {
            let batch: Vec<StoredText> = records.by_ref().take(self.batch_size).collect();
            let texts: Vec<String> = batch.iter().map(|r| r.text.clone()).collect();

            let vectors = self.embedder.embed(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(AppError::Embedding(format!(
                    "Embedder returned {} vectors for {} texts",
                    vectors.len(),
                    batch.len()
                )));
            }

            self.store.add(&vectors, batch).await?;
        }

        info!(chunks = total, model = %self.embedder.model_name(), "Ingested chunks");
        Ok(total)
    }
}
