//! Embedding models.
//!
//! The rest of the pipeline only sees the [`Embedder`] trait: a batch of
//! strings in, one fixed-length vector per string out, order preserved.
//!
//! Two implementations ship with Kestrel:
//!
//! - [`HashingEmbedder`] - deterministic feature hashing over lower-cased
//!   word tokens. No model download, stable across restarts and platforms.
//!   Captures lexical overlap only.
//! - `FastEmbedder` (feature `local-embeddings`) - sentence-transformer
//!   models via fastembed / ONNX Runtime, e.g. `all-MiniLM-L6-v2`.

use crate::types::{AppError, Result};
use crate::utils::config::{EmbeddingConfig, EmbeddingProvider};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Maps text to fixed-dimension vectors.
///
/// Implementations may be slow (model inference); callers never hold the
/// vector store lock while embedding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Output dimension, fixed for the lifetime of the instance.
    fn dimensions(&self) -> usize;

    /// Short model identifier for logs.
    fn model_name(&self) -> String;

    /// Embed `texts`, returning exactly one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Build the embedder selected by `config`.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider {
        EmbeddingProvider::Hashing => Ok(Arc::new(HashingEmbedder::new(config.dimensions)?)),
        #[cfg(feature = "local-embeddings")]
        EmbeddingProvider::FastEmbed => Ok(Arc::new(FastEmbedder::new(&config.model)?)),
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingProvider::FastEmbed => Err(AppError::Configuration(
            "embedding.provider = \"fastembed\" requires the `local-embeddings` feature"
                .to_string(),
        )),
    }
}

// ============================================================================
// Hashing embedder
// ============================================================================

/// Bag-of-words embedder using the hashing trick.
///
/// Each lower-cased alphanumeric token is hashed with SHA-256 into one of
/// `dimensions` buckets; the count vector is L2-normalised. Texts sharing more
/// words land closer together under Euclidean distance.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(AppError::InvalidArgument(
                "Embedding dimensions must be greater than 0".to_string(),
            ));
        }
        Ok(Self { dimensions })
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&digest[..8]);
            let slot = (u64::from_le_bytes(bucket) % self.dimensions as u64) as usize;
            vector[slot] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> String {
        format!("hashing-{}", self.dimensions)
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

// ============================================================================
// fastembed embedder
// ============================================================================

#[cfg(feature = "local-embeddings")]
pub use local::FastEmbedder;

#[cfg(feature = "local-embeddings")]
mod local {
    use super::*;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use parking_lot::Mutex;
    use tracing::info;

    /// Resolve a configured model name to a fastembed model.
    fn resolve_model(name: &str) -> Result<EmbeddingModel> {
        let normalized = name.to_lowercase();
        let model = match normalized.trim_start_matches("sentence-transformers/") {
            "all-minilm-l6-v2" => EmbeddingModel::AllMiniLML6V2,
            "all-minilm-l12-v2" => EmbeddingModel::AllMiniLML12V2,
            "baai/bge-small-en-v1.5" | "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
            "baai/bge-base-en-v1.5" | "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
            _ => {
                return Err(AppError::Configuration(format!(
                    "Unknown embedding model: {}",
                    name
                )))
            }
        };
        Ok(model)
    }

    /// Local ONNX sentence-embedding model.
    ///
    /// Inference runs on the blocking thread pool; the model sits behind a
    /// mutex because fastembed needs exclusive access while embedding.
    pub struct FastEmbedder {
        model: Arc<Mutex<TextEmbedding>>,
        model_name: String,
        dimensions: usize,
    }

    impl FastEmbedder {
        /// Load `model_name` (downloading it on first use) and probe its
        /// output dimension once.
        pub fn new(model_name: &str) -> Result<Self> {
            let model_type = resolve_model(model_name)?;
            let mut model = TextEmbedding::try_new(
                InitOptions::new(model_type).with_show_download_progress(true),
            )
            .map_err(|e| AppError::Embedding(format!("Failed to load {}: {}", model_name, e)))?;

            let probe = model
                .embed(vec!["dimension probe".to_string()], None)
                .map_err(|e| AppError::Embedding(e.to_string()))?;
            let dimensions = probe.first().map(Vec::len).ok_or_else(|| {
                AppError::Embedding(format!("{} returned no embedding", model_name))
            })?;

            info!(model = model_name, dimensions, "Loaded embedding model");
            Ok(Self {
                model: Arc::new(Mutex::new(model)),
                model_name: model_name.to_string(),
                dimensions,
            })
        }
    }

    #[async_trait]
    impl Embedder for FastEmbedder {
        fn dimensions(&self) -> usize {
            self.dimensions
        }

        fn model_name(&self) -> String {
            self.model_name.clone()
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            let model = Arc::clone(&self.model);
            let batch = texts.to_vec();
            tokio::task::spawn_blocking(move || model.lock().embed(batch, None))
                .await
                .map_err(|e| AppError::Internal(format!("Embedding task failed: {}", e)))?
                .map_err(|e| AppError::Embedding(e.to_string()))
        }
    }

}
