//! Query-time retrieval: embed the question, search the store, return the
//! closest chunks best first.

use crate::rag::embeddings::Embedder;
use crate::types::{AppError, Result, RetrievedChunk};
use kestrel_vector::VectorStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default number of chunks returned when the caller does not ask for a
/// specific `k`.
pub const DEFAULT_TOP_K: usize = 3;

/// Turns a query string into the most relevant stored chunks.
///
/// Holds shared handles only; cloning is cheap and every method takes
/// `&self`, so one retriever can serve concurrent queries.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<VectorStore>, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Return the text of the `k` (default `top_k`) most relevant chunks,
    /// best match first.
    pub async fn retrieve(&self, query: &str, k: Option<usize>) -> Result<Vec<String>> {
        Ok(self
            .retrieve_scored(query, k)
            .await?
            .into_iter()
            .map(|chunk| chunk.text)
            .collect())
    }

    /// Like [`retrieve`](Self::retrieve) but keeps distance and metadata.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn retrieve_scored(
        &self,
        query: &str,
        k: Option<usize>,
    ) -> Result<Vec<RetrievedChunk>> {
        let k = k.unwrap_or(self.top_k);
        let query_vector = self.embed_query(query).await?;

        let results = self.store.search(&query_vector, k).await?;
        debug!(k, hits = results.len(), "Retrieved chunks");

        Ok(results
            .into_iter()
            .map(|r| RetrievedChunk {
                text: r.text,
                distance: r.distance,
                metadata: r.metadata,
            })
            .collect())
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        if vectors.len() != 1 {
            return Err(AppError::Embedding(format!(
                "Expected one query embedding, got {}",
                vectors.len()
            )));
        }
        Ok(vectors.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::embeddings::{HashingEmbedder, MockEmbedder};
    use kestrel_vector::StoreConfig;
    use tempfile::TempDir;

    async fn store(dir: &TempDir, dimensions: usize) -> Arc<VectorStore> {
        Arc::new(
            VectorStore::open_or_create(StoreConfig::in_dir(dimensions, dir.path()))
                .await
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_query_is_embedded_as_single_batch() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 2).await;
        store
            .add(&[[1.0, 0.0], [0.0, 1.0]], vec!["east", "north"])
            .await
            .unwrap();

        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .withf(|texts: &[String]| texts.len() == 1 && texts[0] == "which way?")
            .times(1)
            .returning(|_| Ok(vec![vec![0.1, 0.9]]));

        let retriever = Retriever::new(store, Arc::new(embedder), DEFAULT_TOP_K);
        let texts = retriever.retrieve("which way?", Some(1)).await.unwrap();

        assert_eq!(texts, vec!["north"]);
    }

    #[tokio::test]
    async fn test_default_k_is_used() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 2).await;
        store
            .add(
                &[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 2.0]],
                vec!["a", "b", "c", "d"],
            )
            .await
            .unwrap();

        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .returning(|_| Ok(vec![vec![0.0, 0.0]]));

        let retriever = Retriever::new(store, Arc::new(embedder), 2);
        let texts = retriever.retrieve("anything", None).await.unwrap();

        assert_eq!(texts, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_embedder_returning_nothing_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 2).await;

        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().returning(|_| Ok(Vec::new()));

        let retriever = Retriever::new(store, Arc::new(embedder), 3);
        let result = retriever.retrieve("q", None).await;

        assert!(matches!(result, Err(AppError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_empty_store_returns_nothing() {
        let dir = TempDir::new().unwrap();
        let embedder = Arc::new(HashingEmbedder::new(16).unwrap());
        let retriever = Retriever::new(store(&dir, 16).await, embedder, 3);

        assert!(retriever.retrieve("hello", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scored_results_carry_distance() {
        let dir = TempDir::new().unwrap();
        let embedder = Arc::new(HashingEmbedder::new(64).unwrap());
        let store = store(&dir, 64).await;
        let text = "exact match".to_string();
        let vectors = embedder.embed(std::slice::from_ref(&text)).await.unwrap();
        store.add(&vectors, vec![text.clone()]).await.unwrap();

        let retriever = Retriever::new(store, embedder, 3);
        let scored = retriever.retrieve_scored("exact match", None).await.unwrap();

        assert_eq!(scored[0].text, text);
        assert!(scored[0].distance.abs() < 1e-6);
    }
}
