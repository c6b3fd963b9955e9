//! Retrieval pipeline
//!
//! The components that turn a document directory into grounded prompts.
//!
//! # Module Structure
//!
//! - [`rag::chunker`](crate::rag::chunker) - Overlapping word-window chunking
//! - [`rag::loader`](crate::rag::loader) - `.txt` / `.pdf` directory loading
//! - [`rag::embeddings`](crate::rag::embeddings) - The [`Embedder`] boundary and its implementations
//! - [`rag::ingest`](crate::rag::ingest) - Chunk, embed in batches, append to the store
//! - [`rag::retriever`](crate::rag::retriever) - Query embedding and top-k search
//! - [`rag::prompt`](crate::rag::prompt) - Grounded prompt assembly
//!
//! # Pipeline
//!
//! 1. **Loading** - Files are read and chunked
//! 2. **Embedding** - Chunks are embedded in batches
//! 3. **Storage** - Vectors and texts are appended to the persistent store
//! 4. **Retrieval** - The question is embedded and its nearest chunks returned
//! 5. **Prompting** - Chunks and question are assembled for an external generator
//!
//! # Example
//!
//! ```ignore
//! use kestrel::rag::{prompt::build_prompt, retriever::Retriever};
//!
//! let chunks = retriever.retrieve("Who founded the company?", None).await?;
//! let prompt = build_prompt(&chunks, "Who founded the company?");
//! ```

pub mod chunker;
pub mod embeddings;
pub mod ingest;
pub mod loader;
pub mod prompt;
pub mod retriever;

pub use chunker::TextChunker;
pub use embeddings::{build_embedder, Embedder, HashingEmbedder};
pub use ingest::Ingestor;
pub use loader::{load_documents, DocumentLoader};
pub use prompt::build_prompt;
pub use retriever::Retriever;
