use kestrel_vector::Metadata;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============= Ingest Types =============

/// A document handed to the ingest boundary: raw text plus free-form metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A chunk produced by the document loader, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub source: String,
    pub chunk_index: usize,
}

/// A file the loader did not ingest, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Extension is neither `.txt` nor `.pdf`, or the entry is not a file.
    Unsupported,
    /// Reading or extracting the file failed.
    Failed(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub files_loaded: usize,
    pub chunks_added: usize,
    pub skipped: Vec<SkippedFile>,
}

// ============= Retrieval Types =============

/// A retrieved chunk with its score, for callers that want more than text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub distance: f32,
    pub metadata: Metadata,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt state: {0}")]
    CorruptState(String),

    #[error("Failed to ingest {path}: {reason}")]
    PartialIngestFailure { path: PathBuf, reason: String },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<kestrel_vector::Error> for AppError {
    fn from(err: kestrel_vector::Error) -> Self {
        use kestrel_vector::Error;
        match err {
            Error::InvalidArgument(_)
            | Error::DimensionMismatch { .. }
            | Error::LengthMismatch { .. } => AppError::InvalidArgument(err.to_string()),
            Error::CorruptState(msg) => AppError::CorruptState(msg),
            Error::Io(e) => AppError::Internal(format!("Vector store I/O: {}", e)),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_errors_map_to_kinds() {
        let err: AppError = kestrel_vector::Error::LengthMismatch { vectors: 2, texts: 1 }.into();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let err: AppError = kestrel_vector::Error::CorruptState("torn".into()).into();
        assert!(matches!(err, AppError::CorruptState(msg) if msg == "torn"));
    }

    #[test]
    fn test_skip_reason_serialization() {
        let json = serde_json::to_value(SkipReason::Failed("bad xref".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "failed", "detail": "bad xref"}));
    }
}
