//! TOML-based configuration for Kestrel
//!
//! Configuration lives in `kestrel.toml`. Every field has a default, so a
//! missing file or an empty one yields a working local setup. A handful of
//! `KESTREL_*` environment variables (optionally from `.env`) override the
//! file for deployment-specific paths and knobs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from kestrel.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KestrelConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub rag: RagConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============= RAG Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Directory of `.txt` / `.pdf` files ingested when the store is empty
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,

    /// Directory holding the store artifacts
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_index_file")]
    pub index_file: String,

    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Window size in words
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Words shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Texts per embedding call during ingestion
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("./data/documents")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/vectors")
}

fn default_index_file() -> String {
    kestrel_vector::config::DEFAULT_INDEX_FILE.to_string()
}

fn default_metadata_file() -> String {
    kestrel_vector::config::DEFAULT_METADATA_FILE.to_string()
}

fn default_chunk_size() -> usize {
    80
}

fn default_chunk_overlap() -> usize {
    20
}

fn default_top_k() -> usize {
    3
}

fn default_embed_batch_size() -> usize {
    32
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            data_dir: default_data_dir(),
            index_file: default_index_file(),
            metadata_file: default_metadata_file(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}

impl RagConfig {
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }
}

// ============= Embedding Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Built-in feature-hashing embedder; no model download
    Hashing,
    /// fastembed ONNX model (requires the `local-embeddings` feature)
    FastEmbed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProvider,

    /// fastembed model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Output dimension of the hashing embedder
    #[serde(default = "default_hashing_dimensions")]
    pub dimensions: usize,
}

fn default_embedding_provider() -> EmbeddingProvider {
    EmbeddingProvider::Hashing
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_hashing_dimensions() -> usize {
    384
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            dimensions: default_hashing_dimensions(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{name}' has invalid value '{value}'")]
    InvalidEnvVar { name: String, value: String },
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Configuration(err.to_string())
    }
}

impl KestrelConfig {
    /// Load configuration from a TOML file, apply `KESTREL_*` overrides and
    /// validate the result.
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            KestrelConfig::default()
        };

        dotenvy::dotenv().ok();
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string without touching the environment.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: KestrelConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("KESTREL_DOCUMENTS_DIR") {
            self.rag.documents_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("KESTREL_DATA_DIR") {
            self.rag.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("KESTREL_TOP_K") {
            self.rag.top_k = value.parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: "KESTREL_TOP_K".to_string(),
                value: value.clone(),
            })?;
        }
        if let Some(level) = lookup("KESTREL_LOG_LEVEL") {
            self.server.log_level = level;
        }
        Ok(())
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rag = &self.rag;

        if rag.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "rag.chunk_size must be greater than 0".to_string(),
            ));
        }
        if rag.chunk_overlap >= rag.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                rag.chunk_overlap, rag.chunk_size
            )));
        }
        if rag.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "rag.top_k must be greater than 0".to_string(),
            ));
        }
        if rag.embed_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "rag.embed_batch_size must be greater than 0".to_string(),
            ));
        }
        if rag.index_path() == rag.metadata_path() {
            return Err(ConfigError::ValidationError(
                "rag.index_file and rag.metadata_file must differ".to_string(),
            ));
        }
        if self.embedding.provider == EmbeddingProvider::Hashing && self.embedding.dimensions == 0
        {
            return Err(ConfigError::ValidationError(
                "embedding.dimensions must be greater than 0".to_string(),
            ));
        }
        if !matches!(self.server.log_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "server.log_format must be 'pretty' or 'json', got '{}'",
                self.server.log_format
            )));
        }

        Ok(())
    }
}
