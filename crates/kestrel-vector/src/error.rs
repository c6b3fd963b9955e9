//! Error types for kestrel-vector.

use thiserror::Error;

/// Result type for kestrel-vector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kestrel-vector operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied argument was rejected (e.g. NaN components, zero dimensions).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Dimension mismatch between a vector and the store.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions.
        expected: usize,
        /// Actual dimensions provided.
        actual: usize,
    },

    /// `add` was called with a different number of vectors and texts.
    #[error("Length mismatch: {vectors} vectors but {texts} texts")]
    LengthMismatch {
        /// Number of vectors supplied.
        vectors: usize,
        /// Number of texts supplied.
        texts: usize,
    },

    /// Persisted artifacts are unreadable or disagree with each other or the store.
    #[error("Corrupt state: {0}")]
    CorruptState(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error was caused by a bad argument rather than by storage.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_) | Error::DimensionMismatch { .. } | Error::LengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_classification() {
        assert!(Error::LengthMismatch { vectors: 1, texts: 2 }.is_invalid_argument());
        assert!(Error::DimensionMismatch { expected: 3, actual: 2 }.is_invalid_argument());
        assert!(!Error::CorruptState("bad".into()).is_invalid_argument());
    }

    #[test]
    fn test_display() {
        let err = Error::DimensionMismatch { expected: 384, actual: 3 };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 384, got 3");
    }
}
