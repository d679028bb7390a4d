//! Error types for the memory crate.

use thiserror::Error;

/// Errors raised inside the memory engine.
///
/// None of these escape [`MemoryManager`](crate::MemoryManager)'s public operations; they are
/// logged and absorbed by a fallback at the call site.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The embedding model failed.
    #[error("embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    /// The summarizer failed after every retry.
    #[error("summarizer failed after {attempts} attempts: {source}")]
    Summarizer {
        /// Number of attempts made.
        attempts: u32,
        /// Last error reported by the summarizer.
        #[source]
        source: anyhow::Error,
    },

    /// The language model failed to complete a prompt.
    #[error("language model failed: {0}")]
    LanguageModel(#[source] anyhow::Error),

    /// Dimension mismatch between an embedding and the index.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension provided.
        actual: usize,
    },
}

/// Result type alias for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
