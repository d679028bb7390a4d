//! # Embedding Module
//!
//! Embeddings are dense vector representations of text: similar texts produce similar
//! vectors. The memory engine compares every stored fragment by cosine similarity, so all
//! vectors it keeps are L2-normalized first and cosine similarity reduces to a dot product.
//!
//! ## Usage
//!
//! ```rust
//! use cura_core::EmbeddingModel;
//!
//! async fn example<T: EmbeddingModel>(model: &T) -> cura_core::Result<()> {
//!     let dim = model.dim();
//!     let embedding = model.embed("Patient reports a mild fever").await?;
//!     assert_eq!(embedding.len(), dim);
//!     Ok(())
//! }
//! ```

use core::future::Future;

/// A type alias for an embedding vector of 32-bit floats.
pub type Embedding = Vec<f32>;

/// Guards against division by zero when normalizing.
const NORM_EPSILON: f32 = 1e-9;

/// Converts text to vector representations.
///
/// # Implementation Requirements
///
/// - The [`embed`](EmbeddingModel::embed) method must return vectors with length equal to [`dim`](EmbeddingModel::dim)
/// - Output does not need to be normalized; callers run [`normalize`] before storage
/// - The same text must embed to the same vector for a given model version
///
/// # Example
///
/// ```rust
/// use cura_core::EmbeddingModel;
///
/// struct MiniLm;
///
/// impl EmbeddingModel for MiniLm {
///     fn dim(&self) -> usize {
///         384
///     }
///
///     async fn embed(&self, text: &str) -> cura_core::Result<Vec<f32>> {
///         // A real implementation calls the embedding service here.
///         Ok(vec![0.0; self.dim()])
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let embedding = MiniLm.embed("shortness of breath").await.unwrap();
/// assert_eq!(embedding.len(), 384);
/// # });
/// ```
///
/// # Performance Considerations
///
/// Embedding calls usually dominate latency. Callers should cache vectors next to the text
/// they describe instead of re-embedding on every comparison.
pub trait EmbeddingModel: Send + Sync {
    /// Returns the embedding vector dimension.
    fn dim(&self) -> usize;

    /// Converts text to an embedding vector of length [`Self::dim`](EmbeddingModel::dim).
    fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Vec<f32>>> + Send;
}

/// Scales a vector to unit length.
///
/// A small epsilon is added to the norm, so a zero vector stays a zero vector.
#[must_use]
pub fn normalize(mut vector: Embedding) -> Embedding {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt() + NORM_EPSILON;
    for value in &mut vector {
        *value /= norm;
    }
    vector
}

/// Computes cosine similarity between two vectors.
///
/// Returns `0.0` when either vector has zero norm or the lengths differ.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (lhs, rhs) in a.iter().zip(b) {
        dot += lhs * rhs;
        norm_a += lhs * lhs;
        norm_b += rhs * rhs;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
