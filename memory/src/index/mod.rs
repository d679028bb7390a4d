//! Similarity indexes over long-term memory vectors.
//!
//! An index is a derived view of a user's long-term chunk list: it is built in one go from the
//! retained vectors, in list order, and thrown away whenever that list changes. Positions
//! returned by [`VectorIndex::search`] are positions in that list.

mod flat;
mod hnsw;

pub use flat::FlatIndex;
pub use hnsw::HnswIndex;

use cura_core::Embedding;

use crate::error::Result;

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the vector in the list the index was built from.
    pub position: usize,
    /// Cosine similarity to the query.
    pub similarity: f32,
}

/// Trait for vector index implementations.
///
/// Indexes support no in-place delete or update; any change to the underlying list is handled
/// by building a fresh index and swapping it in.
pub trait VectorIndex: Send + Sync {
    /// Builds an index over `vectors`, keeping their order.
    ///
    /// Fails if any vector's length differs from `dimension`.
    fn build(dimension: usize, vectors: Vec<Embedding>) -> Result<Self>
    where
        Self: Sized;

    /// Returns up to `top_k` nearest vectors, most similar first.
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>>;

    /// Returns the embedding dimension.
    fn dimension(&self) -> usize;

    /// Returns the number of indexed vectors.
    fn len(&self) -> usize;

    /// Returns `true` if the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn check_dimension(expected: usize, vector: &[f32]) -> Result<()> {
    if vector.len() == expected {
        Ok(())
    } else {
        Err(crate::error::MemoryError::DimensionMismatch {
            expected,
            actual: vector.len(),
        })
    }
}
