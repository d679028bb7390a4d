//! HNSW-based vector index using instant-distance.

use cura_core::{Embedding, embedding::cosine_similarity};
use instant_distance::{Builder, HnswMap, Point, Search};
use ordered_float::OrderedFloat;

use super::{Neighbor, VectorIndex, check_dimension};
use crate::error::Result;

/// A point wrapper for instant-distance that stores an embedding vector.
#[derive(Clone, Debug)]
struct EmbeddingPoint {
    embedding: Embedding,
}

impl Point for EmbeddingPoint {
    fn distance(&self, other: &Self) -> f32 {
        // Smaller is more similar.
        1.0 - cosine_similarity(&self.embedding, &other.embedding)
    }
}

/// HNSW-based index for approximate nearest neighbor search.
///
/// The graph is built once from the full vector list and never mutated. An empty list builds
/// no graph at all, and every search on it returns nothing.
///
/// # Example
///
/// ```rust
/// use cura_memory::index::{HnswIndex, VectorIndex};
///
/// let index = HnswIndex::build(2, vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
/// let hits = index.search(&[1.0, 0.0], 1).unwrap();
/// assert_eq!(hits[0].position, 0);
/// ```
pub struct HnswIndex {
    dimension: usize,
    len: usize,
    hnsw: Option<HnswMap<EmbeddingPoint, usize>>,
}

impl std::fmt::Debug for HnswIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HnswIndex")
            .field("dimension", &self.dimension)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl VectorIndex for HnswIndex {
    fn build(dimension: usize, vectors: Vec<Embedding>) -> Result<Self> {
        for vector in &vectors {
            check_dimension(dimension, vector)?;
        }

        let len = vectors.len();
        if len == 0 {
            return Ok(Self {
                dimension,
                len,
                hnsw: None,
            });
        }

        let points: Vec<EmbeddingPoint> = vectors
            .into_iter()
            .map(|embedding| EmbeddingPoint { embedding })
            .collect();
        let positions: Vec<usize> = (0..len).collect();

        Ok(Self {
            dimension,
            len,
            hnsw: Some(Builder::default().build(points, positions)),
        })
    }

    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>> {
        check_dimension(self.dimension, query)?;

        let Some(ref hnsw) = self.hnsw else {
            return Ok(Vec::new());
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_point = EmbeddingPoint {
            embedding: query.to_vec(),
        };

        let mut search = Search::default();
        let mut results: Vec<Neighbor> = hnsw
            .search(&query_point, &mut search)
            .take(top_k)
            .map(|candidate| Neighbor {
                position: *candidate.value,
                similarity: 1.0 - candidate.distance,
            })
            .collect();

        // Equal similarities keep list order.
        results.sort_by_key(|r| (std::cmp::Reverse(OrderedFloat(r.similarity)), r.position));

        Ok(results)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MemoryError;

    #[test]
    fn build_and_search() {
        let index = HnswIndex::build(
            4,
            vec![vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]],
        )
        .unwrap();

        assert_eq!(index.len(), 2);

        let results = index.search(&[1.0, 0.0, 0.0, 0.0], 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, 0);
        assert!((results[0].similarity - 1.0).abs() < 1e-5);
    }

    #[test]
    fn results_are_sorted_by_similarity() {
        let index = HnswIndex::build(
            2,
            vec![vec![0.0, 1.0], vec![0.6, 0.8], vec![1.0, 0.0]],
        )
        .unwrap();

        let results = index.search(&[1.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|r| r.position).collect();
        assert_eq!(positions, [2, 1, 0]);
    }

    #[test]
    fn dimension_mismatch() {
        let result = HnswIndex::build(4, vec![vec![1.0, 0.0]]);
        assert!(matches!(
            result,
            Err(MemoryError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));

        let index = HnswIndex::build(4, vec![vec![1.0, 0.0, 0.0, 0.0]]).unwrap();
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn empty_index() {
        let index = HnswIndex::build(4, Vec::new()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), 4);
        assert!(index.search(&[1.0, 0.0, 0.0, 0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn zero_top_k() {
        let index = HnswIndex::build(2, vec![vec![1.0, 0.0]]).unwrap();
        assert!(index.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }
}
