//! Exact brute-force index.

use cura_core::{Embedding, embedding::cosine_similarity};
use ordered_float::OrderedFloat;

use super::{Neighbor, VectorIndex, check_dimension};
use crate::error::Result;

/// Exact cosine index that scans every vector.
///
/// Per-user long-term memory holds tens of chunks, where a linear scan is as fast as a graph
/// walk and never misses a neighbor.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Embedding>,
}

impl VectorIndex for FlatIndex {
    fn build(dimension: usize, vectors: Vec<Embedding>) -> Result<Self> {
        for vector in &vectors {
            check_dimension(dimension, vector)?;
        }
        Ok(Self { dimension, vectors })
    }

    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>> {
        check_dimension(self.dimension, query)?;
        let mut hits: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| Neighbor {
                position,
                similarity: cosine_similarity(vector, query),
            })
            .collect();
        hits.sort_by_key(|hit| std::cmp::Reverse(OrderedFloat(hit.similarity)));
        hits.truncate(top_k);
        Ok(hits)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}
