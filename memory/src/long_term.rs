//! Long-term memory: the vector-indexed chunk list of one user.

use cura_core::EmbeddingModel;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::config::MemoryConfig;
use crate::embedder::EmbeddingMemo;
use crate::error::Result;
use crate::index::VectorIndex;
use crate::scoring::{rank_by, relevance_score};
use crate::types::{MemoryChunk, ScoredChunk};
use crate::upsert::{Placement, absorb_duplicates, merge_into, place};

/// The authoritative chunk list plus an index derived from it.
///
/// The index always covers exactly `chunks`, in order. It is never mutated; every change to the
/// list builds a fresh index before either is swapped in.
#[derive(Debug)]
pub struct LongTermMemory<I> {
    chunks: Vec<MemoryChunk>,
    index: Option<I>,
    dimension: usize,
}

impl<I: VectorIndex> LongTermMemory<I> {
    /// Creates an empty memory for vectors of `dimension`.
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self {
            chunks: Vec::new(),
            index: None,
            dimension,
        }
    }

    /// Upserts one exchange's chunks, trims to the newest `max_chunks` and rebuilds the index.
    ///
    /// Later chunks in the batch see earlier ones. If the rebuild fails, the list and index are
    /// left exactly as they were before the call.
    pub(crate) async fn upsert_batch<E: EmbeddingModel>(
        &mut self,
        batch: Vec<MemoryChunk>,
        memo: &mut EmbeddingMemo<'_, E>,
        config: &MemoryConfig,
    ) {
        if batch.is_empty() {
            return;
        }

        let mut staged = self.chunks.clone();
        for chunk in batch {
            match place(&staged, &chunk.embedding, config) {
                Placement::Replace(position) => {
                    staged[position] = chunk;
                    absorb_duplicates(&mut staged, position, config);
                }
                Placement::Merge(position) => {
                    merge_into(&mut staged[position], chunk, memo, config).await;
                    absorb_duplicates(&mut staged, position, config);
                }
                Placement::Append => staged.push(chunk),
            }
        }

        if staged.len() > config.max_chunks {
            let excess = staged.len() - config.max_chunks;
            staged.drain(..excess);
            debug!(trimmed = excess, "trimmed long-term memory");
        }

        match self.build_index(&staged) {
            Ok(index) => {
                self.chunks = staged;
                self.index = index;
            }
            Err(e) => warn!(error = %e, "failed to rebuild memory index, keeping previous state"),
        }
    }

    fn build_index(&self, chunks: &[MemoryChunk]) -> Result<Option<I>> {
        if chunks.is_empty() {
            return Ok(None);
        }
        let vectors = chunks.iter().map(|c| c.embedding.clone()).collect();
        I::build(self.dimension, vectors).map(Some)
    }

    /// Finds the chunks closest to `query`, bumps their use counts and ranks them.
    ///
    /// Every chunk the index returns counts as used, including those then dropped for falling
    /// below `min_similarity`.
    pub fn search(
        &mut self,
        query: &[f32],
        top_k: usize,
        min_similarity: f32,
        config: &MemoryConfig,
    ) -> Result<Vec<ScoredChunk>> {
        let Some(index) = &self.index else {
            return Ok(Vec::new());
        };
        let neighbors = index.search(query, top_k)?;

        let now = OffsetDateTime::now_utc();
        let mut results = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let Some(chunk) = self.chunks.get_mut(neighbor.position) else {
                continue;
            };
            chunk.use_count = chunk.use_count.saturating_add(1);
            if neighbor.similarity < min_similarity {
                continue;
            }
            let score = relevance_score(
                neighbor.similarity,
                chunk.age_seconds(now),
                chunk.use_count,
                config.decay_half_life,
                config.usage_boost,
            );
            results.push(ScoredChunk {
                chunk: chunk.clone(),
                similarity: neighbor.similarity,
                score,
            });
        }

        rank_by(&mut results, |r| r.score);
        Ok(results)
    }

    /// Iterates over the chunks in index order.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryChunk> {
        self.chunks.iter()
    }

    /// Number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if there are no chunks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of vectors in the current index.
    #[must_use]
    pub fn indexed_len(&self) -> usize {
        self.index.as_ref().map_or(0, I::len)
    }
}
