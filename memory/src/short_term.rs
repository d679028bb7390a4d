//! Short-term memory: a small bounded queue of recent topic summaries.

use std::collections::VecDeque;

use cura_core::EmbeddingModel;

use crate::config::MemoryConfig;
use crate::embedder::EmbeddingMemo;
use crate::types::MemoryChunk;
use crate::upsert::{Placement, absorb_duplicates, merge_into, place};

/// Recency-ordered summaries for one user, oldest first.
#[derive(Debug, Clone)]
pub struct ShortTermMemory {
    entries: VecDeque<MemoryChunk>,
    capacity: usize,
}

impl ShortTermMemory {
    /// Creates an empty queue holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts `chunk`, replacing or merging with its closest entry when similar enough.
    ///
    /// Replaced and merged entries keep their position in the queue. Appending past capacity
    /// drops the oldest entry.
    pub(crate) async fn upsert<E: EmbeddingModel>(
        &mut self,
        chunk: MemoryChunk,
        memo: &mut EmbeddingMemo<'_, E>,
        config: &MemoryConfig,
    ) {
        match place(&self.entries, &chunk.embedding, config) {
            Placement::Replace(position) => {
                self.entries[position] = chunk;
                self.absorb_around(position, config);
            }
            Placement::Merge(position) => {
                merge_into(&mut self.entries[position], chunk, memo, config).await;
                self.absorb_around(position, config);
            }
            Placement::Append => {
                self.entries.push_back(chunk);
                while self.entries.len() > self.capacity {
                    self.entries.pop_front();
                }
            }
        }
    }

    fn absorb_around(&mut self, position: usize, config: &MemoryConfig) {
        let mut entries = Vec::from(std::mem::take(&mut self.entries));
        absorb_duplicates(&mut entries, position, config);
        self.entries = VecDeque::from(entries);
    }

    /// Returns up to `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &MemoryChunk> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    /// Iterates over all entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryChunk> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AxisEmbedder;

    impl EmbeddingModel for AxisEmbedder {
        fn dim(&self) -> usize {
            2
        }

        async fn embed(&self, _text: &str) -> cura_core::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    fn chunk(topic: &str, text: &str, embedding: Vec<f32>) -> MemoryChunk {
        MemoryChunk::new(topic, text, embedding)
    }

    #[tokio::test]
    async fn appends_until_capacity_then_drops_oldest() {
        let config = MemoryConfig::default();
        let mut memo = EmbeddingMemo::new(&AxisEmbedder);
        let mut stm = ShortTermMemory::new(2);

        stm.upsert(chunk("a", "one", vec![1.0, 0.0, 0.0]), &mut memo, &config).await;
        stm.upsert(chunk("b", "two", vec![0.0, 1.0, 0.0]), &mut memo, &config).await;
        stm.upsert(chunk("c", "three", vec![0.0, 0.0, 1.0]), &mut memo, &config).await;

        let topics: Vec<&str> = stm.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, ["b", "c"]);
    }

    #[tokio::test]
    async fn replaces_near_duplicate_in_place() {
        let config = MemoryConfig::default();
        let mut memo = EmbeddingMemo::new(&AxisEmbedder);
        let mut stm = ShortTermMemory::new(5);

        stm.upsert(chunk("a", "old", vec![1.0, 0.0]), &mut memo, &config).await;
        stm.upsert(chunk("b", "other", vec![0.0, 1.0]), &mut memo, &config).await;
        stm.upsert(chunk("a2", "new", vec![1.0, 0.0]), &mut memo, &config).await;

        let texts: Vec<&str> = stm.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["new", "other"]);
    }

    #[tokio::test]
    async fn merge_keeps_use_count_and_longer_topic() {
        let config = MemoryConfig::default();
        let mut memo = EmbeddingMemo::new(&AxisEmbedder);
        let mut stm = ShortTermMemory::new(5);

        let mut base = chunk("Fever care at home", "Drink fluids.", vec![1.0, 0.0]);
        base.use_count = 2;
        stm.upsert(base, &mut memo, &config).await;
        stm.upsert(chunk("Fever", "Take ibuprofen.", vec![0.8, 0.6]), &mut memo, &config)
            .await;

        assert_eq!(stm.len(), 1);
        let merged = stm.iter().next().unwrap();
        assert_eq!(merged.text, "Take ibuprofen. Drink fluids.");
        assert_eq!(merged.topic, "Fever care at home");
        assert_eq!(merged.use_count, 2);
        assert_eq!(merged.embedding, vec![1.0, 0.0]);
    }

    #[test]
    fn recent_returns_tail() {
        let mut stm = ShortTermMemory::new(5);
        for topic in ["a", "b", "c"] {
            stm.entries.push_back(chunk(topic, "x", vec![1.0]));
        }
        let topics: Vec<&str> = stm.recent(2).map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, ["b", "c"]);
        assert_eq!(stm.recent(10).count(), 3);
    }

    #[tokio::test]
    async fn replacement_leaves_no_near_duplicates() {
        let config = MemoryConfig::default();
        let mut memo = EmbeddingMemo::new(&AxisEmbedder);
        let mut stm = ShortTermMemory::new(5);
        let at = |degrees: f32| vec![degrees.to_radians().cos(), degrees.to_radians().sin()];

        stm.upsert(chunk("a", "Alpha.", at(0.0)), &mut memo, &config).await;
        stm.upsert(chunk("b", "Beta.", at(44.0)), &mut memo, &config).await;
        assert_eq!(stm.len(), 2);
        stm.upsert(chunk("c", "Gamma.", at(22.0)), &mut memo, &config).await;

        let texts: Vec<&str> = stm.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["Gamma."]);
    }
}
