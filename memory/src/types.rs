//! Core types for the memory crate.

use cura_core::Embedding;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A single memory entry, shared by the short-term and long-term tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryChunk {
    /// Stable identifier, kept across merges.
    pub id: Uuid,
    /// Short human-readable label.
    pub topic: String,
    /// Condensed semantic content.
    pub text: String,
    /// Unit-norm embedding of `text`, cached to avoid re-embedding.
    pub embedding: Embedding,
    /// Set at insert and refreshed on replace or merge.
    pub created_at: OffsetDateTime,
    /// Number of times a relevance query looked this chunk up.
    pub use_count: u32,
}

impl MemoryChunk {
    /// Creates a fresh chunk stamped with the current time.
    pub fn new(topic: impl Into<String>, text: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            text: text.into(),
            embedding,
            created_at: OffsetDateTime::now_utc(),
            use_count: 0,
        }
    }

    /// Overrides the creation timestamp.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Seconds elapsed between creation and `now`, clamped at zero.
    #[must_use]
    pub fn age_seconds(&self, now: OffsetDateTime) -> f64 {
        (now - self.created_at).as_seconds_f64().max(0.0)
    }

    /// Renders the chunk the way relevance queries return it.
    #[must_use]
    pub fn to_topic_block(&self) -> String {
        format!("### Topic: {}\n{}", self.topic, self.text)
    }

    /// Renders the chunk the way short-term context dumps it.
    #[must_use]
    pub fn to_context_line(&self) -> String {
        format!("Topic: {}\n{}", self.topic, self.text)
    }
}

/// A raw conversational turn, kept verbatim in the per-user exchange log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// The user's question.
    pub query: String,
    /// The assistant's final answer.
    pub response: String,
    /// When the exchange was recorded.
    pub at: OffsetDateTime,
}

/// A long-term chunk returned by a relevance query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matching chunk, as it was after its use count was bumped.
    pub chunk: MemoryChunk,
    /// Raw cosine similarity to the query.
    pub similarity: f32,
    /// Decayed, usage-boosted ranking score.
    pub score: f32,
}

/// Point-in-time copy of one user's memory, for inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Short-term entries, oldest first.
    pub short_term: Vec<MemoryChunk>,
    /// Long-term chunks in index order.
    pub long_term: Vec<MemoryChunk>,
    /// Raw exchange log, oldest first.
    pub exchanges: Vec<Exchange>,
}
