//! Configuration for the memory engine.

use std::time::Duration;

use crate::retry::RetryConfig;

/// Capacities, similarity thresholds and ranking weights for a [`MemoryManager`](crate::MemoryManager).
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of users tracked at once; the least recently touched user is evicted.
    pub max_users: usize,
    /// Short-term entries (and raw exchanges) kept per user.
    pub history_per_user: usize,
    /// Long-term chunks kept per user.
    pub max_chunks: usize,
    /// Cosine similarity at or above which a new chunk replaces an existing one.
    pub duplicate_threshold: f32,
    /// Cosine similarity at or above which a new chunk is merged into an existing one.
    pub merge_threshold: f32,
    /// Token overlap ratio above which two sentences count as the same sentence when merging.
    pub sentence_overlap: f32,
    /// Age at which a chunk's relevance is halved.
    pub decay_half_life: Duration,
    /// Relevance boost per prior retrieval of a chunk.
    pub usage_boost: f32,
    /// Default number of chunks returned by relevance queries.
    pub default_top_k: usize,
    /// Default minimum cosine similarity for relevance queries.
    pub min_similarity: f32,
    /// Short-term entries fed into contextual summaries.
    pub context_turns: usize,
    /// Number of chunking results remembered by the chunk cache.
    pub chunk_cache_capacity: usize,
    /// Retry policy for the summarizer.
    pub summarizer_retry: RetryConfig,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_users: 1000,
            history_per_user: 20,
            max_chunks: 60,
            duplicate_threshold: 0.92,
            merge_threshold: 0.75,
            sentence_overlap: 0.8,
            decay_half_life: Duration::from_secs(300),
            usage_boost: 0.1,
            default_top_k: 3,
            min_similarity: 0.30,
            context_turns: 5,
            chunk_cache_capacity: 1024,
            summarizer_retry: RetryConfig::default(),
        }
    }
}

impl MemoryConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for custom configuration.
    #[must_use]
    pub fn builder() -> MemoryConfigBuilder {
        MemoryConfigBuilder::new()
    }
}

/// Builder for memory configuration.
#[derive(Debug, Default)]
pub struct MemoryConfigBuilder {
    config: MemoryConfig,
}

impl MemoryConfigBuilder {
    /// Creates a new configuration builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MemoryConfig::default(),
        }
    }

    /// Sets the maximum number of tracked users.
    #[must_use]
    pub const fn max_users(mut self, max_users: usize) -> Self {
        self.config.max_users = max_users;
        self
    }

    /// Sets the short-term capacity per user.
    #[must_use]
    pub const fn history_per_user(mut self, history: usize) -> Self {
        self.config.history_per_user = history;
        self
    }

    /// Sets the long-term capacity per user.
    #[must_use]
    pub const fn max_chunks(mut self, max_chunks: usize) -> Self {
        self.config.max_chunks = max_chunks;
        self
    }

    /// Sets the near-duplicate (replace) threshold.
    #[must_use]
    pub const fn duplicate_threshold(mut self, threshold: f32) -> Self {
        self.config.duplicate_threshold = threshold;
        self
    }

    /// Sets the partial-overlap (merge) threshold.
    #[must_use]
    pub const fn merge_threshold(mut self, threshold: f32) -> Self {
        self.config.merge_threshold = threshold;
        self
    }

    /// Sets the sentence overlap ratio used when merging texts.
    #[must_use]
    pub const fn sentence_overlap(mut self, ratio: f32) -> Self {
        self.config.sentence_overlap = ratio;
        self
    }

    /// Sets the relevance decay half-life.
    #[must_use]
    pub const fn decay_half_life(mut self, half_life: Duration) -> Self {
        self.config.decay_half_life = half_life;
        self
    }

    /// Sets the per-retrieval usage boost.
    #[must_use]
    pub const fn usage_boost(mut self, boost: f32) -> Self {
        self.config.usage_boost = boost;
        self
    }

    /// Sets the default number of chunks returned by relevance queries.
    #[must_use]
    pub const fn default_top_k(mut self, k: usize) -> Self {
        self.config.default_top_k = k;
        self
    }

    /// Sets the default minimum similarity for relevance queries.
    #[must_use]
    pub const fn min_similarity(mut self, min_sim: f32) -> Self {
        self.config.min_similarity = min_sim;
        self
    }

    /// Sets how many short-term entries feed contextual summaries.
    #[must_use]
    pub const fn context_turns(mut self, turns: usize) -> Self {
        self.config.context_turns = turns;
        self
    }

    /// Sets the chunk cache capacity.
    #[must_use]
    pub const fn chunk_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.chunk_cache_capacity = capacity;
        self
    }

    /// Sets the summarizer retry policy.
    #[must_use]
    pub fn summarizer_retry(mut self, retry: RetryConfig) -> Self {
        self.config.summarizer_retry = retry;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> MemoryConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MemoryConfig::default();
        assert_eq!(config.max_users, 1000);
        assert_eq!(config.history_per_user, 20);
        assert_eq!(config.max_chunks, 60);
        assert!((config.duplicate_threshold - 0.92).abs() < f32::EPSILON);
        assert!((config.merge_threshold - 0.75).abs() < f32::EPSILON);
        assert_eq!(config.decay_half_life, Duration::from_secs(300));
        assert_eq!(config.default_top_k, 3);
        assert!((config.min_similarity - 0.30).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_config() {
        let config = MemoryConfig::builder()
            .max_users(2)
            .history_per_user(4)
            .max_chunks(8)
            .duplicate_threshold(0.95)
            .merge_threshold(0.6)
            .decay_half_life(Duration::from_secs(60))
            .summarizer_retry(RetryConfig::none())
            .build();

        assert_eq!(config.max_users, 2);
        assert_eq!(config.history_per_user, 4);
        assert_eq!(config.max_chunks, 8);
        assert!((config.duplicate_threshold - 0.95).abs() < f32::EPSILON);
        assert!((config.merge_threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.decay_half_life, Duration::from_secs(60));
        assert_eq!(config.summarizer_retry.max_retries, 0);
    }
}
