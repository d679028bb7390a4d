//! The memory manager: per-user short-term and long-term memory behind one API.

use std::sync::Arc;

use cura_core::{ChunkRecord, EmbeddingModel, LanguageModel, Summarizer};
use tracing::{debug, info, warn};

use crate::config::MemoryConfig;
use crate::context::{ContextSources, contextual_prompt, fallback_summary, interpret_summary};
use crate::dedup::{ChunkCache, exchange_hash};
use crate::embedder::{EmbeddingMemo, embed_normalized};
use crate::error::MemoryError;
use crate::index::{HnswIndex, VectorIndex};
use crate::retry::retry;
use crate::state::UserMemoryState;
use crate::table::UserTable;
use crate::text::enrich_topic;
use crate::types::{MemoryChunk, MemorySnapshot, ScoredChunk};

/// Topic given to an answer stored raw because the summarizer was unavailable.
const FALLBACK_TOPIC: &str = "general";

/// Bounded, per-user conversational memory.
///
/// Every public operation is infallible: embedding, summarizer and language model failures are
/// logged and absorbed, so a chat turn can always proceed with whatever memory is available.
///
/// Model calls never run under a user's lock except to re-embed merged text, and never under
/// the global user table lock.
pub struct MemoryManager<E, S, L, I = HnswIndex> {
    embedder: E,
    summarizer: S,
    language_model: L,
    config: MemoryConfig,
    users: UserTable<UserMemoryState<I>>,
    chunk_cache: Arc<ChunkCache>,
}

impl<E, S, L, I> std::fmt::Debug for MemoryManager<E, S, L, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryManager")
            .field("config", &self.config)
            .field("users", &self.users)
            .field("chunk_cache", &self.chunk_cache.len())
            .finish_non_exhaustive()
    }
}

impl<E, S, L> MemoryManager<E, S, L, HnswIndex>
where
    E: EmbeddingModel,
    S: Summarizer,
    L: LanguageModel,
{
    /// Creates a manager backed by HNSW indexes.
    pub fn new(embedder: E, summarizer: S, language_model: L, config: MemoryConfig) -> Self {
        Self::new_with_index(embedder, summarizer, language_model, config)
    }
}

impl<E, S, L, I> MemoryManager<E, S, L, I>
where
    E: EmbeddingModel,
    S: Summarizer,
    L: LanguageModel,
    I: VectorIndex,
{
    /// Creates a manager backed by indexes of type `I`.
    pub fn new_with_index(
        embedder: E,
        summarizer: S,
        language_model: L,
        config: MemoryConfig,
    ) -> Self {
        Self {
            users: UserTable::new(config.max_users),
            chunk_cache: Arc::new(ChunkCache::new(config.chunk_cache_capacity)),
            embedder,
            summarizer,
            language_model,
            config,
        }
    }

    /// Replaces the chunk cache, e.g. to share one across managers.
    #[must_use]
    pub fn with_chunk_cache(mut self, cache: Arc<ChunkCache>) -> Self {
        self.chunk_cache = cache;
        self
    }

    /// The chunk cache in use.
    pub const fn chunk_cache(&self) -> &Arc<ChunkCache> {
        &self.chunk_cache
    }

    /// The active configuration.
    pub const fn config(&self) -> &MemoryConfig {
        &self.config
    }

    fn new_state(&self) -> UserMemoryState<I> {
        UserMemoryState::new(self.config.history_per_user, self.embedder.dim())
    }

    /// Remembers one completed conversational turn.
    ///
    /// The answer is chunked by the summarizer (or replayed from the chunk cache), then each
    /// chunk is upserted into short-term memory and the batch into long-term memory. Returns
    /// the summarizer records that were stored, with their original topics. An empty response
    /// only refreshes the user's recency.
    ///
    /// A user evicted while the answer is being chunked is recreated to receive it. A user reset
    /// in that window stays reset and nothing is stored.
    pub async fn add_exchange(
        &self,
        user_id: &str,
        query: &str,
        response: &str,
        lang: &str,
    ) -> Vec<ChunkRecord> {
        let handle = self.users.touch_or_create(user_id, || self.new_state());
        if response.trim().is_empty() {
            return Vec::new();
        }

        let records = self.chunk(query, response, lang).await;

        let mut memo = EmbeddingMemo::new(&self.embedder);
        let mut stored = Vec::with_capacity(records.len());
        let mut chunks = Vec::with_capacity(records.len());
        for record in records {
            let text = record.text.trim();
            if text.is_empty() {
                continue;
            }
            let topic = enrich_topic(&record.topic, text);
            match memo.embed(text).await {
                Ok(embedding) => {
                    stored.push(ChunkRecord::new(&record.topic, text));
                    chunks.push(MemoryChunk::new(topic, text, embedding));
                }
                Err(e) => warn!(user_id, error = %e, "failed to embed chunk, skipping"),
            }
        }

        let Some(handle) = self.users.reacquire(user_id, &handle, || self.new_state()) else {
            info!(user_id, "user was reset while chunking, dropping exchange");
            return Vec::new();
        };
        let mut state = handle.lock().await;
        state.record_exchange(query, response);
        for chunk in &chunks {
            state
                .short_term
                .upsert(chunk.clone(), &mut memo, &self.config)
                .await;
        }
        state
            .long_term
            .upsert_batch(chunks, &mut memo, &self.config)
            .await;

        debug!(
            user_id,
            chunks = stored.len(),
            short_term = state.short_term.len(),
            long_term = state.long_term.len(),
            "stored exchange"
        );
        stored
    }

    async fn chunk(&self, query: &str, response: &str, lang: &str) -> Vec<ChunkRecord> {
        let key = exchange_hash(query, response);
        if let Some(cached) = self.chunk_cache.get(key) {
            debug!("chunk cache hit");
            return cached;
        }

        let result = retry(&self.config.summarizer_retry, "summarizer", || {
            self.summarizer.summarize_and_chunk(response, lang, query)
        })
        .await;

        match result {
            Ok(records) => {
                self.chunk_cache.insert(key, records.clone());
                records
            }
            Err((attempts, source)) => {
                let error = MemoryError::Summarizer { attempts, source };
                warn!(error = %error, "storing raw response as a single chunk");
                vec![ChunkRecord::new(FALLBACK_TOPIC, response.trim())]
            }
        }
    }

    /// Long-term chunks relevant to `query`, rendered as `### Topic: <topic>\n<text>`.
    ///
    /// At most `top_k` chunks with cosine similarity of at least `min_sim` are returned, best
    /// ranked first. Unknown users get an empty list.
    pub async fn get_relevant_chunks(
        &self,
        user_id: &str,
        query: &str,
        top_k: usize,
        min_sim: f32,
    ) -> Vec<String> {
        self.search(user_id, query, top_k, min_sim)
            .await
            .iter()
            .map(|hit| hit.chunk.to_topic_block())
            .collect()
    }

    /// [`get_relevant_chunks`](Self::get_relevant_chunks) with the configured defaults.
    pub async fn relevant_chunks(&self, user_id: &str, query: &str) -> Vec<String> {
        self.get_relevant_chunks(
            user_id,
            query,
            self.config.default_top_k,
            self.config.min_similarity,
        )
        .await
    }

    /// Scored long-term search behind [`get_relevant_chunks`](Self::get_relevant_chunks).
    ///
    /// Every chunk the index considers has its use count bumped.
    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
        top_k: usize,
        min_sim: f32,
    ) -> Vec<ScoredChunk> {
        let Some(handle) = self.users.touch(user_id) else {
            return Vec::new();
        };
        if handle.lock().await.long_term.is_empty() {
            return Vec::new();
        }

        let vector = match embed_normalized(&self.embedder, query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(user_id, error = %e, "failed to embed query");
                return Vec::new();
            }
        };

        let mut state = handle.lock().await;
        match state
            .long_term
            .search(&vector, top_k, min_sim, &self.config)
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(user_id, error = %e, "long-term search failed");
                Vec::new()
            }
        }
    }

    /// Recent short-term entries as `Topic: <topic>\n<text>` lines, oldest first.
    pub async fn get_context(&self, user_id: &str, num_turns: usize) -> String {
        let Some(handle) = self.users.touch(user_id) else {
            return String::new();
        };
        let state = handle.lock().await;
        state
            .short_term
            .recent(num_turns)
            .map(MemoryChunk::to_context_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One paragraph summarizing what memory holds about `query`.
    ///
    /// Combines recent short-term entries with relevant long-term chunks and asks the language
    /// model to condense them. Returns an empty string when there is nothing to summarize or the
    /// model finds nothing relevant, and a local summary when the model fails.
    pub async fn get_contextual_chunks(&self, user_id: &str, query: &str, lang: &str) -> String {
        let Some(handle) = self.users.touch(user_id) else {
            return String::new();
        };

        let relevant = self.relevant_chunks(user_id, query).await;
        let sources = {
            let state = handle.lock().await;
            ContextSources {
                history: state
                    .short_term
                    .recent(self.config.context_turns)
                    .map(MemoryChunk::to_context_line)
                    .collect(),
                relevant,
                last_query: state.exchanges().last().map(|e| e.query.clone()),
            }
        };
        debug!(
            user_id,
            history = sources.history.len(),
            relevant = sources.relevant.len(),
            "gathered context"
        );
        if sources.is_empty() {
            return String::new();
        }

        let prompt = contextual_prompt(query, lang, &sources);
        match self.language_model.complete(&prompt).await {
            Ok(output) => interpret_summary(&output),
            Err(e) => {
                let error = MemoryError::LanguageModel(e);
                warn!(user_id, error = %error, "contextual summary failed, using local fallback");
                fallback_summary(&sources)
            }
        }
    }

    /// Forgets everything about `user_id`. Unknown users are ignored.
    pub fn reset(&self, user_id: &str) {
        if self.users.remove(user_id) {
            info!(user_id, "reset user memory");
        }
    }

    /// Copies out a user's memory without changing its recency.
    pub async fn snapshot(&self, user_id: &str) -> Option<MemorySnapshot> {
        let handle = self.users.peek(user_id)?;
        let state = handle.lock().await;
        Some(state.snapshot())
    }

    /// Tracked users, least recently used first.
    pub fn users(&self) -> Vec<String> {
        self.users.users()
    }

    /// Returns `true` if `user_id` currently has memory.
    pub fn contains_user(&self, user_id: &str) -> bool {
        self.users.contains(user_id)
    }
}
