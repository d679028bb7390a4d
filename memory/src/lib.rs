//! Bounded two-tier conversational memory for retrieval-augmented assistants.
//!
//! [`MemoryManager`] keeps, per user, a small recency-ordered **short-term memory** of topic
//! summaries and a larger vector-indexed **long-term memory** of semantic chunks. Each completed
//! turn is chunked by a [`Summarizer`](cura_core::Summarizer), and every chunk is upserted with
//! a three-way rule:
//!
//! | Closest existing entry | Action |
//! |------------------------|--------|
//! | cosine ≥ `duplicate_threshold` (0.92) | replace it in place |
//! | cosine ≥ `merge_threshold` (0.75) | merge the texts, keep its use count |
//! | otherwise | append a new entry |
//!
//! Both tiers are bounded and evict oldest-first; the user table itself is an LRU capped at
//! `max_users`. Long-term indexes are never mutated: each change builds a fresh index from the
//! retained vectors before swapping it in.
//!
//! Relevance queries rank by `similarity * decay * (1 + usage_boost * use_count)`, where
//! `decay = 1 / (1 + age / half_life)`.
//!
//! ```rust,no_run
//! use cura_memory::{LlmChunker, MemoryConfig, MemoryManager};
//! # use cura_core::{EmbeddingModel, LanguageModel};
//! # #[derive(Clone)] struct Model;
//! # impl LanguageModel for Model { async fn complete(&self, _: &str) -> cura_core::Result { Ok(String::new()) } }
//! # impl EmbeddingModel for Model { fn dim(&self) -> usize { 384 } async fn embed(&self, _: &str) -> cura_core::Result<Vec<f32>> { Ok(vec![0.0; 384]) } }
//!
//! # async fn run(model: Model) {
//! let memory = MemoryManager::new(
//!     model.clone(),
//!     LlmChunker::new(model.clone()),
//!     model,
//!     MemoryConfig::default(),
//! );
//!
//! memory
//!     .add_exchange("u1", "I have a fever", "Take 400 mg ibuprofen and rest.", "EN")
//!     .await;
//! let context = memory.relevant_chunks("u1", "fever medication").await;
//! # }
//! ```

mod chunker;
mod config;
mod context;
mod dedup;
mod embedder;
mod error;
pub mod index;
mod long_term;
mod manager;
mod retry;
pub mod scoring;
mod short_term;
mod state;
mod table;
pub mod text;
mod types;
mod upsert;

pub use chunker::{LlmChunker, parse_chunks};
pub use config::{MemoryConfig, MemoryConfigBuilder};
pub use dedup::{ChunkCache, content_hash, exchange_hash};
pub use error::{MemoryError, Result};
pub use long_term::LongTermMemory;
pub use manager::MemoryManager;
pub use retry::RetryConfig;
pub use short_term::ShortTermMemory;
pub use state::UserMemoryState;
pub use table::{UserHandle, UserTable};
pub use types::{Exchange, MemoryChunk, MemorySnapshot, ScoredChunk};
