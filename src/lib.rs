//! # cura
//!
//! Façade crate for cura's conversational memory. It re-exports the collaborator traits from
//! [`cura_core`] and, behind the default `memory` feature, the memory engine from
//! [`cura_memory`] as [`memory`].
//!
//! ## What's inside?
//!
//! - [`EmbeddingModel`], [`LanguageModel`] and [`Summarizer`]: the three capabilities a chat
//!   orchestrator plugs in.
//! - [`memory::MemoryManager`]: bounded, per-user short-term and long-term memory with semantic
//!   dedup, merging, time-decayed ranking and LRU eviction of whole users.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cura::memory::{LlmChunker, MemoryConfig, MemoryManager};
//! use cura::{EmbeddingModel, LanguageModel};
//!
//! async fn turn<M>(model: M, user: &str, question: &str, answer: &str) -> Vec<String>
//! where
//!     M: EmbeddingModel + LanguageModel + Clone,
//! {
//!     let memory = MemoryManager::new(
//!         model.clone(),
//!         LlmChunker::new(model.clone()),
//!         model,
//!         MemoryConfig::default(),
//!     );
//!     memory.add_exchange(user, question, answer, "EN").await;
//!     memory.relevant_chunks(user, question).await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cura_core::embedding`]: text to vectors, normalization and cosine similarity.
//! - [`cura_core::llm`]: prompt completion.
//! - [`cura_core::summarize`]: chunking answers into topic-tagged records.
//! - [`memory`]: the memory engine.

pub use cura_core::*;

#[cfg(feature = "memory")]
#[doc(inline)]
pub use cura_memory as memory;
