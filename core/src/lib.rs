//! # cura-core
//!
//! `cura-core` hosts the trait APIs that the memory engine depends on but never
//! implements itself. A chat-turn orchestrator plugs real providers in behind these traits;
//! tests plug in deterministic doubles.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │  Chat handler   │───▶│   cura-memory    │───▶│   cura-core     │
//! │                 │    │                  │    │                 │
//! │ - add_exchange  │    │ - STM / LTM      │    │ - EmbeddingModel│
//! │ - get_context   │    │ - vector index   │    │ - LanguageModel │
//! │ - reset         │    │ - user LRU       │    │ - Summarizer    │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! ## Capabilities
//!
//! | Capability | Trait | Description |
//! |------------|-------|-------------|
//! | **Embeddings** | [`EmbeddingModel`] | Convert text to vectors for semantic comparison |
//! | **Completion** | [`LanguageModel`] | Turn a prompt into text |
//! | **Chunking** | [`Summarizer`] | Split an answer into topic-tagged summaries |
//!
//! ## Example
//!
//! ```rust
//! use cura_core::{EmbeddingModel, embedding::{cosine_similarity, normalize}};
//!
//! async fn similarity(model: &impl EmbeddingModel, a: &str, b: &str) -> cura_core::Result<f32> {
//!     let lhs = normalize(model.embed(a).await?);
//!     let rhs = normalize(model.embed(b).await?);
//!     Ok(cosine_similarity(&lhs, &rhs))
//! }
//! ```

/// Text embeddings and vector helpers.
pub mod embedding;
/// Prompt completion.
pub mod llm;
/// Response chunking into topic-tagged records.
pub mod summarize;

#[doc(inline)]
pub use embedding::{Embedding, EmbeddingModel};
#[doc(inline)]
pub use llm::LanguageModel;
#[doc(inline)]
pub use summarize::{ChunkRecord, Summarizer};

/// Result type used by every collaborator trait.
///
/// Type alias for [`anyhow::Result<T>`](anyhow::Result) with [`String`] as default success type.
pub type Result<T = String> = anyhow::Result<T>;

pub use anyhow::Error;
