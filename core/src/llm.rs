//! # Language Models
//!
//! The memory engine needs exactly one capability from a hosted model: turn a prompt into
//! text. Chat history, tool calls and streaming belong to the orchestrator, so the trait here
//! stays a single method that any provider client can implement in a few lines.
//!
//! ```rust
//! use cura_core::LanguageModel;
//!
//! struct Echo;
//!
//! impl LanguageModel for Echo {
//!     async fn complete(&self, prompt: &str) -> cura_core::Result {
//!         Ok(prompt.to_owned())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! assert_eq!(Echo.complete("hello").await.unwrap(), "hello");
//! # });
//! ```

use core::future::Future;

/// Completes a prompt with a hosted or local language model.
///
/// Implementations should bound their own network timeouts; callers treat any error as
/// "model unavailable" and fall back to local behavior.
pub trait LanguageModel: Send + Sync {
    /// Sends `prompt` to the model and returns the generated text.
    fn complete(&self, prompt: &str) -> impl Future<Output = crate::Result> + Send;
}

impl<T: LanguageModel> LanguageModel for &T {
    fn complete(&self, prompt: &str) -> impl Future<Output = crate::Result> + Send {
        (**self).complete(prompt)
    }
}
