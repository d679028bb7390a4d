//! # Summarization and Chunking
//!
//! A [`Summarizer`] condenses one assistant answer into zero or more [`ChunkRecord`]s, each a
//! topic-tagged summary of a semantically distinct part of the answer. These records are the
//! atomic units the memory engine stores.

use core::future::Future;

use serde::{Deserialize, Serialize};

/// A topic-tagged fragment of summarized conversational content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Short human-readable label.
    pub topic: String,
    /// Condensed semantic content.
    pub text: String,
}

impl ChunkRecord {
    /// Creates a new record.
    pub fn new(topic: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            text: text.into(),
        }
    }
}

/// Splits an answer into topic-tagged summaries.
///
/// Usually backed by a language model call. Implementations may fail; callers are expected to
/// retry with a bound and fall back to storing the raw answer.
pub trait Summarizer: Send + Sync {
    /// Chunks `response`, using `question` as context and `lang` as a language hint.
    fn summarize_and_chunk(
        &self,
        response: &str,
        lang: &str,
        question: &str,
    ) -> impl Future<Output = crate::Result<Vec<ChunkRecord>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ParagraphSummarizer;

    impl Summarizer for ParagraphSummarizer {
        async fn summarize_and_chunk(
            &self,
            response: &str,
            _lang: &str,
            _question: &str,
        ) -> crate::Result<Vec<ChunkRecord>> {
            Ok(response
                .split("\n\n")
                .filter(|part| !part.trim().is_empty())
                .map(|part| ChunkRecord::new("general", part.trim()))
                .collect())
        }
    }

    #[tokio::test]
    async fn splits_into_records() {
        let chunks = ParagraphSummarizer
            .summarize_and_chunk("Rest.\n\nDrink fluids.", "EN", "flu?")
            .await
            .unwrap();
        assert_eq!(
            chunks,
            vec![
                ChunkRecord::new("general", "Rest."),
                ChunkRecord::new("general", "Drink fluids.")
            ]
        );
    }

    #[test]
    fn record_serializes_as_object() {
        let json = serde_json::to_string(&ChunkRecord::new("fever", "Take fluids.")).unwrap();
        assert_eq!(json, r#"{"topic":"fever","text":"Take fluids."}"#);
    }
}
