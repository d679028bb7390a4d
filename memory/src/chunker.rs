//! Language-model-backed chunking of assistant answers.

use cura_core::{ChunkRecord, LanguageModel, Summarizer};
use tracing::debug;

/// Parts of the model output are separated by this marker.
const PART_SEPARATOR: &str = "---";
/// Lines ending in `:` with at most this many words are treated as headings.
const MAX_HEADING_WORDS: usize = 8;
/// Fallback topics take this many leading words.
const FALLBACK_TOPIC_WORDS: usize = 3;

/// A [`Summarizer`] that asks a language model to split and condense an answer.
///
/// The model is prompted to emit parts separated by `---` lines, each opening with a
/// `Topic: ...` line. Errors from the model are returned as-is.
#[derive(Debug, Clone)]
pub struct LlmChunker<L> {
    model: L,
}

impl<L: LanguageModel> LlmChunker<L> {
    /// Wraps `model`.
    pub const fn new(model: L) -> Self {
        Self { model }
    }
}

impl<L: LanguageModel> Summarizer for LlmChunker<L> {
    async fn summarize_and_chunk(
        &self,
        response: &str,
        lang: &str,
        question: &str,
    ) -> cura_core::Result<Vec<ChunkRecord>> {
        if response.trim().is_empty() {
            return Ok(Vec::new());
        }

        let prompt = chunk_prompt(response, lang, question);
        let output = self.model.complete(&prompt).await?;
        let chunks = parse_chunks(&output);
        debug!(parts = chunks.len(), "chunked response");
        Ok(chunks)
    }
}

fn chunk_prompt(response: &str, lang: &str, question: &str) -> String {
    format!(
        "{}\nLanguage of the response: {lang}\nUser's latest question (context): {question}\n------------------------\n{response}\n------------------------",
        include_str!("../prompts/chunker.txt"),
    )
}

/// Splits model output into topic-tagged records.
///
/// Blank parts are dropped and the `Topic:` line is removed from the stored text.
#[must_use]
pub fn parse_chunks(output: &str) -> Vec<ChunkRecord> {
    output
        .split(PART_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match topic_line(part) {
            Some((index, topic)) => {
                let text = part
                    .lines()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, line)| line)
                    .collect::<Vec<_>>()
                    .join("\n");
                Some(ChunkRecord::new(topic, text.trim()))
            }
            None => {
                let body = part
                    .lines()
                    .filter(|line| !is_bare_topic_line(line))
                    .collect::<Vec<_>>()
                    .join("\n");
                let body = body.trim();
                (!body.is_empty()).then(|| ChunkRecord::new(heading_or_lead(body), body))
            }
        })
        .collect()
}

/// A `Topic:` line with nothing after it.
fn is_bare_topic_line(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("topic:")
}

/// Finds a `Topic: ...` line (case-insensitive), returning its line index and value.
fn topic_line(part: &str) -> Option<(usize, String)> {
    part.lines().enumerate().find_map(|(index, line)| {
        let line = line.trim_start();
        let prefix = line.get(..6)?;
        if !prefix.eq_ignore_ascii_case("topic:") {
            return None;
        }
        let topic = line[6..].trim();
        (!topic.is_empty()).then(|| (index, topic.to_owned()))
    })
}

/// Topic for a part without a `Topic:` line: a short heading, else its first few words.
fn heading_or_lead(part: &str) -> String {
    let heading = part.lines().map(str::trim).find(|line| {
        line.ends_with(':')
            && line.split_whitespace().count() <= MAX_HEADING_WORDS
            && !is_bare_topic_line(line)
    });
    if let Some(heading) = heading {
        return heading.trim_end_matches(':').trim().to_owned();
    }

    part.split_whitespace()
        .take(FALLBACK_TOPIC_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([':', '.', ','])
        .to_owned()
}
