//! Sentence-level text utilities used by merging and topic handling.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// Topics shorter than this many words are considered too generic.
const MIN_TOPIC_WORDS: usize = 5;
/// Topics shorter than this many characters are considered too generic.
const MIN_TOPIC_CHARS: usize = 20;
/// Enriched topics are capped at this many words.
const MAX_TOPIC_WORDS: usize = 16;

/// Splits text into trimmed, non-empty sentences.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn word_set(text: &str) -> HashSet<String> {
    text.unicode_words().map(str::to_lowercase).collect()
}

/// Jaccard overlap of the lowercase word sets of two sentences.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overlap_ratio(a: &str, b: &str) -> f32 {
    let lhs = word_set(a);
    let rhs = word_set(b);
    if lhs.is_empty() || rhs.is_empty() {
        return 0.0;
    }
    let shared = lhs.intersection(&rhs).count();
    let union = lhs.union(&rhs).count();
    shared as f32 / union as f32
}

/// Merges two overlapping texts.
///
/// The result is every sentence of `new_text`, followed by the sentences of `old_text` that
/// are not already present. A sentence is present when it matches an already merged sentence
/// case-insensitively, or shares more than `max_overlap` of its words with one.
#[must_use]
pub fn merge_texts(new_text: &str, old_text: &str, max_overlap: f32) -> String {
    let mut merged: Vec<&str> = split_sentences(new_text);
    let seen: HashSet<String> = merged.iter().map(|s| s.to_lowercase()).collect();

    for sentence in split_sentences(old_text) {
        if seen.contains(&sentence.to_lowercase()) {
            continue;
        }
        if merged
            .iter()
            .any(|kept| overlap_ratio(sentence, kept) > max_overlap)
        {
            continue;
        }
        merged.push(sentence);
    }

    merged.join(" ")
}

/// Replaces a short or generic topic with the opening sentence of its text.
///
/// Runs locally, without a model call.
#[must_use]
pub fn enrich_topic(topic: &str, text: &str) -> String {
    let topic = topic.trim();
    if topic.split_whitespace().count() >= MIN_TOPIC_WORDS && topic.chars().count() >= MIN_TOPIC_CHARS
    {
        return topic.to_owned();
    }
    let Some(first) = split_sentences(text).into_iter().next() else {
        return topic.to_owned();
    };
    let capped = first
        .split_whitespace()
        .take(MAX_TOPIC_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    capped.trim_end_matches(':').trim().to_owned()
}

/// Truncates to at most `max_chars` characters, on a char boundary.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
