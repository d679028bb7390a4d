//! Replace / merge / append placement shared by both memory tiers.

use cura_core::{EmbeddingModel, embedding::cosine_similarity};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::config::MemoryConfig;
use crate::embedder::EmbeddingMemo;
use crate::text::merge_texts;
use crate::types::MemoryChunk;

/// Where an incoming chunk goes relative to the existing entries of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// Near-duplicate of the entry at this position: supersede it.
    Replace(usize),
    /// Partial overlap with the entry at this position: fold both texts together.
    Merge(usize),
    /// Nothing similar enough: add a new entry.
    Append,
}

/// Picks a placement by comparing `vector` against every existing entry.
///
/// The first entry with the highest similarity wins.
pub(crate) fn place<'a>(
    existing: impl IntoIterator<Item = &'a MemoryChunk>,
    vector: &[f32],
    config: &MemoryConfig,
) -> Placement {
    let mut best: Option<(usize, f32)> = None;
    for (position, entry) in existing.into_iter().enumerate() {
        let similarity = cosine_similarity(&entry.embedding, vector);
        if best.is_none_or(|(_, top)| similarity > top) {
            best = Some((position, similarity));
        }
    }

    match best {
        Some((position, similarity)) if similarity >= config.duplicate_threshold => {
            Placement::Replace(position)
        }
        Some((position, similarity)) if similarity >= config.merge_threshold => {
            Placement::Merge(position)
        }
        _ => Placement::Append,
    }
}

/// Folds `incoming` into `base`.
///
/// The merged text keeps every sentence of the incoming chunk plus the base sentences it lacks,
/// the longer topic wins, and the base keeps its id and use count. If the merged text cannot be
/// embedded, the incoming chunk simply replaces the base.
pub(crate) async fn merge_into<E: EmbeddingModel>(
    base: &mut MemoryChunk,
    incoming: MemoryChunk,
    memo: &mut EmbeddingMemo<'_, E>,
    config: &MemoryConfig,
) {
    let text = merge_texts(&incoming.text, &base.text, config.sentence_overlap);
    let embedding = match memo.embed(&text).await {
        Ok(embedding) => embedding,
        Err(e) => {
            warn!(error = %e, "failed to embed merged text, replacing instead");
            *base = incoming;
            return;
        }
    };

    if incoming.topic.chars().count() >= base.topic.chars().count() {
        base.topic = incoming.topic;
    }
    base.text = text;
    base.embedding = embedding;
    base.created_at = OffsetDateTime::now_utc();
}

/// Drops every other entry that is a near-duplicate of the entry at `position`.
///
/// Called after a replace or merge rewrites that entry's vector. The surviving entry keeps the
/// highest use count among those it absorbed. Returns the surviving entry's new position.
pub(crate) fn absorb_duplicates(
    entries: &mut Vec<MemoryChunk>,
    position: usize,
    config: &MemoryConfig,
) -> usize {
    let anchor = entries[position].embedding.clone();
    let mut survivor = position;
    let mut use_count = entries[position].use_count;
    let mut absorbed = 0usize;

    let mut index = 0;
    entries.retain(|entry| {
        let current = index;
        index += 1;
        if current == position
            || cosine_similarity(&entry.embedding, &anchor) < config.duplicate_threshold
        {
            return true;
        }
        use_count = use_count.max(entry.use_count);
        absorbed += 1;
        if current < position {
            survivor -= 1;
        }
        false
    });

    if absorbed > 0 {
        entries[survivor].use_count = use_count;
        debug!(absorbed, "absorbed near-duplicate entries");
    }
    survivor
}
