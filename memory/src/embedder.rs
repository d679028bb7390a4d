//! Normalizing, memoizing access to the embedding model.

use std::collections::HashMap;

use cura_core::{Embedding, EmbeddingModel, embedding::normalize};

use crate::dedup::content_hash;
use crate::error::{MemoryError, Result};

/// Embeds texts for one operation, calling the model at most once per distinct text.
///
/// Every vector handed out is L2-normalized and has the model's declared dimension.
pub(crate) struct EmbeddingMemo<'a, E> {
    model: &'a E,
    vectors: HashMap<u64, Embedding>,
}

impl<'a, E: EmbeddingModel> EmbeddingMemo<'a, E> {
    pub(crate) fn new(model: &'a E) -> Self {
        Self {
            model,
            vectors: HashMap::new(),
        }
    }

    pub(crate) async fn embed(&mut self, text: &str) -> Result<Embedding> {
        let key = content_hash(text);
        if let Some(vector) = self.vectors.get(&key) {
            return Ok(vector.clone());
        }

        let vector = embed_normalized(self.model, text).await?;
        self.vectors.insert(key, vector.clone());
        Ok(vector)
    }
}

/// Embeds `text` once, checks the dimension and normalizes the result.
pub(crate) async fn embed_normalized<E: EmbeddingModel>(model: &E, text: &str) -> Result<Embedding> {
    let vector = model.embed(text).await.map_err(MemoryError::Embedding)?;
    if vector.len() != model.dim() {
        return Err(MemoryError::DimensionMismatch {
            expected: model.dim(),
            actual: vector.len(),
        });
    }
    Ok(normalize(vector))
}
