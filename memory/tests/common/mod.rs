//! Deterministic test doubles for the memory manager.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cura_core::{ChunkRecord, EmbeddingModel, LanguageModel, Summarizer};
use cura_memory::{MemoryConfig, MemoryManager, RetryConfig};

/// Words the keyword embedder knows about; each owns one axis.
pub const VOCABULARY: [&str; 12] = [
    "fever",
    "ibuprofen",
    "fluids",
    "rest",
    "dry",
    "honey",
    "rash",
    "cream",
    "itch",
    "cough",
    "headache",
    "water",
];

/// Embeds text as a presence vector over [`VOCABULARY`].
#[derive(Debug, Default, Clone)]
pub struct KeywordEmbedder;

impl EmbeddingModel for KeywordEmbedder {
    fn dim(&self) -> usize {
        VOCABULARY.len()
    }

    async fn embed(&self, text: &str) -> cura_core::Result<Vec<f32>> {
        let mut vector = vec![0.0; VOCABULARY.len()];
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            let word = word.to_lowercase();
            if let Some(axis) = VOCABULARY.iter().position(|known| *known == word) {
                vector[axis] = 1.0;
            }
        }
        Ok(vector)
    }
}

/// Places a few known texts at fixed angles on the unit circle; anything else sits at 90°.
#[derive(Debug, Clone, Copy)]
pub struct AngleEmbedder;

impl AngleEmbedder {
    pub const TEXTS: [(&'static str, f32); 3] = [("Alpha.", 0.0), ("Beta.", 44.0), ("Gamma.", 22.0)];
}

impl EmbeddingModel for AngleEmbedder {
    fn dim(&self) -> usize {
        2
    }

    async fn embed(&self, text: &str) -> cura_core::Result<Vec<f32>> {
        let degrees = Self::TEXTS
            .iter()
            .find(|(known, _)| *known == text.trim())
            .map_or(90.0_f32, |(_, degrees)| *degrees);
        let radians = degrees.to_radians();
        Ok(vec![radians.cos(), radians.sin()])
    }
}

/// A [`ParagraphSummarizer`] that waits on `gate` before chunking `gated`.
#[derive(Debug, Clone)]
pub struct GatedSummarizer {
    pub gate: Arc<async_lock::Mutex<()>>,
    pub gated: String,
    pub inner: ParagraphSummarizer,
}

impl GatedSummarizer {
    pub fn new(gate: Arc<async_lock::Mutex<()>>, gated: &str) -> Self {
        Self {
            gate,
            gated: gated.to_owned(),
            inner: ParagraphSummarizer::default(),
        }
    }
}

impl Summarizer for GatedSummarizer {
    async fn summarize_and_chunk(
        &self,
        response: &str,
        lang: &str,
        question: &str,
    ) -> cura_core::Result<Vec<ChunkRecord>> {
        if response == self.gated {
            let _open = self.gate.lock().await;
        }
        self.inner.summarize_and_chunk(response, lang, question).await
    }
}

/// Splits responses on blank lines, tagging every part "general", and counts calls.
#[derive(Debug, Default, Clone)]
pub struct ParagraphSummarizer {
    pub calls: Arc<AtomicUsize>,
}

impl ParagraphSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Summarizer for ParagraphSummarizer {
    async fn summarize_and_chunk(
        &self,
        response: &str,
        _lang: &str,
        _question: &str,
    ) -> cura_core::Result<Vec<ChunkRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(response
            .split("\n\n")
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| ChunkRecord::new("general", part))
            .collect())
    }
}

/// Always fails, counting attempts.
#[derive(Debug, Default, Clone)]
pub struct FailingSummarizer {
    pub calls: Arc<AtomicUsize>,
}

impl FailingSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Summarizer for FailingSummarizer {
    async fn summarize_and_chunk(
        &self,
        _response: &str,
        _lang: &str,
        _question: &str,
    ) -> cura_core::Result<Vec<ChunkRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("summarizer unavailable"))
    }
}

/// Replies with a fixed answer, or fails when none is set, and counts calls.
#[derive(Debug, Default, Clone)]
pub struct ScriptedModel {
    pub reply: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_owned()),
            calls: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LanguageModel for ScriptedModel {
    async fn complete(&self, _prompt: &str) -> cura_core::Result {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("model unavailable"))
    }
}

pub type TestManager<S = ParagraphSummarizer> = MemoryManager<KeywordEmbedder, S, ScriptedModel>;

/// Default config with retries that never sleep.
pub fn config() -> MemoryConfig {
    MemoryConfig::builder()
        .summarizer_retry(RetryConfig::immediate(2))
        .build()
}

pub fn manager(config: MemoryConfig) -> (TestManager, ParagraphSummarizer) {
    let summarizer = ParagraphSummarizer::default();
    let manager = MemoryManager::new(
        KeywordEmbedder,
        summarizer.clone(),
        ScriptedModel::failing(),
        config,
    );
    (manager, summarizer)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
