//! Offline walk-through of cura's conversational memory.
//!
//! Uses a bag-of-words hashing embedder and a canned language model, so it runs without any
//! API key. Shows chunking, merging, relevance retrieval, contextual summaries and reset.
//!
//! Run: `RUST_LOG=cura_memory=debug cargo run --example medical_memory`

use anyhow::Result;
use cura::memory::{LlmChunker, MemoryConfig, MemoryManager};
use cura::{EmbeddingModel, LanguageModel};
use tracing_subscriber::EnvFilter;

const DIMENSION: usize = 64;

/// Hashes each lowercase word into one of [`DIMENSION`] buckets.
#[derive(Debug, Clone, Copy)]
struct HashingEmbedder;

impl EmbeddingModel for HashingEmbedder {
    fn dim(&self) -> usize {
        DIMENSION
    }

    async fn embed(&self, text: &str) -> cura::Result<Vec<f32>> {
        let mut vector = vec![0.0; DIMENSION];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| w.len() > 3) {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(0usize, |hash, byte| hash.wrapping_mul(31).wrapping_add(byte.into()));
            vector[bucket % DIMENSION] += 1.0;
        }
        Ok(vector)
    }
}

/// Pretends to be a hosted model: chunks by paragraph and summarizes by quoting.
#[derive(Debug, Clone, Copy)]
struct CannedModel;

impl LanguageModel for CannedModel {
    async fn complete(&self, prompt: &str) -> cura::Result {
        if prompt.contains("Available context information") {
            return Ok("The patient is managing a fever at home with ibuprofen and fluids.".into());
        }

        let response = prompt
            .split("------------------------")
            .nth(1)
            .unwrap_or_default();
        Ok(response
            .split("\n\n")
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| format!("Topic: {}\n{part}", part.split('.').next().unwrap_or(part)))
            .collect::<Vec<_>>()
            .join("\n---\n"))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let memory = MemoryManager::new(
        HashingEmbedder,
        LlmChunker::new(CannedModel),
        CannedModel,
        MemoryConfig::builder().max_chunks(8).build(),
    );

    let turns = [
        (
            "I have had a fever since yesterday.",
            "Fever in adults usually settles within three days. Take 400 mg ibuprofen every eight hours with food.\n\nDrink plenty of fluids and rest.",
        ),
        (
            "Also a red itchy rash on my arm.",
            "An itchy rash often responds to 1% hydrocortisone cream twice daily. Avoid scratching.",
        ),
        (
            "Can I keep taking ibuprofen for the fever?",
            "Fever in adults usually settles within three days. Take 400 mg ibuprofen every eight hours with food. Stop if stomach pain appears.",
        ),
    ];

    for (question, answer) in turns {
        let stored = memory.add_exchange("patient-42", question, answer, "EN").await;
        println!("stored {} chunk(s) for {question:?}", stored.len());
    }

    if let Some(snapshot) = memory.snapshot("patient-42").await {
        println!("\nlong-term memory:");
        for chunk in &snapshot.long_term {
            println!("- [{}] {}", chunk.topic, chunk.text);
        }
    }

    println!("\nrelevant to \"ibuprofen dose\":");
    for block in memory
        .get_relevant_chunks("patient-42", "ibuprofen dose for fever", 3, 0.2)
        .await
    {
        println!("{block}\n");
    }

    println!("recent context:\n{}\n", memory.get_context("patient-42", 3).await);

    let summary = memory
        .get_contextual_chunks("patient-42", "Is my fever getting better?", "EN")
        .await;
    println!("contextual summary: {summary}");

    memory.reset("patient-42");
    println!("after reset, tracked users: {:?}", memory.users());
    Ok(())
}
