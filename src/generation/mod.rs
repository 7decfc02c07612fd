//! Vocabulary generation abstraction.

mod gemini;

pub use gemini::GeminiGenerator;

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// One generated vocabulary entry.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub example_phrase: Option<String>,
}

/// Request for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Topic the vocabulary should cover (e.g. "food", "travel").
    pub topic: String,
    /// How many entries to produce.
    pub count: usize,
    /// Language the vocabulary is in, as prompt wording (e.g. "German").
    pub language: String,
    /// Best-effort summary of existing deck content, to steer the model
    /// away from duplicates.
    pub existing_summary: String,
}

/// Trait for vocabulary generation backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate vocabulary entries for a request.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<VocabEntry>>;
}
