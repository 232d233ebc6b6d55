//! Capability traits for pluggable backends
//!
//! The embedding-model provider and the LLM provider are external
//! collaborators; the core consumes them only through these seams. Errors
//! from both are non-fatal at the caller.

use async_trait::async_trait;

use crate::error::Result;

/// Produces fixed-dimension dense vectors for documents and queries.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Encode a single text into a vector of exactly `dim()` elements
    async fn encode_one(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode a batch of texts; implementations batch on the provider
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Fixed output dimension
    fn dim(&self) -> usize;
}

/// Large-model chat scorer used for reranking, intent augmentation, answer
/// generation and zero-result recovery.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Single-turn chat completion returning the raw response text
    async fn chat(
        &self,
        system: &str,
        user: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String>;

    /// Cheap availability probe; defaults to optimistic
    async fn is_available(&self) -> bool {
        true
    }

    /// Model identifier for telemetry
    fn model_name(&self) -> &str;

    /// Rough token estimate for prompt budgeting and cost accounting when the
    /// provider does not report usage (~4 characters per token for English).
    fn estimate_tokens(&self, text: &str) -> usize {
        text.chars().count().max(1) / 4
    }
}
