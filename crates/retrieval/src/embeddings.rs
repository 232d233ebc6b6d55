//! Text embeddings
//!
//! Dense vectors come from an ordered provider chain: a local ONNX model
//! when the `onnx` feature is enabled (preferred, free, batch-capable), an
//! OpenAI-compatible embeddings API, and finally a deterministic hash-based
//! vector flagged as low quality in the logs. A failing batch falls through
//! the chain and lands on zero vectors rather than failing sibling batches.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use searchlight_config::constants::search as tuning;
use searchlight_core::{Embedder, Error, Result};

/// Truncate on a char boundary; embedding providers all cap input length
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

fn pad_or_truncate(mut embedding: Vec<f32>, dim: usize) -> Vec<f32> {
    if embedding.len() < dim {
        embedding.resize(dim, 0.0);
    } else {
        embedding.truncate(dim);
    }
    embedding
}

/// Deterministic hash-based embedding, the last-resort provider.
///
/// Not semantic; only keeps the pipeline shape intact when every real
/// provider is down.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let digest = format!("{:x}", md5::compute(text.as_bytes()));
        let mut embedding: Vec<f32> = digest
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            })
            .map(|value| value as f32 / 255.0)
            .collect();
        embedding = pad_or_truncate(embedding, self.dim);
        embedding
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// OpenAI-compatible embeddings API client
pub struct ApiEmbedder {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    dim: usize,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingsItem>,
}

#[derive(Deserialize)]
struct EmbeddingsItem {
    embedding: Vec<f32>,
}

impl ApiEmbedder {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dim: usize,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(
                searchlight_config::constants::timeouts::EMBEDDING_MS,
            ))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
            dim,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.api_base.trim_end_matches('/'));
        let request = EmbeddingsRequest {
            model: &self.model,
            input: inputs,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!("HTTP {status}: {body}")));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        if parsed.data.len() != inputs.len() {
            return Err(Error::Embedding(format!(
                "Provider returned {} embeddings for {} inputs",
                parsed.data.len(),
                inputs.len()
            )));
        }

        // Provider dimension may differ from D; pad or truncate to fit
        Ok(parsed
            .data
            .into_iter()
            .map(|item| pad_or_truncate(item.embedding, self.dim))
            .collect())
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    async fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        let input = vec![truncate_chars(text, tuning::API_EMBED_MAX_CHARS)];
        let mut embeddings = self.request(&input).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::Embedding("Empty embeddings response".to_string()))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let inputs: Vec<String> = texts
            .iter()
            .map(|text| truncate_chars(text, tuning::API_EMBED_MAX_CHARS))
            .collect();
        self.request(&inputs).await
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Local sentence-embedding model via ONNX Runtime
#[cfg(feature = "onnx")]
pub mod local {
    use super::*;
    use ndarray::Array2;
    use ort::{session::builder::GraphOptimizationLevel, session::Session, value::Tensor};
    use tokenizers::Tokenizer;

    const MAX_SEQ_LEN: usize = 512;

    pub struct LocalEmbedder {
        session: parking_lot::Mutex<Session>,
        tokenizer: Tokenizer,
        dim: usize,
    }

    impl LocalEmbedder {
        pub fn new(
            model_path: impl AsRef<std::path::Path>,
            tokenizer_path: impl AsRef<std::path::Path>,
            dim: usize,
        ) -> Result<Self> {
            let session = Session::builder()
                .map_err(|e| Error::Embedding(e.to_string()))?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .map_err(|e| Error::Embedding(e.to_string()))?
                .commit_from_file(model_path)
                .map_err(|e| Error::Embedding(e.to_string()))?;

            let tokenizer = Tokenizer::from_file(tokenizer_path)
                .map_err(|e| Error::Embedding(e.to_string()))?;

            Ok(Self {
                session: parking_lot::Mutex::new(session),
                tokenizer,
                dim,
            })
        }

        /// Mean-pooled, L2-normalized embeddings for a batch
        pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let truncated: Vec<String> = texts
                .iter()
                .map(|t| truncate_chars(t, tuning::LOCAL_EMBED_MAX_CHARS))
                .collect();
            let batch_size = truncated.len();

            let encodings = self
                .tokenizer
                .encode_batch(truncated, true)
                .map_err(|e| Error::Embedding(e.to_string()))?;

            let mut input_ids = vec![0i64; batch_size * MAX_SEQ_LEN];
            let mut attention_mask = vec![0i64; batch_size * MAX_SEQ_LEN];
            let mut token_type_ids = vec![0i64; batch_size * MAX_SEQ_LEN];

            for (i, encoding) in encodings.iter().enumerate() {
                let ids = encoding.get_ids();
                let mask = encoding.get_attention_mask();
                let types = encoding.get_type_ids();
                let len = ids.len().min(MAX_SEQ_LEN);
                let offset = i * MAX_SEQ_LEN;
                for j in 0..len {
                    input_ids[offset + j] = ids[j] as i64;
                    attention_mask[offset + j] = mask[j] as i64;
                    token_type_ids[offset + j] = types[j] as i64;
                }
            }

            let shape = (batch_size, MAX_SEQ_LEN);
            let input_ids = Array2::from_shape_vec(shape, input_ids)
                .map_err(|e| Error::Embedding(e.to_string()))?;
            let attention_mask_arr = Array2::from_shape_vec(shape, attention_mask.clone())
                .map_err(|e| Error::Embedding(e.to_string()))?;
            let token_type_ids = Array2::from_shape_vec(shape, token_type_ids)
                .map_err(|e| Error::Embedding(e.to_string()))?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![
                    "input_ids" => Tensor::from_array(input_ids)
                        .map_err(|e| Error::Embedding(e.to_string()))?,
                    "attention_mask" => Tensor::from_array(attention_mask_arr)
                        .map_err(|e| Error::Embedding(e.to_string()))?,
                    "token_type_ids" => Tensor::from_array(token_type_ids)
                        .map_err(|e| Error::Embedding(e.to_string()))?,
                ])
                .map_err(|e| Error::Embedding(e.to_string()))?;

            let (shape, hidden) = outputs
                .get("last_hidden_state")
                .ok_or_else(|| Error::Embedding("Missing output tensor".to_string()))?
                .try_extract_tensor::<f32>()
                .map_err(|e| Error::Embedding(e.to_string()))?;

            let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
            if dims.len() != 3 {
                return Err(Error::Embedding(format!(
                    "Unexpected tensor shape: {dims:?}"
                )));
            }
            let (seq_len, hidden_dim) = (dims[1], dims[2]);

            let mut embeddings = Vec::with_capacity(batch_size);
            for i in 0..batch_size.min(dims[0]) {
                let mut embedding = vec![0.0f32; self.dim];
                let mut counted = 0usize;
                for j in 0..seq_len {
                    if attention_mask[i * MAX_SEQ_LEN + j.min(MAX_SEQ_LEN - 1)] == 0 {
                        continue;
                    }
                    counted += 1;
                    for (k, slot) in embedding.iter_mut().enumerate().take(hidden_dim.min(self.dim))
                    {
                        *slot += hidden[i * seq_len * hidden_dim + j * hidden_dim + k];
                    }
                }
                let denom = counted.max(1) as f32;
                for value in &mut embedding {
                    *value /= denom;
                }
                let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for value in &mut embedding {
                        *value /= norm;
                    }
                }
                embeddings.push(embedding);
            }

            Ok(embeddings)
        }
    }
}

/// Ordered provider chain implementing the `Embedder` capability
pub struct EmbeddingService {
    #[cfg(feature = "onnx")]
    local: Option<Arc<local::LocalEmbedder>>,
    api: Option<Arc<ApiEmbedder>>,
    hash: HashEmbedder,
    dim: usize,
}

impl EmbeddingService {
    pub fn new(api: Option<ApiEmbedder>, dim: usize) -> Self {
        Self {
            #[cfg(feature = "onnx")]
            local: None,
            api: api.filter(|embedder| embedder.is_configured()).map(Arc::new),
            hash: HashEmbedder::new(dim),
            dim,
        }
    }

    #[cfg(feature = "onnx")]
    pub fn with_local(mut self, local: Arc<local::LocalEmbedder>) -> Self {
        self.local = Some(local);
        self
    }

    async fn local_batch(&self, texts: &[String]) -> Option<Result<Vec<Vec<f32>>>> {
        #[cfg(feature = "onnx")]
        {
            if let Some(local) = self.local.clone() {
                let owned: Vec<String> = texts.to_vec();
                // ONNX inference is CPU-bound; keep it off the async workers
                let result = tokio::task::spawn_blocking(move || local.embed_batch(&owned))
                    .await
                    .map_err(|e| Error::Embedding(format!("Embedding task failed: {e}")));
                return Some(match result {
                    Ok(inner) => inner,
                    Err(err) => Err(err),
                });
            }
        }
        let _ = texts;
        None
    }

    /// Encode one batch (at most `INDEX_BATCH_SIZE` texts) through the
    /// provider chain, falling back to zero vectors as the last resort.
    async fn encode_batch_degradable(&self, texts: &[String]) -> Vec<Vec<f32>> {
        if let Some(result) = self.local_batch(texts).await {
            match result {
                Ok(embeddings) => return embeddings,
                Err(err) => {
                    tracing::warn!("Local embedding batch failed: {}, trying API", err);
                }
            }
        }

        if let Some(api) = &self.api {
            match api.encode_batch(texts).await {
                Ok(embeddings) => return embeddings,
                Err(err) => {
                    tracing::warn!("API embedding batch failed: {}, using zero vectors", err);
                }
            }
        } else {
            tracing::warn!("No embedding service available, using zero vectors");
        }

        vec![vec![0.0; self.dim]; texts.len()]
    }
}

#[async_trait]
impl Embedder for EmbeddingService {
    async fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(result) = self.local_batch(std::slice::from_ref(&text.to_string())).await {
            match result {
                Ok(mut embeddings) if !embeddings.is_empty() => {
                    return Ok(embeddings.swap_remove(0))
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("Local embedding failed: {}, trying API", err),
            }
        }

        if let Some(api) = &self.api {
            match api.encode_one(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(err) => tracing::warn!("API embedding failed: {}, using fallback", err),
            }
        }

        tracing::warn!("Using hash-based embedding fallback (low quality)");
        Ok(self.hash.embed(text))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        let total_batches = texts.len().div_ceil(tuning::INDEX_BATCH_SIZE).max(1);

        for (index, batch) in texts.chunks(tuning::INDEX_BATCH_SIZE).enumerate() {
            tracing::info!(
                batch = index + 1,
                total = total_batches,
                size = batch.len(),
                "generating embedding batch"
            );
            // One bad batch must not fail its siblings
            all.extend(self.encode_batch_degradable(batch).await);
        }

        Ok(all)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embedder_deterministic() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("hazardous waste");
        let b = embedder.embed("hazardous waste");
        let c = embedder.embed("something else");
        assert_eq!(a.len(), 384);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_pad_or_truncate() {
        assert_eq!(pad_or_truncate(vec![1.0; 10], 4).len(), 4);
        let padded = pad_or_truncate(vec![1.0; 2], 5);
        assert_eq!(padded, vec![1.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_truncate_chars_boundary_safe() {
        let text = "日本語のテキストです";
        let truncated = truncate_chars(text, 4);
        assert_eq!(truncated.chars().count(), 4);
    }

    #[tokio::test]
    async fn test_service_falls_back_to_zero_vectors_on_batch() {
        // No local model, no API key: the batch path degrades to zeros
        let service = EmbeddingService::new(None, 8);
        let texts = vec!["a".to_string(), "b".to_string()];
        let embeddings = service.encode_batch(&texts).await.unwrap();
        assert_eq!(embeddings.len(), 2);
        assert!(embeddings[0].iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn test_encode_one_falls_back_to_hash() {
        let service = EmbeddingService::new(None, 8);
        let embedding = service.encode_one("query text").await.unwrap();
        assert_eq!(embedding.len(), 8);
        // Hash fallback is deterministic, not zero
        assert!(embedding.iter().any(|v| *v != 0.0));
    }
}
