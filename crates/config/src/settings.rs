//! Main settings module
//!
//! Settings load from an optional YAML/TOML file plus environment variables
//! with the `SEARCHLIGHT_` prefix (e.g. `SEARCHLIGHT_QDRANT__URL`). Intent
//! keyword lists are additionally overridable through flat comma-separated
//! env vars so site operators can extend the lexicons without a config file.

use std::collections::HashMap;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{cache, endpoints, search};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub qdrant: QdrantSettings,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub embedding: EmbeddingSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub features: FeatureFlags,

    #[serde(default)]
    pub intent: IntentKeywordOverrides,

    /// Known post types in default priority order
    #[serde(default = "default_post_types")]
    pub post_types: Vec<String>,

    /// Typo corrections applied by zero-result recovery
    #[serde(default = "default_typo_corrections")]
    pub typo_corrections: HashMap<String, String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Qdrant connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantSettings {
    #[serde(default = "default_qdrant_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_vector_dim")]
    pub vector_dim: usize,
}

fn default_qdrant_url() -> String {
    endpoints::QDRANT_DEFAULT.clone()
}

fn default_collection() -> String {
    "content_index".to_string()
}

fn default_vector_dim() -> usize {
    search::EMBEDDING_DIMENSION
}

impl Default for QdrantSettings {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            api_key: None,
            collection: default_collection(),
            vector_dim: default_vector_dim(),
        }
    }
}

/// LLM provider configuration (OpenAI-compatible chat API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,
    /// Empty key disables AI reranking, augmentation and answers
    #[serde(default = "default_llm_api_key")]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
}

fn default_llm_api_base() -> String {
    endpoints::LLM_DEFAULT.clone()
}

fn default_llm_api_key() -> String {
    std::env::var("LLM_API_KEY").unwrap_or_default()
}

fn default_llm_model() -> String {
    std::env::var("LLM_MODEL").unwrap_or_else(|_| "llama-3.3-70b".to_string())
}

impl LlmSettings {
    /// Whether a usable LLM is configured
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: default_llm_api_base(),
            api_key: default_llm_api_key(),
            model: default_llm_model(),
        }
    }
}

/// Embedding provider configuration (OpenAI-compatible embeddings API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_embedding_api_base")]
    pub api_base: String,
    #[serde(default = "default_embedding_api_key")]
    pub api_key: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_vector_dim")]
    pub dimension: usize,
}

fn default_embedding_api_base() -> String {
    endpoints::EMBEDDING_DEFAULT.clone()
}

fn default_embedding_api_key() -> String {
    std::env::var("EMBEDDING_API_KEY").unwrap_or_default()
}

fn default_embedding_model() -> String {
    std::env::var("EMBEDDING_MODEL").unwrap_or_else(|_| "text-embedding-ada-002".to_string())
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_base: default_embedding_api_base(),
            api_key: default_embedding_api_key(),
            model: default_embedding_model(),
            dimension: default_vector_dim(),
        }
    }
}

/// Search pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Default weight of the LLM score when blending (0..1)
    #[serde(default = "default_ai_weight")]
    pub ai_weight: f32,
}

fn default_limit() -> usize {
    10
}

fn default_chunk_size() -> usize {
    search::DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    search::DEFAULT_CHUNK_OVERLAP
}

fn default_ai_weight() -> f32 {
    0.7
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            ai_weight: default_ai_weight(),
        }
    }
}

/// Cache tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_result_cache_entries")]
    pub result_cache_entries: usize,
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

fn default_result_cache_entries() -> usize {
    cache::RESULT_CACHE_MAX_ENTRIES
}

fn default_ttl_secs() -> u64 {
    cache::TTL_DEFAULT_SECS
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            result_cache_entries: default_result_cache_entries(),
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

/// Feature flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Toggle analytics-driven CTR boosting
    #[serde(default = "default_true")]
    pub enable_ctr_boost: bool,
    /// Globally enable/disable AI reranking support
    #[serde(default = "default_true")]
    pub enable_ai_rerank: bool,
    /// If true, AI answers only use search results (no external knowledge)
    #[serde(default = "default_true")]
    pub strict_ai_answer_mode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_ctr_boost: true,
            enable_ai_rerank: true,
            strict_ai_answer_mode: true,
        }
    }
}

/// Additional intent keywords merged into the built-in lexicons.
///
/// Each list also honors a flat comma-separated env var so deployments can
/// extend the lexicons without shipping a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentKeywordOverrides {
    #[serde(default = "default_service_keywords")]
    pub service_keywords: Vec<String>,
    #[serde(default = "default_sector_keywords")]
    pub sector_keywords: Vec<String>,
    #[serde(default = "default_navigational_keywords")]
    pub navigational_keywords: Vec<String>,
    #[serde(default = "default_transactional_keywords")]
    pub transactional_keywords: Vec<String>,
}

/// Split a comma-separated env value into trimmed, non-empty entries
pub fn parse_keyword_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn keywords_from_env(var: &str) -> Vec<String> {
    std::env::var(var)
        .map(|v| parse_keyword_list(&v))
        .unwrap_or_default()
}

fn default_service_keywords() -> Vec<String> {
    keywords_from_env("INTENT_SERVICE_KEYWORDS")
}

fn default_sector_keywords() -> Vec<String> {
    keywords_from_env("INTENT_SECTOR_KEYWORDS")
}

fn default_navigational_keywords() -> Vec<String> {
    keywords_from_env("INTENT_NAVIGATIONAL_KEYWORDS")
}

fn default_transactional_keywords() -> Vec<String> {
    keywords_from_env("INTENT_TRANSACTIONAL_KEYWORDS")
}

impl Default for IntentKeywordOverrides {
    fn default() -> Self {
        Self {
            service_keywords: default_service_keywords(),
            sector_keywords: default_sector_keywords(),
            navigational_keywords: default_navigational_keywords(),
            transactional_keywords: default_transactional_keywords(),
        }
    }
}

fn default_post_types() -> Vec<String> {
    ["profile", "service", "page", "post", "attachment"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_typo_corrections() -> HashMap<String, String> {
    [
        ("envrionmental", "environmental"),
        ("enviromental", "environmental"),
        ("compilance", "compliance"),
        ("asessment", "assessment"),
        ("auditting", "auditing"),
        ("consutling", "consulting"),
        ("enginering", "engineering"),
    ]
    .into_iter()
    .map(|(typo, fix)| (typo.to_string(), fix.to_string()))
    .collect()
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings, rejecting values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.search.ai_weight) {
            return Err(ConfigError::InvalidValue {
                field: "search.ai_weight".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", self.search.ai_weight),
            });
        }

        if self.search.chunk_overlap >= self.search.chunk_size {
            return Err(ConfigError::InvalidValue {
                field: "search.chunk_overlap".to_string(),
                message: format!(
                    "Overlap ({}) must be smaller than chunk size ({})",
                    self.search.chunk_overlap, self.search.chunk_size
                ),
            });
        }

        if self.search.default_limit == 0 || self.search.default_limit > search::MAX_RESULT_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "search.default_limit".to_string(),
                message: format!("Must be between 1 and {}", search::MAX_RESULT_LIMIT),
            });
        }

        if self.qdrant.vector_dim == 0 {
            return Err(ConfigError::InvalidValue {
                field: "qdrant.vector_dim".to_string(),
                message: "Vector dimension must be positive".to_string(),
            });
        }

        if self.embedding.dimension != self.qdrant.vector_dim {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dimension".to_string(),
                message: format!(
                    "Embedding dimension ({}) must match the collection dimension ({})",
                    self.embedding.dimension, self.qdrant.vector_dim
                ),
            });
        }

        Ok(())
    }
}

/// Load settings from an optional file plus SEARCHLIGHT_* environment vars
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path));
    }

    let config = builder
        .add_source(Environment::with_prefix("SEARCHLIGHT").separator("__"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.qdrant.vector_dim, 384);
        assert_eq!(settings.post_types.len(), 5);
        assert!(settings.features.enable_ai_rerank);
    }

    #[test]
    fn test_parse_keyword_list() {
        assert_eq!(
            parse_keyword_list("waste management, air quality ,, pfas "),
            vec!["waste management", "air quality", "pfas"]
        );
        assert!(parse_keyword_list("").is_empty());
    }

    #[test]
    fn test_ai_weight_bounds() {
        let mut settings = Settings::default();
        settings.search.ai_weight = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_chunk_overlap_bounds() {
        let mut settings = Settings::default();
        settings.search.chunk_overlap = settings.search.chunk_size;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut settings = Settings::default();
        settings.embedding.dimension = 768;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_typo_corrections_seeded() {
        let settings = Settings::default();
        assert_eq!(
            settings.typo_corrections.get("envrionmental").map(String::as_str),
            Some("environmental")
        );
    }
}
