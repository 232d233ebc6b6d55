//! Configuration management for the hybrid search service
//!
//! Supports loading configuration from:
//! - YAML/TOML files
//! - Environment variables (SEARCHLIGHT_ prefix)
//! - Runtime overrides
//!
//! Every intent keyword list is additionally overridable via comma-separated
//! environment variables (see `Settings::intent`).

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, CacheSettings, EmbeddingSettings, FeatureFlags, IntentKeywordOverrides,
    LlmSettings, QdrantSettings, SearchSettings, ServerSettings, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
