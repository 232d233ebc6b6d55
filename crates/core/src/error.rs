//! Error taxonomy surfaced in API responses
//!
//! Every external dependency error is caught at its adapter and converted
//! into either a fallback result or a degraded metadata field. Only
//! validation and request-shape errors reach the client as non-2xx.

use thiserror::Error;

/// Service-wide error type
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("validation failed for '{field}': {details}")]
    Validation {
        code: String,
        field: String,
        details: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("service unavailable: {service}")]
    ServiceUnavailable { service: String },

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("vector store error: {0}")]
    VectorStore(String),

    #[error("search error: {0}")]
    Search(String),

    #[error("index error: {0}")]
    Index(String),

    #[error("llm error: {0}")]
    Llm(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for validation failures
    pub fn validation(
        code: impl Into<String>,
        field: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::Validation {
            code: code.into(),
            field: field.into(),
            details: details.into(),
        }
    }

    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &str {
        match self {
            Self::Validation { code, .. } => code,
            Self::NotFound(_) => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::Timeout(_) => "upstream_timeout",
            Self::Embedding(_) => "embedding_error",
            Self::VectorStore(_) => "vector_store_error",
            Self::Search(_) => "search_error",
            Self::Index(_) => "index_error",
            Self::Llm(_) => "llm_error",
            Self::Config(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// HTTP status this error maps to at the surface
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound(_) => 404,
            Self::RateLimited { .. } => 429,
            Self::ServiceUnavailable { .. } => 503,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::validation("bad_query", "query", "too short").status(), 400);
        assert_eq!(Error::NotFound("doc".into()).status(), 404);
        assert_eq!(Error::RateLimited { retry_after: 30 }.status(), 429);
        assert_eq!(
            Error::ServiceUnavailable {
                service: "qdrant".into()
            }
            .status(),
            503
        );
        assert_eq!(Error::Internal("boom".into()).status(), 500);
    }

    #[test]
    fn test_validation_fields() {
        let err = Error::validation("bad_limit", "limit", "must be between 1 and 100");
        assert_eq!(err.code(), "bad_limit");
        assert!(err.to_string().contains("limit"));
    }
}
