//! Centralized constants for the search service
//!
//! Single source of truth for service endpoints, timeout budgets and
//! search-engine tuning values. Anything corpus-specific (keyword lists,
//! post types, typo corrections) belongs in `Settings`, not here.

/// Service endpoints (loaded from env vars with fallback defaults)
pub mod endpoints {
    use once_cell::sync::Lazy;

    /// Qdrant vector store endpoint (env: QDRANT_URL)
    pub static QDRANT_DEFAULT: Lazy<String> = Lazy::new(|| {
        std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://127.0.0.1:6334".to_string())
    });

    /// LLM endpoint, OpenAI-compatible (env: LLM_API_BASE)
    pub static LLM_DEFAULT: Lazy<String> = Lazy::new(|| {
        std::env::var("LLM_API_BASE").unwrap_or_else(|_| "https://api.cerebras.ai/v1".to_string())
    });

    /// Embedding API endpoint, OpenAI-compatible (env: EMBEDDING_API_BASE)
    pub static EMBEDDING_DEFAULT: Lazy<String> = Lazy::new(|| {
        std::env::var("EMBEDDING_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
    });
}

/// Timeout budgets (milliseconds unless noted)
pub mod timeouts {
    /// Vector-store client timeout (ms)
    pub const VECTOR_STORE_MS: u64 = 10_000;

    /// Embedding provider timeout (ms)
    pub const EMBEDDING_MS: u64 = 30_000;

    /// LLM request timeout (ms)
    pub const LLM_REQUEST_MS: u64 = 60_000;

    /// Overall search budget (ms); on expiry the degradation fallback wins
    pub const SEARCH_OVERALL_MS: u64 = 30_000;

    /// Cached vector-store availability TTL (seconds)
    pub const HEALTH_CACHE_SECS: u64 = 60;

    /// HTTP client idle pool expiry (seconds)
    pub const IDLE_POOL_SECS: u64 = 300;
}

/// Retrieval and ranking tuning
pub mod search {
    /// Dense embedding dimension; the store rejects mismatched vectors
    pub const EMBEDDING_DIMENSION: usize = 384;

    /// TF-IDF vocabulary cap
    pub const TFIDF_MAX_FEATURES: usize = 10_000;

    /// N-gram range for the vectorizer
    pub const TFIDF_NGRAM_MIN: usize = 1;
    pub const TFIDF_NGRAM_MAX: usize = 2;

    /// Word-window chunking defaults
    pub const DEFAULT_CHUNK_SIZE: usize = 1_000;
    pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

    /// Embedding batch size during indexing
    pub const INDEX_BATCH_SIZE: usize = 50;

    /// Vector-store upsert batch size
    pub const UPSERT_BATCH_SIZE: usize = 100;

    /// Reciprocal rank fusion constant
    pub const RRF_K: f32 = 60.0;

    /// Reranking candidate bounds
    pub const MIN_RERANK_CANDIDATES: usize = 10;
    pub const MAX_RERANK_CANDIDATES: usize = 50;
    pub const RERANK_BUFFER_SIZE: usize = 5;

    /// Skip LLM reranking when the top fused score is at least this
    pub const TFIDF_HIGH_CONFIDENCE_THRESHOLD: f32 = 0.85;

    /// Candidates with a raw LLM score below this AND negative reasoning
    /// are dropped by the not-relevant filter
    pub const AI_NOT_RELEVANT_SCORE: f32 = 30.0;

    /// Hard cap on the per-page result limit
    pub const MAX_RESULT_LIMIT: usize = 100;

    /// Query length bounds accepted by validation
    pub const MIN_QUERY_LENGTH: usize = 2;
    pub const MAX_QUERY_LENGTH: usize = 500;

    /// Custom-instruction length cap
    pub const MAX_INSTRUCTIONS_LENGTH: usize = 1_000;

    /// Simple-text fallback engages below this candidate count / top score
    pub const LEXICAL_FALLBACK_MIN_RESULTS: usize = 3;
    pub const LEXICAL_FALLBACK_MIN_SCORE: f32 = 0.1;

    /// Results fed to answer generation
    pub const MAX_SEARCH_RESULTS_FOR_ANSWER: usize = 5;

    /// Truncation limits per embedding provider (characters)
    pub const LOCAL_EMBED_MAX_CHARS: usize = 500;
    pub const API_EMBED_MAX_CHARS: usize = 8_000;
}

/// Cache tuning
pub mod cache {
    /// Result-cache entry cap; overflow evicts the oldest-by-access 10%
    pub const RESULT_CACHE_MAX_ENTRIES: usize = 1_000;

    /// Query-embedding cache entry cap (FIFO eviction)
    pub const EMBEDDING_CACHE_MAX_ENTRIES: usize = 1_000;

    /// Background sweeper interval (seconds)
    pub const SWEEP_INTERVAL_SECS: u64 = 60;

    /// TTLs by query class (seconds)
    pub const TTL_DEFAULT_SECS: u64 = 3_600;
    pub const TTL_NAVIGATIONAL_SECS: u64 = 10_800;
    pub const TTL_POPULAR_SECS: u64 = 10_800;
    pub const TTL_INFORMATIONAL_SECS: u64 = 1_800;

    /// Queries shorter than this are never cached
    pub const MIN_CACHEABLE_QUERY_LEN: usize = 3;
}

/// Degradation controller tuning
pub mod degradation {
    /// Consecutive failures before a breaker opens
    pub const FAILURE_THRESHOLD: u32 = 5;

    /// Seconds an open breaker fails fast before allowing a probe
    pub const OPEN_TIMEOUT_SECS: u64 = 60;
}

/// LLM cost accounting
pub mod llm {
    /// Approximate cost per million tokens (USD)
    pub const COST_PER_MILLION_TOKENS: f64 = 0.10;

    /// Token budget for rerank responses
    pub const RERANK_MAX_TOKENS: usize = 2_000;

    /// Token budget for analysis / recovery prompts
    pub const ANALYSIS_MAX_TOKENS: usize = 500;
    pub const RECOVERY_MAX_TOKENS: usize = 300;
    pub const ANSWER_MAX_TOKENS: usize = 1_000;
}
