//! Retrieval primitives for hybrid search
//!
//! Features:
//! - Word-window chunking with parent/child metadata and read-time merging
//! - Dense embeddings with an ordered provider fallback chain
//! - LRU query-embedding cache
//! - In-memory TF-IDF sparse index with cosine lookup and a simple-text
//!   fallback scorer
//! - Qdrant vector-store adapter with cached availability
//! - Reciprocal rank fusion and the boost engine

pub mod boost;
pub mod cache;
pub mod chunker;
pub mod embeddings;
pub mod fusion;
pub mod sparse;
pub mod vector_store;

pub use boost::{BoostEngine, PostTypePriority};
pub use cache::QueryEmbeddingCache;
pub use chunker::{merge_chunk_results, ContentChunker};
pub use embeddings::{ApiEmbedder, EmbeddingService, HashEmbedder};
pub use fusion::reciprocal_rank_fusion;
pub use sparse::{SparseIndex, TfidfVectorizer};
pub use vector_store::{CollectionInfo, StoreFilter, VectorStore, VectorStoreConfig};

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<RetrievalError> for searchlight_core::Error {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::Embedding(msg) => searchlight_core::Error::Embedding(msg),
            RetrievalError::VectorStore(msg) | RetrievalError::Connection(msg) => {
                searchlight_core::Error::VectorStore(msg)
            }
            RetrievalError::Search(msg) => searchlight_core::Error::Search(msg),
            RetrievalError::Index(msg) => searchlight_core::Error::Index(msg),
            RetrievalError::NotFound(msg) => searchlight_core::Error::NotFound(msg),
        }
    }
}
