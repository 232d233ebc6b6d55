//! Core types and traits for the hybrid search service
//!
//! This crate provides foundational types used across all other crates:
//! - Document and chunk records as indexed from the CMS
//! - Candidate results carried through fusion, boosting and reranking
//! - Query analysis types (intent, entities, signals)
//! - Behavioral (CTR) signal types and URL normalization
//! - Capability traits for pluggable backends (Embedder, ChatModel)
//! - Error taxonomy surfaced in API responses

pub mod analysis;
pub mod behavioral;
pub mod candidate;
pub mod document;
pub mod error;
pub mod traits;

pub use analysis::{AnalysisMethod, EntitySet, QueryAnalysis, QueryIntent, QuerySignals};
pub use behavioral::{normalize_url, BehavioralSignals, CtrItem, CtrSignals};
pub use candidate::{
    BoostBreakdown, Candidate, CandidateSource, ChunkInfo, FusionDetails, RankingExplanation,
    Relevance,
};
pub use document::{Document, DocumentMeta, SparseVector, TaxonomyTerm};
pub use error::{Error, Result};
pub use traits::{ChatModel, Embedder};
