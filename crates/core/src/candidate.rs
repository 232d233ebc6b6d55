//! Candidate results carried through the ranking pipeline
//!
//! A candidate accumulates per-stream scores during fusion, boost factors,
//! and (optionally) LLM scores. `score` always holds the value used for the
//! final ordering so clients can sort without recomputation.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Which retrieval stream produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Lexical,
    Vector,
    Hybrid,
}

/// Relevance bucket derived from the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    High,
    Medium,
    Low,
    VeryLow,
}

impl Relevance {
    /// Bucket a final score. Thresholds follow the simple-text scorer's
    /// normalized scale (exact title match alone lands at 0.5).
    pub fn from_score(score: f32) -> Self {
        if score >= 0.5 {
            Self::High
        } else if score >= 0.2 {
            Self::Medium
        } else if score >= 0.05 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

/// Per-stream details recorded during reciprocal rank fusion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionDetails {
    pub lexical_score_normalized: Option<f32>,
    pub vector_score_normalized: Option<f32>,
    pub lexical_rank: Option<usize>,
    pub vector_rank: Option<usize>,
    pub rrf_constant: f32,
}

/// Per-boost multiplier breakdown, kept for admin debugging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostBreakdown {
    pub field: f32,
    pub freshness: f32,
    pub category_tag: f32,
    pub heading_anchor: f32,
    pub taxonomy_depth: f32,
    pub behavioral: f32,
}

impl Default for BoostBreakdown {
    fn default() -> Self {
        Self {
            field: 1.0,
            freshness: 1.0,
            category_tag: 1.0,
            heading_anchor: 1.0,
            taxonomy_depth: 1.0,
            behavioral: 1.0,
        }
    }
}

impl BoostBreakdown {
    pub fn product(&self) -> f32 {
        self.field
            * self.freshness
            * self.category_tag
            * self.heading_anchor
            * self.taxonomy_depth
            * self.behavioral
    }
}

/// Annotation attached when a chunk represents its parent in merged results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkInfo {
    pub total_chunks: usize,
    pub chunk_index: usize,
    pub all_chunks: Vec<String>,
}

/// End-to-end explanation of how a result reached its final position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingExplanation {
    /// Fused+boosted score before any LLM blending
    pub tfidf_score: f32,
    /// Normalized LLM score in [0,1], when reranked
    pub ai_score: Option<f32>,
    /// Raw LLM score on the 0-100 scale
    pub ai_score_raw: Option<f32>,
    pub hybrid_score: f32,
    pub tfidf_weight: f32,
    pub ai_weight: f32,
    pub ai_reason: Option<String>,
    pub post_type: String,
    pub position_before_priority: Option<usize>,
    /// 1-based index of the result in the returned page
    pub final_position: usize,
    /// Priority index of the post type; unknown types get the sentinel 9999
    pub post_type_priority: usize,
    pub priority_order: Vec<String>,
}

impl RankingExplanation {
    /// Explanation for a result that was not LLM-scored
    pub fn without_ai(score: f32, post_type: &str, reason: impl Into<String>) -> Self {
        Self {
            tfidf_score: score,
            ai_score: None,
            ai_score_raw: None,
            hybrid_score: score,
            tfidf_weight: 1.0,
            ai_weight: 0.0,
            ai_reason: Some(reason.into()),
            post_type: post_type.to_string(),
            position_before_priority: None,
            final_position: 0,
            post_type_priority: 9999,
            priority_order: Vec::new(),
        }
    }
}

/// A scored search candidate flowing through the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub document: Document,
    /// The score used for the final ordering of this candidate
    pub score: f32,
    pub relevance: Relevance,
    #[serde(default)]
    pub source: CandidateSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexical_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexical_score_normalized: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_score_normalized: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrf_score: Option<f32>,
    /// Score before fusion replaced it, for reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fusion_details: Option<FusionDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_score_raw: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hybrid_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost_debug: Option<BoostBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_info: Option<ChunkInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_explanation: Option<RankingExplanation>,
}

impl Default for CandidateSource {
    fn default() -> Self {
        Self::Lexical
    }
}

impl Candidate {
    pub fn new(document: Document, score: f32, source: CandidateSource) -> Self {
        Self {
            document,
            score,
            relevance: Relevance::from_score(score),
            source,
            lexical_score: None,
            lexical_score_normalized: None,
            vector_score: None,
            vector_score_normalized: None,
            rrf_score: None,
            original_score: None,
            fusion_details: None,
            ai_score: None,
            ai_score_raw: None,
            ai_reason: None,
            hybrid_score: None,
            boost_debug: None,
            chunk_info: None,
            ranking_explanation: None,
        }
    }

    /// Update the final score and re-bucket relevance
    pub fn set_score(&mut self, score: f32) {
        self.score = score;
        self.relevance = Relevance::from_score(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_buckets() {
        assert_eq!(Relevance::from_score(0.9), Relevance::High);
        assert_eq!(Relevance::from_score(0.5), Relevance::High);
        assert_eq!(Relevance::from_score(0.3), Relevance::Medium);
        assert_eq!(Relevance::from_score(0.06), Relevance::Low);
        assert_eq!(Relevance::from_score(0.0), Relevance::VeryLow);
    }

    #[test]
    fn test_boost_product() {
        let breakdown = BoostBreakdown {
            field: 2.0,
            freshness: 1.5,
            ..Default::default()
        };
        assert!((breakdown.product() - 3.0).abs() < 1e-6);
        assert!((BoostBreakdown::default().product() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_score_rebuckets() {
        let mut candidate =
            Candidate::new(Document::new("1", "Doc"), 0.01, CandidateSource::Lexical);
        assert_eq!(candidate.relevance, Relevance::VeryLow);
        candidate.set_score(0.7);
        assert_eq!(candidate.relevance, Relevance::High);
    }
}
