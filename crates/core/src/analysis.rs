//! Query analysis types
//!
//! Produced by the intent analyzer and consumed by the boost engine, the
//! reranker prompt builder and the post-type priority policy.

use serde::{Deserialize, Serialize};

/// Coarse label over query semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    PersonName,
    ExecutiveRole,
    Service,
    LocalService,
    Howto,
    CaseStudy,
    Sector,
    Regulatory,
    Navigational,
    Transactional,
    Informational,
    General,
}

impl QueryIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonName => "person_name",
            Self::ExecutiveRole => "executive_role",
            Self::Service => "service",
            Self::LocalService => "local_service",
            Self::Howto => "howto",
            Self::CaseStudy => "case_study",
            Self::Sector => "sector",
            Self::Regulatory => "regulatory",
            Self::Navigational => "navigational",
            Self::Transactional => "transactional",
            Self::Informational => "informational",
            Self::General => "general",
        }
    }

    /// Parse a label as emitted by the LLM; unknown labels map to None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "person_name" => Some(Self::PersonName),
            "executive_role" => Some(Self::ExecutiveRole),
            "service" => Some(Self::Service),
            "local_service" => Some(Self::LocalService),
            "howto" | "how_to" => Some(Self::Howto),
            "case_study" => Some(Self::CaseStudy),
            "sector" => Some(Self::Sector),
            "regulatory" => Some(Self::Regulatory),
            "navigational" => Some(Self::Navigational),
            "transactional" => Some(Self::Transactional),
            "informational" => Some(Self::Informational),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities extracted from the query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub regulatory: Vec<String>,
    #[serde(default)]
    pub local_modifiers: Vec<String>,
}

impl EntitySet {
    /// Merge another entity set in, deduplicating case-insensitively.
    pub fn merge(&mut self, other: EntitySet) {
        merge_dedup(&mut self.people, other.people);
        merge_dedup(&mut self.roles, other.roles);
        merge_dedup(&mut self.services, other.services);
        merge_dedup(&mut self.sectors, other.sectors);
        merge_dedup(&mut self.locations, other.locations);
        merge_dedup(&mut self.organizations, other.organizations);
        merge_dedup(&mut self.regulatory, other.regulatory);
        merge_dedup(&mut self.local_modifiers, other.local_modifiers);
    }
}

fn merge_dedup(target: &mut Vec<String>, incoming: Vec<String>) {
    for item in incoming {
        let lowered = item.to_lowercase();
        if !target.iter().any(|existing| existing.to_lowercase() == lowered) {
            target.push(item);
        }
    }
}

/// Boolean signals observed while analyzing the query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySignals {
    pub is_question: bool,
    pub question_word: Option<String>,
    pub has_role_keyword: bool,
    pub has_service_keyword: bool,
    pub has_location: bool,
    pub has_organization: bool,
    pub has_person_candidate: bool,
    pub has_local_modifier: bool,
    pub has_zip_code: bool,
    pub has_case_study_signal: bool,
    pub has_regulatory_signal: bool,
}

/// How the analysis was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    Heuristic,
    AiEnhanced,
}

/// Full analysis of a search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub intent: QueryIntent,
    /// Confidence in [0,1]
    pub confidence: f32,
    pub entities: EntitySet,
    pub signals: QuerySignals,
    pub normalized_query: String,
    pub keywords: Vec<String>,
    /// Entity categories present in the query, in priority order
    pub primary_entities: Vec<String>,
    pub original_query: String,
    pub analysis_method: AnalysisMethod,
}

impl QueryAnalysis {
    /// Fallback analysis when the analyzer is bypassed entirely
    pub fn general(query: &str) -> Self {
        Self {
            intent: QueryIntent::General,
            confidence: 0.4,
            entities: EntitySet::default(),
            signals: QuerySignals::default(),
            normalized_query: query.trim().to_lowercase(),
            keywords: Vec::new(),
            primary_entities: Vec::new(),
            original_query: query.to_string(),
            analysis_method: AnalysisMethod::Heuristic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_labels_roundtrip() {
        for intent in [
            QueryIntent::PersonName,
            QueryIntent::ExecutiveRole,
            QueryIntent::Service,
            QueryIntent::LocalService,
            QueryIntent::Howto,
            QueryIntent::CaseStudy,
            QueryIntent::Sector,
            QueryIntent::Regulatory,
            QueryIntent::Navigational,
            QueryIntent::Transactional,
            QueryIntent::Informational,
            QueryIntent::General,
        ] {
            assert_eq!(QueryIntent::parse(intent.as_str()), Some(intent));
        }
        assert_eq!(QueryIntent::parse("nonsense"), None);
    }

    #[test]
    fn test_entity_merge_dedup() {
        let mut entities = EntitySet {
            services: vec!["waste management".to_string()],
            ..Default::default()
        };
        entities.merge(EntitySet {
            services: vec!["Waste Management".to_string(), "air quality".to_string()],
            people: vec!["James Walsh".to_string()],
            ..Default::default()
        });
        assert_eq!(entities.services.len(), 2);
        assert_eq!(entities.people, vec!["James Walsh".to_string()]);
    }
}
