//! LLM-augmented query analysis
//!
//! The heuristic result is always computed first; the LLM may override the
//! intent and confidence (when its own confidence clears 0.5) and contribute
//! additional entities and keywords. LLM failures are swallowed and the
//! heuristic result stands.

use serde::Deserialize;

use searchlight_config::constants::llm;
use searchlight_core::{AnalysisMethod, ChatModel, EntitySet, QueryAnalysis, QueryIntent};

use crate::intent::QueryAnalyzer;

const SYSTEM_PROMPT: &str = "You are an expert at analyzing search queries for intent and \
entities. Always return valid JSON.";

#[derive(Debug, Deserialize)]
struct AiAnalysis {
    intent: Option<String>,
    confidence: Option<f32>,
    #[serde(default)]
    entities: AiEntities,
    #[serde(default)]
    signals: AiSignals,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AiEntities {
    #[serde(default)]
    people: Vec<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    services: Vec<String>,
    #[serde(default)]
    sectors: Vec<String>,
    #[serde(default)]
    locations: Vec<String>,
    #[serde(default)]
    organizations: Vec<String>,
    #[serde(default)]
    regulatory: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AiSignals {
    is_question: Option<bool>,
    has_service_keyword: Option<bool>,
    has_location: Option<bool>,
    has_role_keyword: Option<bool>,
    has_organization: Option<bool>,
}

impl QueryAnalyzer {
    /// Analyze with optional LLM augmentation.
    ///
    /// When `use_ai` is false or no model is supplied this is exactly
    /// [`QueryAnalyzer::analyze`].
    pub async fn analyze_with_ai(
        &self,
        query: &str,
        model: Option<&dyn ChatModel>,
        use_ai: bool,
    ) -> QueryAnalysis {
        let heuristic = self.analyze(query);

        let model = match (use_ai, model) {
            (true, Some(model)) => model,
            _ => return heuristic,
        };

        match analyze_query_with_ai(query, model).await {
            Some(ai) => merge_ai_analysis(heuristic, ai),
            None => heuristic,
        }
    }
}

async fn analyze_query_with_ai(query: &str, model: &dyn ChatModel) -> Option<AiAnalysis> {
    let prompt = build_analysis_prompt(query);

    let response = match model
        .chat(SYSTEM_PROMPT, &prompt, llm::ANALYSIS_MAX_TOKENS, 0.1)
        .await
    {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(
                "AI query analysis failed: {}, falling back to heuristic analysis",
                err
            );
            return None;
        }
    };

    match parse_ai_json(&response) {
        Some(analysis) => {
            tracing::info!(
                intent = analysis.intent.as_deref().unwrap_or("general"),
                confidence = analysis.confidence.unwrap_or(0.5),
                "AI query analysis"
            );
            Some(analysis)
        }
        None => {
            tracing::warn!("Could not extract JSON from AI analysis response");
            None
        }
    }
}

fn build_analysis_prompt(query: &str) -> String {
    format!(
        r#"Analyze the following content-search query and identify its intent and entities.

Query: "{query}"

Intent types: service, local_service, person_name, executive_role, sector, navigational,
transactional, howto, case_study, regulatory, informational, general.

Rules:
- Phrases containing words like "management", "system", "service", "solution",
  "chain", "supply", "compliance" describe a SERVICE, not a person.
- A bare 2-3 word capitalized name with no service terms is a person_name.
- Question words (who, what, how) indicate informational or howto intent.
- Action words (request, apply, download) indicate transactional intent.
- A service term plus a location indicates local_service.

Return ONLY a JSON object with this structure:
{{
    "intent": "service",
    "confidence": 0.85,
    "entities": {{
        "people": [],
        "roles": [],
        "services": ["waste management"],
        "sectors": ["environmental"],
        "locations": [],
        "organizations": [],
        "regulatory": []
    }},
    "signals": {{
        "is_question": false,
        "has_service_keyword": true,
        "has_location": false,
        "has_role_keyword": false,
        "has_organization": false
    }},
    "keywords": ["waste", "management"]
}}

CRITICAL: Return ONLY valid JSON, no explanatory text before or after."#
    )
}

/// Parse the model response as JSON, recovering from markdown fences and
/// surrounding prose by extracting the first balanced object block.
fn parse_ai_json(response: &str) -> Option<AiAnalysis> {
    let text = response.trim();

    if let Ok(parsed) = serde_json::from_str::<AiAnalysis>(text) {
        return Some(parsed);
    }

    let fenced = if let Some(start) = text.find("```json") {
        text[start + 7..].split("```").next()
    } else if let Some(start) = text.find("```") {
        text[start + 3..].split("```").next()
    } else {
        None
    };
    if let Some(block) = fenced {
        if let Ok(parsed) = serde_json::from_str::<AiAnalysis>(block.trim()) {
            return Some(parsed);
        }
    }

    extract_balanced_object(text).and_then(|block| serde_json::from_str(&block).ok())
}

/// First balanced `{...}` substring, or None
fn extract_balanced_object(text: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => {
                if start.is_none() {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(begin) = start {
                            return Some(text[begin..=idx].to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn merge_ai_analysis(mut analysis: QueryAnalysis, ai: AiAnalysis) -> QueryAnalysis {
    let ai_confidence = ai.confidence.unwrap_or(0.5);

    if ai_confidence > 0.5 {
        if let Some(intent) = ai.intent.as_deref().and_then(QueryIntent::parse) {
            analysis.intent = intent;
            analysis.confidence = ai_confidence.clamp(0.0, 1.0);
        }
    }

    analysis.entities.merge(EntitySet {
        people: ai.entities.people,
        roles: ai.entities.roles,
        services: ai.entities.services,
        sectors: ai.entities.sectors,
        locations: ai.entities.locations,
        organizations: ai.entities.organizations,
        regulatory: ai.entities.regulatory,
        local_modifiers: Vec::new(),
    });

    if let Some(value) = ai.signals.is_question {
        analysis.signals.is_question = value;
    }
    if let Some(value) = ai.signals.has_service_keyword {
        analysis.signals.has_service_keyword = value;
    }
    if let Some(value) = ai.signals.has_location {
        analysis.signals.has_location = value;
    }
    if let Some(value) = ai.signals.has_role_keyword {
        analysis.signals.has_role_keyword = value;
    }
    if let Some(value) = ai.signals.has_organization {
        analysis.signals.has_organization = value;
    }

    for keyword in ai.keywords {
        let lowered = keyword.to_lowercase();
        if analysis.keywords.len() >= 20 {
            break;
        }
        if !analysis.keywords.contains(&lowered) {
            analysis.keywords.push(lowered);
        }
    }

    // Re-derive primary entities now that the union may have grown
    analysis.primary_entities.clear();
    for (name, values) in [
        ("people", &analysis.entities.people),
        ("services", &analysis.entities.services),
        ("sectors", &analysis.entities.sectors),
        ("locations", &analysis.entities.locations),
        ("organizations", &analysis.entities.organizations),
        ("regulatory", &analysis.entities.regulatory),
    ] {
        if !values.is_empty() {
            analysis.primary_entities.push(name.to_string());
        }
    }

    analysis.analysis_method = AnalysisMethod::AiEnhanced;
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use searchlight_core::{Error, Result};

    struct ScriptedChat {
        response: String,
        fail: bool,
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        async fn chat(
            &self,
            _system: &str,
            _user: &str,
            _max_tokens: usize,
            _temperature: f32,
        ) -> Result<String> {
            if self.fail {
                Err(Error::Llm("connection refused".to_string()))
            } else {
                Ok(self.response.clone())
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_ai_override_applied() {
        let analyzer = QueryAnalyzer::default();
        let model = ScriptedChat {
            response: r#"{"intent": "service", "confidence": 0.92,
                "entities": {"services": ["energy audits"]},
                "keywords": ["energy", "audit"]}"#
                .to_string(),
            fail: false,
        };
        let analysis = analyzer
            .analyze_with_ai("blue sky thinking", Some(&model), true)
            .await;
        assert_eq!(analysis.intent, QueryIntent::Service);
        assert!((analysis.confidence - 0.92).abs() < 1e-6);
        assert_eq!(analysis.analysis_method, AnalysisMethod::AiEnhanced);
        assert!(analysis
            .entities
            .services
            .contains(&"energy audits".to_string()));
    }

    #[tokio::test]
    async fn test_low_confidence_keeps_heuristic_intent() {
        let analyzer = QueryAnalyzer::default();
        let model = ScriptedChat {
            response: r#"{"intent": "navigational", "confidence": 0.3}"#.to_string(),
            fail: false,
        };
        let analysis = analyzer
            .analyze_with_ai("James Walsh", Some(&model), true)
            .await;
        assert_eq!(analysis.intent, QueryIntent::PersonName);
        // Entities still merged even when the intent override is rejected
        assert_eq!(analysis.analysis_method, AnalysisMethod::AiEnhanced);
    }

    #[tokio::test]
    async fn test_llm_error_swallowed() {
        let analyzer = QueryAnalyzer::default();
        let model = ScriptedChat {
            response: String::new(),
            fail: true,
        };
        let analysis = analyzer
            .analyze_with_ai("hazardous waste management", Some(&model), true)
            .await;
        assert_eq!(analysis.intent, QueryIntent::Service);
        assert_eq!(analysis.analysis_method, AnalysisMethod::Heuristic);
    }

    #[tokio::test]
    async fn test_fenced_and_noisy_json_recovered() {
        let analyzer = QueryAnalyzer::default();
        let model = ScriptedChat {
            response: "Here is the analysis:\n```json\n{\"intent\": \"sector\", \"confidence\": 0.8}\n```"
                .to_string(),
            fail: false,
        };
        let analysis = analyzer
            .analyze_with_ai("blue sky thinking", Some(&model), true)
            .await;
        assert_eq!(analysis.intent, QueryIntent::Sector);
    }

    #[test]
    fn test_extract_balanced_object() {
        assert_eq!(
            extract_balanced_object("noise {\"a\": {\"b\": 1}} trailing"),
            Some("{\"a\": {\"b\": 1}}".to_string())
        );
        assert_eq!(extract_balanced_object("no json here"), None);
    }
}
