//! Heuristic intent classification
//!
//! Pure function of the query text and the configured lexicons. The cascade
//! is ordered by signal strength: explicit person names beat role keywords,
//! which beat navigational/transactional hits, which beat service and sector
//! matches, with question-word intents and `general` at the bottom.

use once_cell::sync::Lazy;
use regex::Regex;

use searchlight_core::{
    AnalysisMethod, EntitySet, QueryAnalysis, QueryIntent, QuerySignals,
};

use crate::lexicons::Lexicons;

static CAPITALIZED_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3}\b").expect("valid regex")
});

static ZIP_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{5}(?:-\d{4})?\b").expect("valid regex"));

static ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,}\b").expect("valid regex"));

static TWO_LETTER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z]{2}\b").expect("valid regex"));

static ORG_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z&]+(?:\s+[A-Z][A-Za-z&]+)*\b").expect("valid regex")
});

static CITY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:city of|county of)\s+[a-z]+(?:\s+[a-z]+)*").expect("valid regex")
});

/// Multi-word patterns that read like service offerings
static SERVICE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b\w+\s+management\b",
        r"\b\w+\s+systems?\b",
        r"\b\w+\s+services?\b",
        r"\b\w+\s+solutions?\b",
        r"\b\w+\s+consulting\b",
        r"\b\w+\s+engineering\b",
        r"\b\w+\s+remediation\b",
        r"\b\w+\s+compliance\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Lexicon-driven query analyzer
pub struct QueryAnalyzer {
    lexicons: Lexicons,
}

impl QueryAnalyzer {
    pub fn new(lexicons: Lexicons) -> Self {
        Self { lexicons }
    }

    pub fn lexicons(&self) -> &Lexicons {
        &self.lexicons
    }

    /// Analyze a query heuristically. No state mutation, no I/O.
    pub fn analyze(&self, query: &str) -> QueryAnalysis {
        let original_query = query.to_string();
        let query = query.trim();
        let query_lower = query.to_lowercase();

        let people = self.extract_capitalized_phrases(query);
        let roles = self.extract_roles(&query_lower);
        let services = self.extract_services(&query_lower);
        let locations = self.extract_locations(query, &query_lower);
        let organizations = self.extract_organizations(query);

        let (intent, confidence, signals) = self.determine_intent(
            query,
            &query_lower,
            &people,
            &roles,
            &services,
            &locations,
            &organizations,
        );

        let keywords = tokenize_keywords(&query_lower);

        let mut sectors: Vec<String> = self
            .lexicons
            .sector_keywords
            .iter()
            .filter(|kw| query_lower.contains(kw.as_str()))
            .cloned()
            .collect();
        sectors.extend(
            self.lexicons
                .sector_phrases
                .iter()
                .filter(|phrase| query_lower.contains(phrase.as_str()))
                .cloned(),
        );
        sectors.sort();
        sectors.dedup();

        let regulatory: Vec<String> = self
            .lexicons
            .regulatory_keywords
            .iter()
            .filter(|kw| query_lower.contains(kw.as_str()))
            .cloned()
            .collect();

        let local_modifiers: Vec<String> = self
            .lexicons
            .local_modifiers
            .iter()
            .filter(|modifier| query_lower.contains(modifier.as_str()))
            .cloned()
            .collect();

        let entities = EntitySet {
            people,
            roles,
            services,
            sectors,
            locations,
            organizations,
            regulatory,
            local_modifiers,
        };

        let primary_entities = primary_entities(&entities);

        QueryAnalysis {
            intent,
            confidence,
            entities,
            signals,
            normalized_query: query_lower,
            keywords,
            primary_entities,
            original_query,
            analysis_method: AnalysisMethod::Heuristic,
        }
    }

    /// Candidate proper nouns / person names: capitalized bigrams to
    /// quadgrams, with service/system phrases filtered out.
    fn extract_capitalized_phrases(&self, query: &str) -> Vec<String> {
        let mut cleaned = Vec::new();

        for candidate in CAPITALIZED_PHRASE.find_iter(query) {
            let phrase = candidate.as_str().trim();
            let phrase_lower = phrase.to_lowercase();
            let words: Vec<&str> = phrase.split_whitespace().collect();

            let is_service_phrase = self
                .lexicons
                .service_indicator_words
                .iter()
                .chain(self.lexicons.organization_indicators.iter())
                .any(|indicator| phrase_lower.contains(indicator.as_str()));

            let no_indicator_word = !words.iter().any(|word| {
                let lowered = word.to_lowercase();
                self.lexicons.service_indicator_words.contains(&lowered)
                    || self.lexicons.organization_indicators.contains(&lowered)
            });

            if !is_service_phrase || (words.len() <= 3 && no_indicator_word) {
                cleaned.push(phrase.to_string());
            }
        }

        cleaned
    }

    fn extract_roles(&self, query_lower: &str) -> Vec<String> {
        let mut roles: Vec<String> = self
            .lexicons
            .role_keywords
            .iter()
            .filter(|kw| query_lower.contains(kw.as_str()))
            .cloned()
            .collect();
        roles.sort();
        roles
    }

    fn extract_services(&self, query_lower: &str) -> Vec<String> {
        let mut matches: Vec<String> = self
            .lexicons
            .service_keywords
            .iter()
            .filter(|kw| query_lower.contains(kw.as_str()))
            .cloned()
            .collect();

        for phrase in &self.lexicons.service_phrases {
            if query_lower.contains(phrase.as_str()) {
                matches.push(phrase.clone());
            }
        }

        for pattern in SERVICE_PATTERNS.iter() {
            for found in pattern.find_iter(query_lower) {
                let text = found.as_str().trim();
                if !text.is_empty() && text.split_whitespace().count() <= 3 {
                    matches.push(text.to_string());
                }
            }
        }

        matches.sort();
        matches.dedup();
        matches
    }

    fn extract_locations(&self, query: &str, query_lower: &str) -> Vec<String> {
        let mut locations: Vec<String> = Vec::new();

        for state in &self.lexicons.us_state_names {
            if query_lower.contains(state.as_str()) {
                locations.push(title_case(state));
            }
        }

        // Two-letter uppercase tokens that name a state (CA, NY, ...)
        for token in TWO_LETTER_TOKEN.find_iter(query) {
            let text = token.as_str();
            if text.chars().all(|c| c.is_ascii_uppercase())
                && self
                    .lexicons
                    .us_state_abbreviations
                    .contains(&text.to_lowercase())
            {
                locations.push(text.to_string());
            }
        }

        for found in CITY_PREFIX.find_iter(query_lower) {
            locations.push(title_case(found.as_str()));
        }

        locations.sort();
        locations.dedup();
        locations
    }

    fn extract_organizations(&self, query: &str) -> Vec<String> {
        let mut organizations: Vec<String> = Vec::new();

        for candidate in ORG_PHRASE.find_iter(query) {
            let phrase = candidate.as_str();
            let lowered = phrase.to_lowercase();
            if self.lexicons.us_state_names.contains(&lowered) {
                continue;
            }
            if self
                .lexicons
                .organization_suffixes
                .iter()
                .any(|suffix| lowered.ends_with(suffix.as_str()))
            {
                organizations.push(phrase.trim().to_string());
            }
        }

        // Uppercase acronyms (EPA, OSHA, ...)
        for token in ACRONYM.find_iter(query) {
            if token.as_str().len() >= 3 {
                organizations.push(token.as_str().to_string());
            }
        }

        organizations.sort();
        organizations.dedup();
        organizations
    }

    #[allow(clippy::too_many_arguments)]
    fn determine_intent(
        &self,
        query: &str,
        query_lower: &str,
        people: &[String],
        roles: &[String],
        services: &[String],
        locations: &[String],
        organizations: &[String],
    ) -> (QueryIntent, f32, QuerySignals) {
        let mut signals = QuerySignals {
            has_role_keyword: !roles.is_empty(),
            has_service_keyword: !services.is_empty(),
            has_location: !locations.is_empty(),
            has_organization: !organizations.is_empty(),
            has_person_candidate: !people.is_empty(),
            ..Default::default()
        };

        let words: Vec<&str> = query.split_whitespace().collect();
        if let Some(first) = words.first() {
            let first_lower = first.to_lowercase();
            if self.lexicons.question_words.contains(&first_lower) {
                signals.is_question = true;
                signals.question_word = Some(first_lower);
            }
        }

        signals.has_local_modifier = self
            .lexicons
            .local_modifiers
            .iter()
            .any(|modifier| query_lower.contains(modifier.as_str()));
        signals.has_zip_code = ZIP_CODE.is_match(query_lower);
        signals.has_case_study_signal = self
            .lexicons
            .case_study_keywords
            .iter()
            .any(|kw| query_lower.contains(kw.as_str()));
        signals.has_regulatory_signal = self
            .lexicons
            .regulatory_keywords
            .iter()
            .any(|kw| query_lower.contains(kw.as_str()));

        // Person / executive detection. A capitalized phrase only counts as
        // a person when nothing about the query reads like a service or an
        // organization.
        if !people.is_empty() {
            let query_words: Vec<String> =
                query_lower.split_whitespace().map(String::from).collect();

            let is_service_phrase = query_words
                .iter()
                .any(|word| self.lexicons.service_indicator_words.contains(word));
            let is_organization = query_words
                .iter()
                .any(|word| self.lexicons.organization_indicators.contains(word));

            let people_phrase = people.join(" ").to_lowercase();
            let is_people_phrase_service = self
                .lexicons
                .service_indicator_words
                .iter()
                .chain(self.lexicons.organization_indicators.iter())
                .any(|indicator| people_phrase.contains(indicator.as_str()));

            let is_long_service_query = words.len() >= 4 && is_service_phrase;

            if !(is_service_phrase
                || is_organization
                || is_people_phrase_service
                || is_long_service_query)
                && people.len() == 1
                && words.len() <= 4
            {
                return (QueryIntent::PersonName, 0.9, signals);
            }

            if !roles.is_empty() || signals.question_word.as_deref() == Some("who") {
                return (QueryIntent::ExecutiveRole, 0.85, signals);
            }
        }

        if !roles.is_empty() && query_lower.contains("who") {
            return (QueryIntent::ExecutiveRole, 0.8, signals);
        }

        if self
            .lexicons
            .navigational_keywords
            .iter()
            .any(|kw| query_lower.contains(kw.as_str()))
        {
            return (QueryIntent::Navigational, 0.75, signals);
        }

        if self
            .lexicons
            .transactional_keywords
            .iter()
            .any(|kw| query_lower.contains(kw.as_str()))
        {
            return (QueryIntent::Transactional, 0.7, signals);
        }

        // Local service: service term plus a location signal
        if !services.is_empty()
            && (signals.has_local_modifier || signals.has_location || signals.has_zip_code)
        {
            return (QueryIntent::LocalService, 0.82, signals);
        }

        let has_service_pattern = SERVICE_PATTERNS
            .iter()
            .take(6)
            .any(|pattern| pattern.is_match(query_lower));
        if !services.is_empty() || has_service_pattern {
            return (QueryIntent::Service, 0.8, signals);
        }

        if self
            .lexicons
            .sector_keywords
            .iter()
            .any(|kw| query_lower.contains(kw.as_str()))
            || self
                .lexicons
                .sector_phrases
                .iter()
                .any(|phrase| query_lower.contains(phrase.as_str()))
        {
            return (QueryIntent::Sector, 0.65, signals);
        }

        if signals.has_case_study_signal {
            return (QueryIntent::CaseStudy, 0.6, signals);
        }

        if signals.has_regulatory_signal {
            return (QueryIntent::Regulatory, 0.6, signals);
        }

        if signals.is_question {
            return match signals.question_word.as_deref() {
                Some("how") | Some("what") | Some("why") => (QueryIntent::Howto, 0.65, signals),
                Some("who") if !roles.is_empty() => (QueryIntent::ExecutiveRole, 0.75, signals),
                _ => (QueryIntent::Informational, 0.6, signals),
            };
        }

        (QueryIntent::General, 0.4, signals)
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new(Lexicons::builtin())
    }
}

fn tokenize_keywords(query_lower: &str) -> Vec<String> {
    static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").expect("valid regex"));
    TOKEN
        .find_iter(query_lower)
        .take(20)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn primary_entities(entities: &EntitySet) -> Vec<String> {
    let mut primary = Vec::new();
    if !entities.people.is_empty() {
        primary.push("people".to_string());
    }
    if !entities.services.is_empty() {
        primary.push("services".to_string());
    }
    if !entities.sectors.is_empty() {
        primary.push("sectors".to_string());
    }
    if !entities.locations.is_empty() {
        primary.push("locations".to_string());
    }
    if !entities.organizations.is_empty() {
        primary.push("organizations".to_string());
    }
    if !entities.regulatory.is_empty() {
        primary.push("regulatory".to_string());
    }
    primary
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> QueryAnalyzer {
        QueryAnalyzer::default()
    }

    #[test]
    fn test_person_name_short_query() {
        let analysis = analyzer().analyze("James Walsh");
        assert_eq!(analysis.intent, QueryIntent::PersonName);
        assert!((analysis.confidence - 0.9).abs() < 1e-6);
        assert_eq!(analysis.entities.people, vec!["James Walsh".to_string()]);
    }

    #[test]
    fn test_capitalized_service_phrase_is_not_a_person() {
        let analysis = analyzer().analyze("Supply Chain Management Systems");
        assert_eq!(analysis.intent, QueryIntent::Service);
        assert!(analysis.entities.people.is_empty());
    }

    #[test]
    fn test_executive_role() {
        let analysis = analyzer().analyze("who is the ceo");
        assert_eq!(analysis.intent, QueryIntent::ExecutiveRole);
        assert!(analysis.signals.is_question);
        assert!(analysis.entities.roles.contains(&"ceo".to_string()));
    }

    #[test]
    fn test_service_intent() {
        let analysis = analyzer().analyze("hazardous waste management");
        assert_eq!(analysis.intent, QueryIntent::Service);
        assert!(analysis
            .entities
            .services
            .contains(&"hazardous waste".to_string()));
        assert!(analysis.primary_entities.contains(&"services".to_string()));
    }

    #[test]
    fn test_local_service_with_state() {
        let analysis = analyzer().analyze("waste management services in California");
        assert_eq!(analysis.intent, QueryIntent::LocalService);
        assert!(analysis
            .entities
            .locations
            .contains(&"California".to_string()));
    }

    #[test]
    fn test_local_service_with_zip() {
        let analysis = analyzer().analyze("remediation services 90210");
        assert_eq!(analysis.intent, QueryIntent::LocalService);
        assert!(analysis.signals.has_zip_code);
    }

    #[test]
    fn test_navigational_and_transactional() {
        assert_eq!(
            analyzer().analyze("contact").intent,
            QueryIntent::Navigational
        );
        assert_eq!(
            analyzer().analyze("request a quote").intent,
            QueryIntent::Transactional
        );
    }

    #[test]
    fn test_regulatory_beats_question_word() {
        let analysis = analyzer().analyze("how to comply with EPA regulations");
        assert_eq!(analysis.intent, QueryIntent::Regulatory);
        assert!(analysis
            .entities
            .organizations
            .contains(&"EPA".to_string()));
    }

    #[test]
    fn test_howto_question() {
        let analysis = analyzer().analyze("how do landfills settle over time");
        assert_eq!(analysis.intent, QueryIntent::Sector);
        // Pure question with no lexicon hits falls to howto
        let analysis = analyzer().analyze("how do things decay over decades");
        assert_eq!(analysis.intent, QueryIntent::Howto);
    }

    #[test]
    fn test_general_fallback() {
        let analysis = analyzer().analyze("blue sky thinking");
        assert_eq!(analysis.intent, QueryIntent::General);
        assert!((analysis.confidence - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_keywords_capped_at_20() {
        let long_query = (0..30).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let analysis = analyzer().analyze(&long_query);
        assert_eq!(analysis.keywords.len(), 20);
    }
}
