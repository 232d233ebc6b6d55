//! Keyword lexicons driving intent classification
//!
//! Built-in sets cover the corpus domain (environmental and engineering
//! consulting content); every set can be extended through configuration.

use std::collections::HashSet;

use searchlight_config::IntentKeywordOverrides;

const SERVICE_KEYWORDS: &[&str] = &[
    "service",
    "services",
    "solution",
    "solutions",
    "consulting",
    "consultant",
    "consultants",
    "management",
    "assessment",
    "monitoring",
    "remediation",
    "compliance",
    "engineering",
    "audit",
    "design",
    "implementation",
    "support",
    "analysis",
    "planning",
];

const ROLE_KEYWORDS: &[&str] = &[
    "ceo", "chief", "president", "principal", "director", "chair", "founder", "lead", "officer",
    "manager", "executive", "partner", "vice",
];

const TRANSACTIONAL_KEYWORDS: &[&str] = &[
    "buy", "purchase", "order", "request", "quote", "apply", "register", "subscribe", "download",
    "hire", "schedule", "book",
];

const NAVIGATIONAL_KEYWORDS: &[&str] = &[
    "contact",
    "about",
    "team",
    "careers",
    "location",
    "locations",
    "office",
    "offices",
    "login",
    "account",
    "portal",
    "map",
    "directions",
    "phone",
    "email",
];

const QUESTION_WORDS: &[&str] = &[
    "who", "what", "where", "when", "why", "how", "can", "should", "will", "do", "does", "is",
    "are",
];

const SECTOR_KEYWORDS: &[&str] = &[
    "environmental",
    "waste",
    "remediation",
    "sustainability",
    "industrial",
    "manufacturing",
    "energy",
    "infrastructure",
    "water",
    "air",
    "landfill",
    "recycling",
    "compliance",
    "construction",
    "geotechnical",
    "pfas",
    "permitting",
    "geology",
];

const SERVICE_PHRASES: &[&str] = &[
    "waste management",
    "air quality",
    "environmental compliance",
    "sustainability consulting",
    "hazardous waste",
    "landfill gas",
    "remediation services",
    "brownfield redevelopment",
    "leachate management",
    "pfas treatment",
    "renewable energy",
];

const SECTOR_PHRASES: &[&str] = &[
    "solid waste",
    "municipal waste",
    "industrial waste",
    "environmental engineering",
    "waste to energy",
    "biogas",
    "circular economy",
    "climate resilience",
];

const LOCAL_MODIFIERS: &[&str] = &["near me", "nearby", "in my area", "close to me", "local"];

const CASE_STUDY_KEYWORDS: &[&str] =
    &["case study", "case studies", "project", "projects", "portfolio"];

const REGULATORY_KEYWORDS: &[&str] = &[
    "regulation",
    "regulations",
    "rule",
    "rules",
    "policy",
    "laws",
    "epa",
    "osha",
    "compliance",
    "permitting",
];

/// Words that mark a capitalized phrase as a service/system rather than a
/// person name ("Supply Chain Management Systems" is not a person).
const SERVICE_INDICATOR_WORDS: &[&str] = &[
    "management",
    "system",
    "systems",
    "service",
    "services",
    "solution",
    "solutions",
    "chain",
    "supply",
    "compliance",
    "consulting",
    "engineering",
    "remediation",
    "treatment",
    "monitoring",
    "assessment",
    "audit",
    "planning",
    "design",
    "implementation",
    "support",
    "analysis",
    "operations",
    "technology",
    "technologies",
    "environmental",
    "waste",
    "hazardous",
    "solid",
    "municipal",
    "industrial",
    "renewable",
    "energy",
    "sustainability",
    "infrastructure",
    "geotechnical",
];

const ORGANIZATION_INDICATORS: &[&str] = &[
    "company",
    "corporation",
    "corp",
    "inc",
    "llc",
    "ltd",
    "associates",
    "partners",
    "group",
    "enterprises",
    "industries",
    "systems",
    "technologies",
    "solutions",
    "services",
];

const ORGANIZATION_SUFFIXES: &[&str] = &[
    "inc",
    "llc",
    "ltd",
    "corp",
    "co",
    "company",
    "associates",
    "partners",
    "group",
    "department",
    "agency",
    "university",
    "college",
    "authority",
    "board",
    "bureau",
    "commission",
    "council",
];

const US_STATE_NAMES: &[&str] = &[
    "alabama",
    "alaska",
    "arizona",
    "arkansas",
    "california",
    "colorado",
    "connecticut",
    "delaware",
    "florida",
    "georgia",
    "hawaii",
    "idaho",
    "illinois",
    "indiana",
    "iowa",
    "kansas",
    "kentucky",
    "louisiana",
    "maine",
    "maryland",
    "massachusetts",
    "michigan",
    "minnesota",
    "mississippi",
    "missouri",
    "montana",
    "nebraska",
    "nevada",
    "new hampshire",
    "new jersey",
    "new mexico",
    "new york",
    "north carolina",
    "north dakota",
    "ohio",
    "oklahoma",
    "oregon",
    "pennsylvania",
    "rhode island",
    "south carolina",
    "south dakota",
    "tennessee",
    "texas",
    "utah",
    "vermont",
    "virginia",
    "washington",
    "west virginia",
    "wisconsin",
    "wyoming",
];

const US_STATE_ABBREVIATIONS: &[&str] = &[
    "al", "ak", "az", "ar", "ca", "co", "ct", "de", "fl", "ga", "hi", "id", "il", "in", "ia", "ks",
    "ky", "la", "me", "md", "ma", "mi", "mn", "ms", "mo", "mt", "ne", "nv", "nh", "nj", "nm", "ny",
    "nc", "nd", "oh", "ok", "or", "pa", "ri", "sc", "sd", "tn", "tx", "ut", "vt", "va", "wa", "wv",
    "wi", "wy",
];

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// All keyword sets used by the analyzer
#[derive(Debug, Clone)]
pub struct Lexicons {
    pub service_keywords: HashSet<String>,
    pub role_keywords: HashSet<String>,
    pub transactional_keywords: HashSet<String>,
    pub navigational_keywords: HashSet<String>,
    pub question_words: HashSet<String>,
    pub sector_keywords: HashSet<String>,
    pub service_phrases: HashSet<String>,
    pub sector_phrases: HashSet<String>,
    pub local_modifiers: Vec<String>,
    pub case_study_keywords: Vec<String>,
    pub regulatory_keywords: Vec<String>,
    pub service_indicator_words: HashSet<String>,
    pub organization_indicators: HashSet<String>,
    pub organization_suffixes: Vec<String>,
    pub us_state_names: HashSet<String>,
    pub us_state_abbreviations: HashSet<String>,
}

impl Lexicons {
    /// Built-in lexicons only
    pub fn builtin() -> Self {
        Self {
            service_keywords: to_set(SERVICE_KEYWORDS),
            role_keywords: to_set(ROLE_KEYWORDS),
            transactional_keywords: to_set(TRANSACTIONAL_KEYWORDS),
            navigational_keywords: to_set(NAVIGATIONAL_KEYWORDS),
            question_words: to_set(QUESTION_WORDS),
            sector_keywords: to_set(SECTOR_KEYWORDS),
            service_phrases: to_set(SERVICE_PHRASES),
            sector_phrases: to_set(SECTOR_PHRASES),
            local_modifiers: LOCAL_MODIFIERS.iter().map(|s| s.to_string()).collect(),
            case_study_keywords: CASE_STUDY_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            regulatory_keywords: REGULATORY_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            service_indicator_words: to_set(SERVICE_INDICATOR_WORDS),
            organization_indicators: to_set(ORGANIZATION_INDICATORS),
            organization_suffixes: ORGANIZATION_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            us_state_names: to_set(US_STATE_NAMES),
            us_state_abbreviations: to_set(US_STATE_ABBREVIATIONS),
        }
    }

    /// Built-in lexicons merged with configured overrides. Multi-word
    /// service/sector entries also join the phrase sets so substring
    /// matching picks them up.
    pub fn with_overrides(overrides: &IntentKeywordOverrides) -> Self {
        let mut lexicons = Self::builtin();

        for keyword in &overrides.service_keywords {
            let lowered = keyword.to_lowercase();
            if lowered.contains(' ') {
                lexicons.service_phrases.insert(lowered.clone());
            }
            lexicons.service_keywords.insert(lowered);
        }
        for keyword in &overrides.sector_keywords {
            let lowered = keyword.to_lowercase();
            if lowered.contains(' ') {
                lexicons.sector_phrases.insert(lowered.clone());
            }
            lexicons.sector_keywords.insert(lowered);
        }
        for keyword in &overrides.navigational_keywords {
            lexicons.navigational_keywords.insert(keyword.to_lowercase());
        }
        for keyword in &overrides.transactional_keywords {
            lexicons.transactional_keywords.insert(keyword.to_lowercase());
        }

        lexicons
    }
}

impl Default for Lexicons {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_coverage() {
        let lexicons = Lexicons::builtin();
        assert!(lexicons.service_keywords.contains("remediation"));
        assert!(lexicons.role_keywords.contains("ceo"));
        assert!(lexicons.us_state_names.contains("california"));
        assert_eq!(lexicons.us_state_abbreviations.len(), 50);
    }

    #[test]
    fn test_overrides_merge_into_phrases() {
        let overrides = IntentKeywordOverrides {
            service_keywords: vec!["stormwater design".to_string(), "dredging".to_string()],
            sector_keywords: vec!["mining".to_string()],
            navigational_keywords: vec!["Newsroom".to_string()],
            transactional_keywords: vec![],
        };
        let lexicons = Lexicons::with_overrides(&overrides);
        assert!(lexicons.service_keywords.contains("dredging"));
        assert!(lexicons.service_phrases.contains("stormwater design"));
        assert!(lexicons.sector_keywords.contains("mining"));
        assert!(lexicons.navigational_keywords.contains("newsroom"));
    }
}
