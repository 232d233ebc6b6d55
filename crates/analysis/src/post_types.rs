//! Post-type priority recommendation
//!
//! Maps query context to a post-type ordering: person queries prefer
//! profiles, service queries prefer service pages, how-to queries prefer
//! articles. The output always contains every known post type exactly once.

use searchlight_core::{QueryAnalysis, QueryIntent};

const PROFILE: &str = "profile";
const SERVICE: &str = "service";
const PAGE: &str = "page";
const POST: &str = "post";
const ATTACHMENT: &str = "attachment";

fn intent_priority(intent: QueryIntent) -> Option<[&'static str; 5]> {
    match intent {
        QueryIntent::PersonName | QueryIntent::ExecutiveRole => {
            Some([PROFILE, PAGE, POST, SERVICE, ATTACHMENT])
        }
        QueryIntent::Service | QueryIntent::LocalService => {
            Some([SERVICE, PAGE, POST, PROFILE, ATTACHMENT])
        }
        QueryIntent::Howto => Some([POST, PAGE, PROFILE, SERVICE, ATTACHMENT]),
        QueryIntent::CaseStudy => Some([POST, PAGE, SERVICE, PROFILE, ATTACHMENT]),
        QueryIntent::Sector => Some([PAGE, POST, SERVICE, PROFILE, ATTACHMENT]),
        QueryIntent::Regulatory => Some([POST, PAGE, SERVICE, PROFILE, ATTACHMENT]),
        QueryIntent::Navigational | QueryIntent::Transactional => {
            Some([PAGE, POST, SERVICE, PROFILE, ATTACHMENT])
        }
        QueryIntent::Informational => Some([POST, PAGE, SERVICE, PROFILE, ATTACHMENT]),
        QueryIntent::General => None,
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

fn move_to_front(list: &mut Vec<String>, value: &str) {
    if let Some(pos) = list.iter().position(|existing| existing == value) {
        let item = list.remove(pos);
        list.insert(0, item);
    } else {
        list.insert(0, value.to_string());
    }
}

/// Recommended post-type ordering for a query, merging the caller's default
/// priority with entity- and intent-driven adjustments.
///
/// Every type in `known_types` appears exactly once in the result; types the
/// context surfaces that are unknown to the deployment are appended too, so
/// the priority index is always defined.
pub fn recommended_post_types(
    analysis: &QueryAnalysis,
    default_priority: Option<&[String]>,
    known_types: &[String],
) -> Vec<String> {
    let mut recommended: Vec<String> = match default_priority {
        Some(priority) if !priority.is_empty() => priority.to_vec(),
        _ => known_types.to_vec(),
    };

    // Entity adjustments first: entities are the strongest signal
    let has_people =
        !analysis.entities.people.is_empty() || !analysis.entities.roles.is_empty();
    if has_people && analysis.confidence > 0.6 {
        move_to_front(&mut recommended, PROFILE);
        tracing::debug!("post-type adjustment: people/roles detected, prioritizing profiles");
    }

    if !analysis.entities.services.is_empty() && analysis.confidence > 0.6 {
        move_to_front(&mut recommended, SERVICE);
        tracing::debug!("post-type adjustment: services detected, prioritizing service pages");
    }

    // Intent ordering next, preserving entity-promoted types at the front
    if analysis.confidence > 0.5 {
        if let Some(intent_order) = intent_priority(analysis.intent) {
            let mut merged: Vec<String> = Vec::new();
            for candidate in recommended.iter().take(2) {
                if candidate == PROFILE || candidate == SERVICE {
                    push_unique(&mut merged, candidate);
                }
            }
            for post_type in intent_order {
                push_unique(&mut merged, post_type);
            }
            for post_type in &recommended {
                push_unique(&mut merged, post_type);
            }
            recommended = merged;
        }
    }

    for post_type in known_types {
        push_unique(&mut recommended, post_type);
    }

    recommended
}

/// Merge an admin-set priority with the context recommendation: types in
/// both lists first (context order), then the rest of the admin list, then
/// any remaining context types.
pub fn effective_priority(admin: Option<&[String]>, context: &[String]) -> Vec<String> {
    let admin = match admin {
        Some(admin) if !admin.is_empty() => admin,
        _ => return context.to_vec(),
    };

    let mut merged: Vec<String> = Vec::new();
    for post_type in context {
        if admin.contains(post_type) {
            push_unique(&mut merged, post_type);
        }
    }
    for post_type in admin {
        push_unique(&mut merged, post_type);
    }
    for post_type in context {
        push_unique(&mut merged, post_type);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::QueryAnalyzer;

    fn known() -> Vec<String> {
        [PROFILE, SERVICE, PAGE, POST, ATTACHMENT]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_person_query_prioritizes_profiles() {
        let analysis = QueryAnalyzer::default().analyze("James Walsh");
        let priority = recommended_post_types(&analysis, None, &known());
        assert_eq!(priority[0], PROFILE);
        assert_eq!(priority.len(), 5);
    }

    #[test]
    fn test_service_query_prioritizes_service_pages() {
        let analysis = QueryAnalyzer::default().analyze("hazardous waste management");
        let priority = recommended_post_types(&analysis, None, &known());
        assert_eq!(priority[0], SERVICE);
    }

    #[test]
    fn test_every_known_type_appears_exactly_once() {
        let analysis = QueryAnalyzer::default().analyze("who is the ceo");
        let priority = recommended_post_types(&analysis, None, &known());
        let mut sorted = priority.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), priority.len());
        for post_type in known() {
            assert!(priority.contains(&post_type));
        }
    }

    #[test]
    fn test_low_confidence_keeps_default_order() {
        let analysis = QueryAnalyzer::default().analyze("blue sky thinking");
        let priority = recommended_post_types(&analysis, None, &known());
        assert_eq!(priority, known());
    }

    #[test]
    fn test_effective_priority_merge() {
        let admin = vec![POST.to_string(), PAGE.to_string()];
        let context = vec![
            PROFILE.to_string(),
            PAGE.to_string(),
            POST.to_string(),
            SERVICE.to_string(),
            ATTACHMENT.to_string(),
        ];
        let merged = effective_priority(Some(&admin), &context);
        // Shared types first in context order, then admin leftovers, then context
        assert_eq!(merged[0], PAGE);
        assert_eq!(merged[1], POST);
        assert!(merged.contains(&PROFILE.to_string()));
        assert_eq!(merged.len(), 5);
    }
}
