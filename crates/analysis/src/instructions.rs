//! Intent-driven reranking instructions
//!
//! Each detected intent maps to an instruction block appended to the
//! reranker prompt. User-supplied criteria always rank above these.

use searchlight_core::QueryIntent;

/// Instruction text for an intent, or None when default behavior applies
pub fn intent_instructions(intent: QueryIntent, query: &str) -> Option<String> {
    let text = match intent {
        QueryIntent::PersonName => format!(
            "User is searching for a specific person: \"{query}\".\n\n\
             PRIORITY:\n\
             1. Professional profiles where the person's full name appears in the title\n\
             2. Biographical content about this specific person\n\
             3. Press releases, announcements, or news about this person\n\n\
             RULES:\n\
             - Only show results about THIS specific person\n\
             - Boost exact name matches in titles\n\
             - Do NOT include general articles unless they're specifically about this person\n\
             - If no professional profile exists, show news/articles about them"
        ),
        QueryIntent::ExecutiveRole => format!(
            "User is asking about a specific executive role or position: \"{query}\".\n\n\
             PRIORITY:\n\
             1. Professional profiles where the person holds the specific role mentioned\n\
             2. Press releases or announcements naming the person in that role\n\
             3. Profiles that mention the role in title or content\n\n\
             RULES:\n\
             - Prioritize profiles where the person is CURRENTLY in that role\n\
             - Look for role keywords: CEO, President, Executive, Chief, Director, Leader\n\
             - Boost results where the role appears in the title\n\
             - For \"Who is the CEO?\", the person currently holding that title should rank #1\n\
             - Recent announcements about role changes are highly relevant"
        ),
        QueryIntent::Service | QueryIntent::LocalService => format!(
            "User is looking for services or solutions related to: \"{query}\".\n\n\
             PRIORITY:\n\
             1. Service description pages that match the query\n\
             2. Solution offerings and capabilities\n\
             3. Service-specific landing pages\n\n\
             RULES:\n\
             - Prioritize actionable, practical service information\n\
             - Show what services are available\n\
             - Include capabilities and expertise areas\n\
             - Avoid general informational content unless highly relevant"
        ),
        QueryIntent::Howto => format!(
            "User needs actionable guidance on: \"{query}\".\n\n\
             PRIORITY:\n\
             1. Step-by-step guides and tutorials\n\
             2. Instructional content with actionable steps\n\
             3. \"How to\" articles with practical advice\n\n\
             RULES:\n\
             - Prioritize content with numbered steps or clear instructions\n\
             - Look for practical, actionable advice\n\
             - Skip theoretical content unless no practical guides exist\n\
             - Focus on \"how to do X\" rather than \"what is X\""
        ),
        QueryIntent::Navigational => format!(
            "User is looking for a specific page: \"{query}\".\n\n\
             PRIORITY:\n\
             1. Exact match for the page they're looking for\n\
             2. Related pages that might serve the same purpose\n\n\
             RULES:\n\
             - Match the navigation intent exactly\n\
             - Exact title matches should be #1"
        ),
        QueryIntent::Transactional => format!(
            "User wants to perform an action related to: \"{query}\".\n\n\
             PRIORITY:\n\
             1. Pages where they can complete the action\n\
             2. Service request pages\n\
             3. Download/application pages\n\n\
             RULES:\n\
             - Show pages where the user can DO something (not just read about it)\n\
             - Prioritize actionable pages"
        ),
        _ => return None,
    };
    Some(text)
}

/// Combine user instructions with intent-derived ones. User instructions
/// come first: they carry the highest priority in the rerank prompt.
pub fn combine_instructions(user: &str, intent_based: Option<&str>) -> String {
    match (user.trim().is_empty(), intent_based) {
        (false, Some(intent_text)) => format!("{}\n\n{}", user.trim(), intent_text),
        (false, None) => user.trim().to_string(),
        (true, Some(intent_text)) => intent_text.to_string(),
        (true, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_instructions() {
        let text = intent_instructions(QueryIntent::PersonName, "James Walsh").unwrap();
        assert!(text.contains("James Walsh"));
        assert!(text.contains("Professional profiles"));
    }

    #[test]
    fn test_general_has_no_instructions() {
        assert!(intent_instructions(QueryIntent::General, "anything").is_none());
        assert!(intent_instructions(QueryIntent::Sector, "waste").is_none());
    }

    #[test]
    fn test_combine_puts_user_first() {
        let combined = combine_instructions("prefer recent items", Some("intent text"));
        assert!(combined.starts_with("prefer recent items"));
        assert!(combined.ends_with("intent text"));
        assert_eq!(combine_instructions("", None), "");
        assert_eq!(combine_instructions(" x ", None), "x");
    }
}
