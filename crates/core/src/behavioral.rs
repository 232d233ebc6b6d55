//! Behavioral (CTR) signals and URL normalization
//!
//! Click-through weights arrive with the search request; results whose
//! normalized URL matches an entry get a capped multiplicative boost.

use serde::{Deserialize, Serialize};

/// Behavioral signals supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehavioralSignals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctr: Option<CtrSignals>,
}

/// Click-through-rate input over a time window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CtrSignals {
    #[serde(default)]
    pub time_window_days: u32,
    #[serde(default)]
    pub items: Vec<CtrItem>,
}

/// One URL's click affinity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtrItem {
    pub url: String,
    /// Normalized click-through affinity in [0,1]
    pub weight: f32,
    #[serde(default)]
    pub clicks: u64,
}

/// Normalize a URL for CTR lookup: lowercase scheme and host, strip the
/// trailing slash, drop query string and fragment.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    let without_fragment = url.split('#').next().unwrap_or("");
    let without_query = without_fragment.split('?').next().unwrap_or("");
    match without_query.find("://") {
        Some(idx) => {
            let scheme = without_query[..idx].to_lowercase();
            let rest = &without_query[idx + 3..];
            let (host, path) = match rest.find('/') {
                Some(slash) => (&rest[..slash], &rest[slash..]),
                None => (rest, ""),
            };
            format!(
                "{}://{}{}",
                scheme,
                host.to_lowercase(),
                path.trim_end_matches('/')
            )
        }
        None => without_query.trim_end_matches('/').to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_strips_query_and_fragment() {
        assert_eq!(
            normalize_url("HTTPS://Example.com/a/?x=1#y"),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_normalize_url_case_and_slash() {
        assert_eq!(
            normalize_url("http://WWW.Site.ORG/Path/To/Page/"),
            "http://www.site.org/Path/To/Page"
        );
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_normalize_url_schemeless() {
        assert_eq!(normalize_url("Example.com/About/"), "example.com/about");
        assert_eq!(normalize_url(""), "");
    }
}
