//! Document and chunk records
//!
//! Documents are immutable once indexed: created on index, replaced on
//! re-index, deleted individually on upstream deletion. Chunks are derived
//! documents that inherit parent fields and carry their own vectors.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Sparse lexical vector: term index -> TF-IDF weight, zero elsewhere.
///
/// Dimensionality is fixed by the fitted vocabulary; re-fitting invalidates
/// every previously stored sparse vector.
pub type SparseVector = BTreeMap<u32, f32>;

/// A taxonomy term (category or tag)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyTerm {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub slug: String,
    /// Parent term id; present for nested taxonomies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
}

impl TaxonomyTerm {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            slug: slug.into(),
            parent: None,
        }
    }
}

/// Free-form document metadata extracted upstream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// H1-H3 heading texts, when the extractor provides them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    /// Anything else the CMS attaches
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DocumentMeta {
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
            && self.focus_keywords.is_empty()
            && self.keywords.is_empty()
            && self.topics.is_empty()
            && self.extra.is_empty()
    }

    /// All meta text fields joined and lowercased, for keyword matching
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(self.focus_keywords.iter().map(|s| s.to_lowercase()));
        parts.extend(self.keywords.iter().map(|s| s.to_lowercase()));
        parts.extend(self.topics.iter().map(|s| s.to_lowercase()));
        for value in self.extra.values() {
            match value {
                serde_json::Value::String(s) => parts.push(s.to_lowercase()),
                serde_json::Value::Array(items) => parts.extend(
                    items
                        .iter()
                        .filter_map(|v| v.as_str())
                        .map(|s| s.to_lowercase()),
                ),
                _ => {}
            }
        }
        parts.join(" ")
    }
}

/// A document sourced from the content-management system.
///
/// Chunk fields are populated only when `is_chunk` is true; chunks share the
/// parent's taxonomy but not its `word_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque, globally unique id (chunks: `{parent_id}_chunk_{n}`)
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub url: String,
    /// Post type tag (profile, service, page, post, attachment, ...)
    #[serde(rename = "type", default)]
    pub post_type: String,
    #[serde(default)]
    pub author: String,
    /// Publish timestamp as delivered by the CMS (ISO 8601 or `YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    /// Last-modified timestamp, same formats as `date`
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub categories: Vec<TaxonomyTerm>,
    #[serde(default)]
    pub tags: Vec<TaxonomyTerm>,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub featured_image: String,
    #[serde(default)]
    pub featured_media_id: u64,
    #[serde(default)]
    pub meta: DocumentMeta,

    // Chunk metadata
    #[serde(default)]
    pub is_chunk: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_end: Option<usize>,

    // Vectors, attached during indexing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_vector: Option<SparseVector>,
}

impl Document {
    /// Minimal document for tests and single-document upserts
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: String::new(),
            url: String::new(),
            post_type: "post".to_string(),
            author: String::new(),
            date: String::new(),
            modified: String::new(),
            excerpt: String::new(),
            content: String::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            word_count: 0,
            featured_image: String::new(),
            featured_media_id: 0,
            meta: DocumentMeta::default(),
            is_chunk: false,
            parent_id: None,
            chunk_index: None,
            total_chunks: None,
            chunk_start: None,
            chunk_end: None,
            embedding: None,
            sparse_vector: None,
        }
    }

    /// Title and content combined, the text that gets embedded and fitted
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Parsed `modified` timestamp, falling back to `date`.
    ///
    /// Accepts RFC 3339 / ISO 8601 (with or without offset) and bare
    /// `YYYY-MM-DD` / `YYYY-MM-DD HH:MM:SS`; anything else yields None.
    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.modified).or_else(|| parse_timestamp(&self.date))
    }
}

/// Parse a CMS timestamp in the formats the upstream actually emits.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive).fixed_offset());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive).fixed_offset());
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = day.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&naive).fixed_offset());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-01").is_some());
        assert!(parse_timestamp("2024-01-01T12:30:00").is_some());
        assert!(parse_timestamp("2024-01-01T12:30:00Z").is_some());
        assert!(parse_timestamp("2024-01-01 12:30:00").is_some());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_modified_falls_back_to_date() {
        let mut doc = Document::new("1", "Title");
        doc.date = "2024-06-01".to_string();
        assert!(doc.modified_at().is_some());
        doc.modified = "2024-07-01T00:00:00Z".to_string();
        let parsed = doc.modified_at().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-07-01T00:00:00+00:00");
    }

    #[test]
    fn test_meta_searchable_text() {
        let mut meta = DocumentMeta::default();
        meta.focus_keywords.push("Hazardous Waste".to_string());
        meta.extra.insert(
            "summary".to_string(),
            serde_json::Value::String("Site Remediation".to_string()),
        );
        let text = meta.searchable_text();
        assert!(text.contains("hazardous waste"));
        assert!(text.contains("site remediation"));
    }

    #[test]
    fn test_document_roundtrip() {
        let mut doc = Document::new("42", "Energy Audit Services");
        doc.post_type = "service".to_string();
        doc.categories.push(TaxonomyTerm::new("Services", "services"));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"type\":\"service\""));
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "42");
        assert_eq!(back.post_type, "service");
        assert!(!back.is_chunk);
    }
}
