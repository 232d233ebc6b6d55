//! Content chunking
//!
//! Long documents are split into overlapping word windows so each chunk
//! embeds well; at read time the highest-scoring chunk represents its parent.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use searchlight_core::{Candidate, ChunkInfo, Document};

/// Maximum excerpt length for generated chunk excerpts (characters)
const CHUNK_EXCERPT_MAX_LEN: usize = 200;

/// Splits long documents into overlapping word-window chunks
#[derive(Debug, Clone)]
pub struct ContentChunker {
    /// Target chunk size in words
    chunk_size: usize,
    /// Words shared between consecutive chunks, for context
    overlap: usize,
}

impl ContentChunker {
    /// `chunk_size` must be greater than `overlap`; both must be nonzero.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        debug_assert!(chunk_size > overlap && overlap > 0);
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split a document into chunks. Documents at or under the window size
    /// come back unchanged as a single-element list.
    pub fn chunk_document(&self, doc: &Document) -> Vec<Document> {
        let words: Vec<&str> = doc.content.split_whitespace().collect();
        if words.len() <= self.chunk_size {
            return vec![doc.clone()];
        }

        tracing::info!(
            title = %doc.title,
            words = words.len(),
            "chunking document"
        );

        let stride = self.chunk_size - self.overlap;
        let total_chunks = words.len().div_ceil(stride);
        let mut chunks = Vec::new();
        let mut chunk_index = 0;
        let mut position = 0;

        while position < words.len() {
            let chunk_end = (position + self.chunk_size).min(words.len());
            let chunk_words = &words[position..chunk_end];
            let chunk_text = chunk_words.join(" ");

            let mut chunk = doc.clone();
            chunk.id = format!("{}_chunk_{}", doc.id, chunk_index);
            chunk.excerpt = chunk_excerpt(&chunk_text, CHUNK_EXCERPT_MAX_LEN);
            chunk.content = chunk_text;
            chunk.word_count = chunk_words.len();
            chunk.is_chunk = true;
            chunk.parent_id = Some(doc.id.clone());
            chunk.chunk_index = Some(chunk_index);
            chunk.total_chunks = Some(total_chunks);
            chunk.chunk_start = Some(position);
            chunk.chunk_end = Some(chunk_end);
            chunk.embedding = None;
            chunk.sparse_vector = None;

            chunks.push(chunk);

            position += stride;
            chunk_index += 1;
        }

        tracing::info!(title = %doc.title, chunks = chunks.len(), "created chunks");
        chunks
    }

    /// Chunk a batch of documents
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Document> {
        let mut chunked = Vec::new();
        for doc in documents {
            chunked.extend(self.chunk_document(doc));
        }
        tracing::info!(
            documents = documents.len(),
            total = chunked.len(),
            "chunked document batch"
        );
        chunked
    }
}

/// Longest prefix of complete sentences that fits in `max_len` characters,
/// falling back to plain truncation.
fn chunk_excerpt(text: &str, max_len: usize) -> String {
    let mut excerpt = String::new();

    for sentence in text.split_inclusive(['.', '!', '?']) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        if excerpt.len() + sentence.len() < max_len {
            excerpt.push_str(sentence);
            excerpt.push(' ');
        } else {
            break;
        }
    }

    if excerpt.is_empty() {
        // No complete sentence fits; truncate on a grapheme boundary
        excerpt = text.graphemes(true).take(max_len).collect();
    }

    excerpt.trim().to_string()
}

/// Merge chunk results back to their parents: group by `parent_id`, keep the
/// single highest-scored chunk annotated with `chunk_info`, pass non-chunk
/// results through verbatim, and re-sort the merged list by score.
pub fn merge_chunk_results(results: Vec<Candidate>) -> Vec<Candidate> {
    let mut by_parent: HashMap<String, Vec<Candidate>> = HashMap::new();
    let mut merged: Vec<Candidate> = Vec::new();

    for result in results {
        if result.document.is_chunk {
            let parent_id = result
                .document
                .parent_id
                .clone()
                .unwrap_or_else(|| result.document.id.clone());
            by_parent.entry(parent_id).or_default().push(result);
        } else {
            merged.push(result);
        }
    }

    for (_, mut chunks) in by_parent {
        chunks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let all_chunks: Vec<String> = chunks.iter().map(|c| c.document.id.clone()).collect();
        let mut best = chunks.swap_remove(0);
        best.chunk_info = Some(ChunkInfo {
            total_chunks: all_chunks.len(),
            chunk_index: best.document.chunk_index.unwrap_or(0),
            all_chunks,
        });
        merged.push(best);
    }

    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchlight_core::CandidateSource;

    fn doc_with_words(id: &str, count: usize) -> Document {
        let mut doc = Document::new(id, "Long Document");
        doc.content = (0..count).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        doc.word_count = count;
        doc
    }

    #[test]
    fn test_short_document_unchunked() {
        let chunker = ContentChunker::new(100, 20);
        let doc = doc_with_words("d1", 50);
        let chunks = chunker.chunk_document(&doc);
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].is_chunk);
        assert_eq!(chunks[0].id, "d1");
    }

    #[test]
    fn test_chunk_ids_and_metadata() {
        let chunker = ContentChunker::new(100, 20);
        let doc = doc_with_words("d1", 250);
        let chunks = chunker.chunk_document(&doc);

        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].id, "d1_chunk_0");
        assert_eq!(chunks[1].id, "d1_chunk_1");
        for chunk in &chunks {
            assert!(chunk.is_chunk);
            assert_eq!(chunk.parent_id.as_deref(), Some("d1"));
            assert!(chunk.word_count <= 100);
        }
        // Consecutive chunks overlap by `overlap` words
        assert_eq!(chunks[0].chunk_end, Some(100));
        assert_eq!(chunks[1].chunk_start, Some(80));
    }

    #[test]
    fn test_chunk_excerpt_sentence_prefix() {
        let text = "First sentence here. Second sentence follows. ".repeat(10);
        let excerpt = chunk_excerpt(&text, 200);
        assert!(excerpt.len() < 200);
        assert!(excerpt.starts_with("First sentence here."));
    }

    #[test]
    fn test_chunk_excerpt_truncation_fallback() {
        let text = "a".repeat(500);
        let excerpt = chunk_excerpt(&text, 200);
        assert_eq!(excerpt.len(), 200);
    }

    #[test]
    fn test_merge_single_document_roundtrip() {
        let chunker = ContentChunker::new(100, 20);
        let doc = doc_with_words("d1", 250);
        let results: Vec<Candidate> = chunker
            .chunk_document(&doc)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                Candidate::new(chunk, 1.0 - i as f32 * 0.1, CandidateSource::Lexical)
            })
            .collect();

        let merged = merge_chunk_results(results);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].document.parent_id.as_deref(), Some("d1"));
        let info = merged[0].chunk_info.as_ref().unwrap();
        assert_eq!(info.total_chunks, 4);
        assert_eq!(info.chunk_index, 0);
    }

    #[test]
    fn test_merge_preserves_non_chunks_and_sorts() {
        let standalone = Candidate::new(Document::new("s1", "Standalone"), 0.4, CandidateSource::Lexical);
        let mut chunk_doc = Document::new("d1_chunk_1", "Long");
        chunk_doc.is_chunk = true;
        chunk_doc.parent_id = Some("d1".to_string());
        chunk_doc.chunk_index = Some(1);
        let chunk = Candidate::new(chunk_doc, 0.9, CandidateSource::Lexical);

        let merged = merge_chunk_results(vec![standalone, chunk]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].document.id, "d1_chunk_1");
        assert_eq!(merged[1].document.id, "s1");
    }
}
