//! Posting summarization with automatic handling of oversized pages.
//!
//! Short postings go to the model in one call. Pages past the token budget
//! are split into overlapping chunks, each chunk is condensed (map), and the
//! partials are merged into the final structured summary (reduce). One level
//! only; a posting that still overflows after mapping is a pathological page,
//! not a longer pipeline.

use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::{OllamaClient, TEMP_EXTRACT};
use crate::posting::prompts::{MAP_TEMPLATE, REDUCE_TEMPLATE, SUMMARY_TEMPLATE};

/// Largest content (in estimated tokens) sent in a single summary call.
pub const MAX_CONTENT_TOKENS: usize = 2048;
/// Chunk size for the map stage, in characters.
const CHUNK_CHARS: usize = MAX_CONTENT_TOKENS * 4;
/// Overlap between neighboring chunks so requirements split across a
/// boundary appear in at least one chunk whole.
const CHUNK_OVERLAP_CHARS: usize = 200;

pub struct Summarizer<'a> {
    llm: &'a OllamaClient,
}

impl<'a> Summarizer<'a> {
    pub fn new(llm: &'a OllamaClient) -> Self {
        Self { llm }
    }

    /// Returns the raw Korean summary markdown for the given posting text.
    pub async fn summarize(&self, content: &str) -> Result<String, AppError> {
        let cleaned = clean_content(content);
        let tokens = estimate_tokens(&cleaned);

        if tokens <= MAX_CONTENT_TOKENS {
            debug!("Summarizing directly ({tokens} estimated tokens)");
            let prompt = SUMMARY_TEMPLATE.replace("{job_content}", &cleaned);
            return self.call(&prompt).await;
        }

        info!("Posting is large ({tokens} estimated tokens), using map-reduce summarization");
        self.summarize_map_reduce(&cleaned).await
    }

    async fn summarize_map_reduce(&self, content: &str) -> Result<String, AppError> {
        let chunks = split_into_chunks(content, CHUNK_CHARS, CHUNK_OVERLAP_CHARS);
        info!("Map stage: {} chunks", chunks.len());

        let mut partials = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            debug!("Summarizing chunk {}/{}", index + 1, chunks.len());
            let prompt = MAP_TEMPLATE.replace("{text}", chunk);
            partials.push(self.call(&prompt).await?);
        }

        let merged = partials.join("\n\n");
        let prompt = REDUCE_TEMPLATE.replace("{text}", &merged);
        self.call(&prompt).await
    }

    async fn call(&self, prompt: &str) -> Result<String, AppError> {
        self.llm
            .generate(prompt, TEMP_EXTRACT)
            .await
            .map_err(|e| AppError::Model(format!("summarization failed: {e}")))
    }
}

/// Rough token estimate: four characters per token holds well enough for
/// mixed Korean/English posting text to pick a processing strategy.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Trims lines and collapses runs of blank lines to one.
fn clean_content(content: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut last_blank = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !last_blank && !out.is_empty() {
                out.push("");
            }
            last_blank = true;
        } else {
            out.push(trimmed);
            last_blank = false;
        }
    }
    while out.last() == Some(&"") {
        out.pop();
    }
    out.join("\n")
}

/// Splits text into chunks of at most `chunk_chars` characters with
/// `overlap_chars` of shared tail, cutting only at char boundaries.
pub fn split_into_chunks(text: &str, chunk_chars: usize, overlap_chars: usize) -> Vec<String> {
    if text.is_empty() || chunk_chars == 0 {
        return Vec::new();
    }
    // Keeps the loop advancing even with a misconfigured overlap.
    let overlap = overlap_chars.min(chunk_chars - 1);

    let boundaries: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    let total_chars = boundaries.len();

    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let end = usize::min(start + chunk_chars, total_chars);
        let byte_start = boundaries[start];
        let byte_end = if end == total_chars {
            text.len()
        } else {
            boundaries[end]
        };
        chunks.push(text[byte_start..byte_end].to_string());

        if end == total_chars {
            break;
        }
        start = end - overlap;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_estimate_tokens_counts_chars_not_bytes() {
        // Four Korean syllables are twelve bytes but one estimated token
        // per four characters.
        assert_eq!(estimate_tokens("가나다라"), 1);
    }

    #[test]
    fn test_split_short_text_is_single_chunk() {
        let chunks = split_into_chunks("hello world", 100, 10);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_split_chunks_overlap_and_cover_all_text() {
        let text = "abcdefghij"; // 10 chars
        let chunks = split_into_chunks(text, 4, 1);
        assert_eq!(chunks[0], "abcd");
        assert_eq!(chunks[1], "defg", "next chunk starts one char back");
        assert!(chunks.last().unwrap().ends_with('j'), "tail must be covered");
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 4);
        }
    }

    #[test]
    fn test_split_multibyte_text_cuts_at_char_boundaries() {
        let text = "가나다라마바사아자차".repeat(3);
        let chunks = split_into_chunks(&text, 7, 2);
        let mut seen: String = String::new();
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 7);
            seen.push_str(chunk);
        }
        assert!(seen.contains("차가나"), "chunks must span the seams");
    }

    #[test]
    fn test_split_empty_text_is_empty() {
        assert!(split_into_chunks("", 10, 2).is_empty());
    }

    #[test]
    fn test_clean_content_collapses_blank_runs() {
        let cleaned = clean_content("  채용공고  \n\n\n\n필수: Rust\n\n");
        assert_eq!(cleaned, "채용공고\n\n필수: Rust");
    }
}
