//! Posting retrieval and visible-text extraction.

use reqwest::Client;
use scraper::{ElementRef, Html, Node};
use tracing::debug;

use crate::errors::AppError;

/// Job boards often reject default library user agents.
const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Subtrees that never contain posting text.
const IGNORED_ELEMENTS: [&str; 5] = ["head", "script", "style", "noscript", "svg"];

/// Elements that end a visual line; a newline is inserted after their
/// content so list items and paragraphs stay separated.
const BLOCK_ELEMENTS: [&str; 18] = [
    "p", "br", "div", "li", "ul", "ol", "tr", "table", "section", "article", "header", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6",
];

pub struct PostingFetcher {
    client: Client,
}

impl PostingFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Downloads the posting page and returns its visible text.
    pub async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT_VALUE)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("request to '{url}' failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!(
                "'{url}' answered with status {status}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("could not read body of '{url}': {e}")))?;

        debug!("Fetched {} bytes of HTML from '{url}'", html.len());

        let content = extract_visible_text(&html);
        if content.is_empty() {
            return Err(AppError::Fetch(format!(
                "'{url}' contains no visible text (script-rendered page?)"
            )));
        }

        Ok(content)
    }
}

impl Default for PostingFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the human-visible text of an HTML document: skips non-content
/// subtrees, keeps line structure at block elements, and collapses runs of
/// whitespace.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    normalize_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Element(el) => {
                let name = el.name();
                if IGNORED_ELEMENTS.contains(&name) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if BLOCK_ELEMENTS.contains(&name) {
                    out.push('\n');
                }
            }
            Node::Text(text) => {
                if !text.text.trim().is_empty() {
                    out.push_str(&text.text);
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn normalize_whitespace(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<html>
<head><title>페이지 제목</title><script>var tracker = 1;</script></head>
<body>
  <h1>백엔드 엔지니어 채용</h1>
  <style>.hidden { display: none; }</style>
  <div>회사:    토스</div>
  <ul><li>필수: Rust</li><li>우대:  Kubernetes</li></ul>
  <noscript>자바스크립트를 켜주세요</noscript>
  <svg><text>chart label</text></svg>
  <p>지원 마감: <strong>2025-09-30</strong></p>
</body>
</html>"#;

    #[test]
    fn test_extract_skips_non_content_elements() {
        let text = extract_visible_text(FIXTURE);
        assert!(!text.contains("페이지 제목"), "head content must be dropped");
        assert!(!text.contains("tracker"), "script content must be dropped");
        assert!(!text.contains("display: none"), "style content must be dropped");
        assert!(!text.contains("자바스크립트"), "noscript content must be dropped");
        assert!(!text.contains("chart label"), "svg content must be dropped");
    }

    #[test]
    fn test_extract_keeps_posting_text_with_line_structure() {
        let text = extract_visible_text(FIXTURE);
        assert!(text.contains("백엔드 엔지니어 채용"));
        assert!(text.contains("회사: 토스"), "runs of spaces collapse to one");
        assert!(text.contains("2025-09-30"));

        let lines: Vec<&str> = text.lines().collect();
        assert!(
            lines.iter().any(|l| l.contains("필수: Rust")),
            "list items should land on their own lines, got: {lines:?}"
        );
    }

    #[test]
    fn test_extract_empty_page_yields_empty_string() {
        let html = "<html><head><script>only code</script></head><body></body></html>";
        assert_eq!(extract_visible_text(html), "");
    }

    #[test]
    fn test_normalize_whitespace_drops_blank_lines() {
        assert_eq!(normalize_whitespace("  a   b  \n\n\n c \n"), "a b\nc");
    }
}
