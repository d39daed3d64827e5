//! Summary parser: turns the model's Korean summary markdown into a
//! `PostingSummary` with a fixed section layout.
//!
//! The model is prompted with an exact heading structure (see `prompts`),
//! but replies drift: headings get reworded suffixes, sections go missing.
//! Parsing matches on stable heading prefixes and always produces the three
//! sections in order, empty when absent, so rendering stays deterministic.

use serde::Serialize;

/// Shown in place of a title or company the model could not find.
pub const UNKNOWN_FIELD: &str = "(미상)";

/// The three fixed summary sections, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    CompanyAndRole,
    Qualifications,
    Benefits,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        SectionKind::CompanyAndRole,
        SectionKind::Qualifications,
        SectionKind::Benefits,
    ];

    /// Canonical heading used when re-rendering the summary.
    pub fn heading(self) -> &'static str {
        match self {
            SectionKind::CompanyAndRole => "### A. 회사소개 (비전, 연혁) & 직무 소개 (주요 업무):",
            SectionKind::Qualifications => "### B. 자격요건 (필수조건) & 우대사항 (선택 요건):",
            SectionKind::Benefits => "### C. 혜택 및 복지 & 기타사항:",
        }
    }

    /// Stable prefix the parser matches against model replies.
    fn marker(self) -> &'static str {
        match self {
            SectionKind::CompanyAndRole => "### A",
            SectionKind::Qualifications => "### B",
            SectionKind::Benefits => "### C",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarySection {
    pub kind: SectionKind,
    pub body: String,
}

/// Structured posting summary. `sections` always holds the three kinds of
/// `SectionKind::ALL` in that order.
#[derive(Debug, Clone, Serialize)]
pub struct PostingSummary {
    pub title: String,
    pub company: String,
    pub deadline: String,
    pub sections: Vec<SummarySection>,
    pub source_url: String,
}

impl PostingSummary {
    /// Summary markdown without the source link, used as model input for
    /// requirement extraction.
    pub fn body_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("## 공고명: {}\n", self.title));
        out.push_str(&format!("### 회사명: {}\n\n", self.company));
        out.push_str(&format!("**마감기한**\n- {}\n", self.deadline));
        for section in &self.sections {
            out.push('\n');
            out.push_str(section.kind.heading());
            out.push('\n');
            if section.body.is_empty() {
                out.push_str("- (정보 없음)\n");
            } else {
                out.push_str(&section.body);
                out.push('\n');
            }
        }
        out
    }

    /// Full summary markdown with the source link appended, as it appears in
    /// the report and in Discord messages.
    pub fn to_markdown(&self) -> String {
        format!(
            "{}\n[원본 채용공고]({})",
            self.body_markdown(),
            self.source_url
        )
    }
}

/// Parses a summary reply. Never fails: unrecognized replies degrade to
/// `(미상)` fields and empty sections rather than aborting the run.
pub fn parse_summary(reply: &str, source_url: &str) -> PostingSummary {
    let lines: Vec<&str> = reply.lines().collect();

    let title = field_after_marker(&lines, "## 공고명");
    let company = field_after_marker(&lines, "### 회사명");
    let deadline = deadline_after_marker(&lines);

    let sections = SectionKind::ALL
        .iter()
        .map(|&kind| SummarySection {
            kind,
            body: section_body(&lines, kind),
        })
        .collect();

    PostingSummary {
        title,
        company,
        deadline,
        sections,
        source_url: source_url.to_string(),
    }
}

/// Value after the first `marker...:` line, `(미상)` when missing or blank.
fn field_after_marker(lines: &[&str], marker: &str) -> String {
    for line in lines {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(marker) {
            let value = rest.trim_start_matches(':').trim();
            let value = value.trim_matches(|c| c == '[' || c == ']').trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    UNKNOWN_FIELD.to_string()
}

/// First non-empty line after `**마감기한**`, stripped of its bullet.
fn deadline_after_marker(lines: &[&str]) -> String {
    let mut seen_marker = false;
    for line in lines {
        let trimmed = line.trim();
        if !seen_marker {
            if trimmed.starts_with("**마감기한**") {
                seen_marker = true;
            }
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("###") || trimmed.starts_with("## ") {
            break; // next heading, no deadline given
        }
        let value = trimmed
            .trim_start_matches('-')
            .trim()
            .trim_matches(|c| c == '[' || c == ']')
            .trim();
        if value.is_empty() {
            break;
        }
        return value.to_string();
    }
    UNKNOWN_FIELD.to_string()
}

/// Lines between this section's heading and the next `###`/`##` heading.
fn section_body(lines: &[&str], kind: SectionKind) -> String {
    let start = lines
        .iter()
        .position(|line| line.trim().starts_with(kind.marker()));
    let Some(start) = start else {
        return String::new();
    };

    let mut body_lines = Vec::new();
    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        if trimmed.starts_with("###") || trimmed.starts_with("## ") {
            break;
        }
        body_lines.push(line.trim_end());
    }

    // Trim leading and trailing blank lines, keep interior structure.
    while body_lines.first().is_some_and(|l| l.trim().is_empty()) {
        body_lines.remove(0);
    }
    while body_lines.last().is_some_and(|l| l.trim().is_empty()) {
        body_lines.pop();
    }

    body_lines.join("\n")
}
