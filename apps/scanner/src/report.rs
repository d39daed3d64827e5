//! Combined report assembly and persistence.
//!
//! The report is one deterministic markdown document: same artifacts in,
//! same bytes out. It is written to `<output_dir>/results/` before any
//! transport runs, so a failed send never loses the analysis.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::analysis::gap::GapReport;
use crate::analysis::questions::QuestionSet;
use crate::errors::AppError;
use crate::posting::parser::PostingSummary;

const REPORT_TITLE: &str = "# 채용공고 분석 리포트";
const SUMMARY_HEADING: &str = "## 채용공고 요약";
const GAP_HEADING: &str = "## 스킬 갭 분석";
const QUESTIONS_KO_HEADING: &str = "## 면접 준비 질문 (한국어)";
const QUESTIONS_EN_HEADING: &str = "## Interview Preparation Questions (English)";

const MAX_SLUG_CHARS: usize = 40;
const FALLBACK_SLUG: &str = "posting";

/// Renders the combined report. Sections appear in a fixed order; absent
/// artifacts are skipped without leaving an empty heading behind.
pub fn render_report(
    summary: &PostingSummary,
    gap: Option<&GapReport>,
    questions_ko: Option<&QuestionSet>,
    questions_en: Option<&QuestionSet>,
) -> String {
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");
    out.push_str(SUMMARY_HEADING);
    out.push_str("\n\n");
    out.push_str(summary.to_markdown().trim_end());
    out.push('\n');

    if let Some(gap) = gap {
        push_section(&mut out, GAP_HEADING, &gap.to_markdown());
    }
    if let Some(set) = questions_ko {
        push_section(&mut out, QUESTIONS_KO_HEADING, &set.to_markdown());
    }
    if let Some(set) = questions_en {
        push_section(&mut out, QUESTIONS_EN_HEADING, &set.to_markdown());
    }
    out
}

fn push_section(out: &mut String, heading: &str, body: &str) {
    out.push_str("\n---\n\n");
    out.push_str(heading);
    out.push_str("\n\n");
    out.push_str(body.trim_end());
    out.push('\n');
}

/// `{company}_{title}_{YYYYMMDD_HHMMSS}.md`, both parts slugified.
pub fn report_filename(summary: &PostingSummary, timestamp: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}.md",
        slugify(&summary.company),
        slugify(&summary.title),
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Writes the report under `<output_dir>/results/` and returns its path.
pub fn write_report(
    output_dir: &Path,
    summary: &PostingSummary,
    report: &str,
) -> Result<PathBuf, AppError> {
    let results_dir = output_dir.join("results");
    fs::create_dir_all(&results_dir)?;

    let path = results_dir.join(report_filename(summary, Local::now()));
    fs::write(&path, report)?;
    Ok(path)
}

/// Filename-safe slug. Keeps alphanumerics of any script (Korean titles
/// stay readable), joins runs of everything else with a single hyphen, and
/// caps the length so two slugs plus a timestamp stay well under filesystem
/// name limits.
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }

    let truncated: String = slug.chars().take(MAX_SLUG_CHARS).collect();
    let truncated = truncated.trim_end_matches('-');
    if truncated.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        truncated.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::questions::{parse_question_reply, Language};
    use crate::posting::parser::parse_summary;

    const SUMMARY_REPLY: &str = "## 공고명: 백엔드 개발자\n### 회사명: 네이버\n\n### A. 회사 및 직무 정보\n- 서비스 백엔드 개발\n\n### B. 지원자격 및 우대사항\n- Python 3년 이상\n\n### C. 복리후생 및 기타 정보\n- 유연근무제\n\n### 마감일: 2025-09-30";

    fn fixture_summary() -> PostingSummary {
        parse_summary(SUMMARY_REPLY, "https://jobs.example.com/123")
    }

    fn fixture_gap() -> GapReport {
        use std::collections::BTreeSet;
        GapReport {
            matched: BTreeSet::from(["python".to_string()]),
            missing: BTreeSet::from(["aws".to_string()]),
            extra: BTreeSet::new(),
            score: Some(70),
            narrative: "### 2. 프로젝트 경험 분석\n- 관련 경험 있음".to_string(),
        }
    }

    #[test]
    fn test_full_report_orders_sections() {
        let gap = fixture_gap();
        let ko = parse_question_reply(Language::Korean, "### A. 질문\n1. 하나\n");
        let en = parse_question_reply(Language::English, "### A. Q\n1. one\n");

        let report = render_report(&fixture_summary(), Some(&gap), Some(&ko), Some(&en));

        let positions: Vec<usize> = [
            REPORT_TITLE,
            SUMMARY_HEADING,
            GAP_HEADING,
            QUESTIONS_KO_HEADING,
            QUESTIONS_EN_HEADING,
        ]
        .iter()
        .map(|heading| report.find(heading).expect(heading))
        .collect();

        assert!(
            positions.windows(2).all(|pair| pair[0] < pair[1]),
            "sections must keep the fixed order"
        );
    }

    #[test]
    fn test_summary_only_report_has_no_dividers() {
        let report = render_report(&fixture_summary(), None, None, None);
        assert!(report.contains(SUMMARY_HEADING));
        assert!(!report.contains("---"));
        assert!(!report.contains(GAP_HEADING));
    }

    #[test]
    fn test_render_is_deterministic() {
        let gap = fixture_gap();
        let first = render_report(&fixture_summary(), Some(&gap), None, None);
        let second = render_report(&fixture_summary(), Some(&gap), None, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_keeps_source_link() {
        let report = render_report(&fixture_summary(), None, None, None);
        assert!(report.contains("[원본 채용공고](https://jobs.example.com/123)"));
    }

    #[test]
    fn test_slugify_keeps_korean() {
        assert_eq!(slugify("네이버 주식회사"), "네이버-주식회사");
        assert_eq!(slugify("(미상)"), "미상");
    }

    #[test]
    fn test_slugify_lowercases_and_joins() {
        assert_eq!(
            slugify("Back-End Developer (Python)"),
            "back-end-developer-python"
        );
    }

    #[test]
    fn test_slugify_falls_back_when_nothing_survives() {
        assert_eq!(slugify("!!! ???"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
    }

    #[test]
    fn test_slugify_truncates_long_titles() {
        let long = "a".repeat(120);
        assert_eq!(slugify(&long).chars().count(), MAX_SLUG_CHARS);
    }

    #[test]
    fn test_report_filename_shape() {
        use chrono::TimeZone;
        let timestamp = Local.with_ymd_and_hms(2025, 9, 1, 14, 30, 5).unwrap();
        let name = report_filename(&fixture_summary(), timestamp);
        assert_eq!(name, "네이버_백엔드-개발자_20250901_143005.md");
    }

    #[test]
    fn test_write_report_creates_results_dir() {
        let dir = tempfile::tempdir().unwrap();
        let summary = fixture_summary();
        let report = render_report(&summary, None, None, None);

        let path = write_report(dir.path(), &summary, &report).unwrap();

        assert!(path.starts_with(dir.path().join("results")));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, report);
    }
}
