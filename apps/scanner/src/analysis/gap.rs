//! Skill-gap evaluation.
//!
//! The model's reply is advisory: its matched/missing claims are sanitized
//! against the extracted requirement vocabulary before anything reaches the
//! report. CRITICAL invariants of the sanitizer:
//!   - matched and missing are subsets of the requirement vocabulary,
//!   - a skill claimed both matched and missing counts as matched,
//!   - a score outside 0..=100 becomes "not computed", never clamped.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::analysis::prompts::SKILL_GAP_TEMPLATE;
use crate::analysis::requirements::JobRequirements;
use crate::errors::AppError;
use crate::github::models::GithubProfile;
use crate::llm_client::{OllamaClient, TEMP_GENERATE};

/// Rendered in place of a numeric score when none could be trusted.
pub const SCORE_NOT_COMPUTED: &str = "산출되지 않음";

const MATCHED_MARKER: &str = "일치하는 기술";
const MISSING_MARKER: &str = "부족한 필수 기술";
const EXTRA_MARKER: &str = "지원자의 추가 기술";
const SCORE_MARKER: &str = "점수:";
const NARRATIVE_MARKER: &str = "### 2";

/// List items the model uses to say "nothing here".
const EMPTY_CLAIMS: [&str; 3] = ["없음", "none", "n/a"];

const NO_REPO_DATA_NOTE: &str = "공개 레포지토리에서 확인된 기술이 없어 모델 비교 분석을 수행하지 않았습니다.\n채용공고의 요구 기술 전체를 학습 목표로 검토하세요.";

#[derive(Debug, Clone, Serialize)]
pub struct GapReport {
    /// Required or preferred skills the candidate demonstrably has.
    pub matched: BTreeSet<String>,
    /// Required or preferred skills with no trace in the profile.
    pub missing: BTreeSet<String>,
    /// Candidate skills the posting never asked for.
    pub extra: BTreeSet<String>,
    /// Match score 0..=100; `None` when the reply carried no usable score.
    pub score: Option<u8>,
    /// The model's free-text analysis (project relevance, maturity, verdict).
    pub narrative: String,
}

impl GapReport {
    /// Deterministic markdown: matched-skill table, missing/extra lists,
    /// score line, then the narrative. Sets render in sorted order.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str("### 기술 매칭\n\n");
        if self.matched.is_empty() {
            out.push_str("일치하는 기술이 확인되지 않았습니다.\n");
        } else {
            out.push_str("| 기술 | 상태 |\n| --- | --- |\n");
            for skill in &self.matched {
                out.push_str(&format!("| {skill} | 보유 |\n"));
            }
        }

        out.push_str("\n**부족한 필수 기술**\n");
        push_list(&mut out, &self.missing);

        out.push_str("\n**지원자의 추가 기술**\n");
        push_list(&mut out, &self.extra);

        out.push('\n');
        match self.score {
            Some(score) => out.push_str(&format!("**종합 매칭 점수:** {score}/100\n")),
            None => out.push_str(&format!("**종합 매칭 점수:** {SCORE_NOT_COMPUTED}\n")),
        }

        if !self.narrative.is_empty() {
            out.push('\n');
            out.push_str(&self.narrative);
            out.push('\n');
        }

        out
    }
}

fn push_list(out: &mut String, items: &BTreeSet<String>) {
    if items.is_empty() {
        out.push_str("- 없음\n");
    } else {
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
    }
}

/// Evaluates the gap between the posting requirements and the profile.
///
/// An empty skill inventory short-circuits without a model call: everything
/// required is missing and the score is a definite 0, not a guess.
pub async fn evaluate_gap(
    llm: &OllamaClient,
    requirements: &JobRequirements,
    profile: &GithubProfile,
) -> Result<GapReport, AppError> {
    if profile.skill_inventory().is_empty() {
        info!("Skill inventory is empty, skipping the gap model call");
        return Ok(empty_inventory_report(requirements));
    }

    let requirements_json =
        serde_json::to_string_pretty(requirements).map_err(anyhow::Error::from)?;
    let profile_json =
        serde_json::to_string_pretty(&profile.to_summary_json()).map_err(anyhow::Error::from)?;

    let prompt = SKILL_GAP_TEMPLATE
        .replace("{job_requirements}", &requirements_json)
        .replace("{github_profile}", &profile_json);

    let reply = llm
        .generate(&prompt, TEMP_GENERATE)
        .await
        .map_err(|e| AppError::Model(format!("skill gap analysis failed: {e}")))?;

    Ok(parse_gap_reply(&reply, &requirements.full_set()))
}

/// Deterministic report for a profile with no usable repository data.
pub fn empty_inventory_report(requirements: &JobRequirements) -> GapReport {
    GapReport {
        matched: BTreeSet::new(),
        missing: requirements.full_set(),
        extra: BTreeSet::new(),
        score: Some(0),
        narrative: NO_REPO_DATA_NOTE.to_string(),
    }
}

/// Parses and sanitizes one gap reply against the requirement vocabulary.
pub fn parse_gap_reply(reply: &str, vocabulary: &BTreeSet<String>) -> GapReport {
    let claimed_matched = bulleted_items_after(reply, MATCHED_MARKER);
    let claimed_missing = bulleted_items_after(reply, MISSING_MARKER);
    let claimed_extra = bulleted_items_after(reply, EXTRA_MARKER);

    let matched = requirements_named(&claimed_matched, vocabulary);
    let mut missing = requirements_named(&claimed_missing, vocabulary);
    missing.retain(|skill| !matched.contains(skill));

    let extra: BTreeSet<String> = claimed_extra
        .iter()
        .map(|item| normalize_extra(item))
        .filter(|item| !item.is_empty())
        .filter(|item| {
            !vocabulary
                .iter()
                .any(|requirement| item_names_requirement(item, requirement))
        })
        .collect();

    GapReport {
        matched,
        missing,
        extra,
        score: parse_score(reply),
        narrative: narrative_of(reply),
    }
}

/// Bullet lines under the first line containing `marker`, up to the next
/// non-bullet line.
fn bulleted_items_after(reply: &str, marker: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut in_section = false;

    for line in reply.lines() {
        let trimmed = line.trim();
        if !in_section {
            if trimmed.contains(marker) {
                in_section = true;
            }
            continue;
        }
        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            items.push(item.trim().to_string());
        } else if trimmed.is_empty() {
            continue;
        } else {
            break;
        }
    }
    items
}

/// Requirements that some claim line actually names.
fn requirements_named(claims: &[String], vocabulary: &BTreeSet<String>) -> BTreeSet<String> {
    vocabulary
        .iter()
        .filter(|requirement| {
            claims
                .iter()
                .any(|claim| item_names_requirement(claim, requirement))
        })
        .cloned()
        .collect()
}

/// Whole-token match so a claim of "django" never satisfies a requirement
/// of "go". Multi-word requirements fall back to substring search.
fn item_names_requirement(item: &str, requirement: &str) -> bool {
    if requirement.contains(' ') {
        return item.to_lowercase().contains(requirement);
    }
    item_tokens(item).iter().any(|token| token == requirement)
}

fn item_tokens(item: &str) -> Vec<String> {
    item.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#' || c == '.'))
        .map(|token| token.trim_matches('.').to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Lowercases an extra-skill claim and drops annotations, template echoes,
/// and "nothing here" placeholders.
fn normalize_extra(item: &str) -> String {
    let trimmed = item.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return String::new();
    }

    let lowered = trimmed.to_lowercase();
    let base = match lowered.split_once(" (") {
        Some((head, _)) => head,
        None => lowered.as_str(),
    };
    let base = base.trim();

    if EMPTY_CLAIMS.contains(&base) {
        return String::new();
    }
    base.to_string()
}

/// First parseable score on a `점수:` line. Out-of-range values are
/// reported as `None` so a hallucinated "120/100" never reaches the report.
fn parse_score(reply: &str) -> Option<u8> {
    for line in reply.lines() {
        let Some(pos) = line.find(SCORE_MARKER) else {
            continue;
        };
        let tail = &line[pos + SCORE_MARKER.len()..];
        let digits: String = tail
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            continue;
        }
        return match digits.parse::<u32>() {
            Ok(value) if value <= 100 => Some(value as u8),
            _ => None,
        };
    }
    None
}

/// Everything from the project-experience section onward.
fn narrative_of(reply: &str) -> String {
    match reply.find(NARRATIVE_MARKER) {
        Some(pos) => reply[pos..].trim().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAP_REPLY: &str = r#"### 1. 기술 스킬 매칭 분석

**일치하는 기술:**
- Python (주력 언어로 다수 프로젝트에서 사용)
- Docker
- FastAPI

**부족한 필수 기술:**
- AWS (레포지토리에서 확인되지 않음)
- Docker

**지원자의 추가 기술:**
- Rust (시스템 프로그래밍)
- PostgreSQL
- 없음

### 2. 프로젝트 경험 분석
- 결제 관련 프로젝트 경험이 공고의 업무와 직접 관련됩니다.

### 3. 기술 성숙도 평가
- Python 사용 빈도가 높고 프로젝트 규모도 충분합니다.

### 4. 종합 매칭 점수
- **점수:** 72점
- **평가:** 전반적으로 적합한 후보입니다.
"#;

    fn vocabulary() -> BTreeSet<String> {
        ["python", "fastapi", "docker", "aws", "kubernetes"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_parse_sanitizes_lists_against_vocabulary() {
        let report = parse_gap_reply(GAP_REPLY, &vocabulary());
        assert!(report.matched.contains("python"));
        assert!(report.matched.contains("docker"));
        assert!(report.matched.contains("fastapi"));
        assert!(
            !report.matched.contains("rust"),
            "claims outside the vocabulary never land in matched"
        );
    }

    #[test]
    fn test_skill_claimed_both_ways_counts_as_matched() {
        let report = parse_gap_reply(GAP_REPLY, &vocabulary());
        assert!(report.matched.contains("docker"));
        assert!(!report.missing.contains("docker"));
        assert_eq!(report.missing.iter().collect::<Vec<_>>(), vec!["aws"]);
    }

    #[test]
    fn test_extra_skills_exclude_vocabulary_and_placeholders() {
        let report = parse_gap_reply(GAP_REPLY, &vocabulary());
        assert!(report.extra.contains("rust"));
        assert!(report.extra.contains("postgresql"));
        assert!(!report.extra.contains("없음"));
    }

    #[test]
    fn test_parse_score_in_range() {
        let report = parse_gap_reply(GAP_REPLY, &vocabulary());
        assert_eq!(report.score, Some(72));
    }

    #[test]
    fn test_score_out_of_range_is_not_computed() {
        let reply = "### 4. 종합 매칭 점수\n- **점수:** 150점\n";
        assert_eq!(parse_gap_reply(reply, &vocabulary()).score, None);
    }

    #[test]
    fn test_score_missing_is_not_computed() {
        let reply = "### 1. 기술 스킬 매칭 분석\n**일치하는 기술:**\n- Python\n";
        assert_eq!(parse_gap_reply(reply, &vocabulary()).score, None);
    }

    #[test]
    fn test_score_boundaries_are_accepted() {
        assert_eq!(
            parse_gap_reply("- **점수:** 100점", &vocabulary()).score,
            Some(100)
        );
        assert_eq!(
            parse_gap_reply("- **점수:** 0점", &vocabulary()).score,
            Some(0)
        );
    }

    #[test]
    fn test_token_match_avoids_substring_false_positives() {
        let mut vocab = BTreeSet::new();
        vocab.insert("go".to_string());
        let reply = "**일치하는 기술:**\n- Django\n";
        let report = parse_gap_reply(reply, &vocab);
        assert!(
            report.matched.is_empty(),
            "'django' must not satisfy a 'go' requirement"
        );
    }

    #[test]
    fn test_narrative_starts_at_project_analysis() {
        let report = parse_gap_reply(GAP_REPLY, &vocabulary());
        assert!(report.narrative.starts_with("### 2. 프로젝트 경험 분석"));
        assert!(report.narrative.contains("### 4. 종합 매칭 점수"));
    }

    #[test]
    fn test_empty_inventory_report_is_deterministic_zero() {
        let requirements = crate::analysis::requirements::parse_requirements(
            r#"{"required_languages": ["Python"], "required_tools": ["Docker"], "preferred_skills": ["Kubernetes"]}"#,
        );
        let report = empty_inventory_report(&requirements);
        assert_eq!(report.score, Some(0));
        assert!(report.matched.is_empty());
        assert!(report.extra.is_empty());
        assert_eq!(report.missing.len(), 3, "every requirement is missing");
        assert!(report.narrative.contains("공개 레포지토리"));
    }

    #[test]
    fn test_markdown_renders_score_sentinel() {
        let report = GapReport {
            matched: BTreeSet::new(),
            missing: BTreeSet::new(),
            extra: BTreeSet::new(),
            score: None,
            narrative: String::new(),
        };
        let markdown = report.to_markdown();
        assert!(markdown.contains(SCORE_NOT_COMPUTED));
        assert!(markdown.contains("- 없음"));
    }

    #[test]
    fn test_markdown_is_deterministic_and_ordered() {
        let report = parse_gap_reply(GAP_REPLY, &vocabulary());
        let first = report.to_markdown();
        assert_eq!(first, report.to_markdown());

        let docker = first.find("| docker |").unwrap();
        let fastapi = first.find("| fastapi |").unwrap();
        let python = first.find("| python |").unwrap();
        assert!(docker < fastapi && fastapi < python, "table rows sort");
    }
}
