//! Interview question generation.
//!
//! Questions come back as markdown with five lettered sections (A-E). The
//! parser keys on the `### A.`..`### E.` prefixes only, so reworded headings
//! still land in the right category. A section the model skipped stays in
//! the set with an empty body; the rendered report always shows all five.

use crate::analysis::prompts::{QUESTIONS_TEMPLATE_EN, QUESTIONS_TEMPLATE_KO};
use crate::errors::AppError;
use crate::llm_client::{OllamaClient, TEMP_GENERATE};

const MARKERS: [&str; 5] = ["### A.", "### B.", "### C.", "### D.", "### E."];
const LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

const LABELS_KO: [&str; 5] = [
    "부족한 기술에 대한 질문",
    "대안 기술 선택에 대한 질문",
    "기술 갭 극복 계획 질문",
    "프로젝트 심화 질문",
    "실제 업무 시나리오 질문",
];

const LABELS_EN: [&str; 5] = [
    "Questions About Missing Skills",
    "Alternative Technology Choices",
    "Skill Gap Mitigation Plans",
    "Project Deep-Dive Questions",
    "Real-World Scenario Questions",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Korean,
    English,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Korean => "한국어",
            Language::English => "English",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Language::Korean => QUESTIONS_TEMPLATE_KO,
            Language::English => QUESTIONS_TEMPLATE_EN,
        }
    }

    fn labels(&self) -> [&'static str; 5] {
        match self {
            Language::Korean => LABELS_KO,
            Language::English => LABELS_EN,
        }
    }

    fn empty_note(&self) -> &'static str {
        match self {
            Language::Korean => "(질문이 생성되지 않았습니다)",
            Language::English => "(no questions were generated)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategorySection {
    /// Canonical heading, independent of how the model phrased it.
    pub label: &'static str,
    /// Question lines as the model wrote them, trimmed. May be empty.
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct QuestionSet {
    pub language: Language,
    /// Always five entries, A through E in order.
    pub categories: Vec<CategorySection>,
}

impl QuestionSet {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for (index, section) in self.categories.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&format!("### {}. {}\n\n", LETTERS[index], section.label));
            if section.body.is_empty() {
                out.push_str(self.language.empty_note());
            } else {
                out.push_str(&section.body);
            }
            out.push('\n');
        }
        out
    }
}

/// Generates the five-category question set for one language.
pub async fn generate_questions(
    llm: &OllamaClient,
    language: Language,
    gap_markdown: &str,
    job_title: &str,
    candidate_technologies: &[String],
) -> Result<QuestionSet, AppError> {
    let prompt = language
        .template()
        .replace("{skill_gap_analysis}", gap_markdown)
        .replace("{job_title}", job_title)
        .replace("{candidate_technologies}", &candidate_technologies.join(", "));

    let reply = llm.generate(&prompt, TEMP_GENERATE).await.map_err(|e| {
        AppError::Model(format!(
            "question generation ({}) failed: {e}",
            language.display_name()
        ))
    })?;

    Ok(parse_question_reply(language, &reply))
}

/// Splits one reply into the five fixed categories.
pub fn parse_question_reply(language: Language, reply: &str) -> QuestionSet {
    let categories = MARKERS
        .into_iter()
        .zip(language.labels())
        .map(|(marker, label)| CategorySection {
            label,
            body: section_body(reply, marker),
        })
        .collect();

    QuestionSet {
        language,
        categories,
    }
}

/// Text between a category heading and the next lettered heading.
fn section_body(reply: &str, marker: &str) -> String {
    let Some(start) = reply.find(marker) else {
        return String::new();
    };
    let after_heading = match reply[start..].find('\n') {
        Some(newline) => &reply[start + newline + 1..],
        None => "",
    };
    let end = MARKERS
        .iter()
        .filter_map(|m| after_heading.find(m))
        .min()
        .unwrap_or(after_heading.len());
    after_heading[..end].trim().to_string()
}
