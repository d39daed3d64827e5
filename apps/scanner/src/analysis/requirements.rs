//! Structured requirement extraction from the posting summary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::prompts::REQUIREMENTS_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::{slice_json_object, strip_json_fences, OllamaClient, TEMP_EXTRACT};

/// Position title used when the model could not name one.
pub const DEFAULT_JOB_TITLE: &str = "Software Developer";

/// Technology requirements the model reads out of the summary. Every field
/// defaults so a partial reply still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub required_languages: Vec<String>,
    #[serde(default)]
    pub required_frameworks: Vec<String>,
    #[serde(default)]
    pub required_tools: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub experience_level: String,
    #[serde(default)]
    pub key_responsibilities: Vec<String>,
}

impl JobRequirements {
    /// Lowercased required technologies: languages, frameworks, tools.
    pub fn required_set(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        for list in [
            &self.required_languages,
            &self.required_frameworks,
            &self.required_tools,
        ] {
            set.extend(normalized(list));
        }
        set
    }

    /// `required_set` plus preferred skills. This is the vocabulary the gap
    /// sanitizer accepts for matched and missing claims.
    pub fn full_set(&self) -> BTreeSet<String> {
        let mut set = self.required_set();
        set.extend(normalized(&self.preferred_skills));
        set
    }

    pub fn job_title_or_default(&self) -> &str {
        let title = self.job_title.trim();
        if title.is_empty() || title.eq_ignore_ascii_case("unknown") {
            DEFAULT_JOB_TITLE
        } else {
            title
        }
    }

    pub fn is_empty(&self) -> bool {
        self.required_languages.is_empty()
            && self.required_frameworks.is_empty()
            && self.required_tools.is_empty()
            && self.preferred_skills.is_empty()
    }
}

fn normalized(items: &[String]) -> impl Iterator<Item = String> + '_ {
    items
        .iter()
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
}

/// Runs the extraction call. A model failure aborts (the gap stage depends
/// on this reply); a malformed reply degrades to empty requirements.
pub async fn extract_requirements(
    llm: &OllamaClient,
    summary_markdown: &str,
) -> Result<JobRequirements, AppError> {
    let prompt = REQUIREMENTS_TEMPLATE.replace("{job_summary}", summary_markdown);
    let reply = llm
        .generate(&prompt, TEMP_EXTRACT)
        .await
        .map_err(|e| AppError::Model(format!("requirement extraction failed: {e}")))?;

    Ok(parse_requirements(&reply))
}

/// Fence- and prose-tolerant parse of the extraction reply.
pub fn parse_requirements(reply: &str) -> JobRequirements {
    let candidate = slice_json_object(strip_json_fences(reply));
    match serde_json::from_str::<JobRequirements>(candidate) {
        Ok(requirements) => requirements,
        Err(e) => {
            warn!("Requirement reply did not parse ({e}); continuing with empty requirements");
            JobRequirements::default()
        }
    }
}
