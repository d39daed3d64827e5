//! GitHub profile data and skill-inventory derivation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Framework names matched against repo topics and descriptions.
pub const FRAMEWORK_PATTERNS: &[&str] = &[
    "react", "angular", "vue", "django", "flask", "spring", "rails", "express", "fastapi",
    "nextjs", "nuxt", "svelte", "laravel", "flutter", "swiftui", "pytorch", "tensorflow", "nest",
    "gatsby", "remix",
];

/// Tool and platform names matched against repo topics and descriptions.
pub const TOOL_PATTERNS: &[&str] = &[
    "docker",
    "kubernetes",
    "terraform",
    "ansible",
    "jenkins",
    "github-actions",
    "gitlab-ci",
    "aws",
    "gcp",
    "azure",
    "nginx",
    "graphql",
    "webpack",
    "vite",
    "eslint",
    "prettier",
];

/// Database and storage names matched against repo topics and descriptions.
pub const DATABASE_PATTERNS: &[&str] = &[
    "postgresql",
    "mysql",
    "mongodb",
    "sqlite",
    "redis",
    "dynamodb",
    "firebase",
    "supabase",
    "prisma",
    "elasticsearch",
];

/// Wire shape of one entry in `/users/{u}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub html_url: String,
}

/// Wire shape of `/users/{u}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub login: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
}

/// One analyzed (non-fork) repository.
#[derive(Debug, Clone, Serialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    /// Language name to share of the repo in percent, one decimal.
    pub languages_breakdown: BTreeMap<String, f64>,
    pub stars: u64,
    pub topics: Vec<String>,
    pub url: String,
}

impl Repository {
    pub fn from_response(repo: RepoResponse, language_bytes: BTreeMap<String, u64>) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            language: repo.language,
            languages_breakdown: percentages(&language_bytes),
            stars: repo.stargazers_count,
            topics: repo.topics,
            url: repo.html_url,
        }
    }
}

/// Byte counts to rounded percentages (one decimal place).
fn percentages(language_bytes: &BTreeMap<String, u64>) -> BTreeMap<String, f64> {
    let total: u64 = language_bytes.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    language_bytes
        .iter()
        .map(|(language, bytes)| {
            let share = (*bytes as f64 / total as f64) * 100.0;
            (language.clone(), (share * 10.0).round() / 10.0)
        })
        .collect()
}

/// Technologies beyond plain languages, grouped the way they appear in the
/// gap-analysis prompt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Technologies {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub databases: Vec<String>,
}

/// Analyzed GitHub profile.
#[derive(Debug, Clone, Serialize)]
pub struct GithubProfile {
    pub username: String,
    pub profile_url: String,
    pub bio: Option<String>,
    pub public_repos_count: u64,
    pub repositories: Vec<Repository>,
    pub technologies: Technologies,
}

impl GithubProfile {
    /// All distinct languages across repositories, primary and breakdown,
    /// in display case, sorted.
    pub fn all_languages(&self) -> Vec<String> {
        let mut languages: BTreeSet<String> = BTreeSet::new();
        for repo in &self.repositories {
            if let Some(language) = &repo.language {
                languages.insert(language.clone());
            }
            languages.extend(repo.languages_breakdown.keys().cloned());
        }
        languages.into_iter().collect()
    }

    /// Lowercased set of everything the candidate demonstrably works with.
    /// Empty when no public repository carried usable signals.
    pub fn skill_inventory(&self) -> BTreeSet<String> {
        let mut inventory: BTreeSet<String> = BTreeSet::new();
        inventory.extend(self.technologies.languages.iter().map(|s| s.to_lowercase()));
        inventory.extend(
            self.technologies
                .frameworks
                .iter()
                .map(|s| s.to_lowercase()),
        );
        inventory.extend(self.technologies.tools.iter().map(|s| s.to_lowercase()));
        inventory.extend(self.technologies.databases.iter().map(|s| s.to_lowercase()));
        inventory
    }

    /// Compact JSON the gap-analysis prompt embeds: top repos by stars,
    /// languages, and the grouped technology lists.
    pub fn to_summary_json(&self) -> serde_json::Value {
        let mut top_repos: Vec<&Repository> = self.repositories.iter().collect();
        top_repos.sort_by(|a, b| b.stars.cmp(&a.stars).then_with(|| a.name.cmp(&b.name)));

        json!({
            "username": self.username,
            "bio": self.bio,
            "total_repos": self.public_repos_count,
            "languages": self.all_languages(),
            "technologies": self.technologies,
            "top_repos": top_repos
                .iter()
                .take(10)
                .map(|repo| {
                    json!({
                        "name": repo.name,
                        "description": repo.description,
                        "language": repo.language,
                        "stars": repo.stars,
                        "topics": repo.topics,
                        "languages_used": repo.languages_breakdown.keys().collect::<Vec<_>>(),
                    })
                })
                .collect::<Vec<_>>(),
        })
    }
}

/// Scans topics and descriptions for known framework, tool, and database
/// names. Substring search over a lowercased haystack, the same trade-off a
/// topic list implies (topics are already canonical slugs).
pub fn extract_technologies(repositories: &[Repository]) -> Technologies {
    let mut haystack = String::new();
    for repo in repositories {
        for topic in &repo.topics {
            haystack.push_str(&topic.to_lowercase());
            haystack.push(' ');
        }
        if let Some(description) = &repo.description {
            haystack.push_str(&description.to_lowercase());
            haystack.push(' ');
        }
    }

    let matched = |patterns: &[&str]| -> Vec<String> {
        patterns
            .iter()
            .filter(|pattern| haystack.contains(**pattern))
            .map(|pattern| pattern.to_string())
            .collect()
    };

    let mut languages: BTreeSet<String> = BTreeSet::new();
    for repo in repositories {
        if let Some(language) = &repo.language {
            languages.insert(language.clone());
        }
        languages.extend(repo.languages_breakdown.keys().cloned());
    }

    Technologies {
        languages: languages.into_iter().collect(),
        frameworks: matched(FRAMEWORK_PATTERNS),
        tools: matched(TOOL_PATTERNS),
        databases: matched(DATABASE_PATTERNS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, language: Option<&str>, topics: &[&str], description: Option<&str>) -> Repository {
        Repository {
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            language: language.map(|s| s.to_string()),
            languages_breakdown: BTreeMap::new(),
            stars: 0,
            topics: topics.iter().map(|s| s.to_string()).collect(),
            url: format!("https://github.com/octocat/{name}"),
        }
    }

    #[test]
    fn test_repo_response_deserializes_api_shape() {
        let raw = r#"{
            "name": "payments",
            "description": "Settlement engine built with FastAPI",
            "language": "Python",
            "fork": false,
            "stargazers_count": 12,
            "topics": ["fastapi", "postgresql"],
            "html_url": "https://github.com/octocat/payments",
            "watchers": 12,
            "open_issues": 3
        }"#;
        let repo: RepoResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(repo.name, "payments");
        assert_eq!(repo.stargazers_count, 12);
        assert!(!repo.fork);
        assert_eq!(repo.topics.len(), 2);
    }

    #[test]
    fn test_repo_response_tolerates_missing_optional_fields() {
        let raw = r#"{"name": "tiny", "description": null, "language": null}"#;
        let repo: RepoResponse = serde_json::from_str(raw).unwrap();
        assert!(repo.topics.is_empty());
        assert_eq!(repo.stargazers_count, 0);
    }

    #[test]
    fn test_percentages_round_to_one_decimal() {
        let mut bytes = BTreeMap::new();
        bytes.insert("Rust".to_string(), 900u64);
        bytes.insert("TOML".to_string(), 100u64);
        let shares = percentages(&bytes);
        assert_eq!(shares["Rust"], 90.0);
        assert_eq!(shares["TOML"], 10.0);
    }

    #[test]
    fn test_percentages_empty_input_is_empty() {
        assert!(percentages(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_all_languages_dedups_primary_and_breakdown() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert("Rust".to_string(), 95.0);
        breakdown.insert("Shell".to_string(), 5.0);

        let mut first = repo("a", Some("Rust"), &[], None);
        first.languages_breakdown = breakdown;
        let second = repo("b", Some("Python"), &[], None);

        let profile = GithubProfile {
            username: "octocat".to_string(),
            profile_url: "https://github.com/octocat".to_string(),
            bio: None,
            public_repos_count: 2,
            repositories: vec![first, second],
            technologies: Technologies::default(),
        };

        assert_eq!(profile.all_languages(), vec!["Python", "Rust", "Shell"]);
    }

    #[test]
    fn test_extract_technologies_matches_topics_and_descriptions() {
        let repos = vec![
            repo("web", Some("TypeScript"), &["react", "docker"], None),
            repo("api", Some("Python"), &[], Some("Django service on PostgreSQL")),
        ];
        let technologies = extract_technologies(&repos);
        assert!(technologies.frameworks.contains(&"react".to_string()));
        assert!(technologies.frameworks.contains(&"django".to_string()));
        assert!(technologies.tools.contains(&"docker".to_string()));
        assert!(technologies.databases.contains(&"postgresql".to_string()));
        assert_eq!(technologies.languages, vec!["Python", "TypeScript"]);
    }

    #[test]
    fn test_skill_inventory_is_lowercased_union() {
        let profile = GithubProfile {
            username: "octocat".to_string(),
            profile_url: "https://github.com/octocat".to_string(),
            bio: None,
            public_repos_count: 1,
            repositories: vec![],
            technologies: Technologies {
                languages: vec!["Rust".to_string(), "Python".to_string()],
                frameworks: vec!["fastapi".to_string()],
                tools: vec!["docker".to_string()],
                databases: vec!["postgresql".to_string()],
            },
        };
        let inventory = profile.skill_inventory();
        assert!(inventory.contains("rust"));
        assert!(inventory.contains("python"));
        assert!(inventory.contains("fastapi"));
        assert!(inventory.contains("docker"));
        assert!(inventory.contains("postgresql"));
    }

    #[test]
    fn test_summary_json_ranks_repos_by_stars() {
        let mut popular = repo("popular", Some("Rust"), &[], None);
        popular.stars = 40;
        let quiet = repo("quiet", Some("Rust"), &[], None);

        let profile = GithubProfile {
            username: "octocat".to_string(),
            profile_url: "https://github.com/octocat".to_string(),
            bio: Some("systems tinkerer".to_string()),
            public_repos_count: 2,
            repositories: vec![quiet, popular],
            technologies: Technologies::default(),
        };

        let summary = profile.to_summary_json();
        let top = summary["top_repos"].as_array().unwrap();
        assert_eq!(top[0]["name"], "popular");
        assert_eq!(summary["total_repos"], 2);
    }
}
