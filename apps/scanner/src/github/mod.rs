//! GitHub REST client and profile analysis.
//!
//! Only public data is read. Requests work unauthenticated; GITHUB_TOKEN
//! raises the rate limit when present. A 403 anywhere surfaces as
//! `RateLimited` so the pipeline can abort with guidance instead of
//! producing a half-empty inventory.

pub mod models;

use std::collections::BTreeMap;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, info};

use models::{extract_technologies, GithubProfile, RepoResponse, Repository, UserResponse};

const BASE_URL: &str = "https://api.github.com";
const ACCEPT_VALUE: &str = "application/vnd.github.v3+json";
const USER_AGENT_VALUE: &str = "JD-Scanner/1.0";

/// Most recently updated repositories considered per profile.
const MAX_REPOS: usize = 30;
/// Unstarred repos past this rank skip the per-repo languages call to keep
/// the request count low on large profiles.
const DETAILED_LANGUAGE_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct GithubClient {
    client: Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            token,
        }
    }

    /// Full profile analysis: user, recent non-fork repositories, language
    /// breakdowns, and the derived technology lists.
    pub async fn analyze_profile(&self, username: &str) -> Result<GithubProfile, GithubError> {
        info!("Analyzing GitHub profile '{username}'");

        let user = self.fetch_profile(username).await?;
        let raw_repos = self.fetch_repositories(username).await?;

        let mut repositories: Vec<Repository> = Vec::new();
        for raw in raw_repos {
            // Forks say nothing about the candidate's own work.
            if raw.fork {
                continue;
            }

            let wants_languages =
                raw.stargazers_count > 0 || repositories.len() < DETAILED_LANGUAGE_LIMIT;
            let language_bytes = if wants_languages {
                self.fetch_languages(username, &raw.name).await?
            } else {
                BTreeMap::new()
            };

            debug!(
                "Repo '{}': {} languages, {} stars",
                raw.name,
                language_bytes.len(),
                raw.stargazers_count
            );
            repositories.push(Repository::from_response(raw, language_bytes));
        }

        let technologies = extract_technologies(&repositories);
        info!(
            "Profile analysis done: {} repositories, {} languages",
            repositories.len(),
            technologies.languages.len()
        );

        Ok(GithubProfile {
            profile_url: format!("https://github.com/{}", user.login),
            username: user.login,
            bio: user.bio,
            public_repos_count: user.public_repos,
            repositories,
            technologies,
        })
    }

    pub async fn fetch_profile(&self, username: &str) -> Result<UserResponse, GithubError> {
        self.get_json(&format!("/users/{username}")).await
    }

    /// Recently updated repositories, paginated, at most `MAX_REPOS` raw
    /// entries (forks included at this level; the analyzer filters them).
    pub async fn fetch_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<RepoResponse>, GithubError> {
        let per_page = MAX_REPOS.min(100);
        let mut repos: Vec<RepoResponse> = Vec::new();
        let mut page = 1usize;

        loop {
            let batch: Vec<RepoResponse> = self
                .get_json(&format!(
                    "/users/{username}/repos?sort=updated&per_page={per_page}&page={page}"
                ))
                .await?;
            let batch_len = batch.len();
            repos.extend(batch);

            if repos.len() >= MAX_REPOS || batch_len < per_page {
                break;
            }
            page += 1;
        }

        repos.truncate(MAX_REPOS);
        Ok(repos)
    }

    /// Language byte counts for one repository. A 404 here means an empty
    /// repo, not a missing profile, and maps to an empty breakdown.
    pub async fn fetch_languages(
        &self,
        username: &str,
        repo_name: &str,
    ) -> Result<BTreeMap<String, u64>, GithubError> {
        match self
            .get_json::<BTreeMap<String, u64>>(&format!("/repos/{username}/{repo_name}/languages"))
            .await
        {
            Ok(languages) => Ok(languages),
            Err(GithubError::NotFound(_)) => Ok(BTreeMap::new()),
            Err(e) => Err(e),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GithubError> {
        let mut request = self
            .client
            .get(format!("{BASE_URL}{path}"))
            .header(header::ACCEPT, ACCEPT_VALUE)
            .header(header::USER_AGENT, USER_AGENT_VALUE);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        match status.as_u16() {
            404 => Err(GithubError::NotFound(path.to_string())),
            // 403 is how api.github.com reports an exhausted quota; 429 is
            // its secondary limit.
            403 | 429 => Err(GithubError::RateLimited(api_message(response).await)),
            _ if !status.is_success() => Err(GithubError::Api {
                status: status.as_u16(),
                message: api_message(response).await,
            }),
            _ => Ok(response.json::<T>().await?),
        }
    }
}

async fn api_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}
