//! Model client, the single point of entry for all Ollama calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the model runtime
//! directly. Every prompt goes through `OllamaClient` so error mapping and
//! reply cleanup stay in one place.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Temperature for structure-following calls (summary, requirement extraction).
pub const TEMP_EXTRACT: f32 = 0.1;
/// Temperature for generative calls (gap narrative, interview questions).
pub const TEMP_GENERATE: f32 = 0.3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ollama error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned empty output")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    eval_count: Option<u64>,
    #[serde(default)]
    total_duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

/// Client for a local Ollama runtime (`POST {base}/api/generate`).
///
/// There is deliberately no retry logic here. A run either talks to a
/// healthy local runtime or aborts with guidance; backoff loops only hide
/// a stopped daemon.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Sends one prompt and returns the model's full (non-streamed) reply.
    pub async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Ollama wraps failures as {"error": "..."}
            let message = serde_json::from_str::<OllamaErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateResponse = response.json().await?;

        debug!(
            "Ollama call finished: done={}, eval_count={:?}, total_duration={:?}ns",
            reply.done, reply.eval_count, reply.total_duration
        );

        if reply.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }

        Ok(reply.response)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Narrows a reply to its outermost `{...}` so leading or trailing prose
/// ("Here is the JSON you asked for:") does not break deserialization.
pub fn slice_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
