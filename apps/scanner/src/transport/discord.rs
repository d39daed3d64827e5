//! Discord delivery.
//!
//! The condensed posting summary goes to every configured channel. Discord
//! caps message content at 2000 characters, so long summaries are split on
//! line boundaries first and by raw characters only when a single line
//! exceeds the limit. Failures are counted per channel, never escalated.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Discord's hard limit on message content length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub struct DiscordSender {
    client: Client,
    token: String,
    channel_ids: Vec<u64>,
}

/// Per-channel delivery tally for one broadcast.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub delivered: usize,
    pub failed: usize,
}

impl DiscordSender {
    /// Returns `None` unless a bot token and at least one channel are set.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.discord_enabled() {
            return None;
        }
        Some(Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            token: config.discord_bot_token.clone()?,
            channel_ids: config.discord_channel_ids.clone(),
        })
    }

    /// Sends `content` to every configured channel, chunked to the message
    /// limit. Chunks go out in order; the first failed chunk marks the
    /// whole channel as failed and the broadcast moves on.
    pub async fn broadcast(&self, content: &str) -> BroadcastOutcome {
        let chunks = chunk_message(content, MAX_MESSAGE_CHARS);
        let mut outcome = BroadcastOutcome::default();

        for &channel_id in &self.channel_ids {
            match self.send_chunks(channel_id, &chunks).await {
                Ok(()) => {
                    info!(channel_id, "Discord summary delivered");
                    outcome.delivered += 1;
                }
                Err(e) => {
                    warn!(channel_id, "Discord delivery failed: {e}");
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    async fn send_chunks(&self, channel_id: u64, chunks: &[String]) -> Result<(), AppError> {
        for chunk in chunks {
            let url = format!("{DISCORD_API_BASE}/channels/{channel_id}/messages");
            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bot {}", self.token))
                .json(&json!({ "content": chunk }))
                .send()
                .await
                .map_err(|e| AppError::Transport(format!("Discord request failed: {e}")))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Transport(format!(
                    "Discord API returned {status}: {body}"
                )));
            }
        }
        Ok(())
    }
}

/// Splits `content` into chunks of at most `limit` characters, preferring
/// line boundaries. Blank-only chunks are dropped.
pub fn chunk_message(content: &str, limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for line in content.lines() {
        let line_chars = line.chars().count();

        if line_chars > limit {
            flush(&mut chunks, &mut current, &mut current_chars);
            chunks.extend(split_by_chars(line, limit));
            continue;
        }

        let needed = if current.is_empty() {
            line_chars
        } else {
            line_chars + 1
        };
        if current_chars + needed > limit {
            flush(&mut chunks, &mut current, &mut current_chars);
        }
        if !current.is_empty() {
            current.push('\n');
            current_chars += 1;
        }
        current.push_str(line);
        current_chars += line_chars;
    }
    flush(&mut chunks, &mut current, &mut current_chars);

    chunks.retain(|chunk| !chunk.trim().is_empty());
    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String, count: &mut usize) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
    *count = 0;
}

fn split_by_chars(line: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(limit)
        .map(|piece| piece.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_is_one_chunk() {
        let chunks = chunk_message("첫 줄\n둘째 줄", MAX_MESSAGE_CHARS);
        assert_eq!(chunks, vec!["첫 줄\n둘째 줄".to_string()]);
    }

    #[test]
    fn test_chunks_break_on_line_boundaries() {
        let content = "aaaaa\nbbbbb\nccccc";
        let chunks = chunk_message(content, 11);
        assert_eq!(chunks, vec!["aaaaa\nbbbbb".to_string(), "ccccc".to_string()]);
    }

    #[test]
    fn test_oversized_line_is_hard_split() {
        let content = "x".repeat(25);
        let chunks = chunk_message(&content, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 10);
        assert_eq!(chunks[2].chars().count(), 5);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let content = "가".repeat(5);
        let chunks = chunk_message(&content, 2);
        assert_eq!(chunks.len(), 3, "5 Korean chars at limit 2 gives 3 chunks");
        assert!(chunks.iter().all(|c| c.chars().count() <= 2));
    }

    #[test]
    fn test_blank_content_yields_no_chunks() {
        assert!(chunk_message("", MAX_MESSAGE_CHARS).is_empty());
        assert!(chunk_message("\n\n\n", MAX_MESSAGE_CHARS).is_empty());
    }

    #[test]
    fn test_zero_limit_yields_no_chunks() {
        assert!(chunk_message("anything", 0).is_empty());
    }

    #[test]
    fn test_no_chunk_exceeds_the_limit() {
        let content = (0..50)
            .map(|i| format!("{i} 번째 줄의 내용입니다"))
            .collect::<Vec<_>>()
            .join("\n");
        for chunk in chunk_message(&content, 40) {
            assert!(chunk.chars().count() <= 40);
        }
    }

    #[test]
    fn test_sender_requires_token_and_channels() {
        let config = Config {
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "gpt-oss:20b".to_string(),
            github_token: None,
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            sender_email: None,
            sender_password: None,
            discord_bot_token: Some("token".to_string()),
            discord_channel_ids: Vec::new(),
            output_dir: "output".to_string(),
            rust_log: "jd_scanner=info".to_string(),
        };
        assert!(DiscordSender::from_config(&config).is_none());

        let config = Config {
            discord_channel_ids: vec![42, 43],
            ..config
        };
        let sender = DiscordSender::from_config(&config).unwrap();
        assert_eq!(sender.channel_ids, vec![42, 43]);
    }
}
