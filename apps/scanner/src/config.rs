use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Captured once at startup; the pipeline only ever borrows it.
///
/// Every key is optional. Transports without credentials are skipped at
/// publish time rather than treated as errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub github_token: Option<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub discord_bot_token: Option<String>,
    pub discord_channel_ids: Vec<u64>,
    pub output_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "gpt-oss:20b"),
            github_token: optional_env("GITHUB_TOKEN"),
            smtp_server: env_or("SMTP_SERVER", "smtp.gmail.com"),
            smtp_port: env_or("SMTP_PORT", "587")
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            sender_email: optional_env("SENDER_EMAIL"),
            sender_password: optional_env("SENDER_PASSWORD"),
            discord_bot_token: optional_env("DISCORD_BOT_TOKEN"),
            discord_channel_ids: parse_channel_ids(
                &optional_env("DISCORD_CHANNEL_IDS").unwrap_or_default(),
            )?,
            output_dir: env_or("OUTPUT_DIR", "output"),
            rust_log: env_or("RUST_LOG", "jd_scanner=info"),
        })
    }

    /// E-mail delivery needs both the sender address and its password.
    pub fn email_enabled(&self) -> bool {
        self.sender_email.is_some() && self.sender_password.is_some()
    }

    /// Discord delivery needs a bot token and at least one channel.
    pub fn discord_enabled(&self) -> bool {
        self.discord_bot_token.is_some() && !self.discord_channel_ids.is_empty()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Empty or whitespace-only values count as unset so a blank line in `.env`
/// does not half-enable a transport.
fn optional_env(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

fn parse_channel_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .with_context(|| format!("DISCORD_CHANNEL_IDS entry '{part}' is not a channel id"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_credentials() -> Config {
        Config {
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "gpt-oss:20b".to_string(),
            github_token: None,
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            sender_email: None,
            sender_password: None,
            discord_bot_token: None,
            discord_channel_ids: Vec::new(),
            output_dir: "output".to_string(),
            rust_log: "jd_scanner=info".to_string(),
        }
    }

    #[test]
    fn test_parse_channel_ids_splits_and_trims() {
        let ids = parse_channel_ids("123, 456 ,789").unwrap();
        assert_eq!(ids, vec![123, 456, 789]);
    }

    #[test]
    fn test_parse_channel_ids_empty_input_is_empty_list() {
        assert!(parse_channel_ids("").unwrap().is_empty());
        assert!(parse_channel_ids(" , ,").unwrap().is_empty());
    }

    #[test]
    fn test_parse_channel_ids_rejects_non_numeric() {
        let err = parse_channel_ids("123,general").unwrap_err();
        assert!(
            err.to_string().contains("general"),
            "error should name the bad entry"
        );
    }

    #[test]
    fn test_email_disabled_without_password() {
        let mut config = config_without_credentials();
        config.sender_email = Some("scanner@example.com".to_string());
        assert!(
            !config.email_enabled(),
            "address alone must not enable e-mail"
        );

        config.sender_password = Some("app-password".to_string());
        assert!(config.email_enabled());
    }

    #[test]
    fn test_discord_disabled_without_channels() {
        let mut config = config_without_credentials();
        config.discord_bot_token = Some("token".to_string());
        assert!(
            !config.discord_enabled(),
            "token alone must not enable Discord"
        );

        config.discord_channel_ids = vec![42];
        assert!(config.discord_enabled());
    }
}
