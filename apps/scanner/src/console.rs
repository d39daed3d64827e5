//! Operator input collection.
//!
//! Every prompt loop is generic over `BufRead` so tests can drive it with a
//! `Cursor` instead of a live terminal. Each loop re-prompts a bounded number
//! of times and then gives up with `AppError::UserInput`; the pipeline never
//! blocks forever on bad input.

use std::io::{self, BufRead, Write};

use crate::errors::AppError;

const MAX_ATTEMPTS: u32 = 3;

/// Everything the operator types before the pipeline starts.
#[derive(Debug, Clone)]
pub struct OperatorInput {
    pub contact_email: String,
    pub github_username: Option<String>,
    pub posting_url: String,
}

impl OperatorInput {
    /// Canonical profile URL stored in the operator record.
    pub fn github_url(&self) -> Option<String> {
        self.github_username
            .as_ref()
            .map(|name| format!("https://github.com/{name}"))
    }
}

pub fn prompt_contact_email<R: BufRead>(input: &mut R) -> Result<String, AppError> {
    for _ in 0..MAX_ATTEMPTS {
        print!("Contact e-mail (for the report): ");
        io::stdout().flush()?;

        let Some(line) = read_trimmed_line(input)? else {
            return Err(input_closed());
        };

        if validate_contact_email(&line) {
            return Ok(line);
        }
        println!("  '{line}' does not look like an e-mail address (expected name@domain).");
    }

    Err(AppError::UserInput(format!(
        "no valid e-mail address after {MAX_ATTEMPTS} attempts"
    )))
}

/// Blank input opts out of GitHub analysis entirely; it is not an invalid
/// attempt.
pub fn prompt_github_username<R: BufRead>(input: &mut R) -> Result<Option<String>, AppError> {
    for _ in 0..MAX_ATTEMPTS {
        print!("GitHub profile URL or username (Enter to skip): ");
        io::stdout().flush()?;

        let Some(line) = read_trimmed_line(input)? else {
            return Err(input_closed());
        };

        if line.is_empty() {
            return Ok(None);
        }
        if let Some(username) = extract_github_username(&line) {
            return Ok(Some(username));
        }
        println!("  '{line}' is not a GitHub profile URL or username.");
    }

    Err(AppError::UserInput(format!(
        "no valid GitHub profile after {MAX_ATTEMPTS} attempts"
    )))
}

pub fn prompt_posting_url<R: BufRead>(input: &mut R) -> Result<String, AppError> {
    for _ in 0..MAX_ATTEMPTS {
        print!("Job posting URL: ");
        io::stdout().flush()?;

        let Some(line) = read_trimmed_line(input)? else {
            return Err(input_closed());
        };

        if validate_posting_url(&line) {
            return Ok(line);
        }
        println!("  '{line}' is not a usable URL (expected http:// or https://).");
    }

    Err(AppError::UserInput(format!(
        "no valid posting URL after {MAX_ATTEMPTS} attempts"
    )))
}

/// Returns `None` on end of input (closed stdin), `Some(trimmed)` otherwise.
fn read_trimmed_line<R: BufRead>(input: &mut R) -> Result<Option<String>, AppError> {
    let mut line = String::new();
    let bytes = input.read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn input_closed() -> AppError {
    AppError::UserInput("input stream closed before a value was entered".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// `local@domain.tld` with the usual address characters and an alphabetic
/// top-level domain of at least two letters.
pub fn validate_contact_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }
    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

pub fn validate_posting_url(value: &str) -> bool {
    let rest = if let Some(rest) = value.strip_prefix("https://") {
        rest
    } else if let Some(rest) = value.strip_prefix("http://") {
        rest
    } else {
        return false;
    };

    // Host is whatever comes before the first slash.
    let host = rest.split('/').next().unwrap_or("");
    !host.is_empty()
}

/// Accepts `https://github.com/<user>` (extra path, query, trailing slash
/// tolerated), `github.com/<user>`, or a bare `<user>`; returns the username.
pub fn extract_github_username(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);

    let candidate = match without_www.strip_prefix("github.com/") {
        Some(rest) => rest.split(['/', '?', '#']).next().unwrap_or(""),
        None => without_www,
    };

    if validate_github_username(candidate) {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// GitHub username rules: 1-39 chars, alphanumeric or hyphen, no hyphen at
/// either end and no consecutive hyphens.
fn validate_github_username(name: &str) -> bool {
    if name.is_empty() || name.len() > 39 {
        return false;
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return false;
    }
    if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
        return false;
    }
    true
}
