use thiserror::Error;

/// Application-level error type.
/// Every pipeline stage returns `Result<T, AppError>` so the run loop can
/// print one guidance line and exit instead of unwinding with a backtrace.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    UserInput(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("GitHub API rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// One-line hint printed under the error message when a run aborts.
    pub fn guidance(&self) -> &'static str {
        match self {
            AppError::UserInput(_) => "Check the value and run the scanner again.",
            AppError::Fetch(_) => {
                "Verify the posting URL opens in a browser and that the network is reachable."
            }
            AppError::RateLimit(_) => {
                "Wait for the limit window to reset, or set GITHUB_TOKEN to raise it."
            }
            AppError::Model(_) => {
                "Make sure Ollama is running at OLLAMA_BASE_URL and the model is pulled."
            }
            AppError::Transport(_) => {
                "The report file is already written; check the transport credentials."
            }
            AppError::Io(_) => "Check that OUTPUT_DIR exists and is writable.",
            AppError::Internal(_) => "This is a bug; re-run with RUST_LOG=debug for details.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_kind() {
        let err = AppError::Fetch("status 404".to_string());
        assert!(
            err.to_string().contains("Fetch error"),
            "display should prefix the error kind"
        );

        let err = AppError::RateLimit("403 from api.github.com".to_string());
        assert!(
            err.to_string().contains("rate limit"),
            "rate limit errors should be recognizable in logs"
        );
    }

    #[test]
    fn test_guidance_is_actionable_per_kind() {
        let model = AppError::Model("connection refused".to_string());
        assert!(
            model.guidance().contains("OLLAMA_BASE_URL"),
            "model guidance should point at the Ollama endpoint"
        );

        let rate = AppError::RateLimit("exceeded".to_string());
        assert!(
            rate.guidance().contains("GITHUB_TOKEN"),
            "rate limit guidance should mention the token escape hatch"
        );
    }
}
