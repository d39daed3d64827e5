//! E-mail delivery over SMTP.
//!
//! The full report goes out as multipart/alternative: raw markdown as the
//! plain part, a styled HTML rendering as the rich part. STARTTLS against
//! the configured relay, credentials from the environment.

use comrak::{markdown_to_html, Options};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;

const SUBJECT_PREFIX: &str = "JD-Scanner 분석 결과: ";
const SUBJECT_URL_CHARS: usize = 50;

const HTML_WRAPPER: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            padding: 20px;
            max-width: 800px;
            margin: 0 auto;
            color: #333;
        }
        h1, h2, h3 {
            color: #2c3e50;
            border-bottom: 1px solid #eee;
            padding-bottom: 10px;
        }
        a {
            color: #3498db;
        }
        li {
            margin: 5px 0;
        }
        .footer {
            margin-top: 30px;
            padding-top: 20px;
            border-top: 1px solid #eee;
            font-size: 12px;
            color: #888;
        }
    </style>
</head>
<body>
    {content}
    <div class="footer">
        <p>JD-Scanner - AI 기반 채용공고 분석 시스템</p>
    </div>
</body>
</html>
"#;

pub struct EmailSender {
    smtp_server: String,
    smtp_port: u16,
    sender_email: String,
    sender_password: String,
}

impl EmailSender {
    /// Returns `None` unless both the sender address and password are set.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.email_enabled() {
            return None;
        }
        Some(Self {
            smtp_server: config.smtp_server.clone(),
            smtp_port: config.smtp_port,
            sender_email: config.sender_email.clone()?,
            sender_password: config.sender_password.clone()?,
        })
    }

    /// Sends the full report to `recipient`.
    pub async fn send_report(
        &self,
        recipient: &str,
        subject: &str,
        report_markdown: &str,
    ) -> Result<(), AppError> {
        let message = self.build_message(recipient, subject, report_markdown)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp_server)
            .map_err(|e| AppError::Transport(format!("SMTP relay setup failed: {e}")))?
            .port(self.smtp_port)
            .credentials(Credentials::new(
                self.sender_email.clone(),
                self.sender_password.clone(),
            ))
            .build();

        mailer
            .send(message)
            .await
            .map_err(|e| AppError::Transport(format!("SMTP send failed: {e}")))?;

        info!(recipient, "Report e-mail delivered");
        Ok(())
    }

    fn build_message(
        &self,
        recipient: &str,
        subject: &str,
        report_markdown: &str,
    ) -> Result<Message, AppError> {
        let from: Mailbox = self
            .sender_email
            .parse()
            .map_err(|e| AppError::Transport(format!("invalid sender address: {e}")))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| AppError::Transport(format!("invalid recipient address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                report_markdown.to_string(),
                markdown_to_html_document(report_markdown),
            ))
            .map_err(|e| AppError::Transport(format!("failed to assemble e-mail: {e}")))
    }
}

/// Subject line naming the analyzed posting, URL cut to a fixed width.
pub fn build_subject(posting_url: &str) -> String {
    let head: String = posting_url.chars().take(SUBJECT_URL_CHARS).collect();
    format!("{SUBJECT_PREFIX}{head}...")
}

/// Full HTML document for the rich part: rendered markdown inside the
/// styled wrapper with the product footer.
fn markdown_to_html_document(markdown: &str) -> String {
    let body = markdown_to_html(markdown, &Options::default());
    HTML_WRAPPER.replace("{content}", &body)
}
