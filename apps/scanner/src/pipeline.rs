//! End-to-end run: collect input, fetch and summarize the posting, analyze
//! the GitHub profile, build the report, then publish it.
//!
//! Failure policy, in one place:
//!   - fetch/summarize/requirement/gap errors abort the run,
//!   - a missing or broken GitHub profile degrades to a summary-only report,
//!   - a GitHub rate limit aborts (partial skill data would mislead),
//!   - per-language question failures drop only that language,
//!   - transports can never fail the run once the report file is written.

use std::io;
use std::path::Path;

use tracing::warn;

use crate::analysis::gap::{evaluate_gap, GapReport};
use crate::analysis::questions::{generate_questions, Language, QuestionSet};
use crate::analysis::requirements::extract_requirements;
use crate::config::Config;
use crate::console::{self, OperatorInput};
use crate::errors::AppError;
use crate::github::{GithubClient, GithubError};
use crate::llm_client::OllamaClient;
use crate::operators::{OperatorRecord, OperatorStore};
use crate::posting::fetcher::PostingFetcher;
use crate::posting::parser::{parse_summary, PostingSummary};
use crate::posting::summarizer::Summarizer;
use crate::report::{render_report, write_report};
use crate::transport::discord::DiscordSender;
use crate::transport::email::{build_subject, EmailSender};

const BANNER_WIDTH: usize = 60;
const STEP_WIDTH: usize = 40;

/// Analysis artifacts beyond the posting summary. All optional; the report
/// renders whatever is present.
#[derive(Default)]
struct Artifacts {
    gap: Option<GapReport>,
    questions_ko: Option<QuestionSet>,
    questions_en: Option<QuestionSet>,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    llm: OllamaClient,
    fetcher: PostingFetcher,
    github: GithubClient,
    store: OperatorStore,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            llm: OllamaClient::new(&config.ollama_base_url, &config.ollama_model),
            fetcher: PostingFetcher::new(),
            github: GithubClient::new(config.github_token.clone()),
            store: OperatorStore::new(Path::new(&config.output_dir)),
            config,
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        banner("JD-Scanner - job posting analysis and interview preparation");

        // Console input happens up front; nothing async needs stdin.
        let (operator_input, mut record) = {
            let stdin = io::stdin();
            let mut reader = stdin.lock();

            step(1, "Operator information");
            let mut operator_input = OperatorInput {
                contact_email: console::prompt_contact_email(&mut reader)?,
                github_username: console::prompt_github_username(&mut reader)?,
                posting_url: String::new(),
            };

            let (record, returning) = self.store.load_or_create(
                &operator_input.contact_email,
                operator_input.github_url().as_deref(),
            )?;
            if returning {
                println!(
                    "\nWelcome back, {}! Completed analyses so far: {}",
                    record.email, record.analysis_count
                );
            } else {
                println!("\nWelcome, {}!", record.email);
            }

            step(2, "Job posting URL");
            operator_input.posting_url = console::prompt_posting_url(&mut reader)?;
            (operator_input, record)
        };

        step(3, "Posting analysis");
        println!("Extracting content...");
        let text = self.fetcher.fetch(&operator_input.posting_url).await?;
        println!("Extraction complete ({} characters)", text.chars().count());

        println!("Summarizing with the local model (this can take a while)...");
        let summarizer = Summarizer::new(&self.llm);
        let reply = summarizer.summarize(&text).await?;
        let summary = parse_summary(&reply, &operator_input.posting_url);

        let artifacts = match &operator_input.github_username {
            Some(username) => self.analyze_candidate(username, &summary).await?,
            None => {
                println!("\n[Step 4-6/6] GitHub analysis skipped (no profile provided)");
                Artifacts::default()
            }
        };

        println!("\n{}", "=".repeat(BANNER_WIDTH));
        println!("Publishing the report...");

        let report = render_report(
            &summary,
            artifacts.gap.as_ref(),
            artifacts.questions_ko.as_ref(),
            artifacts.questions_en.as_ref(),
        );
        // The file is the source of truth; transports only ever follow it.
        let report_path = write_report(Path::new(&self.config.output_dir), &summary, &report)?;
        println!("Report saved to: {}", report_path.display());

        self.deliver(&record, &operator_input.posting_url, &report, &summary)
            .await;
        self.store.record_publish(&mut record)?;

        banner("Analysis complete!");
        println!("\n[Posting summary]");
        println!("{}", "-".repeat(STEP_WIDTH));
        println!("{}", summary.to_markdown());
        if let Some(gap) = &artifacts.gap {
            println!("\n[Skill gap analysis]");
            println!("{}", "-".repeat(STEP_WIDTH));
            println!("{}", gap.to_markdown());
        }
        Ok(())
    }

    /// Steps 4-6. A profile that cannot be analyzed degrades to a
    /// summary-only report; only a rate limit aborts.
    async fn analyze_candidate(
        &self,
        username: &str,
        summary: &PostingSummary,
    ) -> Result<Artifacts, AppError> {
        step(4, "GitHub profile analysis");
        let profile = match self.github.analyze_profile(username).await {
            Ok(profile) => profile,
            Err(GithubError::RateLimited(message)) => {
                return Err(AppError::RateLimit(message));
            }
            Err(GithubError::NotFound(message)) => {
                warn!("GitHub profile unavailable: {message}");
                println!("GitHub user '{username}' was not found; continuing with the summary only.");
                return Ok(Artifacts::default());
            }
            Err(e) => {
                warn!("GitHub analysis failed: {e}");
                println!("GitHub analysis failed; continuing with the summary only.");
                return Ok(Artifacts::default());
            }
        };

        println!("Extracting job requirements...");
        let requirements = extract_requirements(&self.llm, &summary.body_markdown()).await?;
        if requirements.is_empty() {
            println!("No explicit technology requirements were found in the posting.");
        }

        step(5, "Skill gap analysis");
        let gap = evaluate_gap(&self.llm, &requirements, &profile).await?;
        println!("Skill gap analysis complete");

        step(6, "Interview question generation");
        let gap_markdown = gap.to_markdown();
        let job_title = requirements.job_title_or_default().to_string();
        let candidate_techs = profile.all_languages();

        println!("Generating Korean questions...");
        let questions_ko = self
            .questions_or_skip(Language::Korean, &gap_markdown, &job_title, &candidate_techs)
            .await;
        println!("Generating English questions...");
        let questions_en = self
            .questions_or_skip(Language::English, &gap_markdown, &job_title, &candidate_techs)
            .await;

        Ok(Artifacts {
            gap: Some(gap),
            questions_ko,
            questions_en,
        })
    }

    async fn questions_or_skip(
        &self,
        language: Language,
        gap_markdown: &str,
        job_title: &str,
        candidate_techs: &[String],
    ) -> Option<QuestionSet> {
        match generate_questions(&self.llm, language, gap_markdown, job_title, candidate_techs)
            .await
        {
            Ok(set) => Some(set),
            Err(e) => {
                warn!("Question generation failed: {e}");
                println!(
                    "{} question generation failed; the report will omit it.",
                    language.display_name()
                );
                None
            }
        }
    }

    /// Sends the finished report out. Every outcome is printed; none can
    /// fail the run.
    async fn deliver(
        &self,
        record: &OperatorRecord,
        posting_url: &str,
        report: &str,
        summary: &PostingSummary,
    ) {
        match EmailSender::from_config(self.config) {
            Some(sender) => {
                let subject = build_subject(posting_url);
                match sender.send_report(&record.email, &subject, report).await {
                    Ok(()) => println!("E-mail sent to {}", record.email),
                    Err(e) => {
                        warn!("E-mail delivery failed: {e}");
                        println!("E-mail delivery failed: {e}");
                    }
                }
            }
            None => println!("E-mail delivery skipped (credentials not configured)."),
        }

        match DiscordSender::from_config(self.config) {
            Some(sender) => {
                let outcome = sender.broadcast(&summary.to_markdown()).await;
                println!(
                    "Discord: {} channel(s) delivered, {} failed",
                    outcome.delivered, outcome.failed
                );
            }
            None => println!("Discord delivery skipped (bot token or channels not configured)."),
        }
    }
}

fn banner(title: &str) {
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("  {title}");
    println!("{}", "=".repeat(BANNER_WIDTH));
}

fn step(number: u8, label: &str) {
    println!("\n[Step {number}/6] {label}");
    println!("{}", "-".repeat(STEP_WIDTH));
}
