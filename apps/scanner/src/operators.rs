//! Operator records.
//!
//! One JSON file per contact address under `<output_dir>/operators/`, so a
//! returning operator keeps their id and analysis history across runs. A
//! record that fails to parse is recreated rather than aborting the run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub id: Uuid,
    pub email: String,
    pub github_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub analysis_count: u64,
}

impl OperatorRecord {
    fn new(email: &str, github_url: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            github_url: github_url.map(str::to_string),
            created_at: now,
            last_active: now,
            analysis_count: 0,
        }
    }
}

pub struct OperatorStore {
    dir: PathBuf,
}

impl OperatorStore {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            dir: output_dir.join("operators"),
        }
    }

    /// Loads the record for `email`, creating one on first contact. Returns
    /// the record and whether the operator was already known. Both paths
    /// persist immediately so `last_active` is always current on disk.
    pub fn load_or_create(
        &self,
        email: &str,
        github_url: Option<&str>,
    ) -> Result<(OperatorRecord, bool), AppError> {
        let path = self.record_path(email);

        let existing = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str::<OperatorRecord>(&raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(path = %path.display(), "Operator record is corrupt, recreating: {e}");
                    None
                }
            }
        } else {
            None
        };

        match existing {
            Some(mut record) => {
                record.last_active = Utc::now();
                if github_url.is_some() {
                    record.github_url = github_url.map(str::to_string);
                }
                self.save(&record)?;
                debug!(email, "Loaded returning operator");
                Ok((record, true))
            }
            None => {
                let record = OperatorRecord::new(email, github_url);
                self.save(&record)?;
                debug!(email, "Created new operator record");
                Ok((record, false))
            }
        }
    }

    /// Marks one completed analysis against the record and persists it.
    pub fn record_publish(&self, record: &mut OperatorRecord) -> Result<(), AppError> {
        record.analysis_count += 1;
        record.last_active = Utc::now();
        self.save(record)
    }

    fn save(&self, record: &OperatorRecord) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record).map_err(anyhow::Error::from)?;
        fs::write(self.record_path(&record.email), json)?;
        Ok(())
    }

    fn record_path(&self, email: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_filename(email)))
    }
}

/// Filesystem-safe name for a contact address. Keeps lowercase
/// alphanumerics, dots and hyphens; everything else becomes `_`.
fn sanitize_filename(email: &str) -> String {
    email
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
