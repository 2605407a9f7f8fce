//! Run reports

use chrono::{DateTime, Utc};
use dsr_core::{RequestCategory, Result, SubmissionPlan};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Form submitted and accepted
    Submitted,
    /// Planned only (dry run)
    Planned,
    /// Not attempted; the plan carried a skip reason
    Skipped { reason: String },
    /// Attempted and failed
    Failed { error: String },
}

/// Outcome of one record along with the decisions behind it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult {
    /// 1-based row number in the source
    pub row: usize,
    pub plan: SubmissionPlan,
    pub outcome: RecordOutcome,
    pub screenshot: Option<PathBuf>,
}

/// Counts per outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub submitted: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} record(s): {} submitted, {} planned, {} skipped, {} failed",
            self.total, self.submitted, self.planned, self.skipped, self.failed
        )
    }
}

/// Full record of one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub results: Vec<RecordResult>,
}

impl RunReport {
    pub fn start(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: RecordResult) {
        self.results.push(result);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.results.len(),
            ..Default::default()
        };
        for result in &self.results {
            match result.outcome {
                RecordOutcome::Submitted => summary.submitted += 1,
                RecordOutcome::Planned => summary.planned += 1,
                RecordOutcome::Skipped { .. } => summary.skipped += 1,
                RecordOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Results whose request fell into `category`
    pub fn by_category(&self, category: RequestCategory) -> impl Iterator<Item = &RecordResult> {
        self.results
            .iter()
            .filter(move |r| r.plan.classification.category == category)
    }

    /// Write the report as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
