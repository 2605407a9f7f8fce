//! Sequential batch runner
//!
//! One form can only be driven by one actor at a time, so records are
//! processed strictly in order. A failing record is logged and reported; it
//! never stops the batch.

use dsr_browser::{save_screenshot, FormDriver};
use dsr_core::{ColumnConfig, DsrConfig, DsrError, Record, Result, SubmissionPlan};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::report::{RecordOutcome, RecordResult, RunReport};

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    pub form_url: String,
    pub catalog: Vec<String>,
    pub columns: ColumnConfig,
    /// Capture a screenshot after each attempted record
    pub screenshot_dir: Option<PathBuf>,
    /// Plan every record without touching the driver
    pub dry_run: bool,
}

impl RunnerOptions {
    pub fn from_config(config: &DsrConfig) -> Self {
        Self {
            form_url: config.form.url.clone(),
            catalog: config.form.catalog.clone(),
            columns: config.columns.clone(),
            screenshot_dir: config.output.screenshot_dir.clone(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Drives a [`FormDriver`] through a batch of records
pub struct FormRunner<D: FormDriver> {
    driver: D,
    options: RunnerOptions,
}

impl<D: FormDriver> FormRunner<D> {
    pub fn new(driver: D, options: RunnerOptions) -> Self {
        Self { driver, options }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Plan one record against the configured catalog
    pub fn plan(&self, record: &Record) -> SubmissionPlan {
        SubmissionPlan::build(record, &self.options.catalog, &self.options.columns)
    }

    /// Process every record in order and report the outcomes
    pub async fn run(&self, records: &[Record]) -> RunReport {
        let mut report = RunReport::start(self.options.dry_run);
        info!(
            "Starting run {} over {} record(s){}",
            report.run_id,
            records.len(),
            if self.options.dry_run { " (dry run)" } else { "" }
        );

        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;
            let plan = self.plan(record);

            let (outcome, screenshot) = if let Some(reason) = &plan.skip_reason {
                (
                    RecordOutcome::Skipped {
                        reason: reason.clone(),
                    },
                    None,
                )
            } else if self.options.dry_run {
                (RecordOutcome::Planned, None)
            } else {
                let outcome = match self.submit(row, &plan).await {
                    Ok(()) => RecordOutcome::Submitted,
                    Err(e) => {
                        warn!("Row {} failed: {}", row, e);
                        RecordOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                let screenshot = self.capture(row, &outcome).await;
                (outcome, screenshot)
            };

            report.push(RecordResult {
                row,
                plan,
                outcome,
                screenshot,
            });
        }

        report.finish();
        info!("Run {} finished: {}", report.run_id, report.summary());
        report
    }

    /// Drive the form for one planned record
    #[instrument(skip(self, plan), fields(category = %plan.classification.category))]
    pub async fn submit(&self, row: usize, plan: &SubmissionPlan) -> Result<()> {
        let label = plan.classification.matched_label.as_deref().ok_or_else(|| {
            DsrError::Submission(format!("Row {} has no request label to select", row))
        })?;

        self.driver.open_form(&self.options.form_url).await?;
        self.driver.select_by_label(label).await?;

        for option_label in plan.selected_labels() {
            self.driver.select_by_label(option_label).await?;
        }

        for (role, value) in &plan.fields {
            self.driver.fill_field(*role, value).await?;
        }

        self.driver.submit().await?;
        info!("Row {} submitted as '{}'", row, label);
        Ok(())
    }

    /// Screenshot evidence; a capture failure never changes the outcome
    async fn capture(&self, row: usize, outcome: &RecordOutcome) -> Option<PathBuf> {
        let dir = self.options.screenshot_dir.as_ref()?;
        let status = match outcome {
            RecordOutcome::Submitted => "submitted",
            _ => "failed",
        };
        match save_screenshot(&self.driver, dir, &format!("row-{}-{}", row, status)).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Screenshot for row {} failed (fail-open): {}", row, e);
                None
            }
        }
    }
}
