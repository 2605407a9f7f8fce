//! DSR CLI - privacy request form submission
//!
//! Usage:
//!   dsr init                         Write a default .dsr/config.toml
//!   dsr classify <text>              Show how a request type is classified
//!   dsr format-date <value>          Normalize a birth date
//!   dsr plan <records.json>          Print the submission plan for each record
//!   dsr run <records.json>           Submit every record through the browser

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dsr_browser::{ChromeFormDriver, MockFormDriver};
use dsr_core::{classify, format_birth_date, DsrConfig, SubmissionPlan};
use dsr_runner::{FormRunner, JsonRecordSource, RecordSource, RunReport, RunnerOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "dsr")]
#[command(author, version, about = "Data Subject Rights request form submission")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (defaults to .dsr/config.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Classify a request type against the configured catalog
    Classify {
        /// Request type text as it appears in the spreadsheet
        text: String,
    },

    /// Normalize a birth date to M/D/YYYY
    FormatDate {
        /// Raw birth date value
        value: String,
    },

    /// Print submission plans without opening a browser
    Plan {
        /// JSON export of the request spreadsheet
        records: PathBuf,
    },

    /// Submit every record through the browser
    Run {
        /// JSON export of the request spreadsheet
        records: PathBuf,

        /// Plan and report only; no browser is launched
        #[arg(long)]
        dry_run: bool,

        /// Report path (overrides output.report_path)
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Attach to a running Chrome on this DevTools port instead of launching one
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => cmd_init(&path),
        Commands::Classify { text } => cmd_classify(&load_config(cli.config.as_deref())?, &text),
        Commands::FormatDate { value } => cmd_format_date(&value),
        Commands::Plan { records } => cmd_plan(&load_config(cli.config.as_deref())?, &records),
        Commands::Run {
            records,
            dry_run,
            report,
            port,
        } => cmd_run(load_config(cli.config.as_deref())?, &records, dry_run, report, port).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<DsrConfig> {
    match path {
        Some(path) => DsrConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => DsrConfig::load_or_default(Path::new(".")).context("Failed to load .dsr/config.toml"),
    }
}

fn cmd_init(path: &Path) -> Result<()> {
    info!("Initializing DSR config in {:?}", path);
    let written = DsrConfig::write_default(path).context("Failed to write default config")?;
    println!("Created {}", written.display());
    println!("Edit form.catalog to match the labels currently shown on the form.");
    Ok(())
}

fn cmd_classify(config: &DsrConfig, text: &str) -> Result<()> {
    let result = classify(Some(text), &config.form.catalog);
    println!("Category: {}", result.category);
    println!("Method:   {}", result.method);
    println!(
        "Label:    {}",
        result.matched_label.as_deref().unwrap_or("(none)")
    );
    Ok(())
}

fn cmd_format_date(value: &str) -> Result<()> {
    println!("{}", format_birth_date(value));
    Ok(())
}

fn cmd_plan(config: &DsrConfig, records_path: &Path) -> Result<()> {
    let records = JsonRecordSource::new(records_path)
        .records()
        .context("Failed to load records")?;

    for (idx, record) in records.iter().enumerate() {
        let plan = SubmissionPlan::build(record, &config.form.catalog, &config.columns);
        println!("Row {}:", idx + 1);
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }
    Ok(())
}

async fn cmd_run(
    config: DsrConfig,
    records_path: &Path,
    dry_run: bool,
    report_path: Option<PathBuf>,
    port: Option<u16>,
) -> Result<()> {
    let records = JsonRecordSource::new(records_path)
        .records()
        .context("Failed to load records")?;
    let options = RunnerOptions::from_config(&config).dry_run(dry_run);

    let report = if dry_run {
        FormRunner::new(MockFormDriver::new(), options).run(&records).await
    } else {
        let driver = match port {
            Some(port) => {
                let timeout = Duration::from_secs(config.browser.timeout_seconds);
                ChromeFormDriver::connect(port, config.selectors.clone(), timeout).await?
            }
            None => ChromeFormDriver::launch(&config.browser, config.selectors.clone()).await?,
        };
        FormRunner::new(driver, options).run(&records).await
    };

    let report_path = report_path.unwrap_or_else(|| config.output.report_path.clone());
    report
        .write_json(&report_path)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    print_summary(&report);
    println!("Report: {}", report_path.display());
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("Run {}", report.run_id);
    println!("{}", report.summary());
    for result in &report.results {
        println!(
            "  row {:>3}  {:<16} {:?}",
            result.row, result.plan.classification.category.to_string(), result.outcome
        );
    }
}
