//! CLI entry point for the decision grader.
//!
//! Scores batters' plate discipline from pitch-tracking CSVs and merges the
//! grades into a roster export as a formatted spreadsheet.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use decision_grader::analyzers::analyzer::{handle_upload, score_pitch_files};
use decision_grader::{
    config::{ExportConfig, log_file_path},
    fetch::load_source,
    output::{print_json, print_pretty, write_document, write_scores_csv},
    parser::Source,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "decision_grader")]
#[command(about = "Grade batter plate discipline and merge it into a roster export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SummaryFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Score pitch files, merge into the roster, and write the workbook
    Export {
        /// Pitch-tracking CSV (path or URL); repeat for multiple files
        #[arg(short, long = "trackman", value_name = "FILE_OR_URL", required = true)]
        trackman: Vec<String>,

        /// Roster CSV with playerFirstName and playerFullName columns
        #[arg(short = 'm', long, value_name = "FILE_OR_URL")]
        trumedia: String,

        /// Output workbook path (defaults to the configured export file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worksheet name
        #[arg(long)]
        sheet: Option<String>,

        /// Log a run summary in the given format
        #[arg(long, value_enum)]
        summary: Option<SummaryFormat>,
    },
    /// Score pitch files only and write one CSV row per batter
    Score {
        /// Pitch-tracking CSV (path or URL); repeat for multiple files
        #[arg(short, long = "trackman", value_name = "FILE_OR_URL", required = true)]
        trackman: Vec<String>,

        /// CSV file to write scores to
        #[arg(short, long, default_value = "scores.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = log_file_path();
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("decision_grader.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            trackman,
            trumedia,
            output,
            sheet,
            summary,
        } => export(&trackman, &trumedia, output, sheet, summary).await,
        Commands::Score { trackman, output } => score(&trackman, &output).await,
    };

    if let Err(e) = &result {
        error!("Run failed: {e:#}");
    }
    result
}

async fn export(
    trackman: &[String],
    trumedia: &str,
    output: Option<PathBuf>,
    sheet: Option<String>,
    summary: Option<SummaryFormat>,
) -> Result<()> {
    let config = ExportConfig::from_env().with_sheet_name(sheet);
    let pitch_files = load_all(trackman).await?;
    let roster = load_source(trumedia).await?;

    let document = handle_upload(&pitch_files, &roster, &config)
        .with_context(|| format!("export of {} failed", roster.name))?;

    let path = output.unwrap_or_else(|| PathBuf::from(&document.file_name));
    write_document(&path, &document.bytes)?;

    match summary {
        Some(SummaryFormat::Pretty) => print_pretty(&document.report),
        Some(SummaryFormat::Json) => print_json(&document.report)?,
        None => {}
    }

    Ok(())
}

async fn score(trackman: &[String], output: &str) -> Result<()> {
    let pitch_files = load_all(trackman).await?;
    let scored = score_pitch_files(&pitch_files)?;

    write_scores_csv(output, &scored.batters)?;
    info!(output, batters = scored.batters.len(), "Scores written");
    Ok(())
}

/// Loads every input in order; the first failure aborts the run.
async fn load_all(locations: &[String]) -> Result<Vec<Source>> {
    let mut sources = Vec::with_capacity(locations.len());
    for location in locations {
        sources.push(load_source(location).await?);
    }
    Ok(sources)
}
