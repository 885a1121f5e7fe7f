//! Batch processing command for multiple resume files.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use cvex_core::ExtractionResult;
use cvex_core::resume::{ExtractionLog, ResumeParser};

use super::process::{extract_file, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Summary CSV path
    #[arg(short, long, default_value = "extraction.csv")]
    output: PathBuf,

    /// Skip the AI stage even if a credential is configured
    #[arg(long)]
    no_ai: bool,

    /// Dump the extraction log after processing
    #[arg(long)]
    show_log: bool,
}

/// Outcome of processing one file, kept in submission order.
struct BatchRecord {
    file_name: String,
    result: ExtractionResult,
    /// Document-level failure: nothing could even reach the pipeline.
    failed: bool,
}

#[derive(PartialEq)]
enum RecordStatus {
    Success,
    NoData,
    Failed,
    CreditError,
}

impl BatchRecord {
    fn status(&self) -> RecordStatus {
        if self.failed {
            return RecordStatus::Failed;
        }
        if let Some(error) = &self.result.error {
            if error.to_lowercase().contains("credit") {
                return RecordStatus::CreditError;
            }
        }
        if self.result.has_any_field() {
            RecordStatus::Success
        } else {
            RecordStatus::NoData
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.no_ai {
        config.ai.enabled = false;
    }

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "png" | "jpg" | "jpeg")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let parser = ResumeParser::from_env(config.clone());

    // One early credit check: an exhausted account fails every document the
    // same way, so say it once up front.
    if parser.ai_available() {
        if let Err(e) = parser.check_credits().await {
            println!("{} {}", style("⚠").yellow(), e);
        }
    } else if config.ai.enabled && !args.no_ai {
        println!(
            "{} No API key configured; AI fallback is disabled",
            style("⚠").yellow()
        );
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // One pipeline run per file; a failure never aborts the batch.
    let mut records = Vec::with_capacity(files.len());
    let mut log = ExtractionLog::new();

    for path in &files {
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let record = match extract_file(path, &config, &parser, &mut log).await {
            Ok(result) => BatchRecord {
                file_name,
                result,
                failed: false,
            },
            Err(e) => {
                warn!("failed to process {}: {}", path.display(), e);
                BatchRecord {
                    file_name,
                    result: ExtractionResult {
                        error: Some(e.to_string()),
                        ..Default::default()
                    },
                    failed: true,
                }
            }
        };

        records.push(record);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    write_summary(&args.output, &records)?;
    println!(
        "{} Summary written to {}",
        style("✓").green(),
        args.output.display()
    );

    // Console summary
    let successful = records.iter().filter(|r| r.status() == RecordStatus::Success).count();
    let no_data = records.iter().filter(|r| r.status() == RecordStatus::NoData).count();
    let failed = records.len() - successful - no_data;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} with contact details, {} with no data, {} failed",
        style(successful).green(),
        style(no_data).yellow(),
        style(failed).red()
    );

    if let Some(record) = records.iter().find(|r| r.status() == RecordStatus::CreditError) {
        println!();
        println!(
            "{} {}",
            style("AI credits:").red(),
            record.result.error.as_deref().unwrap_or("credit error")
        );
    }

    let no_data_records: Vec<_> = records
        .iter()
        .filter(|r| r.status() == RecordStatus::NoData)
        .collect();
    if !no_data_records.is_empty() {
        println!();
        println!("{}", style("No data extracted from:").yellow());
        for record in no_data_records {
            println!(
                "  - {}: {}",
                record.file_name,
                record.result.error.as_deref().unwrap_or("no fields matched")
            );
        }
    }

    if args.show_log {
        println!();
        for entry in log.entries() {
            println!("{}", entry);
        }
    }

    Ok(())
}

/// Write the export table: one row per document, in submission order.
fn write_summary(path: &PathBuf, records: &[BatchRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["Name", "Email", "Phone Number", "FileName", "Error"])?;

    for record in records {
        wtr.write_record([
            record.result.name.as_deref().unwrap_or("Not found"),
            record.result.email.as_deref().unwrap_or("Not found"),
            record.result.phone.as_deref().unwrap_or("Not found"),
            &record.file_name,
            record.result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
