//! Process command - extract contact details from a single resume file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, warn};

use cvex_core::models::config::CvexConfig;
use cvex_core::resume::{ExtractionLog, ResumeParser};
use cvex_core::{DocumentText, ExtractionResult, ImageAttachment, PdfTextSource, PlainTextSource, TextSource};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, TXT, or PNG/JPEG for vision extraction)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Skip the AI stage even if a credential is configured
    #[arg(long)]
    no_ai: bool,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,

    /// Dump the extraction log after processing
    #[arg(long)]
    show_log: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if args.no_ai {
        config.ai.enabled = false;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let parser = ResumeParser::from_env(config.clone());
    let mut log = ExtractionLog::new();

    let result = extract_file(&args.input, &config, &parser, &mut log).await?;

    let file_name = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    let output = format_result(&result, file_name, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Confidence: name {:.0}% ({}), email {:.0}% ({}), phone {:.0}% ({})",
            style("ℹ").blue(),
            result.confidence.name * 100.0,
            result.methods.name,
            result.confidence.email * 100.0,
            result.methods.email,
            result.confidence.phone * 100.0,
            result.methods.phone
        );
    }

    if args.show_log {
        println!();
        for entry in log.entries() {
            println!("{}", entry);
        }
    }

    if let Some(error) = &result.error {
        eprintln!("{} {}", style("⚠").yellow(), error);
    }

    Ok(())
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CvexConfig> {
    match config_path {
        Some(path) => Ok(CvexConfig::from_file(Path::new(path))?),
        None => {
            let default_path = super::config::default_config_path();
            if default_path.exists() {
                Ok(CvexConfig::from_file(&default_path)?)
            } else {
                Ok(CvexConfig::default())
            }
        }
    }
}

/// Run the pipeline on one file, routing by extension.
pub async fn extract_file(
    path: &Path,
    config: &CvexConfig,
    parser: &ResumeParser,
    log: &mut ExtractionLog,
) -> anyhow::Result<ExtractionResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" | "txt" => {
            let bytes = fs::read(path)?;
            let doc = load_text(&extension, &bytes, config)?;
            log.record(
                "text_extraction",
                true,
                format!("{} chars, image_based={}", doc.text.len(), doc.image_based),
            );
            if doc.image_based {
                warn!(
                    "{} yielded very little text; it may be a scanned document",
                    path.display()
                );
            }
            Ok(parser.process_with_log(&doc.text, log).await)
        }
        "png" | "jpg" | "jpeg" => {
            let bytes = fs::read(path)?;
            let format = image::guess_format(&bytes)
                .map_err(|e| anyhow::anyhow!("unreadable image {}: {}", path.display(), e))?;
            let attachment = ImageAttachment::new(bytes, format.to_mime_type());
            debug!("routing {} to vision extraction", path.display());
            Ok(parser.process_image_with_log(&[attachment], log).await)
        }
        _ => {
            anyhow::bail!("Unsupported file format: {}", extension);
        }
    }
}

fn load_text(
    extension: &str,
    bytes: &[u8],
    config: &CvexConfig,
) -> anyhow::Result<DocumentText> {
    let doc = match extension {
        "pdf" => PdfTextSource::from_config(&config.document).extract(bytes)?,
        _ => PlainTextSource::from_config(&config.document).extract(bytes)?,
    };
    Ok(doc)
}

pub fn format_result(
    result: &ExtractionResult,
    file_name: &str,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result, file_name),
        OutputFormat::Text => Ok(format_text(result, file_name)),
    }
}

fn format_csv(result: &ExtractionResult, file_name: &str) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["Name", "Email", "Phone Number", "FileName", "Error"])?;
    wtr.write_record([
        result.name.as_deref().unwrap_or("Not found"),
        result.email.as_deref().unwrap_or("Not found"),
        result.phone.as_deref().unwrap_or("Not found"),
        file_name,
        result.error.as_deref().unwrap_or(""),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult, file_name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("File:  {}\n", file_name));
    output.push_str(&format!(
        "Name:  {}\n",
        result.name.as_deref().unwrap_or("Not found")
    ));
    output.push_str(&format!(
        "Email: {}\n",
        result.email.as_deref().unwrap_or("Not found")
    ));
    output.push_str(&format!(
        "Phone: {}\n",
        result.phone.as_deref().unwrap_or("Not found")
    ));
    output.push_str(&format!("AI:    {}\n", if result.ai_used { "yes" } else { "no" }));

    if let Some(error) = &result.error {
        output.push_str(&format!("Note:  {}\n", error));
    }

    output
}
