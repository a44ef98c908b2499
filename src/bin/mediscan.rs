//! CLI binary for mediscan.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig` and pretty-prints the structured result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mediscan::{analyze, ingest_file, AnalysisConfig, AnalysisResult, DocumentType};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze a photographed lab report
  mediscan lab_report.jpg

  # Analyze the first page of a PDF prescription
  mediscan prescription.pdf

  # Ask a specific question about the document
  mediscan results.pdf -q "Is my cholesterol in the normal range?"

  # Structured JSON output for scripting
  mediscan --json medicine_label.png > result.json

  # Use a different Gemini model
  mediscan --model gemini-2.5-flash scan.jpg

SUPPORTED INPUTS:
  Any image type (image/jpeg, image/png, image/webp, ...)  sent as-is
  application/pdf                                          page 1 rasterised

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY     Google Gemini API key (required)
  MEDISCAN_MODEL     Override model ID
  PDFIUM_LIB_PATH    Path to an existing libpdfium shared library

SETUP:
  1. Set API key:    export GEMINI_API_KEY=...
  2. Analyze:        mediscan document.pdf

NOTE:
  Output is informational only and is not medical advice. Always consult a
  qualified healthcare professional.
"#;

/// Analyze medical documents with a vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "mediscan",
    version,
    about = "Analyze medical documents (lab reports, prescriptions, labels) with a vision LLM",
    long_about = "Analyze photographed or scanned medical documents using a vision language \
model. Images are sent as-is; for PDFs the first page is rasterised. The model's answer is \
constrained to a strict JSON schema and printed as a structured report.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image or PDF file to analyze.
    input: PathBuf,

    /// A specific question to answer about the document.
    #[arg(short = 'Q', long, default_value = "")]
    question: String,

    /// Gemini model ID.
    #[arg(long, env = "MEDISCAN_MODEL")]
    model: Option<String>,

    /// Gemini API key (prefer the GEMINI_API_KEY env var).
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output the raw structured result as JSON instead of a report.
    #[arg(long, env = "MEDISCAN_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "MEDISCAN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MEDISCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "MEDISCAN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = AnalysisConfig::builder();
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Ingest ───────────────────────────────────────────────────────────
    let spinner = if show_progress {
        Some(make_spinner("Reading document…"))
    } else {
        None
    };

    let image = ingest_file(&cli.input)
        .await
        .with_context(|| format!("Failed to ingest {}", cli.input.display()))?;

    // ── Analyze ──────────────────────────────────────────────────────────
    if let Some(ref bar) = spinner {
        bar.set_message("Analyzing with AI…");
    }

    let result = analyze(Some(&image), &cli.question, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let result = result.context("Analysis failed")?;

    // ── Output ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
    } else {
        print_report(&cli.input, &result)?;
    }

    Ok(())
}

fn make_spinner(msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Render the structured result as a human-readable terminal report.
fn print_report(input: &std::path::Path, result: &AnalysisResult) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let badge = match result.document_type {
        DocumentType::LabReport => cyan("◆ Lab Report"),
        DocumentType::Prescription => green("◆ Prescription"),
        DocumentType::MedicineLabel => yellow("◆ Medicine Label"),
        DocumentType::OtherMedicalDocument => dim("◆ Other Medical Document"),
    };
    writeln!(out, "{}  {}", badge, dim(&input.display().to_string()))?;
    writeln!(out)?;
    writeln!(out, "{}", bold("Summary"))?;
    writeln!(out, "  {}", result.document_summary)?;

    if let Some(labs) = result.lab_results() {
        writeln!(out)?;
        writeln!(out, "{}", bold("Lab Results"))?;
        for lab in labs {
            let normal = lab.interpretation.eq_ignore_ascii_case("normal");
            let marker = if normal { green("✓") } else { red("!") };
            writeln!(
                out,
                "  {} {:<28} {:>12}  {}  {}",
                marker,
                lab.test_name,
                lab.value,
                if normal {
                    dim(&lab.interpretation)
                } else {
                    red(&lab.interpretation)
                },
                dim(&format!("ref: {}", lab.reference_range)),
            )?;
        }
    }

    if let Some(meds) = result.medications() {
        writeln!(out)?;
        writeln!(out, "{}", bold("Medications"))?;
        for med in meds {
            writeln!(
                out,
                "  • {} {}  {}",
                bold(&med.name),
                med.dosage,
                dim(&med.purpose),
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", bold("Potential Diagnosis"))?;
    writeln!(
        out,
        "  {}  {}",
        result.potential_diagnosis.condition,
        confidence_badge(result.potential_diagnosis.confidence_percent()),
    )?;
    writeln!(out, "  {}", dim(&result.potential_diagnosis.reasoning))?;

    if !result.recommendations.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", bold("Recommendations"))?;
        for rec in &result.recommendations {
            writeln!(out, "  • {rec}")?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        dim("Informational only — not medical advice. Consult a healthcare professional."),
    )?;

    Ok(())
}

fn confidence_badge(percent: u8) -> String {
    let label = format!("{percent}% confidence");
    if percent >= 75 {
        green(&label)
    } else if percent >= 40 {
        yellow(&label)
    } else {
        red(&label)
    }
}
