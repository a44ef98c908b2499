//! # mediscan
//!
//! Analyze medical documents (lab reports, prescriptions, medicine labels)
//! with a vision language model, returning structured findings.
//!
//! ## Why this crate?
//!
//! Medical paperwork arrives as photos and PDFs with wildly inconsistent
//! layouts — multi-column lab panels, handwritten prescriptions, dense
//! medicine labels. Template-based extractors break on each new format.
//! Instead this crate normalizes every document into a single image, lets a
//! VLM read it as a human would, and constrains the response to a strict
//! JSON schema so the output is always machine-usable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! File (image or PDF)
//!  │
//!  ├─ 1. Ingest   classify declared media type; reject everything else
//!  ├─ 2. Render   rasterise PDF page 1 via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Encode   JPEG → base64 NormalizedImage (images pass through)
//!  ├─ 4. Analyze  schema-constrained Gemini call at temperature 0.2
//!  └─ 5. Result   typed AnalysisResult (summary, labs, meds, diagnosis)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mediscan::{analyze_file, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from GEMINI_API_KEY
//!     let config = AnalysisConfig::default();
//!     let result = analyze_file("lab_report.pdf", "", &config).await?;
//!     println!("{}: {}", result.document_type, result.document_summary);
//!     println!("{} ({}% confidence)",
//!         result.potential_diagnosis.condition,
//!         result.potential_diagnosis.confidence_percent());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mediscan` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! mediscan = { version = "0.1", default-features = false }
//! ```
//!
//! ## Not a medical device
//!
//! Output is informational only. Every result should be reviewed by a
//! qualified healthcare professional before acting on it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod schema;
pub mod session;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_file, analyze_request, ingest_file, ANALYSIS_TEMPERATURE};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::MediScanError;
pub use pipeline::{ingest, ingest_bytes};
pub use provider::{AnalysisProvider, GeminiProvider, ProviderError, ProviderRequest};
pub use session::{Generation, Session, SessionStatus};
pub use types::{
    AnalysisRequest, AnalysisResult, DocumentType, LabResult, MediaKind, Medication,
    NormalizedImage, PotentialDiagnosis, SourceFile,
};
