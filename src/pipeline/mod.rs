//! Pipeline stages for document ingestion.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. the rendering backend) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! ingest ──▶ render ──▶ encode
//! (dispatch)  (pdfium)   (JPEG + base64)
//! ```
//!
//! 1. [`ingest`] — classify the declared media type; images pass through,
//!    PDFs continue down the pipeline, everything else is rejected
//! 2. [`render`] — rasterise the first PDF page at a fixed 2.0× scale;
//!    runs in `spawn_blocking` because pdfium is not async-safe
//! 3. [`encode`] — JPEG-encode the raster and base64-wrap it into the
//!    canonical [`crate::types::NormalizedImage`]

pub mod encode;
pub mod ingest;
pub mod render;

pub use ingest::{ingest, ingest_bytes};
