//! Error types for the mediscan library.
//!
//! One enum covers both halves of the system:
//!
//! * **Ingestion errors** — the uploaded file could not be turned into a
//!   normalized image (wrong media type, corrupt PDF). The caller must fully
//!   reset its session state: nothing partial survives a failed ingest.
//!
//! * **Analysis errors** — the external analysis service rejected or failed
//!   the request. The normalized image is still valid; the caller keeps it
//!   so the user can retry without re-uploading.
//!
//! None of these are retried automatically. Every variant carries a message
//! fit for direct display; retry is always a human decision.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the mediscan library.
#[derive(Debug, Error)]
pub enum MediScanError {
    // ── Ingestion errors ──────────────────────────────────────────────────
    /// The file's declared media type is neither `image/*` nor
    /// `application/pdf`.
    #[error("Unsupported file type '{media_type}'. Please select a valid image or PDF file.")]
    UnsupportedFileKind { media_type: String },

    /// The PDF byte stream could not be parsed, or the document has no pages.
    #[error("Failed to process PDF: {detail}\nIt might be corrupted or unsupported.")]
    CorruptOrUnsupportedPdf { detail: String },

    /// Input file was not found at the given path.
    #[error("File not found: {}\nCheck the path exists and is readable.", .path.display())]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading {}\nTry: chmod +r {}", .path.display(), .path.display())]
    PermissionDenied { path: PathBuf },

    // ── Analysis errors ───────────────────────────────────────────────────
    /// `analyze` was called without a normalized image. No network call is
    /// made on this path.
    #[error("Please select an image or PDF file first.")]
    MissingInput,

    /// The access credential is missing or was rejected by the provider.
    #[error("API key is invalid or missing: {detail}\nEnsure GEMINI_API_KEY is configured correctly.")]
    InvalidCredentials { detail: String },

    /// The underlying error indicates a connectivity problem.
    #[error("Network error: {detail}\nCheck your internet connection and try again.")]
    NetworkFailure { detail: String },

    /// The provider responded, but the text was not valid JSON matching the
    /// analysis schema. Never silently patched.
    #[error("The analysis service returned a malformed response: {detail}")]
    MalformedResponse { detail: String },

    /// Catch-all for provider-side rejection (content filtering, unreadable
    /// image, or any other failure).
    #[error("AI analysis failed: {detail}\nThe document might be blurry, unreadable, or not a valid medical document. Please try again with a clearer image.")]
    AnalysisFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediScanError {
    /// Whether the current session image survives this error.
    ///
    /// Ingestion errors invalidate the session; analysis errors leave the
    /// normalized image in place for a human-triggered retry.
    pub fn preserves_image(&self) -> bool {
        matches!(
            self,
            MediScanError::MissingInput
                | MediScanError::InvalidCredentials { .. }
                | MediScanError::NetworkFailure { .. }
                | MediScanError::MalformedResponse { .. }
                | MediScanError::AnalysisFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_kind_display() {
        let e = MediScanError::UnsupportedFileKind {
            media_type: "text/plain".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("text/plain"), "got: {msg}");
        assert!(msg.contains("image or PDF"));
    }

    #[test]
    fn corrupt_pdf_display() {
        let e = MediScanError::CorruptOrUnsupportedPdf {
            detail: "bad xref table".into(),
        };
        assert!(e.to_string().contains("bad xref table"));
        assert!(e.to_string().contains("corrupted or unsupported"));
    }

    #[test]
    fn analysis_failed_guides_retry() {
        let e = MediScanError::AnalysisFailed {
            detail: "content blocked".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("clearer image"), "got: {msg}");
    }

    #[test]
    fn ingest_errors_do_not_preserve_image() {
        assert!(!MediScanError::UnsupportedFileKind {
            media_type: "text/plain".into()
        }
        .preserves_image());
        assert!(!MediScanError::CorruptOrUnsupportedPdf {
            detail: "truncated".into()
        }
        .preserves_image());
    }

    #[test]
    fn analysis_errors_preserve_image() {
        assert!(MediScanError::NetworkFailure {
            detail: "connection refused".into()
        }
        .preserves_image());
        assert!(MediScanError::AnalysisFailed {
            detail: "rejected".into()
        }
        .preserves_image());
    }
}
