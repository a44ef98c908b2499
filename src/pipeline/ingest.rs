//! Document ingestion: one user-supplied file → one normalized image.
//!
//! The dispatch is intentionally strict: any `image/*` subtype passes
//! through byte-for-byte with its subtype retained, exactly
//! `application/pdf` goes through first-page rasterisation, and everything
//! else is rejected before any work happens. There is no sniffing of file
//! contents — the declared media type is the contract with the caller.

use crate::error::MediScanError;
use crate::pipeline::{encode, render};
use crate::types::{MediaKind, NormalizedImage, SourceFile};
use tracing::{debug, info};

/// Normalize a user-supplied file into a single-page image payload.
///
/// Single attempt, no retry: any failure is terminal for this call and the
/// caller must discard partial session state (see
/// [`crate::session::Session::finish_ingest`]).
///
/// # Errors
/// * [`MediScanError::UnsupportedFileKind`] — declared type is neither
///   `image/*` nor `application/pdf`.
/// * [`MediScanError::CorruptOrUnsupportedPdf`] — the PDF cannot be parsed,
///   has no pages, or fails to rasterise.
pub async fn ingest(file: &SourceFile) -> Result<NormalizedImage, MediScanError> {
    match file.kind() {
        MediaKind::Image => {
            debug!(media_type = %file.media_type, bytes = file.bytes.len(), "Ingesting image");
            Ok(encode::encode_passthrough(&file.bytes, &file.media_type))
        }
        MediaKind::Pdf => {
            info!(file = %file.file_name, "Ingesting PDF, rasterising page 1");
            let page = render::render_first_page(&file.bytes).await?;
            encode::encode_page(&page)
        }
        MediaKind::Unsupported => Err(MediScanError::UnsupportedFileKind {
            media_type: file.media_type.clone(),
        }),
    }
}

/// Convenience wrapper over [`ingest`] for callers holding loose bytes.
pub async fn ingest_bytes(
    bytes: Vec<u8>,
    media_type: impl Into<String>,
    file_name: impl Into<String>,
) -> Result<NormalizedImage, MediScanError> {
    let file = SourceFile::new(bytes, media_type, file_name);
    ingest(&file).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[tokio::test]
    async fn image_passes_through_with_subtype_retained() {
        let bytes = vec![1u8, 2, 3, 4, 5];
        let file = SourceFile::new(bytes.clone(), "image/webp", "scan.webp");

        let normalized = ingest(&file).await.expect("image ingest should succeed");
        assert_eq!(normalized.media_type, "image/webp");
        assert_eq!(STANDARD.decode(&normalized.data).unwrap(), bytes);
        assert!(normalized.preview.is_some());
    }

    #[tokio::test]
    async fn unsupported_type_is_rejected() {
        let file = SourceFile::new(b"hello".to_vec(), "text/plain", "notes.txt");
        let err = ingest(&file).await.unwrap_err();
        assert!(
            matches!(err, MediScanError::UnsupportedFileKind { ref media_type } if media_type == "text/plain")
        );
    }

    #[tokio::test]
    async fn pdf_mime_variants_are_not_loosely_matched() {
        // Only the exact PDF media type goes down the PDF branch.
        let file = SourceFile::new(b"%PDF-1.4".to_vec(), "application/x-pdf", "doc.pdf");
        let err = ingest(&file).await.unwrap_err();
        assert!(matches!(err, MediScanError::UnsupportedFileKind { .. }));
    }

    #[tokio::test]
    async fn ingest_is_idempotent_for_images() {
        let file = SourceFile::new(vec![9u8; 64], "image/png", "scan.png");
        let first = ingest(&file).await.unwrap();
        let second = ingest(&file).await.unwrap();
        assert_eq!(first.data, second.data);
        assert_eq!(first.media_type, second.media_type);
    }
}
