//! Image encoding: rasterised page → base64 JPEG wrapped in `NormalizedImage`.
//!
//! Rasterised PDF pages are always normalized to JPEG. At quality 95 the
//! compression artefacts on 2.0×-oversampled text are negligible for the
//! vision model, while the payload stays a fraction of the equivalent PNG —
//! which matters because the whole image travels base64-inlined in one
//! JSON request body.

use crate::error::MediScanError;
use crate::types::{NormalizedImage, JPEG_MIME};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// JPEG quality for rasterised pages (the 0.95 of the classic 0.0–1.0 scale).
pub const JPEG_QUALITY: u8 = 95;

/// Encode a rasterised page as a base64 JPEG ready for the analysis request.
///
/// The preview handle is the same payload as a `data:` URI, so the display
/// layer can show exactly what the model will see.
pub fn encode_page(img: &DynamicImage) -> Result<NormalizedImage, MediScanError> {
    let mut buf = Vec::new();
    let mut cursor = Cursor::new(&mut buf);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    // JPEG has no alpha channel; flatten before encoding.
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| MediScanError::Internal(format!("JPEG encoding failed: {}", e)))?;

    let data = STANDARD.encode(&buf);
    debug!("Encoded page → {} bytes base64", data.len());

    let mut normalized = NormalizedImage {
        data,
        media_type: JPEG_MIME.to_string(),
        preview: None,
    };
    normalized.preview = Some(normalized.to_data_uri());
    Ok(normalized)
}

/// Wrap raw image bytes without re-encoding, retaining the original subtype.
pub fn encode_passthrough(bytes: &[u8], media_type: &str) -> NormalizedImage {
    let data = STANDARD.encode(bytes);
    let mut normalized = NormalizedImage {
        data,
        media_type: media_type.to_string(),
        preview: None,
    };
    normalized.preview = Some(normalized.to_data_uri());
    normalized
}
