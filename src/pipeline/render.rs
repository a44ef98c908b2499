//! PDF rasterisation: render the first page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! thread pool thread for blocking operations, so the async caller can keep
//! showing an in-progress indicator while a large page renders.
//!
//! ## Why a fixed 2.0× scale?
//!
//! Pages render at twice their native point size. The oversampling makes
//! small print legible to the vision model; it is fixed rather than
//! configurable because the analysis contract was validated at this scale.

use crate::error::MediScanError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// Fixed oversampling factor applied to the page's native size.
pub const RENDER_SCALE: f32 = 2.0;

/// Rasterise page 1 of a PDF held in memory.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
/// Fails with [`MediScanError::CorruptOrUnsupportedPdf`] when the byte
/// stream cannot be parsed or the document has no pages.
pub async fn render_first_page(pdf_bytes: &[u8]) -> Result<DynamicImage, MediScanError> {
    let bytes = pdf_bytes.to_vec();

    tokio::task::spawn_blocking(move || render_first_page_blocking(&bytes))
        .await
        .map_err(|e| MediScanError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of first-page rendering.
fn render_first_page_blocking(pdf_bytes: &[u8]) -> Result<DynamicImage, MediScanError> {
    let pdfium = load_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| MediScanError::CorruptOrUnsupportedPdf {
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let total_pages = pages.len();
    if total_pages == 0 {
        return Err(MediScanError::CorruptOrUnsupportedPdf {
            detail: "document has no pages".to_string(),
        });
    }
    info!("PDF loaded: {} pages, rendering page 1", total_pages);

    let page = pages
        .get(0)
        .map_err(|e| MediScanError::CorruptOrUnsupportedPdf {
            detail: format!("failed to open page 1: {:?}", e),
        })?;

    // Target dimensions at 2.0× the page's native point size; pdfium
    // preserves the aspect ratio within the width/height bounds.
    let target_width = (page.width().value * RENDER_SCALE) as i32;
    let target_height = (page.height().value * RENDER_SCALE) as i32;

    let render_config = PdfRenderConfig::new()
        .set_target_width(target_width.max(1))
        .set_maximum_height(target_height.max(1));

    let bitmap =
        page.render_with_config(&render_config)
            .map_err(|e| MediScanError::CorruptOrUnsupportedPdf {
                detail: format!("rasterisation failed: {:?}", e),
            })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page 1 → {}x{} px",
        image.width(),
        image.height()
    );

    Ok(image)
}

/// Load the pdfium dynamic library.
///
/// Discovery order:
/// 1. `PDFIUM_LIB_PATH` env var (explicit path to the library file)
/// 2. Alongside the running executable
/// 3. System library search paths
fn load_pdfium() -> Result<Pdfium, MediScanError> {
    if let Ok(path) = std::env::var("PDFIUM_LIB_PATH") {
        debug!(path = %path, "Loading pdfium from env var");
        let bindings = Pdfium::bind_to_library(&path).map_err(|e| {
            MediScanError::Internal(format!("Failed to load pdfium from {path}: {e}"))
        })?;
        return Ok(Pdfium::new(bindings));
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            let lib_path =
                Pdfium::pdfium_platform_library_name_at_path(exe_dir.to_string_lossy().as_ref());
            if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
                debug!(dir = %exe_dir.display(), "Loaded pdfium from executable directory");
                return Ok(Pdfium::new(bindings));
            }
        }
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        MediScanError::Internal(format!(
            "pdfium library not found. Set PDFIUM_LIB_PATH or install pdfium: {e}"
        ))
    })?;
    Ok(Pdfium::new(bindings))
}
