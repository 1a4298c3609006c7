use std::panic::{self, AssertUnwindSafe};

use super::ExtractError;

/// Concatenates the text layer of every page, in page order.
///
/// Pages without extractable text (scans, images) contribute nothing. There is
/// no OCR fallback.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractError::Pdf("parser aborted on malformed input".to_string()))?
    .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    Ok(pages.concat())
}
