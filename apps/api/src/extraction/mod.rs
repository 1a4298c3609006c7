//! Source Extractor: turns an uploaded PDF or DOCX into bounded plain text.
//!
//! Parsing is CPU-bound, so async callers go through `extract_blocking`,
//! which hops onto tokio's blocking pool.

pub mod docx;
pub mod pdf;

use thiserror::Error;
use tracing::debug;

use crate::models::sow::{ExtractedText, SourceDocument, SourceFormat};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported document type '{0}': upload a .pdf or .docx file")]
    UnsupportedFormat(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Extracts text from `source` and truncates it to the first 8000 characters.
pub fn extract(source: &SourceDocument) -> Result<ExtractedText, ExtractError> {
    let raw = match source.format {
        SourceFormat::Pdf => pdf::extract_pdf_text(&source.bytes)?,
        SourceFormat::Docx => docx::extract_docx_text(&source.bytes)?,
    };

    let text = ExtractedText::truncated(raw);
    debug!(
        "Extracted {} chars from '{}' ({:?})",
        text.char_count(),
        source.file_name,
        source.format
    );
    Ok(text)
}

/// Runs `extract` on the blocking thread pool.
pub async fn extract_blocking(source: SourceDocument) -> Result<ExtractedText, ExtractError> {
    tokio::task::spawn_blocking(move || extract(&source))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::extraction::docx::tests::docx_fixture;
    use crate::extraction::pdf::tests::pdf_fixture;
    use crate::models::sow::MAX_EXTRACTED_CHARS;

    fn docx_source(paragraphs: &[&str]) -> SourceDocument {
        SourceDocument {
            file_name: "base.docx".to_string(),
            format: SourceFormat::Docx,
            bytes: Bytes::from(docx_fixture(paragraphs)),
        }
    }

    #[test]
    fn test_extract_docx_joins_paragraphs_with_newline() {
        let text = extract(&docx_source(&["A", "B"])).unwrap();
        assert_eq!(text.as_str(), "A\nB");
    }

    #[test]
    fn test_extract_docx_is_bounded() {
        let long = "x".repeat(6000);
        let text = extract(&docx_source(&[&long, &long])).unwrap();
        assert_eq!(text.char_count(), MAX_EXTRACTED_CHARS);
        assert!(text.as_str().starts_with(&long));
    }

    fn pdf_source(pages: &[&str]) -> SourceDocument {
        SourceDocument {
            file_name: "base.pdf".to_string(),
            format: SourceFormat::Pdf,
            bytes: Bytes::from(pdf_fixture(pages)),
        }
    }

    #[test]
    fn test_extract_pdf_keeps_page_order() {
        let text = extract(&pdf_source(&["Scope", "", "Payment"])).unwrap();
        let scope = text.as_str().find("Scope").unwrap();
        let payment = text.as_str().find("Payment").unwrap();
        assert!(scope < payment);
    }

    #[test]
    fn test_extract_pdf_is_bounded() {
        let long = "x".repeat(9000);
        let text = extract(&pdf_source(&["Intro", &long])).unwrap();
        assert_eq!(text.char_count(), MAX_EXTRACTED_CHARS);
        assert!(text.as_str().trim_start().starts_with("Intro"));
        assert!(text.as_str().ends_with('x'));
    }

    #[test]
    fn test_extract_garbage_pdf_is_an_error() {
        let source = SourceDocument {
            file_name: "broken.pdf".to_string(),
            format: SourceFormat::Pdf,
            bytes: Bytes::from_static(b"this is not a pdf"),
        };
        assert!(matches!(extract(&source), Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_extract_garbage_docx_is_an_error() {
        let source = SourceDocument {
            file_name: "broken.docx".to_string(),
            format: SourceFormat::Docx,
            bytes: Bytes::from_static(b"PK but not really a zip"),
        };
        assert!(matches!(extract(&source), Err(ExtractError::Docx(_))));
    }

    #[tokio::test]
    async fn test_extract_blocking_matches_sync_path() {
        let source = docx_source(&["Scope", "", "Deliverables"]);
        let sync = extract(&source).unwrap();
        let threaded = extract_blocking(source).await.unwrap();
        assert_eq!(sync, threaded);
        assert_eq!(threaded.as_str(), "Scope\n\nDeliverables");
    }
}
