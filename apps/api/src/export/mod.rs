//! Document Exporter: writes generated SoW text to a scoped temporary .docx.
//!
//! The temp file belongs to the returned `ExportedDocument`. Callers read it,
//! then `release()` it; dropping it also removes the file.

use std::io;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

pub const DOCUMENT_HEADING: &str = "Generated Statement of Work";
/// File name offered to the browser on download.
pub const DOWNLOAD_FILE_NAME: &str = "Statement_of_Work.docx";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const HEADING_STYLE_ID: &str = "Heading1";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write .docx: {0}")]
    Pack(String),

    #[error("Export task failed: {0}")]
    Task(String),
}

/// A written .docx backed by a temp file that lives until `release` or drop.
#[derive(Debug)]
pub struct ExportedDocument {
    file: NamedTempFile,
}

impl ExportedDocument {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>, ExportError> {
        Ok(std::fs::read(self.path())?)
    }

    /// Deletes the backing file, surfacing any error the silent drop would hide.
    pub fn release(self) -> Result<(), ExportError> {
        let path = self.path().to_path_buf();
        self.file.close()?;
        debug!("Released export {}", path.display());
        Ok(())
    }
}

/// Builds the document: one level-1 heading, then one paragraph per line of
/// `content`. Blank lines stay as empty paragraphs.
pub fn build_document(content: &str) -> Docx {
    let heading_style = Style::new(HEADING_STYLE_ID, StyleType::Paragraph)
        .name("Heading 1")
        .size(32)
        .bold();

    let mut docx = Docx::new().add_style(heading_style).add_paragraph(
        Paragraph::new()
            .style(HEADING_STYLE_ID)
            .add_run(Run::new().add_text(DOCUMENT_HEADING)),
    );

    for line in content.split('\n') {
        let paragraph = if line.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(line))
        };
        docx = docx.add_paragraph(paragraph);
    }
    docx
}

/// Writes `content` to a freshly allocated temporary .docx.
pub fn export(content: &str) -> Result<ExportedDocument, ExportError> {
    let mut file = tempfile::Builder::new()
        .prefix("sow-")
        .suffix(".docx")
        .tempfile()?;

    build_document(content)
        .build()
        .pack(file.as_file_mut())
        .map_err(|e| ExportError::Pack(e.to_string()))?;

    debug!("Exported SoW to {}", file.path().display());
    Ok(ExportedDocument { file })
}

/// Runs `export` on the blocking thread pool.
pub async fn export_blocking(content: String) -> Result<ExportedDocument, ExportError> {
    tokio::task::spawn_blocking(move || export(&content))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))?
}
