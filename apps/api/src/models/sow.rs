//! Request-scoped values that flow through the SoW pipeline.
//!
//! Nothing here outlives a single generation request.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Upper bound on extracted base-document text, counted in characters.
pub const MAX_EXTRACTED_CHARS: usize = 8000;

/// Upload formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl SourceFormat {
    /// Detects the format from an upload's file name (case-insensitive extension).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "docx" => Some(SourceFormat::Docx),
            _ => None,
        }
    }
}

/// An uploaded base contract or scope document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub file_name: String,
    pub format: SourceFormat,
    pub bytes: Bytes,
}

/// Plain text pulled from a `SourceDocument`, never longer than `MAX_EXTRACTED_CHARS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Truncates `raw` to the first `MAX_EXTRACTED_CHARS` characters.
    pub fn truncated(raw: String) -> Self {
        match raw.char_indices().nth(MAX_EXTRACTED_CHARS) {
            Some((cut, _)) => {
                let mut raw = raw;
                raw.truncate(cut);
                ExtractedText(raw)
            }
            None => ExtractedText(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// Where an example clause came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClauseOrigin {
    ReferenceSite,
    Pasted,
    UrlFetched,
}

/// One example clause handed to the model as style/structure guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleClause {
    pub origin: ClauseOrigin,
    pub text: String,
}

impl ExampleClause {
    pub fn new(origin: ClauseOrigin, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }
}

/// The composed two-message payload for the chat-completion model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
}

/// Raw model output. Exported as-is; no structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub content: String,
}
