//! SoW Generation: orchestrates the full generation pipeline.
//!
//! Flow: validate inputs → extract base document → collect clauses →
//!       compose prompt → LLM generate → return text (export is the caller's step).
//!
//! Steps run strictly in sequence. Nothing is persisted.

use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::clauses::{collect_clauses, ClauseSources, PageFetcher};
use crate::errors::AppError;
use crate::extraction::{extract_blocking, ExtractError};
use crate::generation::composer::compose;
use crate::llm_client::CompletionModel;
use crate::models::sow::{ExampleClause, GenerationResult, SourceDocument, SourceFormat};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A file as received from the upload form, before format detection.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Detects the format from the file name; unknown extensions are an extraction failure.
    pub fn into_source(self) -> Result<SourceDocument, ExtractError> {
        let format = SourceFormat::from_file_name(&self.file_name)
            .ok_or_else(|| ExtractError::UnsupportedFormat(self.file_name.clone()))?;
        Ok(SourceDocument {
            file_name: self.file_name,
            format,
            bytes: self.bytes,
        })
    }
}

/// Everything the user supplied for one generation.
#[derive(Debug, Clone, Default)]
pub struct SowInput {
    pub document: Option<UploadedFile>,
    pub description: String,
    pub sources: ClauseSources,
}

/// Result of the generation pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSow {
    pub generation_id: Uuid,
    pub sow: String,
    /// Clauses actually sent to the model, placeholders included.
    pub clauses: Vec<ExampleClause>,
    pub notices: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full SoW generation pipeline.
///
/// Steps:
/// 1. reject missing document / description before any I/O
/// 2. extract() → ExtractedText (blocking pool)
/// 3. collect_clauses() → ordered ExampleClause sequence
/// 4. compose() → GenerationRequest
/// 5. llm.complete() → GenerationResult (single attempt)
pub async fn generate_sow(
    llm: &dyn CompletionModel,
    fetcher: &dyn PageFetcher,
    reference_url: &str,
    input: SowInput,
) -> Result<GeneratedSow, AppError> {
    // Step 1: Validate
    let SowInput {
        document,
        description,
        sources,
    } = input;
    let document = match document {
        Some(doc) if !description.trim().is_empty() => doc,
        _ => {
            return Err(AppError::Validation(
                "Please upload a document and provide a description.".to_string(),
            ))
        }
    };

    let generation_id = Uuid::new_v4();

    // Step 2: Extract base document text
    let source = document.into_source()?;
    info!(
        "[{generation_id}] Extracting {:?} document '{}' ({} bytes)",
        source.format,
        source.file_name,
        source.bytes.len()
    );
    let extracted = extract_blocking(source).await?;

    // Step 3: Collect example clauses
    let collected = collect_clauses(fetcher, reference_url, &sources).await?;

    // Step 4: Compose
    let request = compose(&extracted, &description, &collected.clauses);
    info!(
        "[{generation_id}] Composed prompt: {} chars, {} clauses",
        request.prompt.chars().count(),
        collected.clauses.len()
    );

    // Step 5: Generate
    let GenerationResult { content } = llm.complete(&request).await?;
    info!(
        "[{generation_id}] Generated SoW: {} chars",
        content.chars().count()
    );

    Ok(GeneratedSow {
        generation_id,
        sow: content,
        clauses: collected.clauses,
        notices: collected.notices,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::clauses::collector::tests::{reference_page, StubFetcher, REFERENCE_URL, SOURCE_URL};
    use crate::extraction::docx::tests::docx_fixture;
    use crate::llm_client::LlmError;
    use crate::models::sow::{ClauseOrigin, GenerationRequest};

    /// Returns a fixed reply (or `MissingApiKey` when `reply` is None) and records requests.
    pub(crate) struct RecordingModel {
        reply: Option<String>,
        calls: AtomicUsize,
        last: Mutex<Option<GenerationRequest>>,
    }

    impl RecordingModel {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_prompt(&self) -> Option<String> {
            self.last.lock().unwrap().as_ref().map(|r| r.prompt.clone())
        }
    }

    #[async_trait]
    impl CompletionModel for RecordingModel {
        async fn complete(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResult, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Some(reply) => Ok(GenerationResult {
                    content: reply.clone(),
                }),
                None => Err(LlmError::MissingApiKey),
            }
        }
    }

    fn upload(paragraphs: &[&str]) -> UploadedFile {
        UploadedFile {
            file_name: "base.docx".to_string(),
            bytes: Bytes::from(docx_fixture(paragraphs)),
        }
    }

    #[tokio::test]
    async fn test_missing_document_short_circuits_before_any_call() {
        let llm = RecordingModel::replying("unused");
        let fetcher = StubFetcher::default().with_page(REFERENCE_URL, &reference_page(3));
        let input = SowInput {
            document: None,
            description: "Managed network services".to_string(),
            sources: ClauseSources {
                source_url: Some(SOURCE_URL.to_string()),
                ..Default::default()
            },
        };

        let result = generate_sow(&llm, &fetcher, REFERENCE_URL, input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(llm.calls(), 0);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_description_short_circuits() {
        let llm = RecordingModel::replying("unused");
        let fetcher = StubFetcher::default();
        let input = SowInput {
            document: Some(upload(&["Base"])),
            description: "   ".to_string(),
            sources: ClauseSources::default(),
        };

        let result = generate_sow(&llm, &fetcher, REFERENCE_URL, input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(llm.calls(), 0);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_extraction_error() {
        let llm = RecordingModel::replying("unused");
        let fetcher = StubFetcher::default();
        let input = SowInput {
            document: Some(UploadedFile {
                file_name: "notes.txt".to_string(),
                bytes: Bytes::from_static(b"plain"),
            }),
            description: "Consulting".to_string(),
            sources: ClauseSources::default(),
        };

        let result = generate_sow(&llm, &fetcher, REFERENCE_URL, input).await;
        assert!(matches!(
            result,
            Err(AppError::Extraction(ExtractError::UnsupportedFormat(_)))
        ));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_prompt_carries_all_inputs() {
        let llm = RecordingModel::replying("1. Description\nFibre install");
        let fetcher = StubFetcher::default()
            .with_page(REFERENCE_URL, &reference_page(2))
            .with_page(SOURCE_URL, "<p>Vendor SLA 99.9%</p>");
        let input = SowInput {
            document: Some(upload(&["Master agreement", "Clause 4: payment"])),
            description: "Fibre installation for three sites".to_string(),
            sources: ClauseSources {
                pasted: Some("Acceptance within 10 days".to_string()),
                source_url: Some(SOURCE_URL.to_string()),
                ..Default::default()
            },
        };

        let generated = generate_sow(&llm, &fetcher, REFERENCE_URL, input)
            .await
            .unwrap();

        assert_eq!(generated.sow, "1. Description\nFibre install");
        assert_eq!(llm.calls(), 1);
        assert_eq!(generated.clauses.len(), 4);
        assert_eq!(generated.clauses[3].origin, ClauseOrigin::UrlFetched);

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("Fibre installation for three sites"));
        assert!(prompt.contains("Master agreement\nClause 4: payment"));
        assert!(prompt.contains(
            "Ref 1\n---\nRef 2\n---\nAcceptance within 10 days\n---\nVendor SLA 99.9%"
        ));
    }

    #[tokio::test]
    async fn test_reference_failure_aborts_before_model_call() {
        let llm = RecordingModel::replying("unused");
        let fetcher = StubFetcher::default();
        let input = SowInput {
            document: Some(upload(&["Base"])),
            description: "Consulting".to_string(),
            sources: ClauseSources::default(),
        };

        let result = generate_sow(&llm, &fetcher, REFERENCE_URL, input).await;
        assert!(matches!(result, Err(AppError::Fetch(_))));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let llm = RecordingModel::failing();
        let fetcher = StubFetcher::default();
        let input = SowInput {
            document: Some(upload(&["Base"])),
            description: "Consulting".to_string(),
            sources: ClauseSources {
                include_reference: false,
                ..Default::default()
            },
        };

        let result = generate_sow(&llm, &fetcher, REFERENCE_URL, input).await;
        assert!(matches!(result, Err(AppError::Llm(LlmError::MissingApiKey))));
        assert_eq!(llm.calls(), 1);
        assert!(llm.last_prompt().unwrap().contains("None included"));
    }

    #[tokio::test]
    async fn test_zero_reference_examples_surface_as_notice() {
        let llm = RecordingModel::replying("SoW");
        let fetcher = StubFetcher::default().with_page(REFERENCE_URL, "<p>Captcha</p>");
        let input = SowInput {
            document: Some(upload(&["Base"])),
            description: "Consulting".to_string(),
            sources: ClauseSources::default(),
        };

        let generated = generate_sow(&llm, &fetcher, REFERENCE_URL, input)
            .await
            .unwrap();
        assert!(generated.clauses.is_empty());
        assert_eq!(generated.notices.len(), 1);
    }
}
