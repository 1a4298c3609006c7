//! Axum route handlers for the SoW API.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::clauses::{fetch_reference_clauses, ClauseSources};
use crate::errors::AppError;
use crate::export::{export_blocking, ExportedDocument, DOCX_CONTENT_TYPE, DOWNLOAD_FILE_NAME};
use crate::generation::generator::{generate_sow, SowInput, UploadedFile};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReferenceClause {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ReferenceExamplesResponse {
    pub source_url: String,
    pub clauses: Vec<ReferenceClause>,
    pub notice: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    /// `docx` returns the exported document instead of JSON.
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/examples/reference
///
/// Scrapes the reference site so the caller can choose which examples to
/// include. Fetch failure is an error response, not an empty list.
pub async fn handle_reference_examples(
    State(state): State<AppState>,
) -> Result<Json<ReferenceExamplesResponse>, AppError> {
    let reference =
        fetch_reference_clauses(state.fetcher.as_ref(), &state.config.reference_url).await?;

    Ok(Json(ReferenceExamplesResponse {
        source_url: reference.source_url,
        clauses: reference
            .clauses
            .into_iter()
            .enumerate()
            .map(|(index, clause)| ReferenceClause {
                index,
                text: clause.text,
            })
            .collect(),
        notice: reference.notice,
    }))
}

/// POST /api/v1/sow/generate
///
/// Multipart form: `file`, `description`, `include_reference`,
/// `reference_selection`, `pasted_clauses`, `source_url`.
/// Returns JSON, or the .docx itself with `?format=docx`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let as_docx = match query.format.as_deref() {
        None | Some("json") => false,
        Some("docx") => true,
        Some(other) => {
            return Err(AppError::Validation(format!(
                "Unknown format '{other}': expected 'json' or 'docx'"
            )))
        }
    };

    let input = read_generate_form(multipart).await?;
    let generated = generate_sow(
        state.llm.as_ref(),
        state.fetcher.as_ref(),
        &state.config.reference_url,
        input,
    )
    .await?;

    if as_docx {
        let document = export_blocking(generated.sow).await?;
        return docx_download(document);
    }
    Ok(Json(generated).into_response())
}

/// POST /api/v1/sow/export
///
/// Turns (possibly user-edited) SoW text into a downloadable .docx.
pub async fn handle_export(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    let document = export_blocking(request.content).await?;
    docx_download(document)
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Reads the exported bytes, releases the temp file, and builds the attachment response.
fn docx_download(document: ExportedDocument) -> Result<Response, AppError> {
    let bytes = document.read_bytes()?;
    document.release()?;

    let disposition = format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn read_generate_form(mut multipart: Multipart) -> Result<SowInput, AppError> {
    let mut input = SowInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error("Malformed form data", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| form_error("Could not read upload", e))?;
                // Browsers send an empty, nameless part when no file was chosen.
                if !file_name.is_empty() || !bytes.is_empty() {
                    input.document = Some(UploadedFile { file_name, bytes });
                }
            }
            "description" => input.description = field_text(field).await?,
            "include_reference" => {
                input.sources.include_reference = parse_flag(&field_text(field).await?)?
            }
            "reference_selection" => {
                input.sources.reference_selection =
                    Some(parse_selection(&field_text(field).await?)?)
            }
            "pasted_clauses" => input.sources.pasted = Some(field_text(field).await?),
            "source_url" => input.sources.source_url = Some(field_text(field).await?),
            _ => {}
        }
    }

    Ok(input)
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| form_error("Could not read form field", e))
}

/// Keeps the body-limit rejection as a 413; anything else is a bad request.
fn form_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", err.body_text()))
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" => Ok(false),
        other => Err(AppError::Validation(format!(
            "include_reference must be true or false, got '{other}'"
        ))),
    }
}

/// Comma-separated zero-based indices. Blank means "none selected".
fn parse_selection(raw: &str) -> Result<Vec<usize>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>().map_err(|_| {
                AppError::Validation(format!(
                    "reference_selection must list example indices, got '{s}'"
                ))
            })
        })
        .collect()
}
