//! HTTP request handlers.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::ApiError;
use super::AppState;
use crate::report::Report;

/// Multipart field carrying the uploaded PDF.
pub const FILE_FIELD: &str = "arquivo";

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Accept a PDF, extract its text and return the analysis report.
pub async fn upload_arquivo(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Report>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Request is not multipart: {}", e);
        ApiError::MissingFile
    })?;

    let (filename, bytes) = read_file_field(&mut multipart)
        .await?
        .ok_or(ApiError::MissingFile)?;
    info!(filename = %filename, bytes = bytes.len(), "Received document");

    let text = state.extractor.extract(bytes).await?;
    let sections = state.matcher.match_text(&text);
    let report = state.orchestrator.analyze(sections).await;

    info!(
        filename = %filename,
        sections = report.sections().found().count(),
        analyses = report.analyses().len(),
        "Document analyzed"
    );
    Ok(Json(report))
}

/// Find the upload field, skipping any other form fields.
///
/// An empty file part counts as no file.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<(String, Vec<u8>)>, ApiError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidUpload {
                status: e.status(),
                message: e.body_text(),
            })?;

        let Some(field) = field else {
            return Ok(None);
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("documento.pdf").to_string();
        let bytes = field.bytes().await.map_err(|e| ApiError::InvalidUpload {
            status: e.status(),
            message: e.body_text(),
        })?;

        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some((filename, bytes.to_vec())));
    }
}
