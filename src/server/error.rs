//! API error types with `{"erro": ...}` JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::extract::ExtractionError;

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    erro: String,
}

/// Request-fatal errors. Everything else is reported inside the report.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Não autorizado")]
    Unauthorized,

    #[error("Nenhum arquivo enviado.")]
    MissingFile,

    #[error("Falha ao ler o arquivo enviado: {message}")]
    InvalidUpload { status: StatusCode, message: String },

    #[error("Erro ao extrair texto do PDF: {0}")]
    Extraction(#[from] ExtractionError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::InvalidUpload { status, .. } => *status,
            ApiError::Extraction(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Upload failed");
        }
        let erro = self.to_string();
        (status, Json(ErrorBody { erro })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
        let err = ApiError::from(ExtractionError::ExtractionFailed("bad xref".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Erro ao extrair texto do PDF: Extraction failed: bad xref"
        );
    }
}
