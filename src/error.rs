use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::recognition::RecognitionError;

pub type ProctorResult<T> = Result<T, ProctorError>;

/// Failures surfaced to callers. None of these leave partial state behind.
#[derive(Debug, thiserror::Error)]
pub enum ProctorError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    ExternalService(#[from] RecognitionError),
}

impl ProctorError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProctorError::Validation(_) => StatusCode::BAD_REQUEST,
            ProctorError::NotFound(_) => StatusCode::NOT_FOUND,
            ProctorError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProctorError::Validation(_) => "VALIDATION_ERROR",
            ProctorError::NotFound(_) => "NOT_FOUND",
            ProctorError::ExternalService(_) => "ERROR",
        }
    }

    /// Single-line body for the text protocol routes.
    /// External failures collapse to the generic token.
    pub fn into_text_response(self) -> Response {
        let body = match &self {
            ProctorError::ExternalService(_) => self.code().to_string(),
            other => other.to_string(),
        };
        (self.status(), body).into_response()
    }
}

impl IntoResponse for ProctorError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.code(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
