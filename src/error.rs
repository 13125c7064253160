use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::translate::interface::ErrorResponse;

/// Failure talking to the text-generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Transport(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Everything a `/translate` call can fail with.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Translation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Translation failed: {0}")]
    ProviderFailure(#[from] ProviderError),

    #[error("Translation failed: provider returned an empty or invalid result")]
    InvalidOutput,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Translation failed: {0}")]
    Internal(String),
}

impl TranslationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranslationError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TranslationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TranslationError::ProviderFailure(_)
            | TranslationError::InvalidOutput
            | TranslationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TranslationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "translate request failed");
        }
        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
