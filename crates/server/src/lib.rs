//! HTTP API for the plushpal toy backend
//!
//! Devices authenticate with a signed bearer token, post conversation turns,
//! and fetch weather and the story catalog. Every error funnels through one
//! response shape; internal detail is logged server-side and never echoed to
//! the device.

pub mod auth;
pub mod http;
pub mod metrics;
pub mod state;

pub use auth::{DeviceClaims, TokenIssuer};
pub use http::create_router;
pub use metrics::{init_metrics, record_error, record_turn};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Server errors
///
/// The variants that exist map one-to-one onto client-facing error codes;
/// everything unexpected becomes `Internal` with a generic message.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Transcription(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServerError::Auth(_) => "AUTH_INVALID",
            ServerError::InvalidRequest(_) => "INVALID_REQUEST",
            ServerError::Transcription(_) => "TRANSCRIPTION_FAILED",
            ServerError::NotFound(_) => "NOT_FOUND",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Safe message for the device; never includes internal detail
    fn client_message(&self) -> String {
        match self {
            ServerError::Auth(_) => "Invalid or expired token".to_string(),
            ServerError::InvalidRequest(msg) => msg.clone(),
            ServerError::Transcription(_) => {
                "I didn't quite catch that. Could you please say that again?".to_string()
            }
            ServerError::NotFound(_) => "Not found".to_string(),
            ServerError::Internal(_) => {
                "Oops! Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// The single error response shape
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub error_code: String,
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        // full detail stays server-side
        tracing::error!(code = self.error_code(), detail = %self, "request failed");
        metrics::record_error(self.error_code());

        let body = ErrorBody {
            error: true,
            error_code: self.error_code().to_string(),
            error_message: self.client_message(),
            fallback_audio_url: None,
            retry_after: None,
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ServerError::Auth("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_never_reaches_the_client() {
        let err = ServerError::Internal("redis://secret@host refused connection".to_string());
        assert!(!err.client_message().contains("redis"));
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn error_body_omits_empty_optionals() {
        let body = ErrorBody {
            error: true,
            error_code: "AUTH_INVALID".to_string(),
            error_message: "Invalid or expired token".to_string(),
            fallback_audio_url: None,
            retry_after: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("fallback_audio_url"));
        assert!(!json.contains("retry_after"));
    }
}
