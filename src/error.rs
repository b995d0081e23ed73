//! Error types for the LightRAG bridge

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::envelope::ResponseEnvelope;
use crate::forward::ForwardError;
use crate::multipart::SubmissionError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("File too large (max: {max} bytes)")]
    PayloadTooLarge { max: usize },

    #[error("LightRAG returned {status}: {message}")]
    Remote {
        status: u16,
        message: String,
        data: Value,
    },

    #[error("Forwarding error: {0}")]
    Forward(#[from] ForwardError),

    #[error("Invalid submission: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ResponseEnvelope::error(msg))
            }
            AppError::PayloadTooLarge { max } => {
                tracing::warn!(max, "Upload rejected: file too large");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    ResponseEnvelope::error(format!(
                        "File too large: exceeds the {} byte limit",
                        max
                    )),
                )
            }
            AppError::Submission(e) => {
                tracing::warn!("Rejected submission: {}", e);
                (StatusCode::BAD_REQUEST, ResponseEnvelope::error(e.to_string()))
            }
            AppError::Remote {
                status,
                message,
                data,
            } => {
                tracing::error!(status, "LightRAG error: {}", message);
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let envelope = ResponseEnvelope::error(message);
                let envelope = if data.is_null() {
                    envelope
                } else {
                    envelope.with_data(data)
                };
                (status, envelope)
            }
            AppError::Forward(e) => {
                tracing::error!(error_kind = e.kind(), "Forwarding error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ResponseEnvelope::error(format!("Internal server error: {}", e)),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ResponseEnvelope::error("Internal server error"),
                )
            }
        };

        (status, Json(envelope)).into_response()
    }
}

impl AppError {
    /// Mirror a non-2xx LightRAG reply, prefixing the remote message with `context`
    pub fn remote(context: &str, reply: crate::forward::RemoteReply) -> Self {
        let message = format!(
            "{}: {}",
            context,
            reply.message().unwrap_or("Unknown error")
        );
        AppError::Remote {
            status: reply.status,
            message,
            data: reply.body,
        }
    }
}
