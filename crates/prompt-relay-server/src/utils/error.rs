use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Prompt is missing in the request")]
    MissingPrompt,

    #[error("Conversation ID is missing in the request")]
    MissingConversationId,

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Invalid file type.")]
    InvalidFileType,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error bodies carry a single `error` field, matching the wire contract
/// of the relay endpoint.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingPrompt
            | ApiError::MissingConversationId
            | ApiError::InvalidFileType
            | ApiError::BadRequest(_) => {
                tracing::warn!("Bad request: {}", self);
                StatusCode::BAD_REQUEST
            }
            ApiError::UnsupportedModel(_) => {
                tracing::warn!("{}", self);
                StatusCode::NOT_IMPLEMENTED
            }
            ApiError::Provider(_) => {
                tracing::error!("Provider error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(_) => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
