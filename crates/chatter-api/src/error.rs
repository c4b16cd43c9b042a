use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use chatter_types::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Storage failure. Missing, corrupt and unwritable files all end up here.
    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// Wrap a storage error with the message the client should see.
    pub fn internal(context: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Internal { context, source }
    }
}

/// Intentionally strict: a body that fails to deserialize gets a 400 and
/// nothing is written, rather than storing a record with missing fields.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Internal { context, source } => {
                error!("{}: {:#}", context, source);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
