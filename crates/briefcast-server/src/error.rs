use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use synthesis::SubmitError;
use thiserror::Error;

/// API errors rendered in the `{success: false, message}` envelope
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request was malformed or failed validation
    #[error("{0}")]
    BadRequest(String),

    /// Task or artifact does not exist
    #[error("{0}")]
    NotFound(String),

    /// Operation conflicts with the task's current state
    #[error("{0}")]
    Conflict(String),

    /// Unexpected server-side failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get the appropriate HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure envelope shared by every route
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::InvalidScript(e) => Self::BadRequest(e.to_string()),
            SubmitError::TaskExists(id) => Self::Conflict(format!("task '{id}' already exists")),
            SubmitError::Workspace(e) => {
                tracing::error!("Failed to prepare task workspace: {e}");
                Self::Internal("failed to prepare task workspace".to_string())
            }
        }
    }
}
