//! Maps workflow failures onto HTTP responses.
//!
//! Every failure leaves the handler boundary as `{code, message}` JSON. The
//! message is the user-facing one; internals only reach the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::WorkflowError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Error returned by every API handler.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path or query input, rejected before any workflow runs.
    BadRequest(String),
    Workflow(WorkflowError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Workflow(err)
    }
}

pub fn status_for(err: &WorkflowError) -> StatusCode {
    match err {
        WorkflowError::NotFound { .. } => StatusCode::NOT_FOUND,
        WorkflowError::Forbidden(_) | WorkflowError::AccessDenied(_) => StatusCode::FORBIDDEN,
        WorkflowError::InvalidTransition(_)
        | WorkflowError::AlreadyInFlight(_)
        | WorkflowError::Conflict(_) => StatusCode::CONFLICT,
        WorkflowError::Validation { .. } => StatusCode::BAD_REQUEST,
        WorkflowError::PartialFailure { .. } | WorkflowError::Infrastructure(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("BAD_REQUEST", message)),
            )
                .into_response(),
            ApiError::Workflow(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    tracing::error!(error = %err, "Request failed");
                }
                let body = ErrorResponse::new(err.code().to_string(), err.message());
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TransitionError;
    use crate::domain::session::DenialReason;

    #[test]
    fn status_table() {
        let cases = [
            (WorkflowError::not_found("Property", "x"), StatusCode::NOT_FOUND),
            (WorkflowError::forbidden("no"), StatusCode::FORBIDDEN),
            (
                WorkflowError::AccessDenied(DenialReason::PendingApproval),
                StatusCode::FORBIDDEN,
            ),
            (WorkflowError::conflict("dup"), StatusCode::CONFLICT),
            (
                WorkflowError::AlreadyInFlight("booking:1".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                WorkflowError::validation("guests", "too many"),
                StatusCode::BAD_REQUEST,
            ),
            (
                WorkflowError::partial_failure("update_property", "down", None),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WorkflowError::infrastructure("pool closed"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(status_for(&err), expected, "{:?}", err);
        }
    }

    #[test]
    fn invalid_transition_is_conflict() {
        let err = WorkflowError::InvalidTransition(TransitionError {
            entity: "booking",
            from: "confirmed".to_string(),
            to: "declined".to_string(),
        });
        assert_eq!(status_for(&err), StatusCode::CONFLICT);
    }

    #[test]
    fn bad_request_response() {
        let response = ApiError::bad_request("Invalid property id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
