//! Workflow-level error type shared by all application handlers.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | AccessDenied | 403 |
//! | InvalidTransition | 409 |
//! | AlreadyInFlight | 409 |
//! | Conflict | 409 |
//! | Validation | 400 |
//! | PartialFailure | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, TransitionError, ValidationError};
use crate::domain::session::DenialReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Entity does not exist.
    NotFound { entity: &'static str, id: String },

    /// Caller lacks the role or ownership the action needs.
    Forbidden(String),

    /// Caller holds the role but their account is not active.
    AccessDenied(DenialReason),

    /// Status does not allow the requested move.
    InvalidTransition(TransitionError),

    /// Another submission for the same entity is still running.
    AlreadyInFlight(String),

    /// Uniqueness violated, e.g. a second account for one principal.
    Conflict(String),

    Validation { field: String, message: String },

    /// A multi-step workflow stopped part-way and could not be fully undone.
    PartialFailure {
        step: &'static str,
        cause: String,
        compensation: Option<String>,
    },

    Infrastructure(String),
}

impl WorkflowError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        WorkflowError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        WorkflowError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        WorkflowError::Conflict(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn partial_failure(
        step: &'static str,
        cause: impl Into<String>,
        compensation: Option<String>,
    ) -> Self {
        WorkflowError::PartialFailure {
            step,
            cause: cause.into(),
            compensation,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        WorkflowError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::NotFound { .. } => ErrorCode::NotFound,
            WorkflowError::Forbidden(_) | WorkflowError::AccessDenied(_) => ErrorCode::Forbidden,
            WorkflowError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
            WorkflowError::AlreadyInFlight(_) | WorkflowError::Conflict(_) => ErrorCode::Conflict,
            WorkflowError::Validation { .. } => ErrorCode::ValidationFailed,
            WorkflowError::PartialFailure { .. } => ErrorCode::InternalError,
            WorkflowError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            WorkflowError::NotFound { entity, id } => format!("{} {} not found", entity, id),
            WorkflowError::Forbidden(msg) => msg.clone(),
            WorkflowError::AccessDenied(reason) => reason.user_message().to_string(),
            WorkflowError::InvalidTransition(err) => err.to_string(),
            WorkflowError::AlreadyInFlight(_) => {
                "This request is already being processed".to_string()
            }
            WorkflowError::Conflict(msg) => msg.clone(),
            WorkflowError::Validation { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            WorkflowError::PartialFailure { step, .. } => format!(
                "The operation stopped at '{}' and needs operator attention",
                step
            ),
            WorkflowError::Infrastructure(_) => {
                "The operation could not be completed. Please try again.".to_string()
            }
        }
    }
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowError::Infrastructure(detail) => write!(f, "infrastructure: {}", detail),
            WorkflowError::PartialFailure {
                step,
                cause,
                compensation,
            } => {
                write!(f, "partial failure at {}: {}", step, cause)?;
                if let Some(comp) = compensation {
                    write!(f, " (compensation failed: {})", comp)?;
                }
                Ok(())
            }
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for WorkflowError {}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::NotFound | ErrorCode::AccountNotFound => WorkflowError::NotFound {
                entity: "record",
                id: err.message,
            },
            ErrorCode::Forbidden | ErrorCode::Unauthorized => WorkflowError::Forbidden(err.message),
            ErrorCode::Conflict => WorkflowError::Conflict(err.message),
            ErrorCode::ValidationFailed => WorkflowError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => WorkflowError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<TransitionError> for WorkflowError {
    fn from(err: TransitionError) -> Self {
        WorkflowError::InvalidTransition(err)
    }
}

impl From<WorkflowError> for DomainError {
    fn from(err: WorkflowError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::StateMachine;
    use crate::domain::booking::BookingStatus;

    #[test]
    fn database_errors_become_infrastructure() {
        let err: WorkflowError = DomainError::database("connection reset").into();
        assert!(matches!(err, WorkflowError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert!(!err.message().contains("connection reset"));
    }

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: WorkflowError = DomainError::from(ValidationError::empty_field("name")).into();
        assert!(matches!(err, WorkflowError::Validation { ref field, .. } if field == "name"));
    }

    #[test]
    fn transition_error_maps_to_invalid_state() {
        let err: WorkflowError = BookingStatus::Confirmed
            .transition_to(BookingStatus::Declined)
            .unwrap_err()
            .into();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
        assert_eq!(err.message(), "cannot move booking from confirmed to declined");
    }

    #[test]
    fn access_denied_uses_reason_message() {
        let err = WorkflowError::AccessDenied(DenialReason::Suspended);
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert!(err.message().contains("suspended"));
    }

    #[test]
    fn partial_failure_display_names_compensation() {
        let err = WorkflowError::partial_failure(
            "update_property",
            "timeout",
            Some("restore failed".to_string()),
        );
        let text = err.to_string();
        assert!(text.contains("update_property"));
        assert!(text.contains("restore failed"));
    }
}
