//! API error handling
//!
//! [`ApiError`] is the single error type handlers return. The `From` impls
//! translate the domain taxonomy into the four user-facing outcomes: fix your
//! fields (422), you are already registered (409), try again shortly (503),
//! and plain not-found/internal. The 422 body carries one detail line per
//! failed field so the form can highlight them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::PortError;
use domain_registration::{RegistrationError, SubmissionError, ValidationReport};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },
}

impl ApiError {
    /// Creates a validation error from a field-level report
    pub fn validation_report(report: &ValidationReport) -> Self {
        ApiError::Validation {
            message: "one or more fields failed validation".to_string(),
            details: report.errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                Some(details),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(report) => ApiError::validation_report(&report),
            SubmissionError::DuplicateCpf => {
                ApiError::Conflict("a registration with this CPF already exists".to_string())
            }
            SubmissionError::Storage(e) if e.is_transient() => ApiError::Unavailable(
                "storage is temporarily unavailable, try again shortly".to_string(),
            ),
            SubmissionError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(err.to_string())
        } else if err.is_transient() {
            ApiError::Unavailable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<RegistrationError> for ApiError {
    /// Draft-level guard failures raised while assembling the request body
    /// into a draft, all of them field problems from the caller's view
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::ValidationFailed(report) => ApiError::validation_report(&report),
            other => ApiError::Validation {
                message: other.to_string(),
                details: Vec::new(),
            },
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        details.sort();

        ApiError::Validation {
            message: "request body failed validation".to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_registration::{Field, FieldError, ValidationFailure};

    #[test]
    fn test_duplicate_cpf_maps_to_conflict() {
        let api: ApiError = SubmissionError::DuplicateCpf.into();
        assert!(matches!(api, ApiError::Conflict(_)));
    }

    #[test]
    fn test_transient_storage_maps_to_unavailable() {
        let api: ApiError =
            SubmissionError::Storage(PortError::connection("connection refused")).into();
        assert!(matches!(api, ApiError::Unavailable(_)));
    }

    #[test]
    fn test_non_transient_storage_maps_to_internal() {
        let api: ApiError =
            SubmissionError::Storage(PortError::internal("constraint does not exist")).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }

    #[test]
    fn test_validation_report_carries_field_details() {
        let report = ValidationReport::fail(vec![
            FieldError::new(Field::Cpf, ValidationFailure::MalformedCpf),
            FieldError::new(Field::Email, ValidationFailure::Required),
        ]);
        let api: ApiError = SubmissionError::Validation(report).into();

        let ApiError::Validation { details, .. } = api else {
            panic!("expected a validation error");
        };
        assert_eq!(details.len(), 2);
        assert!(details[0].starts_with("cpf:"));
        assert!(details[1].starts_with("email:"));
    }

    #[test]
    fn test_port_not_found_maps_to_404() {
        let api: ApiError = PortError::not_found("Registration", "abc").into();
        assert!(matches!(api, ApiError::NotFound(_)));
    }
}
