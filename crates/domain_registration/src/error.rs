//! Registration domain errors
//!
//! Three error families cover the domain: draft-level guards
//! ([`RegistrationError`]), wizard transition failures ([`WizardError`]), and
//! submission pipeline outcomes ([`SubmissionError`]). Notification failures
//! are deliberately absent from all three: they are logged by the dispatch
//! task and never surface in a result.

use thiserror::Error;

use core_kernel::PortError;

use crate::validation::ValidationReport;

/// Errors raised by draft-level guards
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A field guard rejected the change
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationReport),

    /// The dependent list is at its maximum size
    #[error("dependent limit of {max} reached")]
    DependentLimitReached { max: usize },

    /// No dependent exists at the given position
    #[error("no dependent at position {index}")]
    DependentNotFound { index: usize },
}

impl RegistrationError {
    /// Creates a validation error from a report
    pub fn validation(report: ValidationReport) -> Self {
        RegistrationError::ValidationFailed(report)
    }
}

/// Errors raised by wizard transitions and the submission guard
#[derive(Debug, Error)]
pub enum WizardError {
    /// The requested transition is not permitted from the current step
    #[error("invalid wizard transition from {from} during {action}")]
    InvalidTransition { from: String, action: String },

    /// The current step's validators rejected the draft; state is unchanged
    #[error("step validation failed: {0}")]
    StepValidationFailed(ValidationReport),

    /// A submission is already in flight for this wizard
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    /// Settlement was requested with no submission in flight
    #[error("no submission is in progress")]
    SubmissionNotInProgress,
}

impl WizardError {
    /// Creates an invalid-transition error for an action attempted from a step
    pub fn invalid_transition(from: impl std::fmt::Display, action: impl Into<String>) -> Self {
        WizardError::InvalidTransition {
            from: from.to_string(),
            action: action.into(),
        }
    }
}

/// Terminal outcomes of a submission attempt
///
/// The three variants mirror the three user-facing failure classes: re-edit
/// your fields (`Validation`), you are already registered (`DuplicateCpf`),
/// or try again shortly (`Storage`).
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The draft failed local re-validation; no port was called
    #[error("submission validation failed: {0}")]
    Validation(ValidationReport),

    /// A registration with this CPF already exists
    #[error("a registration with this CPF already exists")]
    DuplicateCpf,

    /// The storage boundary failed; nothing was persisted
    #[error("storage failure: {0}")]
    Storage(PortError),
}

impl SubmissionError {
    /// Whether retrying the same submission could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmissionError::Storage(e) if e.is_transient())
    }
}

impl From<PortError> for SubmissionError {
    /// Unique-violation conflicts surface as the duplicate outcome so the
    /// constraint-raced path and the fast-path check report identically;
    /// everything else is a storage failure.
    fn from(err: PortError) -> Self {
        if err.is_conflict() {
            SubmissionError::DuplicateCpf
        } else {
            SubmissionError::Storage(err)
        }
    }
}
