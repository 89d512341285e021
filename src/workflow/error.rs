// ABOUTME: Error types for record lookup, session loading, and submission.
// ABOUTME: Submission errors hand the session back so the user can keep editing.

use thiserror::Error;

use crate::activity::ValidationResult;
use crate::directory::DirectoryError;
use crate::record::ActivityKind;
use crate::types::{ContainerNumber, ContainerNumberError};

/// Errors from looking up records and opening sessions.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    InvalidNumber(#[from] ContainerNumberError),

    #[error("container {number} not found: {message}")]
    NotFound {
        number: ContainerNumber,
        message: String,
    },

    #[error("container {0} is already registered")]
    AlreadyRegistered(ContainerNumber),

    #[error("container directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("session cancelled before activity data was applied")]
    Cancelled,
}

/// Why a submission did not commit. The record is unchanged in every case.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The live record no longer passes validation.
    #[error("{0}")]
    Invalid(ValidationResult),

    #[error("a {activity} submission for {container} is already in progress")]
    InFlight {
        container: ContainerNumber,
        activity: ActivityKind,
    },

    #[error("submission cancelled")]
    Cancelled,

    /// The strategy's `submit` reported that nothing was committed. None of
    /// the built-in activities decline once validation has passed.
    #[error("{activity} submission for {container} was not applied")]
    NotApplied {
        container: ContainerNumber,
        activity: ActivityKind,
    },
}

impl SubmitError {
    /// Whether trying again later (without edits) can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::InFlight { .. } | SubmitError::Cancelled)
    }
}
