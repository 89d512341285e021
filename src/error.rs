// ABOUTME: Application-wide error types for yardcheck.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::directory::DirectoryError;
use crate::types::ContainerNumberError;
use crate::workflow::{SubmitError, WorkflowError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    InvalidNumber(#[from] ContainerNumberError),

    #[error("{0} of {1} container numbers are invalid")]
    InvalidNumbers(usize, usize),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("submission rejected: {0}")]
    Validation(String),

    #[error("{0} (re-run with --yes to continue anyway)")]
    ConfirmationRequired(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
