use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::rules::ValidationReport;

/// Unified error type for the session, storage and configuration layers.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Record not found: {0}")]
    RecordNotFound(String),
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),
    #[error("A submission is already in progress")]
    SubmissionInFlight,
    #[error("The intake session has already been submitted")]
    SessionClosed,
}

/// Failures surfaced by the `intake_cli` binary.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] IntakeError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

pub type Result<T> = StdResult<T, IntakeError>;

impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        IntakeError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for IntakeError {
    fn from(err: serde_json::Error) -> Self {
        IntakeError::Storage(err.to_string())
    }
}

impl From<ValidationReport> for IntakeError {
    fn from(report: ValidationReport) -> Self {
        IntakeError::Validation(report)
    }
}
