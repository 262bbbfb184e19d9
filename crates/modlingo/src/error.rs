use std::path::PathBuf;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::job::JobStatus;

#[derive(Error, Debug)]
pub enum ModlingoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

/// Reasons a submission is not admitted.
///
/// These are reported inside [`crate::queue::SubmitOutcome`] rather than as `Err`,
/// because the caller still receives a job to display.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("No translation provider is selected")]
    MissingProvider,

    #[error("The selected provider has no API key")]
    MissingApiKey,

    #[error("This mod is already being translated")]
    DuplicateActive,

    #[error("This mod is already waiting in the queue")]
    DuplicateQueued,

    #[error("The mod install path is empty")]
    InvalidPath,
}

impl AdmissionError {
    pub fn code(&self) -> &'static str {
        match self {
            AdmissionError::MissingProvider => "missing-provider",
            AdmissionError::MissingApiKey => "missing-api-key",
            AdmissionError::DuplicateActive => "duplicate-active",
            AdmissionError::DuplicateQueued => "duplicate-queued",
            AdmissionError::InvalidPath => "invalid-path",
        }
    }
}

impl Serialize for AdmissionError {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Translation backend is not available")]
    BackendUnavailable,

    #[error("No active translation job")]
    NoActiveJob,

    #[error("Active job is {status}, expected pending")]
    NotPending { status: JobStatus },

    #[error("Select at least one file to translate")]
    NoFilesSelected,

    #[error("Translation start is already in progress")]
    StartInFlight,

    #[error("Job {job_id} has no provider credential")]
    MissingCredential { job_id: String },

    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{operation} failed: {message}")]
    Rpc {
        operation: &'static str,
        message: String,
    },

    #[error("Backend process is unavailable")]
    Unavailable,
}

impl BackendError {
    pub fn rpc(operation: &'static str, message: impl Into<String>) -> Self {
        BackendError::Rpc {
            operation,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to bridge log records: {0}")]
    LogBridge(String),

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

pub type Result<T> = std::result::Result<T, ModlingoError>;
