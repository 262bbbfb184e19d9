//! Request/response surface of the native translation backend.
//!
//! The backend runs jobs out of process and reports progress on the
//! `translation-progress` stream (see [`crate::broadcast::progress`]).

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::provider::Credential;

/// A file reported by `list_files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: String,
    pub translatable: bool,
    pub auto_selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileListing {
    pub files: Vec<FileDescriptor>,
}

/// A file handed to `start_translation`.
///
/// Carries the detected language when the file list has been loaded, and
/// only the path otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TranslationFile {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
}

impl TranslationFile {
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language_hint: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTranslationRequest {
    pub job_id: String,
    pub provider: String,
    #[serde(serialize_with = "serialize_credential")]
    pub api_key: Credential,
    pub source_lang: String,
    pub target_lang: String,
    pub mod_directory: String,
    pub output_directory: String,
    pub files: Vec<TranslationFile>,
}

fn serialize_credential<S: serde::Serializer>(
    credential: &Credential,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(credential.expose())
}

/// The native backend that executes translation jobs.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Whether the backend execution environment is reachable.
    fn is_available(&self) -> bool {
        true
    }

    async fn list_files(&self, mod_directory: &Path) -> Result<FileListing, BackendError>;

    async fn start_translation(&self, request: StartTranslationRequest) -> Result<(), BackendError>;

    async fn cancel_translation(&self, job_id: &str) -> Result<(), BackendError>;
}
