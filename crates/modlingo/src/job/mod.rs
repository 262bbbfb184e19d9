//! Translation job records and their lifecycle status.

pub mod files;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::Credential;

pub use files::{guess_source_language, JobFile};

/// Status of a translation job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Canceled,
}

impl JobStatus {
    /// Returns true for `completed`, `failed` and `canceled`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Canceled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the mod a job translates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModInfo {
    /// Library mod id, used as the deduplication key.
    pub mod_id: String,
    /// Steam workshop id, if the mod came from the workshop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workshop_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Owning game.
    pub game: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One timestamped line of a job's log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }
}

/// Final counters reported with a terminal event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JobStats {
    pub progress: f64,
    pub translated_count: u64,
    pub total_count: u64,
}

/// Rounds a progress percentage and clamps it to `0..=100`.
///
/// Non-finite input (NaN, infinities) becomes 0.
pub fn clamp_progress(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// A translation request and its evolving status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Process-unique job identifier, minted at admission.
    pub id: String,
    pub mod_info: ModInfo,
    pub install_path: PathBuf,
    /// Output directory; defaults to the install path.
    pub output_path: PathBuf,
    /// Provider chosen at admission (absent on `missing-provider` placeholders).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip)]
    pub credential: Option<Credential>,
    /// Source-language guess, recomputed from the file selection.
    pub source_language: String,
    pub target_language: String,
    pub status: JobStatus,
    /// Integer percentage in `0..=100`.
    pub progress: u8,
    pub translated_count: u64,
    pub total_count: u64,
    pub logs: Vec<LogEntry>,
    /// Files reported by the backend, once loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<JobFile>>,
    /// Paths currently selected for translation, in file order.
    pub selected_files: Vec<String>,
    pub files_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_error: Option<String>,
    pub cancel_requested: bool,
    #[serde(skip)]
    pub(crate) start_in_flight: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub(crate) fn new(
        mod_info: ModInfo,
        install_path: PathBuf,
        output_path: PathBuf,
        provider: Option<String>,
        credential: Option<Credential>,
        source_language: String,
        target_language: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mod_info,
            install_path,
            output_path,
            provider,
            credential,
            source_language,
            target_language,
            status: JobStatus::Pending,
            progress: 0,
            translated_count: 0,
            total_count: 0,
            logs: Vec::new(),
            files: None,
            selected_files: Vec::new(),
            files_loading: false,
            file_error: None,
            cancel_requested: false,
            start_in_flight: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub(crate) fn push_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
    }

    /// Puts the job back into a fresh `pending` state before it takes the active slot.
    ///
    /// The user's file selection is kept; the loaded file list is not. An
    /// in-flight listing keeps `files_loading` set until it completes.
    pub(crate) fn reset_for_activation(&mut self) {
        self.status = JobStatus::Pending;
        self.progress = 0;
        self.translated_count = 0;
        self.total_count = 0;
        self.logs.clear();
        self.files = None;
        self.file_error = None;
        self.cancel_requested = false;
        self.start_in_flight = false;
    }

    /// Converts the job into its terminal record.
    pub(crate) fn finish(&mut self, status: JobStatus, log: Option<LogEntry>, stats: JobStats) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.progress = clamp_progress(stats.progress);
        self.translated_count = stats.translated_count;
        self.total_count = stats.total_count;
        self.cancel_requested = false;
        self.start_in_flight = false;
        self.files_loading = false;
        if let Some(entry) = log {
            self.logs.push(entry);
        }
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
pub(crate) fn test_job(mod_id: &str) -> Job {
    Job::new(
        ModInfo {
            mod_id: mod_id.to_string(),
            workshop_id: None,
            name: format!("Mod {}", mod_id),
            game: "rimworld".to_string(),
        },
        PathBuf::from(format!("/mods/{}", mod_id)),
        PathBuf::from(format!("/mods/{}", mod_id)),
        Some("openai".to_string()),
        Some(Credential::new("sk-test")),
        "en".to_string(),
        "zh-CN".to_string(),
    )
}
