//! Translation progress events pushed by the backend.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::config::OrchestratorConfig;
use crate::job::JobStatus;

/// Event stream names.
pub mod event_names {
    pub const TRANSLATION_PROGRESS: &str = "translation-progress";
}

/// State reported by a progress event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressState {
    Running,
    Completed,
    Failed,
    Canceled,
}

impl ProgressState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressState::Running)
    }

    /// Job status this state maps to.
    pub fn job_status(&self) -> JobStatus {
        match self {
            ProgressState::Running => JobStatus::Running,
            ProgressState::Completed => JobStatus::Completed,
            ProgressState::Failed => JobStatus::Failed,
            ProgressState::Canceled => JobStatus::Canceled,
        }
    }
}

/// Progress event for a translation job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub job_id: String,
    pub state: ProgressState,
    /// Percentage as reported; clamped when applied.
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    #[serde(default)]
    pub translated_count: u64,
    #[serde(default)]
    pub total_count: u64,
}

impl ProgressEvent {
    pub fn new(job_id: &str, state: ProgressState, progress: f64) -> Self {
        Self {
            job_id: job_id.to_string(),
            state,
            progress,
            log: None,
            translated_count: 0,
            total_count: 0,
        }
    }

    pub fn running(job_id: &str, progress: f64, translated: u64, total: u64) -> Self {
        Self::new(job_id, ProgressState::Running, progress).with_counts(translated, total)
    }

    pub fn completed(job_id: &str, translated: u64, total: u64) -> Self {
        Self::new(job_id, ProgressState::Completed, 100.0).with_counts(translated, total)
    }

    pub fn failed(job_id: &str, error: &str) -> Self {
        Self::new(job_id, ProgressState::Failed, 0.0).with_log(error)
    }

    pub fn canceled(job_id: &str) -> Self {
        Self::new(job_id, ProgressState::Canceled, 0.0)
    }

    pub fn with_log(mut self, log: &str) -> Self {
        self.log = Some(log.to_string());
        self
    }

    pub fn with_counts(mut self, translated: u64, total: u64) -> Self {
        self.translated_count = translated;
        self.total_count = total;
        self
    }
}

/// Fans progress events out to subscribers.
#[derive(Clone)]
pub struct ProgressBroadcaster {
    sender: Arc<broadcast::Sender<ProgressEvent>>,
}

impl ProgressBroadcaster {
    /// Creates a new broadcaster with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sized by `progressChannelCapacity`.
    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new(config.progress_channel_capacity)
    }

    /// Sends an event to all subscribers.
    pub fn send(&self, event: ProgressEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    /// Creates a reporter bound to one job id.
    pub fn track(&self, job_id: &str) -> ProgressTracker {
        ProgressTracker {
            job_id: job_id.to_string(),
            sender: Arc::clone(&self.sender),
        }
    }
}

impl Default for ProgressBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Reports progress for a single job.
pub struct ProgressTracker {
    job_id: String,
    sender: Arc<broadcast::Sender<ProgressEvent>>,
}

impl ProgressTracker {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn running(&self, progress: f64, translated: u64, total: u64, log: Option<&str>) {
        let mut event = ProgressEvent::running(&self.job_id, progress, translated, total);
        event.log = log.map(|l| l.to_string());
        let _ = self.sender.send(event);
    }

    pub fn completed(&self, translated: u64, total: u64) {
        let _ = self
            .sender
            .send(ProgressEvent::completed(&self.job_id, translated, total));
    }

    pub fn failed(&self, error: &str) {
        let _ = self.sender.send(ProgressEvent::failed(&self.job_id, error));
    }

    pub fn canceled(&self) {
        let _ = self.sender.send(ProgressEvent::canceled(&self.job_id));
    }
}
