//! Applies backend progress events to the active job.

use crate::broadcast::{ProgressEvent, ProgressState};
use crate::job::{clamp_progress, JobStats, JobStatus, LogEntry, LogLevel};
use crate::queue::{FinalizeOutcome, JobQueue};

/// Effect of one progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// The event did not target the active job.
    Ignored,
    /// The active job's progress was updated.
    Updated,
    /// A terminal event finished the active job.
    Finished(FinalizeOutcome),
}

fn default_message(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Completed => "Translation completed",
        JobStatus::Failed => "Translation failed",
        JobStatus::Canceled => "Translation canceled",
        JobStatus::Pending | JobStatus::Running => "Translation finished",
    }
}

fn terminal_level(status: JobStatus) -> LogLevel {
    match status {
        JobStatus::Failed => LogLevel::Error,
        JobStatus::Canceled => LogLevel::Warn,
        _ => LogLevel::Info,
    }
}

impl JobQueue {
    /// Applies one event from the `translation-progress` stream.
    ///
    /// Events whose job id is not the active job's id are dropped, which keeps
    /// late events for finished or replaced jobs from touching anything.
    pub fn apply_progress(&mut self, event: &ProgressEvent) -> ProgressOutcome {
        if !self.is_active(&event.job_id) {
            log::debug!(
                "Ignoring {:?} event for inactive job {}",
                event.state,
                event.job_id
            );
            return ProgressOutcome::Ignored;
        }

        let message = event
            .log
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());

        match event.state {
            ProgressState::Running => {
                let Some(job) = self.active_mut() else {
                    return ProgressOutcome::Ignored;
                };
                job.status = JobStatus::Running;
                job.progress = clamp_progress(event.progress);
                job.translated_count = event.translated_count;
                job.total_count = event.total_count;
                if let Some(line) = message {
                    job.push_log(LogEntry::info(line));
                }
                ProgressOutcome::Updated
            }
            state => {
                let status = state.job_status();
                let entry = LogEntry::new(
                    terminal_level(status),
                    message.unwrap_or_else(|| default_message(status)),
                );
                let stats = JobStats {
                    progress: event.progress,
                    translated_count: event.translated_count,
                    total_count: event.total_count,
                };
                match self.finalize(status, Some(entry), stats) {
                    Some(outcome) => ProgressOutcome::Finished(outcome),
                    None => ProgressOutcome::Ignored,
                }
            }
        }
    }
}
