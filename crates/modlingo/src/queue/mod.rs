//! Active slot, waiting queue and completed history.
//!
//! [`JobQueue`] is the only owner of job records. Every transition goes through
//! one of its methods, and the orchestrator serializes those calls.

pub mod admission;
pub mod reducer;

use std::collections::VecDeque;

use serde::Serialize;

use crate::job::{Job, JobStats, JobStatus, LogEntry};

pub use admission::{JobDefaults, SubmitOutcome, SubmitRequest};
pub use reducer::ProgressOutcome;

/// Read-only copy of the queue state for presentation layers.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub active_job: Option<Job>,
    pub queue: Vec<Job>,
    pub history: Vec<Job>,
}

/// What `finalize` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOutcome {
    /// Id of the job moved into history.
    pub finished: String,
    pub status: JobStatus,
    /// Id of the job promoted into the active slot, if the queue was non-empty.
    pub promoted: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Activated,
    Queued,
}

#[derive(Debug, Default)]
pub struct JobQueue {
    active: Option<Job>,
    queue: VecDeque<Job>,
    history: Vec<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Job> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|j| j.id.as_str())
    }

    pub fn queued(&self) -> impl Iterator<Item = &Job> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn history(&self) -> &[Job] {
        &self.history
    }

    pub fn is_active(&self, job_id: &str) -> bool {
        self.active_id() == Some(job_id)
    }

    /// Looks a job up in the active slot, the queue, then history.
    pub fn find(&self, job_id: &str) -> Option<&Job> {
        self.active
            .iter()
            .chain(self.queue.iter())
            .chain(self.history.iter().rev())
            .find(|j| j.id == job_id)
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            active_job: self.active.clone(),
            queue: self.queue.iter().cloned().collect(),
            history: self.history.clone(),
        }
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut Job> {
        self.active.as_mut()
    }

    /// Mutable access to a job that has not finished (active or queued).
    pub(crate) fn open_job_mut(&mut self, job_id: &str) -> Option<&mut Job> {
        self.active
            .iter_mut()
            .chain(self.queue.iter_mut())
            .find(|j| j.id == job_id)
    }

    /// Installs `job` as active when the slot is free, otherwise appends it to the queue.
    pub(crate) fn place(&mut self, mut job: Job) -> Placement {
        if self.active.is_none() {
            job.reset_for_activation();
            self.active = Some(job);
            Placement::Activated
        } else {
            self.queue.push_back(job);
            Placement::Queued
        }
    }

    pub(crate) fn record(&mut self, job: Job) {
        debug_assert!(job.is_terminal());
        self.history.push(job);
    }

    /// Moves the active job into history with a terminal status and promotes
    /// the head of the queue. No-op without an active job.
    pub fn finalize(
        &mut self,
        status: JobStatus,
        log: Option<LogEntry>,
        stats: JobStats,
    ) -> Option<FinalizeOutcome> {
        let mut finished = self.active.take()?;
        finished.finish(status, log, stats);
        let finished_id = finished.id.clone();
        self.history.push(finished);

        let promoted = self.queue.pop_front().map(|mut next| {
            next.reset_for_activation();
            let id = next.id.clone();
            self.active = Some(next);
            id
        });

        match &promoted {
            Some(next) => log::info!(
                "Job {} finished as {}, promoted job {}",
                finished_id,
                status,
                next
            ),
            None => log::info!("Job {} finished as {}, queue is empty", finished_id, status),
        }

        Some(FinalizeOutcome {
            finished: finished_id,
            status,
            promoted,
        })
    }

    /// Removes a waiting job from the queue and records it as canceled.
    ///
    /// The active job is never touched here; returns false when `job_id` is not queued.
    pub fn cancel_queued(&mut self, job_id: &str) -> bool {
        let Some(index) = self.queue.iter().position(|j| j.id == job_id) else {
            return false;
        };
        let Some(mut job) = self.queue.remove(index) else {
            return false;
        };

        job.finish(
            JobStatus::Canceled,
            Some(LogEntry::warn("Removed from queue")),
            JobStats::default(),
        );
        log::info!("Canceled queued job {} ({})", job.id, job.mod_info.mod_id);
        self.history.push(job);
        true
    }
}
