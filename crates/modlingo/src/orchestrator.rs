//! Async entry points over the job queue.
//!
//! All state lives in one [`JobQueue`] behind a mutex. Each operation locks it
//! for a synchronous step, never across a backend call, and publishes a fresh
//! [`QueueSnapshot`] before unlocking.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::Instrument;

use crate::backend::{StartTranslationRequest, TranslationBackend, TranslationFile};
use crate::broadcast::ProgressEvent;
use crate::config::OrchestratorConfig;
use crate::error::ExecutionError;
use crate::job::{Job, JobStatus, LogEntry};
use crate::provider::{resolve_provider, ProviderStore};
use crate::queue::{
    JobDefaults, JobQueue, ProgressOutcome, QueueSnapshot, SubmitOutcome, SubmitRequest,
};

pub struct Orchestrator {
    state: Mutex<JobQueue>,
    snapshots: watch::Sender<QueueSnapshot>,
    backend: Arc<dyn TranslationBackend>,
    providers: Arc<dyn ProviderStore>,
    config: OrchestratorConfig,
    defaults: JobDefaults,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        providers: Arc<dyn ProviderStore>,
        config: OrchestratorConfig,
    ) -> Self {
        let (snapshots, _) = watch::channel(QueueSnapshot::default());
        let defaults = JobDefaults::from(&config);
        Self {
            state: Mutex::new(JobQueue::new()),
            snapshots,
            backend,
            providers,
            config,
            defaults,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, JobQueue> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job queue lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// The single mutation point.
    fn mutate<R>(&self, f: impl FnOnce(&mut JobQueue) -> R) -> R {
        let mut state = self.lock();
        let result = f(&mut state);
        self.snapshots.send_replace(state.snapshot());
        result
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.lock().snapshot()
    }

    /// Receives a new snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn active_job(&self) -> Option<Job> {
        self.lock().active().cloned()
    }

    /// Finds a job in the active slot, the queue or history.
    pub fn job(&self, job_id: &str) -> Option<Job> {
        self.lock().find(job_id).cloned()
    }

    pub fn submit(&self, request: SubmitRequest) -> SubmitOutcome {
        let resolution = resolve_provider(self.providers.as_ref());
        self.mutate(|queue| queue.submit(request, resolution, &self.defaults))
    }

    pub fn cancel_queued(&self, job_id: &str) -> bool {
        self.mutate(|queue| queue.cancel_queued(job_id))
    }

    pub fn apply_progress(&self, event: &ProgressEvent) -> ProgressOutcome {
        self.mutate(|queue| queue.apply_progress(event))
    }

    /// Starts the active job on the backend.
    ///
    /// `source_language` and `target_language` override the job's own values
    /// when given. Nothing changes unless every precondition holds; the job
    /// becomes `running` only after the backend acknowledges.
    pub async fn start_execution(
        &self,
        selected_files: Vec<String>,
        source_language: Option<String>,
        target_language: Option<String>,
    ) -> Result<Job, ExecutionError> {
        if !self.backend.is_available() {
            return Err(ExecutionError::BackendUnavailable);
        }

        let request = self.mutate(|queue| {
            let job = queue.active_mut().ok_or(ExecutionError::NoActiveJob)?;
            if job.status != JobStatus::Pending {
                return Err(ExecutionError::NotPending { status: job.status });
            }
            if job.start_in_flight {
                return Err(ExecutionError::StartInFlight);
            }

            let files = resolve_files(job, &selected_files);
            if files.is_empty() {
                return Err(ExecutionError::NoFilesSelected);
            }

            let (Some(provider), Some(credential)) = (job.provider.clone(), job.credential.clone())
            else {
                return Err(ExecutionError::MissingCredential {
                    job_id: job.id.clone(),
                });
            };

            job.start_in_flight = true;
            Ok(StartTranslationRequest {
                job_id: job.id.clone(),
                provider,
                api_key: credential,
                source_lang: pick_language(source_language.as_deref(), &job.source_language),
                target_lang: pick_language(target_language.as_deref(), &job.target_language),
                mod_directory: job.install_path.to_string_lossy().to_string(),
                output_directory: job.output_path.to_string_lossy().to_string(),
                files,
            })
        })?;

        let job_id = request.job_id.clone();
        let source_lang = request.source_lang.clone();
        let target_lang = request.target_lang.clone();
        let paths: Vec<String> = request.files.iter().map(|f| f.path.clone()).collect();

        let span = tracing::info_span!("backend.start_translation", job_id = %job_id);
        let result = self.backend.start_translation(request).instrument(span).await;

        self.mutate(|queue| {
            if let Err(e) = result {
                if let Some(job) = queue.open_job_mut(&job_id) {
                    job.start_in_flight = false;
                }
                log::error!("Failed to start job {}: {}", job_id, e);
                return Err(ExecutionError::Backend(e));
            }

            if let Some(job) = queue.open_job_mut(&job_id) {
                job.start_in_flight = false;
                if job.status == JobStatus::Pending {
                    job.status = JobStatus::Running;
                    job.progress = 0;
                    job.translated_count = 0;
                    job.total_count = 0;
                }
                job.cancel_requested = false;
                job.source_language = source_lang;
                job.target_language = target_lang;
                snapshot_selection(job, paths);
                job.push_log(LogEntry::info(format!(
                    "Translation started: {} file(s), {} -> {}",
                    job.selected_files.len(),
                    job.source_language,
                    job.target_language
                )));
                log::info!("Job {} is running", job_id);
                return Ok(job.clone());
            }

            // A terminal event arrived before the acknowledgement.
            log::warn!("Job {} finished before start was acknowledged", job_id);
            queue
                .find(&job_id)
                .cloned()
                .ok_or_else(|| ExecutionError::JobNotFound {
                    job_id: job_id.clone(),
                })
        })
    }

    /// Asks the backend to cancel the active job.
    ///
    /// The `cancel_requested` flag is set before the call and rolled back if
    /// the call fails. Returns false only in that failure case. The job's
    /// status changes only when the backend sends its terminal event.
    pub async fn request_cancel(&self) -> bool {
        let job_id = self.mutate(|queue| {
            let job = queue.active_mut()?;
            if job.cancel_requested {
                return None;
            }
            job.cancel_requested = true;
            job.push_log(LogEntry::info("Cancellation requested"));
            Some(job.id.clone())
        });

        let Some(job_id) = job_id else {
            return true;
        };

        let span = tracing::info_span!("backend.cancel_translation", job_id = %job_id);
        match self
            .backend
            .cancel_translation(&job_id)
            .instrument(span)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Cancel request for job {} failed: {}", job_id, e);
                self.mutate(|queue| {
                    if let Some(job) = queue.active_mut().filter(|j| j.id == job_id) {
                        job.cancel_requested = false;
                        job.push_log(LogEntry::warn(format!("Cancel request failed: {}", e)));
                    }
                });
                false
            }
        }
    }

    /// Lists the translatable files of a pending job, active or queued.
    ///
    /// Returns `Ok(false)` without calling the backend when a listing for the
    /// job is already in flight or the job has started. A listing that
    /// arrives after the job started is discarded.
    pub async fn load_files(&self, job_id: &str) -> Result<bool, ExecutionError> {
        let mod_directory = self.mutate(|queue| -> Result<Option<PathBuf>, ExecutionError> {
            let job = queue
                .open_job_mut(job_id)
                .ok_or_else(|| ExecutionError::JobNotFound {
                    job_id: job_id.to_string(),
                })?;
            if job.files_loading || job.status != JobStatus::Pending {
                return Ok(None);
            }
            job.files_loading = true;
            Ok(Some(job.install_path.clone()))
        })?;

        let Some(mod_directory) = mod_directory else {
            log::debug!("Not listing files for job {}: in flight or started", job_id);
            return Ok(false);
        };

        let span = tracing::info_span!("backend.list_files", job_id = %job_id);
        let result = self
            .backend
            .list_files(&mod_directory)
            .instrument(span)
            .await;

        let priority = &self.config.language_priority;
        let fallback = &self.config.fallback_source_language;

        match result {
            Ok(listing) => {
                let count = listing.files.len();
                let applied = self.mutate(|queue| match queue.open_job_mut(job_id) {
                    Some(job) => {
                        job.files_loading = false;
                        // The selection was snapshotted when the job started.
                        if job.status != JobStatus::Pending {
                            return false;
                        }
                        job.file_error = None;
                        job.apply_file_list(listing.files, priority, fallback);
                        true
                    }
                    None => false,
                });
                if applied {
                    log::debug!("Loaded {} file(s) for job {}", count, job_id);
                } else {
                    log::debug!("Discarding file listing for started job {}", job_id);
                }
                Ok(applied)
            }
            Err(e) => {
                log::error!("Failed to list files for job {}: {}", job_id, e);
                self.mutate(|queue| {
                    if let Some(job) = queue.open_job_mut(job_id) {
                        job.files_loading = false;
                        job.file_error = Some(e.to_string());
                        job.push_log(LogEntry::error(format!("Failed to list files: {}", e)));
                    }
                });
                Err(ExecutionError::Backend(e))
            }
        }
    }

    /// Flips one file's selection on a pending job. Returns false when the
    /// path is unknown or the job has already started.
    pub fn toggle_file(&self, job_id: &str, path: &str) -> Result<bool, ExecutionError> {
        let priority = &self.config.language_priority;
        let fallback = &self.config.fallback_source_language;

        self.mutate(|queue| {
            let job = queue
                .open_job_mut(job_id)
                .ok_or_else(|| ExecutionError::JobNotFound {
                    job_id: job_id.to_string(),
                })?;
            if job.status != JobStatus::Pending {
                return Ok(false);
            }
            Ok(job.toggle_file(path, priority, fallback))
        })
    }
}

fn pick_language(requested: Option<&str>, current: &str) -> String {
    requested
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(current)
        .to_string()
}

/// Builds the file list for `start_translation`.
///
/// With a loaded file list, unknown paths are dropped and language hints are
/// attached; otherwise the raw paths are sent.
fn resolve_files(job: &Job, selected: &[String]) -> Vec<TranslationFile> {
    let mut seen = std::collections::HashSet::new();
    let selected = selected
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty() && seen.insert(*p));

    match &job.files {
        Some(files) => selected
            .filter_map(|path| files.iter().find(|f| f.path == path))
            .map(|f| TranslationFile {
                path: f.path.clone(),
                language_hint: f.language_hint.clone(),
            })
            .collect(),
        None => selected.map(TranslationFile::from_path).collect(),
    }
}

/// Records the started selection on the job, keeping file flags in sync.
fn snapshot_selection(job: &mut Job, paths: Vec<String>) {
    if let Some(files) = job.files.as_mut() {
        for file in files.iter_mut() {
            file.selected = paths.contains(&file.path);
        }
    }
    job.selected_files = paths;
}
