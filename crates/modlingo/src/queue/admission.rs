//! Admission of new translation requests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::OrchestratorConfig;
use crate::error::AdmissionError;
use crate::job::{Job, JobStats, JobStatus, LogEntry, ModInfo};
use crate::provider::{Credential, ProviderResolution};
use crate::queue::{JobQueue, Placement};

/// A request to translate one mod.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Library mod id; a mod can only be active or queued once.
    pub mod_id: String,
    #[serde(default)]
    pub workshop_id: Option<String>,
    #[serde(default)]
    pub mod_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub install_path: String,
    /// Output directory; blank or absent means the install path.
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

impl SubmitRequest {
    pub fn new(mod_id: &str, install_path: &str) -> Self {
        Self {
            mod_id: mod_id.to_string(),
            mod_name: mod_id.to_string(),
            install_path: install_path.to_string(),
            ..Default::default()
        }
    }
}

/// Result of a submission.
///
/// `job` is always present: the admitted job, the existing duplicate, or a
/// placeholder for display when the request was rejected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub job: Job,
    pub promoted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AdmissionError>,
}

impl SubmitOutcome {
    fn rejected(job: Job, error: AdmissionError) -> Self {
        Self {
            job,
            promoted: false,
            error: Some(error),
        }
    }

    pub fn is_admitted(&self) -> bool {
        self.error.is_none()
    }
}

/// Language defaults applied to new jobs.
#[derive(Debug, Clone)]
pub struct JobDefaults {
    pub source_language: String,
    pub target_language: String,
}

impl From<&OrchestratorConfig> for JobDefaults {
    fn from(config: &OrchestratorConfig) -> Self {
        Self {
            source_language: config.fallback_source_language.clone(),
            target_language: config.default_target_language.clone(),
        }
    }
}

fn build_job(
    request: &SubmitRequest,
    provider: Option<String>,
    credential: Option<Credential>,
    defaults: &JobDefaults,
) -> Job {
    let install_path = request.install_path.trim();
    let output_path = request
        .output_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(install_path);
    let target_language = request
        .target_language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(&defaults.target_language);

    Job::new(
        ModInfo {
            mod_id: request.mod_id.clone(),
            workshop_id: request.workshop_id.clone(),
            name: request.mod_name.clone(),
            game: request.game_name.clone(),
        },
        PathBuf::from(install_path),
        PathBuf::from(output_path),
        provider,
        credential,
        defaults.source_language.clone(),
        target_language.to_string(),
    )
}

impl JobQueue {
    /// Validates a request and activates, queues or rejects it.
    ///
    /// Checks run in order and the first failure wins; rejections never touch
    /// the active slot or the queue. An empty install path is the one
    /// rejection that is recorded, as a `failed` history entry.
    pub fn submit(
        &mut self,
        request: SubmitRequest,
        provider: ProviderResolution,
        defaults: &JobDefaults,
    ) -> SubmitOutcome {
        let (provider, credential) = match provider {
            ProviderResolution::Missing => {
                log::warn!("Rejected mod {}: no provider selected", request.mod_id);
                let placeholder = build_job(&request, None, None, defaults);
                return SubmitOutcome::rejected(placeholder, AdmissionError::MissingProvider);
            }
            ProviderResolution::MissingKey { provider } => {
                log::warn!(
                    "Rejected mod {}: provider {} has no API key",
                    request.mod_id,
                    provider
                );
                let placeholder = build_job(&request, Some(provider), None, defaults);
                return SubmitOutcome::rejected(placeholder, AdmissionError::MissingApiKey);
            }
            ProviderResolution::Ready {
                provider,
                credential,
            } => (provider, credential),
        };

        if let Some(active) = self.active() {
            if active.mod_info.mod_id == request.mod_id {
                log::debug!("Mod {} is already active as {}", request.mod_id, active.id);
                return SubmitOutcome::rejected(active.clone(), AdmissionError::DuplicateActive);
            }
        }

        if let Some(queued) = self.queued().find(|j| j.mod_info.mod_id == request.mod_id) {
            log::debug!("Mod {} is already queued as {}", request.mod_id, queued.id);
            return SubmitOutcome::rejected(queued.clone(), AdmissionError::DuplicateQueued);
        }

        let mut job = build_job(&request, Some(provider), Some(credential), defaults);

        if request.install_path.trim().is_empty() {
            job.finish(
                JobStatus::Failed,
                Some(LogEntry::error("Mod install path is empty")),
                JobStats::default(),
            );
            log::warn!("Rejected mod {}: empty install path", request.mod_id);
            self.record(job.clone());
            return SubmitOutcome::rejected(job, AdmissionError::InvalidPath);
        }

        let job_id = job.id.clone();
        let placement = self.place(job);
        let placed = match placement {
            Placement::Activated => self.active(),
            Placement::Queued => self.queued().last(),
        };
        // `place` just stored the job in the slot named by `placement`.
        let Some(placed) = placed.filter(|j| j.id == job_id).cloned() else {
            unreachable!("job {} missing after placement", job_id);
        };

        match placement {
            Placement::Activated => log::info!(
                "Activated translation job {} for mod {}",
                job_id,
                request.mod_id
            ),
            Placement::Queued => log::info!(
                "Queued translation job {} for mod {} at position {}",
                job_id,
                request.mod_id,
                self.queue_len()
            ),
        }

        SubmitOutcome {
            job: placed,
            promoted: placement == Placement::Activated,
            error: None,
        }
    }
}
