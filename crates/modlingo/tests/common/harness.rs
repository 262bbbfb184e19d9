//! Test harness wiring an orchestrator to a fake backend.

#![allow(dead_code)]

use std::sync::Arc;

use modlingo::config::OrchestratorConfig;
use modlingo::job::Job;
use modlingo::orchestrator::Orchestrator;
use modlingo::provider::InMemoryProviderStore;
use modlingo::queue::SubmitOutcome;

use super::backend::FakeBackend;
use super::builders::SubmitRequestBuilder;

pub struct TestHarness {
    pub orchestrator: Arc<Orchestrator>,
    pub backend: Arc<FakeBackend>,
    pub providers: Arc<InMemoryProviderStore>,
}

impl TestHarness {
    /// Default config with provider `openai` selected and keyed.
    pub fn new() -> Self {
        Self::with_config(OrchestratorConfig::default())
    }

    pub fn with_config(config: OrchestratorConfig) -> Self {
        let backend = Arc::new(FakeBackend::new());
        let providers = Arc::new(InMemoryProviderStore::with_active("openai", "sk-test"));
        let orchestrator = Arc::new(Orchestrator::new(
            backend.clone(),
            providers.clone(),
            config,
        ));
        Self {
            orchestrator,
            backend,
            providers,
        }
    }

    /// Submits a default request for `mod_id`.
    pub fn submit(&self, mod_id: &str) -> SubmitOutcome {
        self.orchestrator
            .submit(SubmitRequestBuilder::new(mod_id).build())
    }

    /// Submits `mod_id` and starts it with a single file.
    pub async fn start(&self, mod_id: &str) -> Job {
        let outcome = self.submit(mod_id);
        assert!(outcome.promoted, "{} was not promoted", mod_id);
        self.orchestrator
            .start_execution(vec!["Keyed/Main.xml".to_string()], None, None)
            .await
            .expect("start_execution failed")
    }

    pub fn active_id(&self) -> Option<String> {
        self.orchestrator.active_job().map(|j| j.id)
    }

    pub fn job(&self, job_id: &str) -> Job {
        self.orchestrator
            .job(job_id)
            .unwrap_or_else(|| panic!("job {} not found", job_id))
    }
}
