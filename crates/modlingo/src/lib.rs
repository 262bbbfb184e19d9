pub mod backend;
pub mod bridge;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod provider;
pub mod queue;
pub mod telemetry;

pub use backend::{FileDescriptor, FileListing, StartTranslationRequest, TranslationBackend};
pub use bridge::ProgressBridge;
pub use broadcast::{ProgressBroadcaster, ProgressEvent, ProgressState};
pub use config::{load_config, OrchestratorConfig};
pub use error::{
    AdmissionError, BackendError, ConfigError, ExecutionError, ModlingoError, Result,
};
pub use job::{Job, JobFile, JobStatus, LogEntry, LogLevel, ModInfo};
pub use orchestrator::Orchestrator;
pub use provider::{Credential, InMemoryProviderStore, ProviderResolution, ProviderStore};
pub use queue::{JobQueue, QueueSnapshot, SubmitOutcome, SubmitRequest};
