//! Feeds backend progress events into the orchestrator.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tokio::task::JoinHandle;

use crate::broadcast::ProgressEvent;
use crate::orchestrator::Orchestrator;
use crate::queue::ProgressOutcome;

/// Background task applying every received [`ProgressEvent`] to the queue.
///
/// The task stops when the sender side closes, on [`ProgressBridge::shutdown`],
/// or when the bridge is dropped.
pub struct ProgressBridge {
    handle: Option<JoinHandle<()>>,
}

impl ProgressBridge {
    /// Must be called from within a tokio runtime.
    pub fn spawn(orchestrator: Arc<Orchestrator>, mut events: Receiver<ProgressEvent>) -> Self {
        info!("Starting progress bridge");

        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => match orchestrator.apply_progress(&event) {
                        ProgressOutcome::Ignored => {
                            debug!("Ignoring progress for inactive job {}", event.job_id);
                        }
                        ProgressOutcome::Updated => {}
                        ProgressOutcome::Finished(outcome) => {
                            info!("Job {} finished as {}", outcome.finished, outcome.status);
                        }
                    },
                    Err(RecvError::Lagged(n)) => {
                        warn!("Progress bridge lagged, missed {} events", n);
                    }
                    Err(RecvError::Closed) => {
                        info!("Progress channel closed, stopping progress bridge");
                        break;
                    }
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressBridge {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
