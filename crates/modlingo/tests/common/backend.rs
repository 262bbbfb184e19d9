//! In-process stand-in for the translation backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use modlingo::backend::{FileDescriptor, FileListing, StartTranslationRequest, TranslationBackend};
use modlingo::error::BackendError;

/// A call received by the fake backend.
#[derive(Debug, Clone)]
pub enum BackendCall {
    ListFiles(PathBuf),
    Start(StartTranslationRequest),
    Cancel(String),
}

/// Scriptable backend: every call is recorded, each operation can be made
/// to fail, and RPCs can be held on a gate until the test releases them.
#[derive(Default)]
pub struct FakeBackend {
    unavailable: AtomicBool,
    fail_list: AtomicBool,
    fail_start: AtomicBool,
    fail_cancel: AtomicBool,
    listings: Mutex<HashMap<PathBuf, Vec<FileDescriptor>>>,
    calls: Mutex<Vec<BackendCall>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn fail_cancel(&self, fail: bool) {
        self.fail_cancel.store(fail, Ordering::SeqCst);
    }

    /// Sets the listing returned for a mod directory.
    pub fn set_listing(&self, mod_directory: impl Into<PathBuf>, files: Vec<FileDescriptor>) {
        self.listings
            .lock()
            .unwrap()
            .insert(mod_directory.into(), files);
    }

    /// Holds every following RPC until the returned handle is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().unwrap().take() {
            gate.notify_waiters();
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn start_requests(&self) -> Vec<StartTranslationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Start(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn cancel_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::Cancel(_)))
            .count()
    }

    pub fn list_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::ListFiles(_)))
            .count()
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TranslationBackend for FakeBackend {
    fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }

    async fn list_files(&self, mod_directory: &Path) -> Result<FileListing, BackendError> {
        self.record(BackendCall::ListFiles(mod_directory.to_path_buf()));
        self.pass_gate().await;

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(BackendError::rpc("list_files", "mod directory unreadable"));
        }
        let files = self
            .listings
            .lock()
            .unwrap()
            .get(mod_directory)
            .cloned()
            .unwrap_or_default();
        Ok(FileListing { files })
    }

    async fn start_translation(&self, request: StartTranslationRequest) -> Result<(), BackendError> {
        self.record(BackendCall::Start(request));
        self.pass_gate().await;

        if self.fail_start.load(Ordering::SeqCst) {
            return Err(BackendError::rpc("start_translation", "provider rejected key"));
        }
        Ok(())
    }

    async fn cancel_translation(&self, job_id: &str) -> Result<(), BackendError> {
        self.record(BackendCall::Cancel(job_id.to_string()));
        self.pass_gate().await;

        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(BackendError::rpc("cancel_translation", "worker not responding"));
        }
        Ok(())
    }
}
