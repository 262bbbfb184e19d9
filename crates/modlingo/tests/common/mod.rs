//! Shared test utilities for modlingo integration tests.
//!
//! This module provides:
//! - `FakeBackend`, a scriptable `TranslationBackend` that records calls
//! - `TestHarness` wiring an orchestrator to the fake backend and a provider store
//! - Builders for submit requests and file listings

pub mod backend;
pub mod builders;
pub mod harness;

pub use backend::FakeBackend;
pub use builders::*;
pub use harness::TestHarness;
