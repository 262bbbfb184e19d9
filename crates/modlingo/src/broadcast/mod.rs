//! Broadcasting of backend progress events.
//!
//! Backends (or the process that relays their output) publish on the
//! `translation-progress` stream; the bridge feeds it into the orchestrator.

pub mod progress;

pub use progress::{
    event_names, ProgressBroadcaster, ProgressEvent, ProgressState, ProgressTracker,
};
