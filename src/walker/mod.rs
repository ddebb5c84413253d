//! Breadth-first traversal over deadline-bounded probes

pub mod engine;
pub mod types;

pub use engine::{DirLister, Walker, WatchdogLister};
pub use types::{FailureRecord, PendingDirectory, ResultBatch, Step, WalkReport};
