//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod job_tracker;

pub use deps::{create_extraction_service, ServerDeps};
pub use job_tracker::{JobKind, JobState, JobTracker, JobView, DEFAULT_RETENTION};
