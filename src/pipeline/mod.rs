// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod orchestrator;
pub mod processor;
mod progress;

pub use orchestrator::{PipelineOrchestrator, RunRequest};
pub use processor::{FileOutcome, FileProcessor};
pub use progress::{PipelineStats, ProgressTracker};
