pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{integrate_session, run_session, run_session_reported};
pub use types::{PipelineStage, ProgressReporter, SessionReport};
