use std::path::PathBuf;

use crate::session::Session;

/// Stages of a run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Scanning,
    ResolvingObserver,
    Integrating,
    Derotating,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scanning => write!(f, "Scanning frames"),
            Self::ResolvingObserver => write!(f, "Resolving observer"),
            Self::Integrating => write!(f, "Integrating rotation"),
            Self::Derotating => write!(f, "De-rotating frames"),
        }
    }
}

/// Result of a de-rotation run.
#[derive(Clone, Debug)]
pub struct SessionReport {
    pub session: Session,
    /// Output files, in session order.
    pub outputs: Vec<PathBuf>,
}

/// Receives stage and per-frame progress from a run. Called from rayon
/// workers during de-rotation, hence `Send + Sync`; every hook defaults to
/// doing nothing.
pub trait ProgressReporter: Send + Sync {
    /// `total_items` is the frame count when the stage works per frame.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// `items_done` frames of the current stage are complete.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

/// Reporter behind [`super::run_session`].
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
