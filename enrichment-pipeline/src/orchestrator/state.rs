//! Pipeline lifecycle states.

use std::fmt;

/// Lifecycle state of the [`Orchestrator`](super::Orchestrator).
///
/// `Idle → Loading → Running ⇄ Flushing → Draining → Terminated`. A run that
/// finds nothing to do goes from `Loading` straight to `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed, not started.
    Idle,
    /// Loading the checkpoint and the entity set.
    Loading,
    /// Processing entities one at a time.
    Running,
    /// Persisting the buffer and saving the checkpoint mid-run.
    Flushing,
    /// Final flush and checkpoint save.
    Draining,
    /// Finished.
    Terminated,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Loading => "loading",
            PipelineState::Running => "running",
            PipelineState::Flushing => "flushing",
            PipelineState::Draining => "draining",
            PipelineState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
