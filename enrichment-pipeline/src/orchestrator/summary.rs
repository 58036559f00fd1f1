//! Run outcome and session report.

use tracing::{error, info, warn};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every remaining entity was processed.
    Completed,
    /// A shutdown signal stopped the run early.
    Interrupted,
    /// An unhandled failure stopped the run early.
    Failed(String),
}

impl RunOutcome {
    /// Whether the run ended without an unhandled failure.
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Failed(_))
    }
}

/// Session report returned by [`Orchestrator::run`](super::Orchestrator::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Entities processed across all sessions.
    pub processed_total: usize,
    /// Entities processed by this session.
    pub processed_this_session: usize,
    /// Documents found by this session.
    pub records_found_this_session: usize,
    /// Records newly inserted by this session.
    pub records_inserted_this_session: usize,
    /// Documents found across all sessions.
    pub total_records_found: u64,
}

impl RunSummary {
    /// Log the session report.
    pub fn log(&self) {
        info!(
            processed_this_session = self.processed_this_session,
            records_found_this_session = self.records_found_this_session,
            records_inserted_this_session = self.records_inserted_this_session,
            processed_total = self.processed_total,
            total_records_found = self.total_records_found,
            "Session report"
        );
        match &self.outcome {
            RunOutcome::Completed => info!("Enrichment completed"),
            RunOutcome::Interrupted => warn!("Enrichment interrupted, progress saved"),
            RunOutcome::Failed(reason) => error!(reason = %reason, "Enrichment failed, progress saved"),
        }
    }
}
