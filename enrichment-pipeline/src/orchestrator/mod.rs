//! Orchestrator module for the enrichment pipeline.
//!
//! Coordinates the supplier, search client, transformer, and loader
//! components, and owns the checkpoint.

mod state;
mod summary;

pub use state::PipelineState;
pub use summary::{RunOutcome, RunSummary};

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::errors::PipelineError;
use crate::loader::RecordLoader;
use crate::processor::RecordTransformer;
use crate::search::SearchClient;
use crate::supplier::EntitySupplier;
use enrichment_shared::EnrichmentRecord;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Processed entities between two flushes.
    pub batch_size: usize,
    /// Install a Ctrl-C listener for the duration of `run`.
    pub listen_for_ctrl_c: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            listen_for_ctrl_c: true,
        }
    }
}

/// Cloneable handle that asks a running orchestrator to drain and stop.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
}

impl ShutdownHandle {
    /// Request a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }
}

/// Per-run bookkeeping. Never persisted.
#[derive(Debug, Default)]
struct Session {
    buffer: Vec<EnrichmentRecord>,
    processed: usize,
    since_flush: usize,
    found: usize,
    inserted: usize,
}

impl Session {
    fn record(&mut self, found: usize, records: Vec<EnrichmentRecord>) {
        self.processed += 1;
        self.since_flush += 1;
        self.found += found;
        self.buffer.extend(records);
    }

    fn summary(&self, outcome: RunOutcome, checkpoint: &Checkpoint) -> RunSummary {
        RunSummary {
            outcome,
            processed_total: checkpoint.processed.len(),
            processed_this_session: self.processed,
            records_found_this_session: self.found,
            records_inserted_this_session: self.inserted,
            total_records_found: checkpoint.total_records_found,
        }
    }
}

/// Orchestrator that coordinates the pipeline components.
///
/// The orchestrator:
/// - Works out which entities are left from the checkpoint
/// - Searches and transforms them strictly one at a time
/// - Flushes the record buffer and saves the checkpoint every batch
/// - Drains exactly once on completion, interrupt, or failure
pub struct Orchestrator {
    supplier: EntitySupplier,
    search: SearchClient,
    transformer: RecordTransformer,
    loader: RecordLoader,
    checkpoint_store: Arc<dyn CheckpointStore>,
    config: OrchestratorConfig,
    state: PipelineState,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_rx: Option<broadcast::Receiver<()>>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        supplier: EntitySupplier,
        search: SearchClient,
        transformer: RecordTransformer,
        loader: RecordLoader,
        checkpoint_store: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self::with_config(
            supplier,
            search,
            transformer,
            loader,
            checkpoint_store,
            OrchestratorConfig::default(),
        )
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        supplier: EntitySupplier,
        search: SearchClient,
        transformer: RecordTransformer,
        loader: RecordLoader,
        checkpoint_store: Arc<dyn CheckpointStore>,
        config: OrchestratorConfig,
    ) -> Self {
        // Subscribed up front so a shutdown requested before `run` is not lost.
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        Self {
            supplier,
            search,
            transformer,
            loader,
            checkpoint_store,
            config,
            state: PipelineState::Idle,
            shutdown_tx,
            shutdown_rx: Some(shutdown_rx),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Handle for requesting shutdown from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Run the orchestrator.
    ///
    /// Processes every entity not yet in the checkpoint, then drains. Returns
    /// `Err` only when the job cannot start: the checkpoint is unreadable or
    /// the entity source is unavailable. Interrupts and per-entity failures
    /// still drain and are reported through [`RunSummary::outcome`].
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<RunSummary, PipelineError> {
        info!("Starting enrichment orchestrator");

        let mut shutdown_rx = self
            .shutdown_rx
            .take()
            .unwrap_or_else(|| self.shutdown_tx.subscribe());

        let signal_task = self.config.listen_for_ctrl_c.then(|| {
            let tx = self.shutdown_tx.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received shutdown signal");
                    let _ = tx.send(());
                }
            })
        });

        let result = self.run_session(&mut shutdown_rx).await;

        if let Some(task) = signal_task {
            task.abort();
        }
        self.transition(PipelineState::Terminated);

        match &result {
            Ok(summary) => summary.log(),
            Err(e) => error!(error = %e, "Enrichment could not start"),
        }
        result
    }

    async fn run_session(
        &mut self,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> Result<RunSummary, PipelineError> {
        self.transition(PipelineState::Loading);

        let mut checkpoint = self.checkpoint_store.load().await?;
        let entities = self.supplier.fetch_all().await?;
        let remaining = checkpoint.remaining(&entities);

        let spacing = self.search.config().request_spacing;
        let estimated_minutes = spacing.as_secs_f64() * remaining.len() as f64 / 60.0;
        info!(
            total_entities = entities.len(),
            already_processed = checkpoint.processed.len(),
            remaining = remaining.len(),
            results_per_entity = self.search.config().results_per_entity,
            request_spacing_secs = spacing.as_secs_f64(),
            estimated_minutes = estimated_minutes.round() as u64,
            "Loaded enrichment state"
        );

        let mut session = Session::default();
        if remaining.is_empty() {
            info!("Nothing to do, every entity has already been processed");
            return Ok(session.summary(RunOutcome::Completed, &checkpoint));
        }

        self.transition(PipelineState::Running);
        let mut outcome = RunOutcome::Completed;
        let total = remaining.len();

        for (index, entity) in remaining.iter().enumerate() {
            info!("[{}/{}] Searching: {}", index + 1, total, entity);

            let search = &mut self.search;
            let transformer = &self.transformer;
            let step = AssertUnwindSafe(async move {
                let documents = search.search(entity).await;
                (documents.len(), transformer.transform_all(&documents, entity))
            })
            .catch_unwind();

            let result = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => None,
                result = step => Some(result),
            };

            let (found, records) = match result {
                None => {
                    warn!(entity = %entity, "Shutdown requested, draining");
                    outcome = RunOutcome::Interrupted;
                    break;
                }
                Some(Err(payload)) => {
                    let err = PipelineError::EntityPanicked {
                        entity: entity.clone(),
                        message: panic_message(payload.as_ref()),
                    };
                    error!(error = %err, "Unhandled failure, draining");
                    outcome = RunOutcome::Failed(err.to_string());
                    break;
                }
                Some(Ok(output)) => output,
            };

            checkpoint.mark_processed(entity, found);
            session.record(found, records);
            if found == 0 {
                info!(entity = %entity, "No results");
            } else {
                info!(entity = %entity, found = found, "Found documents");
            }

            if session.since_flush >= self.config.batch_size {
                self.transition(PipelineState::Flushing);
                if let Err(err) = self.flush(&mut checkpoint, &mut session).await {
                    error!(error = %err, "Flush failed, draining");
                    outcome = RunOutcome::Failed(err.to_string());
                    break;
                }
                self.transition(PipelineState::Running);
            }
        }

        self.transition(PipelineState::Draining);
        if let Err(err) = self.flush(&mut checkpoint, &mut session).await {
            error!(error = %err, "Final flush failed");
            outcome = RunOutcome::Failed(err.to_string());
        }

        Ok(session.summary(outcome, &checkpoint))
    }

    /// Persist the buffer, then save the checkpoint.
    ///
    /// The checkpoint is saved even when the insert panics; the panic is
    /// reported afterwards as [`PipelineError::FlushPanicked`].
    async fn flush(
        &self,
        checkpoint: &mut Checkpoint,
        session: &mut Session,
    ) -> Result<(), PipelineError> {
        let mut panicked = None;
        if !session.buffer.is_empty() {
            let records = std::mem::take(&mut session.buffer);
            match AssertUnwindSafe(self.loader.insert_batch(records))
                .catch_unwind()
                .await
            {
                Ok(summary) => session.inserted += summary.inserted,
                Err(payload) => {
                    panicked = Some(PipelineError::FlushPanicked {
                        message: panic_message(payload.as_ref()),
                    })
                }
            }
        }

        session.since_flush = 0;
        checkpoint.last_index = session.processed;
        self.checkpoint_store.save(checkpoint).await?;

        match panicked {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = %self.state, to = %next, "Pipeline state transition");
        self.state = next;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
