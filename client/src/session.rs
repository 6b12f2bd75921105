//! Async session driving a [`Dashboard`] against a remote store.
//!
//! The dashboard sits behind a single writer lock. The lock is only ever
//! held for synchronous engine calls, never across an await, so a frame
//! never observes a half-applied patch and a pending remote call never
//! blocks scrolling or edits to other records.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use listview_engine::{
    Dashboard, Frame, LoadState, MutationId, MutationOutcome, MutationTicket, Record,
    RecordPatch, SortKey, StatusFilter, ViewControls, Viewport,
};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::debounce::DebounceController;
use crate::error::Result;
use crate::remote::RemoteStore;

/// An optimistic mutation whose remote call is still in flight.
///
/// Dropping it does not cancel the call; the mutation still settles.
#[derive(Debug)]
pub struct PendingMutation {
    ticket: MutationTicket,
    handle: JoinHandle<MutationOutcome>,
}

impl PendingMutation {
    pub fn ticket(&self) -> &MutationTicket {
        &self.ticket
    }

    pub fn mutation_id(&self) -> MutationId {
        self.ticket.mutation_id
    }

    /// Wait for the remote store and the reconciliation.
    pub async fn outcome(self) -> Result<MutationOutcome> {
        Ok(self.handle.await?)
    }
}

pub struct Session<R> {
    remote: Arc<R>,
    dashboard: Arc<Mutex<Dashboard>>,
    search: DebounceController<String>,
}

impl<R: RemoteStore> Session<R> {
    pub fn new(
        remote: Arc<R>,
        viewport: Viewport,
        score_capacity: usize,
        debounce: Duration,
    ) -> Self {
        let dashboard = Arc::new(Mutex::new(Dashboard::new(viewport, score_capacity)));

        let target = Arc::clone(&dashboard);
        let search = DebounceController::new(debounce, move |text: String| {
            tracing::debug!(search = %text, "Search committed");
            lock(&target).set_search(text);
        });

        Self {
            remote,
            dashboard,
            search,
        }
    }

    pub fn from_config(remote: Arc<R>, config: &Config) -> Result<Self> {
        Ok(Self::new(
            remote,
            config.viewport()?,
            config.score_cache_capacity,
            config.debounce(),
        ))
    }

    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    // Load lifecycle

    /// Fetch the record set from the remote store.
    ///
    /// Also the retry path after a failed load. Returns the record count.
    pub async fn load(&self) -> Result<usize> {
        self.lock().begin_load();
        tracing::info!("Loading records");

        let result = self.remote.list_records().await;

        match self.lock().finish_load(result) {
            Ok(count) => {
                tracing::info!(count, "Records loaded");
                Ok(count)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Load failed");
                Err(error.into())
            }
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.lock().load_state().clone()
    }

    // Reads

    /// Render frame for the current state.
    pub fn frame(&self) -> Frame {
        self.lock().frame()
    }

    pub fn controls(&self) -> ViewControls {
        self.lock().controls().clone()
    }

    /// Current canonical value of a record.
    pub fn record(&self, id: &str) -> Option<Record> {
        self.lock().cache().get(id).cloned()
    }

    pub fn pending_mutations(&self) -> usize {
        self.lock().cache().pending_count()
    }

    // View controls

    /// Feed raw search input; the filter updates after the quiet interval.
    pub fn on_search_input(&self, text: impl Into<String>) {
        self.search.on_input(text.into());
    }

    /// Whether a debounced search commit is still scheduled.
    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    /// Apply a search immediately, dropping any scheduled one.
    pub fn set_search(&self, text: impl Into<String>) {
        self.search.cancel();
        self.lock().set_search(text);
    }

    pub fn set_status(&self, status: StatusFilter) {
        self.lock().set_status(status);
    }

    pub fn toggle_sort(&self, key: SortKey) {
        self.lock().toggle_sort(key);
    }

    pub fn set_page(&self, page: usize) -> Result<()> {
        Ok(self.lock().set_page(page)?)
    }

    pub fn set_page_size(&self, page_size: usize) -> Result<()> {
        Ok(self.lock().set_page_size(page_size)?)
    }

    pub fn scroll_to(&self, offset: f64) {
        self.lock().scroll_to(offset);
    }

    // Mutations

    /// Apply `patch` optimistically and send it to the remote store.
    ///
    /// The patch is visible in the next frame when this returns. The remote
    /// call runs on a spawned task that commits or rolls back the record.
    pub fn begin_mutation(&self, id: &str, patch: RecordPatch) -> Result<PendingMutation> {
        let ticket = match self.lock().begin_mutation(id, patch) {
            Ok(ticket) => ticket,
            Err(error) => {
                tracing::warn!(record_id = %id, error = %error, "Mutation rejected");
                return Err(error.into());
            }
        };

        tracing::debug!(
            record_id = %ticket.record_id,
            mutation_id = ticket.mutation_id,
            "Mutation applied optimistically"
        );

        let remote = Arc::clone(&self.remote);
        let dashboard = Arc::clone(&self.dashboard);
        let task_ticket = ticket.clone();
        let handle = tokio::spawn(async move {
            let result = remote
                .update_record(task_ticket.record_id.clone(), task_ticket.patch.clone())
                .await;
            let outcome = lock(&dashboard).settle_mutation(&task_ticket, result);
            log_outcome(&task_ticket, &outcome);
            outcome
        });

        Ok(PendingMutation { ticket, handle })
    }

    /// Apply a mutation and wait for it to settle.
    pub async fn update_record(&self, id: &str, patch: RecordPatch) -> Result<MutationOutcome> {
        self.begin_mutation(id, patch)?.outcome().await
    }

    fn lock(&self) -> MutexGuard<'_, Dashboard> {
        lock(&self.dashboard)
    }
}

fn lock(dashboard: &Mutex<Dashboard>) -> MutexGuard<'_, Dashboard> {
    dashboard.lock().unwrap_or_else(PoisonError::into_inner)
}

fn log_outcome(ticket: &MutationTicket, outcome: &MutationOutcome) {
    match outcome {
        MutationOutcome::Committed(record) => {
            tracing::info!(
                record_id = %record.id,
                mutation_id = ticket.mutation_id,
                "Mutation committed"
            );
        }
        MutationOutcome::RolledBack { error, .. } => {
            tracing::warn!(
                record_id = %ticket.record_id,
                mutation_id = ticket.mutation_id,
                status = error.status,
                error = %error.message,
                "Mutation rolled back"
            );
        }
        MutationOutcome::Rejected(error) => {
            tracing::warn!(
                record_id = %ticket.record_id,
                mutation_id = ticket.mutation_id,
                error = %error,
                "Mutation settlement rejected"
            );
        }
    }
}
