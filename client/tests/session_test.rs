//! Integration tests for the async session.
//!
//! All tests run on a paused clock, so simulated latency and debounce
//! intervals elapse instantly and deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use listview_client::{ClientError, RemoteConfig, RemoteStore, Session, SimulatedStore};
use listview_engine::{
    Error, LoadState, MutationOutcome, Record, RecordId, RecordPatch, RemoteError, Status,
    StatusFilter, Viewport,
};

/// Test helper: a store whose listing fails a given number of times and
/// whose updates always fail for selected ids.
struct ScriptedStore {
    inner: SimulatedStore,
    list_failures: AtomicUsize,
    failing_ids: Vec<RecordId>,
}

impl ScriptedStore {
    fn new(list_failures: usize, failing_ids: &[&str]) -> Self {
        Self {
            inner: reliable_store(),
            list_failures: AtomicUsize::new(list_failures),
            failing_ids: failing_ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl RemoteStore for ScriptedStore {
    async fn list_records(&self) -> Result<Vec<Record>, RemoteError> {
        let remaining = self.list_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.list_failures.store(remaining - 1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(500)).await;
            return Err(RemoteError::server_error("listing unavailable"));
        }
        self.inner.list_records().await
    }

    async fn update_record(&self, id: RecordId, patch: RecordPatch) -> Result<Record, RemoteError> {
        if self.failing_ids.contains(&id) {
            tokio::time::sleep(Duration::from_millis(600)).await;
            return Err(RemoteError::server_error("scripted failure"));
        }
        self.inner.update_record(id, patch).await
    }
}

fn records() -> Vec<Record> {
    vec![
        Record::new("a", "Ann", "ann@example.com", 30, Status::Active),
        Record::new("b", "Ben", "ben@example.com", 41, Status::Inactive),
        Record::new("c", "Cal", "cal@example.com", 25, Status::Active),
    ]
}

fn remote_config(failure_rate: f64) -> RemoteConfig {
    RemoteConfig {
        failure_rate,
        seed: 7,
        ..RemoteConfig::default()
    }
}

fn reliable_store() -> SimulatedStore {
    SimulatedStore::new(records(), remote_config(0.0))
}

fn session<R: RemoteStore>(remote: R) -> Session<R> {
    Session::new(
        Arc::new(remote),
        Viewport::default(),
        64,
        Duration::from_millis(400),
    )
}

async fn loaded<R: RemoteStore>(remote: R) -> Session<R> {
    let session = session(remote);
    session.load().await.unwrap();
    session
}

fn age_of(session: &Session<impl RemoteStore>, id: &str) -> u32 {
    session
        .frame()
        .visible_rows
        .iter()
        .find(|row| row.record.id == id)
        .map(|row| row.record.age)
        .unwrap()
}

#[cfg(test)]
mod load_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_load_populates_frame() {
        let session = session(reliable_store());
        assert_eq!(session.load_state(), LoadState::Idle);

        assert_eq!(session.load().await.unwrap(), 3);
        assert_eq!(session.load_state(), LoadState::Ready);

        let frame = session.frame();
        assert_eq!(frame.total_count, 3);
        assert!(!frame.is_loading);
        // Default sort: name ascending
        let names: Vec<_> = frame.visible_rows.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Ben", "Cal"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_failure_then_retry() {
        let session = session(ScriptedStore::new(1, &[]));

        let err = session.load().await.unwrap_err();
        assert_eq!(err.remote().map(|e| e.status), Some(500));
        assert!(matches!(session.load_state(), LoadState::Failed(_)));
        assert!(session.frame().is_error);
        assert_eq!(session.frame().total_count, 0);

        // Caller-initiated retry
        assert_eq!(session.load().await.unwrap(), 3);
        let frame = session.frame();
        assert!(!frame.is_error);
        assert_eq!(frame.total_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_reports_loading() {
        let session = Arc::new(session(reliable_store()));
        let background = Arc::clone(&session);
        let load = tokio::spawn(async move { background.load().await });

        tokio::task::yield_now().await;
        assert!(session.frame().is_loading);

        load.await.unwrap().unwrap();
        assert!(!session.frame().is_loading);
    }
}

#[cfg(test)]
mod mutation_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_optimistic_write_then_commit() {
        let session = loaded(reliable_store()).await;

        let pending = session
            .begin_mutation("a", RecordPatch::new().age(31))
            .unwrap();

        // Visible before the remote store answers
        assert_eq!(age_of(&session, "a"), 31);
        assert_eq!(session.pending_mutations(), 1);
        assert!(session
            .frame()
            .visible_rows
            .iter()
            .any(|row| row.record.id == "a" && row.is_mutating));

        let outcome = pending.outcome().await.unwrap();
        assert!(outcome.is_committed());
        assert_eq!(session.record("a").unwrap().age, 31);
        assert_eq!(session.remote().get("a").unwrap().age, 31);
        assert_eq!(session.pending_mutations(), 0);
        assert!(session.frame().visible_rows.iter().all(|row| !row.is_mutating));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_write_rolls_back() {
        let session = loaded(SimulatedStore::new(records(), remote_config(1.0))).await;
        let before = session.record("a").unwrap();

        let outcome = session
            .update_record("a", RecordPatch::new().age(31))
            .await
            .unwrap();

        match outcome {
            MutationOutcome::RolledBack { snapshot, error } => {
                assert_eq!(snapshot, before);
                assert_eq!(error.status, 500);
            }
            other => panic!("expected rollback, got {other:?}"),
        }
        assert_eq!(session.record("a").unwrap(), before);
        assert_eq!(age_of(&session, "a"), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_edit_on_pending_record_is_rejected() {
        let session = loaded(reliable_store()).await;
        let first = session
            .begin_mutation("a", RecordPatch::new().age(31))
            .unwrap();

        let err = session
            .begin_mutation("a", RecordPatch::new().name("Other"))
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Engine(Error::ConcurrentMutation(ref id)) if id == "a"
        ));
        assert_eq!(session.record("a").unwrap().name, "Ann");

        first.outcome().await.unwrap();
        // Idle again: a new edit is accepted
        assert!(session
            .update_record("a", RecordPatch::new().name("Anna"))
            .await
            .unwrap()
            .is_committed());
        assert_eq!(session.remote().get("a").unwrap().name, "Anna");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id_rejected_without_network() {
        let session = loaded(reliable_store()).await;
        let err = session
            .begin_mutation("zzz", RecordPatch::new().age(1))
            .unwrap_err();
        assert!(matches!(err, ClientError::Engine(Error::RecordNotFound(_))));
        assert_eq!(session.pending_mutations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rollback_does_not_clobber_other_record() {
        let session = loaded(ScriptedStore::new(0, &["a"])).await;

        let failing = session
            .begin_mutation("a", RecordPatch::new().age(99))
            .unwrap();
        let succeeding = session
            .begin_mutation("b", RecordPatch::new().name("Benjamin"))
            .unwrap();
        assert_eq!(session.pending_mutations(), 2);

        let (a, b) = tokio::join!(failing.outcome(), succeeding.outcome());
        assert!(a.unwrap().is_rolled_back());
        assert!(b.unwrap().is_committed());

        assert_eq!(session.record("a").unwrap().age, 30);
        assert_eq!(session.record("b").unwrap().name, "Benjamin");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_during_pending_mutation() {
        let session = loaded(reliable_store()).await;
        let pending = session
            .begin_mutation("c", RecordPatch::new().age(26))
            .unwrap();

        let (outcome, reload) = tokio::join!(pending.outcome(), session.load());
        assert!(outcome.unwrap().is_committed());
        assert_eq!(reload.unwrap(), 3);

        assert_eq!(session.record("c").unwrap().age, 26);
        assert_eq!(session.pending_mutations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_removed_by_reload_is_not_resurrected() {
        let session = loaded(ScriptedStore::new(0, &["a"])).await;
        let pending = session
            .begin_mutation("a", RecordPatch::new().age(50))
            .unwrap();

        session.remote().inner.remove("a");
        let (outcome, reload) = tokio::join!(pending.outcome(), session.load());
        assert!(outcome.unwrap().is_rolled_back());
        assert_eq!(reload.unwrap(), 2);

        assert!(session.record("a").is_none());
        assert_eq!(session.frame().total_count, 2);
        assert_eq!(session.pending_mutations(), 0);
    }
}

#[cfg(test)]
mod view_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_commits_last_value() {
        let session = loaded(reliable_store()).await;

        for text in ["c", "ca", "cal"] {
            session.on_search_input(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(session.search_pending());
        assert_eq!(session.frame().total_count, 3);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!session.search_pending());
        assert_eq!(session.controls().filter().search_text, "cal");

        let frame = session.frame();
        assert_eq!(frame.total_count, 1);
        assert_eq!(frame.visible_rows[0].record.id, "c");
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_resets_page() {
        let session = loaded(reliable_store()).await;
        session.set_page(2).unwrap();
        assert_eq!(session.frame().page, 2);

        session.set_status(StatusFilter::Active);
        let frame = session.frame();
        assert_eq!(frame.page, 1);
        assert_eq!(frame.total_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_page_size_is_an_engine_error() {
        let session = loaded(reliable_store()).await;
        let err = session.set_page_size(0).unwrap_err();
        assert!(matches!(err, ClientError::Engine(Error::InvalidPageSize(0))));
    }
}
