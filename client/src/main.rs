//! Listview demo - drives a session against the simulated remote store.
//!
//! Loads the generated dataset, types a debounced search, toggles sort,
//! pages and scrolls, then fires a few optimistic edits and logs a summary
//! of each frame.

use std::sync::Arc;
use std::time::Duration;

use listview_client::{Config, SimulatedStore, Session};
use listview_engine::{Frame, MutationOutcome, RecordPatch, SortKey, StatusFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listview_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let summary = serde_json::to_string(&config)?;
    tracing::info!(config = %summary, "Starting listview demo");

    let remote = Arc::new(SimulatedStore::generate(config.record_count, config.remote()));
    let session = Session::from_config(remote, &config)?;

    // Initial load; retry once on failure
    if let Err(error) = session.load().await {
        tracing::warn!(error = %error, "Retrying load");
        session.load().await?;
    }
    log_frame("loaded", &session.frame());

    // Keystrokes arrive faster than the quiet interval
    for prefix in ["m", "ma", "mar", "mari"] {
        session.on_search_input(prefix);
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    tokio::time::sleep(config.debounce() + Duration::from_millis(50)).await;
    log_frame("search", &session.frame());

    session.set_search("");
    session.set_status(StatusFilter::Active);
    session.toggle_sort(SortKey::Age);
    session.toggle_sort(SortKey::Age);
    log_frame("active by age desc", &session.frame());

    session.set_page_size(100)?;
    session.set_page(2)?;
    session.scroll_to(1_500.0);
    log_frame("page 2, scrolled", &session.frame());

    // Optimistic edits on the first visible rows
    let targets: Vec<_> = session
        .frame()
        .visible_rows
        .iter()
        .take(3)
        .map(|row| (row.record.id.clone(), row.record.age))
        .collect();

    let mut pending = Vec::new();
    for (id, age) in &targets {
        pending.push(session.begin_mutation(id, RecordPatch::new().age(age + 1))?);
    }
    log_frame("optimistic", &session.frame());

    let outcomes = futures::future::join_all(pending.into_iter().map(|m| m.outcome())).await;
    for outcome in outcomes {
        match outcome? {
            MutationOutcome::Committed(record) => {
                tracing::info!(record_id = %record.id, age = record.age, "Edit kept");
            }
            MutationOutcome::RolledBack { snapshot, error } => {
                tracing::info!(record_id = %snapshot.id, error = %error, "Edit reverted");
            }
            MutationOutcome::Rejected(error) => {
                tracing::info!(error = %error, "Edit ignored");
            }
        }
    }
    log_frame("settled", &session.frame());

    Ok(())
}

fn log_frame(label: &str, frame: &Frame) {
    let first = frame.visible_rows.first().map(|row| row.index);
    let last = frame.visible_rows.last().map(|row| row.index);
    tracing::info!(
        label,
        total = frame.total_count,
        page = frame.page,
        pages = frame.page_count,
        rows = frame.visible_rows.len(),
        first = ?first,
        last = ?last,
        mutating = frame.visible_rows.iter().filter(|row| row.is_mutating).count(),
        "Frame"
    );
}
