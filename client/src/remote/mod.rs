//! Remote store adapter.
//!
//! The authoritative record set lives behind [`RemoteStore`]. Every call
//! suspends; errors come back as a structured [`RemoteError`] with an
//! HTTP-like status.

pub mod dataset;
pub mod simulated;

use std::future::Future;
use std::time::Duration;

use listview_engine::{Record, RecordId, RecordPatch, RemoteError};

pub use dataset::generate_records;
pub use simulated::SimulatedStore;

/// The authoritative store the client reads from and writes to.
pub trait RemoteStore: Send + Sync + 'static {
    /// Fetch the full current record set.
    fn list_records(&self) -> impl Future<Output = Result<Vec<Record>, RemoteError>> + Send;

    /// Apply `patch` to record `id` and return the authoritative result.
    fn update_record(
        &self,
        id: RecordId,
        patch: RecordPatch,
    ) -> impl Future<Output = Result<Record, RemoteError>> + Send;
}

/// Behaviour of the simulated transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub latency_min: Duration,
    pub latency_max: Duration,
    /// Probability that an update fails with a server error
    pub failure_rate: f64,
    /// RNG seed (0 picks a random seed)
    pub seed: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            latency_min: Duration::from_millis(500),
            latency_max: Duration::from_millis(800),
            failure_rate: 0.1,
            seed: 0,
        }
    }
}
