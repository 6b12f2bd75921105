//! In-process simulated remote store.
//!
//! Holds the authoritative record set in memory, delays every response by
//! a random latency and injects server errors on updates with a fixed
//! probability.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use listview_engine::{Record, RecordId, RecordPatch, RemoteError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::dataset::{generate_records, resolve_seed};
use super::{RemoteConfig, RemoteStore};

/// Simulated authoritative store.
///
/// Thread-safe and can be shared across tasks via `Arc`.
#[derive(Debug)]
pub struct SimulatedStore {
    /// Authoritative records, keyed by ID.
    records: DashMap<RecordId, Record>,
    /// Listing order (generation order).
    order: Vec<RecordId>,
    rng: Mutex<SmallRng>,
    config: RemoteConfig,
}

impl SimulatedStore {
    /// Create a store serving `records`.
    pub fn new(records: Vec<Record>, config: RemoteConfig) -> Self {
        let order = records.iter().map(|r| r.id.clone()).collect();
        let records = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        let rng = SmallRng::seed_from_u64(resolve_seed(config.seed));

        Self {
            records,
            order,
            rng: Mutex::new(rng),
            config,
        }
    }

    /// Create a store over `count` generated records.
    pub fn generate(count: usize, config: RemoteConfig) -> Self {
        let records = generate_records(count, config.seed);
        Self::new(records, config)
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Current authoritative value of a record.
    pub fn get(&self, id: &str) -> Option<Record> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Delete a record from the authoritative set.
    pub fn remove(&self, id: &str) -> Option<Record> {
        self.records.remove(id).map(|(_, record)| record)
    }

    fn latency(&self) -> Duration {
        let RemoteConfig {
            latency_min,
            latency_max,
            ..
        } = self.config;
        if latency_min >= latency_max {
            return latency_min;
        }
        self.with_rng(|rng| rng.gen_range(latency_min..=latency_max))
    }

    fn should_inject_fault(&self) -> bool {
        let rate = self.config.failure_rate;
        if rate.is_nan() || rate <= 0.0 {
            return false;
        }
        if rate >= 1.0 {
            return true;
        }
        self.with_rng(|rng| rng.gen_bool(rate))
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut SmallRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    fn apply_update(&self, id: &str, patch: &RecordPatch) -> Result<Record, RemoteError> {
        // Fault injection runs before the lookup, so it can mask a not-found.
        if self.should_inject_fault() {
            tracing::warn!(record_id = %id, "Injected server error");
            return Err(RemoteError::server_error("Random server error simulation"));
        }

        match self.records.get_mut(id) {
            Some(mut entry) => {
                patch.apply_to(entry.value_mut());
                tracing::debug!(record_id = %id, "Record updated");
                Ok(entry.value().clone())
            }
            None => Err(RemoteError::not_found(id)),
        }
    }
}

impl RemoteStore for SimulatedStore {
    async fn list_records(&self) -> Result<Vec<Record>, RemoteError> {
        let delay = self.latency();
        tokio::time::sleep(delay).await;

        // Snapshot at response time, so updates that landed meanwhile show up.
        let records: Vec<Record> = self.order.iter().filter_map(|id| self.get(id)).collect();

        tracing::debug!(
            count = records.len(),
            latency_ms = delay.as_millis() as u64,
            "Listed records"
        );
        Ok(records)
    }

    async fn update_record(&self, id: RecordId, patch: RecordPatch) -> Result<Record, RemoteError> {
        let delay = self.latency();
        let result = self.apply_update(&id, &patch);
        tokio::time::sleep(delay).await;
        result
    }
}
