//! Optimistic mutation cache.
//!
//! The cache owns the canonical [`RecordStore`] and is its only writer.
//! A mutation goes through `idle -> pending -> committed | rolled back -> idle`:
//!
//! 1. [`MutationCache::begin`] snapshots the record, applies the patch to the
//!    canonical set synchronously and hands back a [`MutationTicket`] to send
//!    to the remote store.
//! 2. [`MutationCache::settle`] consumes the remote outcome. Success replaces
//!    the record with the authoritative value; failure restores the snapshot.
//!
//! At most one mutation may be pending per record id; a second `begin` on the
//! same id is rejected with [`Error::ConcurrentMutation`]. Settlement only
//! ever touches the one record it belongs to, so edits on other ids and bulk
//! reloads in between are never clobbered.

use crate::{error::Result, Error, Record, RecordId, RecordPatch, RecordStore, RemoteError};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Unique identifier for a mutation.
pub type MutationId = u64;

/// Lifecycle state of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationStatus {
    Pending,
    Committed,
    RolledBack,
}

/// Book-keeping for one in-flight mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    pub mutation_id: MutationId,
    pub record_id: RecordId,
    /// Fields written optimistically
    pub pending_payload: RecordPatch,
    /// Exact record value before the optimistic write
    pub previous_snapshot: Record,
    pub status: MutationStatus,
}

/// Handle for an issued mutation, sent along with the remote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationTicket {
    pub mutation_id: MutationId,
    pub record_id: RecordId,
    pub patch: RecordPatch,
}

/// How a mutation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The remote store accepted the write; carries the authoritative record.
    Committed(Record),
    /// The remote store failed; the snapshot was restored.
    RolledBack { snapshot: Record, error: RemoteError },
    /// The mutation never reached the remote store, or its record left the
    /// canonical set before it settled. Nothing was written.
    Rejected(Error),
}

impl MutationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed(_))
    }

    pub fn is_rolled_back(&self) -> bool {
        matches!(self, MutationOutcome::RolledBack { .. })
    }

    /// Final lifecycle state, `None` for a rejected request.
    pub fn status(&self) -> Option<MutationStatus> {
        match self {
            MutationOutcome::Committed(_) => Some(MutationStatus::Committed),
            MutationOutcome::RolledBack { .. } => Some(MutationStatus::RolledBack),
            MutationOutcome::Rejected(_) => None,
        }
    }
}

/// Canonical record set plus the pending mutation table.
#[derive(Debug, Default)]
pub struct MutationCache {
    store: RecordStore,
    pending: HashMap<RecordId, MutationRecord>,
    next_mutation_id: MutationId,
}

impl MutationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding an initial record set.
    pub fn with_records(records: Vec<Record>) -> Result<Self> {
        Ok(Self {
            store: RecordStore::from_records(records)?,
            pending: HashMap::new(),
            next_mutation_id: 0,
        })
    }

    /// Read snapshot of the canonical set.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Get a record by ID, reflecting any optimistic write.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.store.get(id)
    }

    /// The pending mutation for a record, if any.
    pub fn pending(&self, id: &str) -> Option<&MutationRecord> {
        self.pending.get(id)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    /// Get count of pending mutations.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Start an optimistic mutation.
    ///
    /// On success the patch is already visible through [`Self::store`] when
    /// this returns. Rejections leave all state untouched.
    pub fn begin(&mut self, id: &str, patch: RecordPatch) -> Result<MutationTicket> {
        if self.pending.contains_key(id) {
            return Err(Error::ConcurrentMutation(id.to_string()));
        }

        let previous_snapshot = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;

        self.store.apply_patch(id, &patch);

        self.next_mutation_id += 1;
        let mutation_id = self.next_mutation_id;

        self.pending.insert(
            id.to_string(),
            MutationRecord {
                mutation_id,
                record_id: id.to_string(),
                pending_payload: patch.clone(),
                previous_snapshot,
                status: MutationStatus::Pending,
            },
        );

        Ok(MutationTicket {
            mutation_id,
            record_id: id.to_string(),
            patch,
        })
    }

    /// Reconcile a pending mutation with the remote outcome.
    ///
    /// Success writes the authoritative record; failure restores the
    /// pre-mutation snapshot. Either way the record returns to idle. If the
    /// record vanished in a reload meanwhile, the canonical set is left alone
    /// and a successful remote write comes back as
    /// [`MutationOutcome::Rejected`].
    pub fn settle(
        &mut self,
        ticket: &MutationTicket,
        remote: std::result::Result<Record, RemoteError>,
    ) -> MutationOutcome {
        let entry = match self.pending.entry(ticket.record_id.clone()) {
            Entry::Occupied(slot) if slot.get().mutation_id == ticket.mutation_id => slot.remove(),
            _ => {
                return MutationOutcome::Rejected(Error::UnknownMutation(
                    ticket.record_id.clone(),
                ))
            }
        };

        match remote {
            Ok(authoritative) if authoritative.id == ticket.record_id => {
                if self.store.replace(authoritative.clone()) {
                    MutationOutcome::Committed(authoritative)
                } else {
                    MutationOutcome::Rejected(Error::RecordNotFound(ticket.record_id.clone()))
                }
            }
            Ok(other) => {
                self.store.replace(entry.previous_snapshot.clone());
                MutationOutcome::RolledBack {
                    snapshot: entry.previous_snapshot,
                    error: RemoteError::bad_request(format!(
                        "remote answered with record {} for {}",
                        other.id, ticket.record_id
                    )),
                }
            }
            Err(error) => {
                self.store.replace(entry.previous_snapshot.clone());
                MutationOutcome::RolledBack {
                    snapshot: entry.previous_snapshot,
                    error,
                }
            }
        }
    }

    /// Replace the canonical set with a freshly loaded one.
    ///
    /// Records with a pending mutation are rebased: the fresh value becomes
    /// the rollback snapshot and the pending patch is re-applied on top of it.
    pub fn replace_all(&mut self, records: Vec<Record>) -> Result<()> {
        self.store.replace_all(records)?;

        for entry in self.pending.values_mut() {
            if let Some(fresh) = self.store.get(&entry.record_id) {
                entry.previous_snapshot = fresh.clone();
                self.store
                    .apply_patch(&entry.record_id, &entry.pending_payload);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    fn test_cache() -> MutationCache {
        MutationCache::with_records(vec![
            Record::new("1", "Alice", "alice@example.com", 30, Status::Active),
            Record::new("2", "Bob", "bob@example.com", 25, Status::Inactive),
        ])
        .unwrap()
    }

    #[test]
    fn begin_applies_optimistically() {
        let mut cache = test_cache();
        let ticket = cache.begin("1", RecordPatch::new().age(31)).unwrap();

        assert_eq!(ticket.record_id, "1");
        assert_eq!(cache.get("1").unwrap().age, 31);
        assert!(cache.is_pending("1"));

        let entry = cache.pending("1").unwrap();
        assert_eq!(entry.status, MutationStatus::Pending);
        assert_eq!(entry.previous_snapshot.age, 30);
    }

    #[test]
    fn second_begin_is_rejected_without_state_change() {
        let mut cache = test_cache();
        cache.begin("1", RecordPatch::new().age(31)).unwrap();
        let revision = cache.store().revision();

        let result = cache.begin("1", RecordPatch::new().age(99));
        assert_eq!(result, Err(Error::ConcurrentMutation("1".into())));
        assert_eq!(cache.get("1").unwrap().age, 31);
        assert_eq!(cache.store().revision(), revision);
        assert_eq!(cache.pending_count(), 1);
    }

    #[test]
    fn begin_unknown_record() {
        let mut cache = test_cache();
        let result = cache.begin("9", RecordPatch::new().age(1));
        assert_eq!(result, Err(Error::RecordNotFound("9".into())));
        assert_eq!(cache.pending_count(), 0);
    }

    #[test]
    fn commit_uses_authoritative_value() {
        let mut cache = test_cache();
        let ticket = cache.begin("1", RecordPatch::new().name("Alicia")).unwrap();

        // The remote may normalize fields beyond the patch.
        let authoritative = Record::new("1", "Alicia", "alicia@example.com", 30, Status::Active);
        let outcome = cache.settle(&ticket, Ok(authoritative.clone()));

        assert_eq!(outcome, MutationOutcome::Committed(authoritative.clone()));
        assert_eq!(cache.get("1").unwrap(), &authoritative);
        assert!(!cache.is_pending("1"));
    }

    #[test]
    fn rollback_restores_exact_snapshot() {
        let mut cache = test_cache();
        let before = cache.get("1").unwrap().clone();
        let ticket = cache
            .begin("1", RecordPatch::new().name("X").age(31))
            .unwrap();

        let outcome = cache.settle(&ticket, Err(RemoteError::server_error("boom")));

        assert!(outcome.is_rolled_back());
        assert_eq!(cache.get("1").unwrap(), &before);
        assert!(!cache.is_pending("1"));
    }

    #[test]
    fn rollback_leaves_other_records_alone() {
        let mut cache = test_cache();
        let t1 = cache.begin("1", RecordPatch::new().age(31)).unwrap();
        let t2 = cache.begin("2", RecordPatch::new().age(26)).unwrap();

        cache.settle(&t1, Err(RemoteError::server_error("boom")));
        assert_eq!(cache.get("2").unwrap().age, 26);

        let committed = Record::new("2", "Bob", "bob@example.com", 26, Status::Inactive);
        cache.settle(&t2, Ok(committed));
        assert_eq!(cache.get("1").unwrap().age, 30);
        assert_eq!(cache.get("2").unwrap().age, 26);
    }

    #[test]
    fn settle_twice_is_rejected() {
        let mut cache = test_cache();
        let ticket = cache.begin("1", RecordPatch::new().age(31)).unwrap();
        let committed = Record::new("1", "Alice", "alice@example.com", 31, Status::Active);
        cache.settle(&ticket, Ok(committed));

        let outcome = cache.settle(&ticket, Err(RemoteError::server_error("late")));
        assert_eq!(
            outcome,
            MutationOutcome::Rejected(Error::UnknownMutation("1".into()))
        );
        assert_eq!(cache.get("1").unwrap().age, 31);
    }

    #[test]
    fn new_mutation_allowed_after_settle() {
        let mut cache = test_cache();
        let ticket = cache.begin("1", RecordPatch::new().age(31)).unwrap();
        cache.settle(&ticket, Err(RemoteError::server_error("boom")));

        let retry = cache.begin("1", RecordPatch::new().age(31)).unwrap();
        assert!(retry.mutation_id > ticket.mutation_id);
    }

    #[test]
    fn mismatched_authoritative_id_rolls_back() {
        let mut cache = test_cache();
        let ticket = cache.begin("1", RecordPatch::new().age(31)).unwrap();
        let wrong = Record::new("2", "Bob", "bob@example.com", 99, Status::Inactive);

        let outcome = cache.settle(&ticket, Ok(wrong));
        assert!(outcome.is_rolled_back());
        assert_eq!(cache.get("1").unwrap().age, 30);
        assert_eq!(cache.get("2").unwrap().age, 25);
    }

    #[test]
    fn reload_rebases_pending_mutation() {
        let mut cache = test_cache();
        let ticket = cache.begin("1", RecordPatch::new().age(31)).unwrap();

        // The reload brings a newer email for the same record.
        cache
            .replace_all(vec![
                Record::new("1", "Alice", "alice@new.example.com", 30, Status::Active),
                Record::new("2", "Bob", "bob@example.com", 25, Status::Inactive),
            ])
            .unwrap();

        let current = cache.get("1").unwrap();
        assert_eq!(current.age, 31);
        assert_eq!(current.email, "alice@new.example.com");

        cache.settle(&ticket, Err(RemoteError::server_error("boom")));
        let restored = cache.get("1").unwrap();
        assert_eq!(restored.age, 30);
        assert_eq!(restored.email, "alice@new.example.com");
    }

    #[test]
    fn settle_after_record_vanished_is_rejected() {
        let mut cache = test_cache();
        let ticket = cache.begin("1", RecordPatch::new().age(31)).unwrap();
        cache
            .replace_all(vec![Record::new(
                "2",
                "Bob",
                "bob@example.com",
                25,
                Status::Inactive,
            )])
            .unwrap();

        let committed = Record::new("1", "Alice", "alice@example.com", 31, Status::Active);
        let outcome = cache.settle(&ticket, Ok(committed));
        assert_eq!(
            outcome,
            MutationOutcome::Rejected(Error::RecordNotFound("1".into()))
        );
        assert_eq!(outcome.status(), None);
        assert!(!cache.is_pending("1"));
        assert!(cache.get("1").is_none());
        assert_eq!(cache.store().len(), 1);
    }
}
