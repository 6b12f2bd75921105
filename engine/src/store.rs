//! Store - the canonical in-memory record set.
//!
//! The store keeps records in load order together with an id index. Every
//! write bumps a revision counter so readers can tell whether a snapshot
//! they derived from is still current.

use crate::{error::Result, Error, Record, RecordId, RecordPatch};
use std::collections::HashMap;

/// The single authoritative collection of records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    /// Records in original collection order
    records: Vec<Record>,
    /// Position of each record by id
    index: HashMap<RecordId, usize>,
    /// Incremented on every write
    revision: u64,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a loaded record list.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut store = Self::new();
        store.replace_all(records)?;
        Ok(store)
    }

    /// Read-only view of all records in collection order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Get a record by ID.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current write revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a patch to one record in place.
    ///
    /// Returns the updated record, or `None` when the id is unknown.
    pub fn apply_patch(&mut self, id: &str, patch: &RecordPatch) -> Option<&Record> {
        let position = *self.index.get(id)?;
        patch.apply_to(&mut self.records[position]);
        self.revision += 1;
        Some(&self.records[position])
    }

    /// Replace the record with the same id.
    ///
    /// Only that one record is touched; returns `false` when the id is
    /// unknown (the record is not inserted).
    pub fn replace(&mut self, record: Record) -> bool {
        match self.index.get(&record.id) {
            Some(&position) => {
                self.records[position] = record;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Replace the whole set with a freshly loaded one.
    pub fn replace_all(&mut self, records: Vec<Record>) -> Result<()> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), position).is_some() {
                return Err(Error::DuplicateRecord(record.id.clone()));
            }
        }

        self.records = records;
        self.index = index;
        self.revision += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    fn test_store() -> RecordStore {
        RecordStore::from_records(vec![
            Record::new("user-1", "Alice", "alice@example.com", 30, Status::Active),
            Record::new("user-2", "Bob", "bob@example.com", 25, Status::Inactive),
        ])
        .unwrap()
    }

    #[test]
    fn create_store() {
        let store = test_store();
        assert_eq!(store.len(), 2);
        assert!(store.contains("user-1"));
        assert_eq!(store.get("user-2").unwrap().name, "Bob");
        assert!(store.get("user-3").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let record = Record::new("user-1", "Alice", "alice@example.com", 30, Status::Active);
        let result = RecordStore::from_records(vec![record.clone(), record]);
        assert!(matches!(result, Err(Error::DuplicateRecord(id)) if id == "user-1"));
    }

    #[test]
    fn apply_patch_bumps_revision() {
        let mut store = test_store();
        let before = store.revision();

        let updated = store
            .apply_patch("user-1", &RecordPatch::new().age(31))
            .unwrap();
        assert_eq!(updated.age, 31);
        assert_eq!(store.revision(), before + 1);
    }

    #[test]
    fn apply_patch_unknown_id() {
        let mut store = test_store();
        let before = store.revision();
        assert!(store.apply_patch("nope", &RecordPatch::new().age(1)).is_none());
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn replace_touches_only_matching_id() {
        let mut store = test_store();
        let bob = store.get("user-2").unwrap().clone();

        let replaced = store.replace(Record::new(
            "user-1",
            "Alice Smith",
            "alice@example.com",
            31,
            Status::Active,
        ));
        assert!(replaced);
        assert_eq!(store.get("user-1").unwrap().name, "Alice Smith");
        assert_eq!(store.get("user-2").unwrap(), &bob);

        let ghost = Record::new("user-9", "Ghost", "g@example.com", 1, Status::Active);
        assert!(!store.replace(ghost));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replace_all_keeps_order() {
        let mut store = test_store();
        store
            .replace_all(vec![
                Record::new("b", "B", "b@example.com", 1, Status::Active),
                Record::new("a", "A", "a@example.com", 2, Status::Active),
            ])
            .unwrap();

        let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(!store.contains("user-1"));
    }
}
