//! The view pipeline: filter then stable sort.
//!
//! `compute_view` is a pure function of the record slice and the filter.
//! It never reorders or mutates its input and always builds a fresh
//! sequence. [`ViewMemo`] is the caller-side memo: it keeps the last ordered
//! positions and reuses them while the store revision and the filter are
//! structurally unchanged.

use crate::{FilterState, Record, RecordStore, SortKey};
use std::cmp::Ordering;

/// Precomputed sort value of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SortValue {
    Text(String),
    Number(u32),
}

impl SortValue {
    fn of(record: &Record, key: SortKey) -> Self {
        match key {
            SortKey::Name => SortValue::Text(record.name.to_lowercase()),
            SortKey::Email => SortValue::Text(record.email.to_lowercase()),
            SortKey::Age => SortValue::Number(record.age),
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.cmp(b),
            // A single sort pass only ever produces one variant.
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compute the ordered positions (indices into `records`) of the view.
pub fn view_positions(records: &[Record], filter: &FilterState) -> Vec<usize> {
    let matcher = filter.matcher();
    let key = filter.sort_key;
    let direction = filter.sort_direction;

    let mut keyed: Vec<(SortValue, usize)> = if matcher.is_pass_through() {
        records
            .iter()
            .enumerate()
            .map(|(position, record)| (SortValue::of(record, key), position))
            .collect()
    } else {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| matcher.matches(record))
            .map(|(position, record)| (SortValue::of(record, key), position))
            .collect()
    };

    // `sort_by` is stable: ties keep their collection order.
    keyed.sort_by(|a, b| direction.apply(a.0.cmp(&b.0)));

    keyed.into_iter().map(|(_, position)| position).collect()
}

/// Filter and sort `records` into a new ordered view.
pub fn compute_view<'a>(records: &'a [Record], filter: &FilterState) -> Vec<&'a Record> {
    view_positions(records, filter)
        .into_iter()
        .map(|position| &records[position])
        .collect()
}

/// Memo of the last computed view, keyed by store revision and filter.
#[derive(Debug, Default)]
pub struct ViewMemo {
    key: Option<(u64, FilterState)>,
    positions: Vec<usize>,
    recomputations: u64,
}

impl ViewMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered positions into `store.records()` for `filter`.
    ///
    /// Recomputes only when the store revision or the filter changed since
    /// the previous call.
    pub fn positions(&mut self, store: &RecordStore, filter: &FilterState) -> &[usize] {
        let fresh = matches!(
            &self.key,
            Some((revision, cached)) if *revision == store.revision() && cached == filter
        );

        if !fresh {
            self.positions = view_positions(store.records(), filter);
            self.key = Some((store.revision(), filter.clone()));
            self.recomputations += 1;
        }

        &self.positions
    }

    /// How many times the pipeline actually ran.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
