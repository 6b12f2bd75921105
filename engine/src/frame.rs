//! Render frame handed to the presentation layer.

use crate::{Record, RecordId, Status};
use serde::Serialize;
use std::collections::HashSet;

/// One materialized row with its placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRow {
    pub record: Record,
    /// Position within the current page
    pub index: usize,
    pub top_offset: f64,
    pub height: f64,
    pub score: f64,
    /// A mutation on this record is still awaiting the remote store
    pub is_mutating: bool,
}

impl VisibleRow {
    pub fn key(&self) -> RowKey {
        RowKey {
            id: self.record.id.clone(),
            name: self.record.name.clone(),
            email: self.record.email.clone(),
            age: self.record.age,
            status: self.record.status,
            top_bits: self.top_offset.to_bits(),
            height_bits: self.height.to_bits(),
            is_mutating: self.is_mutating,
        }
    }
}

/// Primitive fingerprint of a rendered row.
///
/// Two rows with equal keys render identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub status: Status,
    top_bits: u64,
    height_bits: u64,
    pub is_mutating: bool,
}

/// Everything the renderer needs for one paint.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub visible_rows: Vec<VisibleRow>,
    /// Scrollable height of the current page
    pub total_height: f64,
    /// Length of the whole filtered view
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    /// Scroll offset after clamping
    pub scroll_offset: f64,
    pub is_loading: bool,
    pub is_error: bool,
}

impl Frame {
    /// Positions in `visible_rows` whose fingerprint is not in `previous`.
    pub fn changed_rows(&self, previous: &Frame) -> Vec<usize> {
        let before: HashSet<RowKey> = previous.visible_rows.iter().map(VisibleRow::key).collect();
        self.visible_rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !before.contains(&row.key()))
            .map(|(position, _)| position)
            .collect()
    }
}
