//! Virtualized window computation.
//!
//! Maps a scroll offset over a list of fixed-height rows to the minimal
//! contiguous index range covering the viewport, widened by an overscan on
//! both sides and clamped to the list. The computation is O(1); emitting
//! the rows of a window is O(overscan + visible rows), never O(list length).

use crate::{error::Result, Error};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Row height used by the reference layout.
pub const DEFAULT_ROW_HEIGHT: f64 = 56.0;

/// Rows materialized beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 10;

/// Geometry of the scrolling viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    height: f64,
    row_height: f64,
    overscan: usize,
}

impl Viewport {
    pub fn new(height: f64, row_height: f64, overscan: usize) -> Result<Self> {
        if !row_height.is_finite() || row_height <= 0.0 {
            return Err(Error::InvalidViewport(format!(
                "row height must be positive, got {row_height}"
            )));
        }
        if !height.is_finite() || height < 0.0 {
            return Err(Error::InvalidViewport(format!(
                "viewport height must be non-negative, got {height}"
            )));
        }
        Ok(Self {
            height,
            row_height,
            overscan,
        })
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Total scrollable height of `len` rows.
    pub fn total_height(&self, len: usize) -> f64 {
        len as f64 * self.row_height
    }

    /// Clamp a scroll offset into the scrollable range for `len` rows.
    pub fn clamp_scroll(&self, len: usize, scroll_offset: f64) -> f64 {
        let max_scroll = (self.total_height(len) - self.height).max(0.0);
        if scroll_offset.is_finite() {
            scroll_offset.clamp(0.0, max_scroll)
        } else {
            0.0
        }
    }

    /// Compute the window for `len` rows at `scroll_offset`.
    pub fn window(&self, len: usize, scroll_offset: f64) -> Window {
        let total_height = self.total_height(len);
        if len == 0 {
            return Window {
                start: 0,
                end: 0,
                visible: 0..0,
                row_height: self.row_height,
                total_height,
            };
        }

        let scroll = self.clamp_scroll(len, scroll_offset);
        let first = ((scroll / self.row_height).floor() as usize).min(len - 1);
        let last = ((scroll + self.height) / self.row_height).ceil() as usize;
        let visible_end = last.clamp(first + 1, len);

        Window {
            start: first.saturating_sub(self.overscan),
            end: visible_end.saturating_add(self.overscan).min(len),
            visible: first..visible_end,
            row_height: self.row_height,
            total_height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            height: 600.0,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

/// Placement of one materialized row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualRow {
    pub index: usize,
    /// Absolute offset from the top of the scroll content
    pub top: f64,
    pub height: f64,
}

/// A contiguous, clamped range of rows to materialize.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    start: usize,
    end: usize,
    visible: Range<usize>,
    row_height: f64,
    total_height: f64,
}

impl Window {
    /// Materialized range `[start, end)`, overscan included.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Rows actually intersecting the viewport.
    pub fn visible_range(&self) -> Range<usize> {
        self.visible.clone()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    /// Placements for every materialized row.
    pub fn rows(&self) -> impl Iterator<Item = VirtualRow> + '_ {
        self.range().map(move |index| VirtualRow {
            index,
            top: index as f64 * self.row_height,
            height: self.row_height,
        })
    }
}
