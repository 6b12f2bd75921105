//! User-facing view controls: filter, pagination and scroll position.
//!
//! Reset rules:
//! - any filter change (search, status, sort) resets the page to 1 and the
//!   scroll offset to 0;
//! - a page size change resets the page to 1;
//! - any page change resets the scroll offset.

use crate::{error::Result, FilterState, Pagination, SortKey, StatusFilter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewControls {
    filter: FilterState,
    pagination: Pagination,
    scroll_offset: f64,
}

impl ViewControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search_text = text.into();
        self.reset_position();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.filter.status_filter = status;
        self.reset_position();
    }

    /// Flip direction on the active key, or switch to `key` ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.filter.toggle_sort(key);
        self.reset_position();
    }

    /// Replace the whole filter at once.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.reset_position();
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        self.pagination.set_page(page)?;
        self.scroll_offset = 0.0;
        Ok(())
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.pagination.set_page_size(page_size)?;
        self.scroll_offset = 0.0;
        Ok(())
    }

    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    fn reset_position(&mut self) {
        self.pagination.reset();
        self.scroll_offset = 0.0;
    }
}
