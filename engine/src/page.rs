//! Page-based slicing of an ordered view.

use crate::{error::Result, Error};
use serde::{Deserialize, Serialize};

/// Page sizes offered to the user.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Page size used before the user picks one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Current page position. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page == 0 {
            return Err(Error::InvalidPage(page));
        }
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Move to another page of the same size.
    pub fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 {
            return Err(Error::InvalidPage(page));
        }
        self.page = page;
        Ok(())
    }

    /// Change the page size. The page always resets to 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Go back to the first page.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Index of the first item on the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Number of pages needed for `total` items (at least one).
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// The items of the current page: `view[(page-1)*size .. page*size]`,
    /// clamped to the view.
    pub fn slice<'a, T>(&self, view: &'a [T]) -> &'a [T] {
        let start = self.offset().min(view.len());
        let end = start.saturating_add(self.page_size).min(view.len());
        &view[start..end]
    }
}
