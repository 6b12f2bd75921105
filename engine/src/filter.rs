//! Filter and sort state driving the view pipeline.

use crate::{Record, Status};
use serde::{Deserialize, Serialize};

/// Status predicate of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Check whether a record status passes this filter.
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == Status::Active,
            StatusFilter::Inactive => status == Status::Inactive,
        }
    }
}

/// Field the view is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Email,
    Age,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Apply the direction to an ascending comparison result.
    ///
    /// `Equal` stays `Equal` so a stable sort keeps ties in input order
    /// in both directions.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// The complete filter state of the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_text: String,
    pub status_filter: StatusFilter,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status_filter = status;
        self
    }

    pub fn with_sort(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.sort_direction = direction;
        self
    }

    /// Select a sort key.
    ///
    /// Selecting the active key flips the direction; a new key starts
    /// ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Asc;
        }
    }

    /// Compile the predicate half of the filter.
    pub fn matcher(&self) -> Matcher {
        Matcher {
            needle: self.search_text.trim().to_lowercase(),
            status: self.status_filter,
        }
    }
}

/// Precomputed predicate: lowercase trimmed needle plus status filter.
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: String,
    status: StatusFilter,
}

impl Matcher {
    /// True when nothing would be filtered out.
    pub fn is_pass_through(&self) -> bool {
        self.needle.is_empty() && self.status == StatusFilter::All
    }

    pub fn matches(&self, record: &Record) -> bool {
        if !self.status.matches(record.status) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        record.name.to_lowercase().contains(&self.needle)
            || record.email.to_lowercase().contains(&self.needle)
    }
}
