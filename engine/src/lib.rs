//! # List View Engine
//!
//! The client-side core of an interactive list over a large, mutable record
//! set (tens of thousands of rows resident in memory).
//!
//! The engine filters, sorts and paginates the set on every input, computes
//! the minimal window of rows to materialize for a scroll position, and
//! applies edits optimistically before an unreliable remote store confirms
//! them, with exact rollback when it does not.
//!
//! ## Design Principles
//!
//! - **No IO**: The engine has no knowledge of timers, network or threads
//! - **Deterministic**: Same inputs always produce the same view and window
//! - **Single writer**: Only the mutation cache writes the canonical set
//! - **Proportional**: A scroll costs O(visible rows), not O(records)
//!
//! ## Core Concepts
//!
//! ### View Pipeline
//!
//! [`compute_view`] is a pure function `(records, filter) -> ordered view`:
//! a conjunctive search/status predicate followed by a stable sort on
//! [`SortKey`]. [`ViewMemo`] reuses the last result while neither the store
//! revision nor the [`FilterState`] changed.
//!
//! ### Paging and Windowing
//!
//! [`Pagination`] slices the view into pages. [`Viewport::window`] maps a
//! scroll offset to a clamped, overscanned [`Window`] of rows, each with an
//! absolute top offset.
//!
//! ### Mutation Cache
//!
//! [`MutationCache`] owns the canonical [`RecordStore`]. A mutation is applied
//! immediately by [`MutationCache::begin`] and later reconciled by
//! [`MutationCache::settle`] into a [`MutationOutcome`]: committed with the
//! authoritative record, or rolled back to the exact snapshot.
//!
//! ### Row Score Cache
//!
//! [`RowScoreCache`] memoizes a CPU-heavy per-row score with bounded FIFO
//! eviction.
//!
//! ## Quick Start
//!
//! ```rust
//! use listview_engine::{Dashboard, Record, RecordPatch, RemoteError, Status, Viewport};
//!
//! let records = vec![
//!     Record::new("1", "Alice", "alice@example.com", 30, Status::Active),
//!     Record::new("2", "Bob", "bob@example.com", 41, Status::Inactive),
//! ];
//! let mut dashboard = Dashboard::with_records(records, Viewport::default(), 2000).unwrap();
//!
//! // Optimistic edit: visible before the remote store answers.
//! let ticket = dashboard.begin_mutation("1", RecordPatch::new().age(31)).unwrap();
//! assert_eq!(dashboard.frame().visible_rows[0].record.age, 31);
//!
//! // The remote store fails: the edit is rolled back.
//! dashboard.settle_mutation(&ticket, Err(RemoteError::server_error("boom")));
//! assert_eq!(dashboard.frame().visible_rows[0].record.age, 30);
//! ```

pub mod controls;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod frame;
pub mod mutation;
pub mod page;
pub mod record;
pub mod score;
pub mod store;
pub mod view;
pub mod window;

// Re-export main types at crate root
pub use controls::ViewControls;
pub use dashboard::{Dashboard, LoadState};
pub use error::{Error, RemoteError, RemoteErrorKind};
pub use filter::{FilterState, Matcher, SortDirection, SortKey, StatusFilter};
pub use frame::{Frame, RowKey, VisibleRow};
pub use mutation::{
    MutationCache, MutationId, MutationOutcome, MutationRecord, MutationStatus, MutationTicket,
};
pub use page::{Pagination, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use record::{Record, RecordPatch, Status};
pub use score::{compute_score, RowScoreCache, ScoreKey, DEFAULT_SCORE_CAPACITY, SCORE_ITERATIONS};
pub use store::RecordStore;
pub use view::{compute_view, view_positions, ViewMemo};
pub use window::{VirtualRow, Viewport, Window, DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT};

/// Type aliases for clarity
pub type RecordId = String;
