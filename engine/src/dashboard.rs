//! Dashboard - the composed data-view engine.
//!
//! Ties the mutation cache (canonical records), the view memo, pagination,
//! windowing and the row score cache into a single frame producer. Reads
//! always derive from the latest canonical state; writes go only through the
//! load and mutation entry points.

use crate::{
    error::Result, Error, Frame, MutationCache, MutationOutcome, MutationTicket, Record,
    RecordPatch, RemoteError, RowScoreCache, SortKey, StatusFilter, ViewControls, ViewMemo,
    Viewport, VisibleRow,
};

/// Progress of the initial load (or a retry).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(RemoteError),
}

#[derive(Debug)]
pub struct Dashboard {
    cache: MutationCache,
    load_state: LoadState,
    controls: ViewControls,
    viewport: Viewport,
    memo: ViewMemo,
    scores: RowScoreCache,
}

impl Dashboard {
    pub fn new(viewport: Viewport, score_capacity: usize) -> Self {
        Self {
            cache: MutationCache::new(),
            load_state: LoadState::Idle,
            controls: ViewControls::new(),
            viewport,
            memo: ViewMemo::new(),
            scores: RowScoreCache::new(score_capacity),
        }
    }

    /// Build a ready dashboard over an already loaded record set.
    pub fn with_records(
        records: Vec<Record>,
        viewport: Viewport,
        score_capacity: usize,
    ) -> Result<Self> {
        let mut dashboard = Self::new(viewport, score_capacity);
        dashboard.begin_load();
        dashboard.finish_load(Ok(records))?;
        Ok(dashboard)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn controls(&self) -> &ViewControls {
        &self.controls
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn cache(&self) -> &MutationCache {
        &self.cache
    }

    pub fn scores(&self) -> &RowScoreCache {
        &self.scores
    }

    // Load lifecycle

    /// Mark a load (or retry) as in flight.
    pub fn begin_load(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Apply the result of `listRecords`.
    ///
    /// Returns the number of loaded records. A failure leaves the previous
    /// canonical set in place and moves to [`LoadState::Failed`].
    pub fn finish_load(
        &mut self,
        result: std::result::Result<Vec<Record>, RemoteError>,
    ) -> Result<usize> {
        let records = match result {
            Ok(records) => records,
            Err(error) => {
                self.load_state = LoadState::Failed(error.clone());
                return Err(Error::Remote(error));
            }
        };

        let count = records.len();
        if let Err(error) = self.cache.replace_all(records) {
            self.load_state = LoadState::Failed(RemoteError::bad_request(error.to_string()));
            return Err(error);
        }

        self.load_state = LoadState::Ready;
        Ok(count)
    }

    // View controls

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.controls.set_search(text);
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.controls.set_status(status);
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.controls.toggle_sort(key);
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        self.controls.set_page(page)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.controls.set_page_size(page_size)
    }

    pub fn scroll_to(&mut self, offset: f64) {
        self.controls.scroll_to(offset);
    }

    // Reads

    /// Produce the frame for the current state.
    ///
    /// With an unchanged record set and filter this only touches the rows in
    /// the window.
    pub fn frame(&mut self) -> Frame {
        let store = self.cache.store();
        let positions = self.memo.positions(store, self.controls.filter());
        let pagination = self.controls.pagination();
        let page_rows = pagination.slice(positions);

        let scroll_offset = self
            .viewport
            .clamp_scroll(page_rows.len(), self.controls.scroll_offset());
        let window = self.viewport.window(page_rows.len(), scroll_offset);

        let mut visible_rows = Vec::with_capacity(window.len());
        for row in window.rows() {
            let record = &store.records()[page_rows[row.index]];
            let score = self
                .scores
                .score_for(&record.id, record.age, record.status);
            visible_rows.push(VisibleRow {
                record: record.clone(),
                index: row.index,
                top_offset: row.top,
                height: row.height,
                score,
                is_mutating: self.cache.is_pending(&record.id),
            });
        }

        Frame {
            visible_rows,
            total_height: window.total_height(),
            total_count: positions.len(),
            page: pagination.page(),
            page_size: pagination.page_size(),
            page_count: pagination.page_count(positions.len()),
            scroll_offset,
            is_loading: self.load_state == LoadState::Loading,
            is_error: matches!(self.load_state, LoadState::Failed(_)),
        }
    }

    // Mutations

    /// Apply an optimistic edit; the next read already reflects it.
    pub fn begin_mutation(&mut self, id: &str, patch: RecordPatch) -> Result<MutationTicket> {
        self.cache.begin(id, patch)
    }

    /// Commit or roll back a mutation with the remote outcome.
    pub fn settle_mutation(
        &mut self,
        ticket: &MutationTicket,
        remote: std::result::Result<Record, RemoteError>,
    ) -> MutationOutcome {
        self.cache.settle(ticket, remote)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Viewport::default(), crate::DEFAULT_SCORE_CAPACITY)
    }
}
