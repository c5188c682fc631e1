//! The surface-owning model: rows, their index, sorting, activation, and columns.

use tokio::sync::mpsc;

use super::{Surface, SurfaceCommand, SurfaceSender, ViewMode};
use crate::config::{COLUMN_HEADERS, MIN_COLUMN_WIDTH, ViewConfig};
use crate::file_system::{Activation, FsEntry};
use crate::icons::Icon;
use crate::listing::{Row, RowId, RowIndex, SortSpec, sort_rows, sorted_insert_position};
use crate::pipeline::RunId;

/// Rough average glyph width used when auto-sizing columns.
const APPROX_CHAR_WIDTH: u32 = 7;

/// Horizontal padding added to every auto-sized column.
const COLUMN_PADDING: u32 = 12;

/// Rows as the user sees them, plus the index that binds each row to its entry.
///
/// Lives on the thread that owns the surface. Every row in `rows` has exactly one entry in
/// `index` and vice versa; both are only ever changed together by [`Self::apply`].
pub struct ThumbnailView<S: Surface> {
    surface: S,
    receiver: mpsc::UnboundedReceiver<SurfaceCommand>,
    rows: Vec<Row>,
    index: RowIndex,
    sort: SortSpec,
    /// Run whose Reset was applied last. Commands from any other run are dropped.
    current_run: Option<RunId>,
    view_mode: ViewMode,
    column_widths: [u32; 4],
}

impl<S: Surface> ThumbnailView<S> {
    /// Creates the view and the sender that pipeline workers use to reach it.
    pub fn new(surface: S, config: &ViewConfig) -> (Self, SurfaceSender) {
        let (sender, receiver) = SurfaceSender::channel();
        let view = Self {
            surface,
            receiver,
            rows: Vec::new(),
            index: RowIndex::new(),
            sort: config.default_sort,
            current_run: None,
            view_mode: config.view_mode,
            column_widths: [MIN_COLUMN_WIDTH; 4],
        };
        (view, sender)
    }

    /// Applies every queued command without waiting. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.receiver.try_recv() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    /// Waits for the next command and applies it. Returns false once every sender is gone.
    pub async fn next_command(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(command) => {
                self.apply(command);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, command: SurfaceCommand) {
        match command {
            SurfaceCommand::Reset { run } => self.reset(run),
            SurfaceCommand::AddRow { run, row, entry } => {
                if self.is_current(run) {
                    self.add_row(row, entry);
                } else {
                    log::trace!("Dropping row {} from stale run {}", row.id, run);
                }
            }
            SurfaceCommand::SetIcons { run, id, large, small } => {
                if self.is_current(run) {
                    self.set_icons(id, large, small);
                } else {
                    log::trace!("Dropping icons for {} from stale run {}", id, run);
                }
            }
        }
    }

    fn is_current(&self, run: RunId) -> bool {
        self.current_run == Some(run)
    }

    fn reset(&mut self, run: RunId) {
        if let Some(current) = self.current_run
            && run < current
        {
            log::trace!("Ignoring reset from stale run {} (current {})", run, current);
            return;
        }
        self.current_run = Some(run);
        self.rows.clear();
        self.index.clear();
        self.surface.clear_rows();
    }

    fn add_row(&mut self, row: Row, entry: FsEntry) {
        if !self.index.insert(row.id, entry) {
            log::warn!("Row {} added twice, ignoring the second one", row.id);
            return;
        }
        let position = sorted_insert_position(&self.rows, &row, &self.sort);
        self.rows.insert(position, row);
        self.surface.add_row(&self.rows[position], position);
    }

    fn set_icons(&mut self, id: RowId, large: Icon, small: Icon) {
        if !self.index.contains(id) {
            log::trace!("Icons for unknown row {}", id);
            return;
        }
        let Some(row) = self.rows.iter_mut().find(|r| r.id == id) else {
            log::trace!("Icons for unknown row {}", id);
            return;
        };
        self.surface.update_row_icon(id, &large, &small);
        row.large_icon = Some(large);
        row.small_icon = Some(small);
        self.surface.request_redraw(id);
    }

    // ========================================
    // Queries
    // ========================================

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    pub fn entry(&self, id: RowId) -> Option<&FsEntry> {
        self.index.get(id)
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.current_run
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Row names in display order.
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(Row::name).collect()
    }

    // ========================================
    // Sorting
    // ========================================

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    /// Replaces the sort spec and re-sorts every row, icons loaded or not.
    pub fn set_sort_spec(&mut self, spec: SortSpec) {
        self.sort = spec;
        self.sort();
    }

    /// Re-sorts all rows with the current spec.
    pub fn sort(&mut self) {
        sort_rows(&mut self.rows, &self.sort);
        let order: Vec<RowId> = self.rows.iter().map(|r| r.id).collect();
        self.surface.reorder(&order);
    }

    /// Column header click: same column flips direction, another column switches to it.
    pub fn click_column(&mut self, column: usize) {
        self.set_sort_spec(self.sort.clicked(column));
    }

    // ========================================
    // Activation
    // ========================================

    /// What activating (double-clicking) the row means. `None` for unknown rows and for
    /// files nothing can open.
    pub fn activate(&self, id: RowId) -> Option<Activation> {
        self.index.get(id).and_then(FsEntry::activation)
    }

    // ========================================
    // View mode and columns
    // ========================================

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switching to details mode auto-sizes the columns.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        if mode == ViewMode::Details {
            self.resize_columns();
        }
    }

    pub fn column_widths(&self) -> [u32; 4] {
        self.column_widths
    }

    /// Fits every column to its widest content, never narrower than [`MIN_COLUMN_WIDTH`].
    pub fn resize_columns(&mut self) {
        for (column, width) in self.column_widths.iter_mut().enumerate() {
            let widest = self
                .rows
                .iter()
                .map(|r| r.column(column).chars().count())
                .chain(std::iter::once(COLUMN_HEADERS[column].chars().count()))
                .max()
                .unwrap_or(0);
            let fitted = u32::try_from(widest)
                .unwrap_or(u32::MAX / APPROX_CHAR_WIDTH)
                .saturating_mul(APPROX_CHAR_WIDTH)
                .saturating_add(COLUMN_PADDING);
            *width = fitted.max(MIN_COLUMN_WIDTH);
        }
    }
}
