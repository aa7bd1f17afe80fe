//! The sheet: aggregate root wiring cell storage, coordinate mapping,
//! selection state and the host collaborators together.
//!
//! All mutation is synchronous. Pointer handlers live in `events`, the
//! autoscroll timer in `scroll`, structural edits in `structure`.

mod cells;
mod events;
mod scroll;
mod selection;
mod signals;
mod structure;

pub use events::{Gesture, HitTarget, Modifiers};
pub use scroll::{ManualScheduler, Scheduler, TimerId};
pub use signals::{NoSignals, SheetSignals};

use tracing::debug;

use self::selection::SelectionState;
use crate::cell_ref::col_to_letter;
use crate::color::Rgba;
use crate::editor::{EditorFactory, EditorSession, EditorState};
use crate::error::Result;
use crate::grid::{GridStore, TitleButton};
use crate::layout::{CellRect, SheetLayout, Viewport};
use crate::render::{CellRenderData, NullSurface, PaintSurface};
use crate::styles::AttributeOverlay;
use crate::types::{
    CellLink, CellPos, Justification, SelectionMode, SheetConfig, SheetRange, SheetState,
};

/// A spreadsheet-style grid without any drawing code
pub struct Sheet {
    title: Option<String>,
    description: Option<String>,
    config: SheetConfig,
    grid: GridStore,
    overlay: AttributeOverlay,
    layout: SheetLayout,
    viewport: Viewport,
    selection: SelectionState,
    editor: EditorState,
    surface: Box<dyn PaintSurface>,
    signals: Box<dyn SheetSignals>,
    scheduler: Box<dyn Scheduler>,
    /// Nested freeze depth; paints are suppressed while > 0
    freeze_count: u32,
    is_sensitive: bool,
}

impl Sheet {
    /// Create a sheet with default configuration.
    ///
    /// # Errors
    /// Returns an error if the descriptor arrays cannot be allocated.
    pub fn new(rows: usize, columns: usize, title: Option<&str>) -> Result<Self> {
        Self::with_config(rows, columns, title, SheetConfig::default())
    }

    /// Create a sheet with the given configuration.
    ///
    /// # Errors
    /// Returns an error if the descriptor arrays cannot be allocated.
    pub fn with_config(
        rows: usize,
        columns: usize,
        title: Option<&str>,
        config: SheetConfig,
    ) -> Result<Self> {
        let config = config.sanitized();
        let grid = GridStore::new(
            rows,
            columns,
            config.default_row_height,
            config.default_column_width,
        )?;
        let layout = SheetLayout::new(grid.rows(), grid.columns());
        let mut sheet = Self {
            title: title.map(str::to_string),
            description: None,
            overlay: AttributeOverlay::new(&config),
            config,
            grid,
            layout,
            viewport: Viewport::new(),
            selection: SelectionState::default(),
            editor: EditorState::default(),
            surface: Box::new(NullSurface),
            signals: Box::new(NoSignals),
            scheduler: Box::new(ManualScheduler::default()),
            freeze_count: 0,
            is_sensitive: true,
        };
        sheet.relayout();
        sheet.set_active_cell(0, 0);
        debug!(rows, columns, "created sheet");
        Ok(sheet)
    }

    // ---- Collaborators ----

    pub fn set_paint_surface(&mut self, surface: Box<dyn PaintSurface>) {
        self.surface = surface;
        self.invalidate_all();
    }

    pub fn set_signals(&mut self, signals: Box<dyn SheetSignals>) {
        self.signals = signals;
    }

    /// Install the autoscroll timer host. A running timer on the old host is canceled.
    pub fn set_scheduler(&mut self, scheduler: Box<dyn Scheduler>) {
        self.stop_autoscroll();
        self.scheduler = scheduler;
    }

    /// Install the editor factory; the active cell gets a fresh session from it.
    pub fn set_editor_factory(&mut self, factory: Box<dyn EditorFactory>) {
        let reopen = self.editor.is_editing();
        self.editor.set_factory(factory);
        if reopen {
            self.open_editor(self.selection.active);
        }
    }

    // ---- Sheet properties ----

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        self.title = title.map(str::to_string);
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = description.map(str::to_string);
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn rows_count(&self) -> i32 {
        self.grid.max_row() + 1
    }

    pub fn columns_count(&self) -> i32 {
        self.grid.max_col() + 1
    }

    pub fn max_row(&self) -> i32 {
        self.grid.max_row()
    }

    pub fn max_col(&self) -> i32 {
        self.grid.max_col()
    }

    pub fn max_alloc_row(&self) -> i32 {
        self.grid.max_alloc_row()
    }

    pub fn max_alloc_col(&self) -> i32 {
        self.grid.max_alloc_col()
    }

    pub fn is_locked(&self) -> bool {
        self.config.locked
    }

    /// Locked sheets reject editing and move/resize gestures.
    pub fn set_locked(&mut self, locked: bool) {
        self.config.locked = locked;
        let editable = self.active_cell_editable();
        if let Some(session) = self.editor.session_mut() {
            session.set_editable(editable);
        }
    }

    pub fn rows_resizable(&self) -> bool {
        self.config.rows_resizable
    }

    pub fn set_rows_resizable(&mut self, resizable: bool) {
        self.config.rows_resizable = resizable;
    }

    pub fn columns_resizable(&self) -> bool {
        self.config.columns_resizable
    }

    pub fn set_columns_resizable(&mut self, resizable: bool) {
        self.config.columns_resizable = resizable;
    }

    pub fn autoscroll(&self) -> bool {
        self.config.autoscroll
    }

    pub fn set_autoscroll(&mut self, autoscroll: bool) {
        self.config.autoscroll = autoscroll;
        if !autoscroll {
            self.stop_autoscroll();
        }
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.config.selection_mode
    }

    /// Change the selection mode; a selection the new mode cannot express is dropped.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        let range = self.selection.range;
        let keep = match self.selection.state {
            SheetState::Normal => true,
            SheetState::RangeSelected => mode.allows_ranges(),
            SheetState::RowSelected => {
                mode.allows_lines() && (mode.allows_ranges() || range.row_count() == 1)
            }
            SheetState::ColumnSelected => {
                mode.allows_lines() && (mode.allows_ranges() || range.col_count() == 1)
            }
        };
        if !keep {
            self.unselect_range();
        }
    }

    pub fn is_sensitive(&self) -> bool {
        self.is_sensitive
    }

    /// An insensitive sheet ignores pointer input.
    pub fn set_sensitive(&mut self, sensitive: bool) {
        self.is_sensitive = sensitive;
        self.invalidate_all();
    }

    /// Color of the grid lines between cells.
    pub fn grid_color(&self) -> Rgba {
        self.config.grid_color
    }

    pub fn set_grid_color(&mut self, color: Rgba) {
        if self.config.grid_color != color {
            self.config.grid_color = color;
            self.invalidate_all();
        }
    }

    // ---- Freeze / thaw ----

    /// Suppress repaints until the matching [`Sheet::thaw`].
    pub fn freeze(&mut self) {
        self.freeze_count = self.freeze_count.saturating_add(1);
    }

    /// Undo one [`Sheet::freeze`]; the last one repaints everything.
    pub fn thaw(&mut self) {
        if self.freeze_count == 0 {
            return;
        }
        self.freeze_count -= 1;
        if self.freeze_count == 0 {
            self.relayout();
            self.invalidate_all();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_count > 0
    }

    // ---- Title areas ----

    pub fn row_titles_visible(&self) -> bool {
        self.config.row_titles_visible
    }

    pub fn show_row_titles(&mut self) {
        self.config.row_titles_visible = true;
        self.relayout();
        self.invalidate_all();
    }

    pub fn hide_row_titles(&mut self) {
        self.config.row_titles_visible = false;
        self.relayout();
        self.invalidate_all();
    }

    pub fn column_titles_visible(&self) -> bool {
        self.config.column_titles_visible
    }

    pub fn show_column_titles(&mut self) {
        self.config.column_titles_visible = true;
        self.relayout();
        self.invalidate_all();
    }

    pub fn hide_column_titles(&mut self) {
        self.config.column_titles_visible = false;
        self.relayout();
        self.invalidate_all();
    }

    pub fn set_row_titles_width(&mut self, width: i32) {
        self.config.row_title_width = width.max(0);
        self.relayout();
        self.invalidate_all();
    }

    pub fn set_column_titles_height(&mut self, height: i32) {
        self.config.column_title_height = height.max(0);
        self.relayout();
        self.invalidate_all();
    }

    // ---- Row and column titles ----

    /// Label shown on the row title button; defaults to the 1-based row number.
    pub fn row_label(&self, row: i32) -> Option<String> {
        let descriptor = self.grid.row(row)?;
        Some(match descriptor.button.label.as_deref() {
            Some(label) => label.to_string(),
            None => (row + 1).to_string(),
        })
    }

    /// Label actually drawn for the row, `None` when the label is hidden.
    pub fn row_title_text(&self, row: i32) -> Option<String> {
        let descriptor = self.grid.row(row)?;
        if !descriptor.button.label_visible {
            return None;
        }
        descriptor
            .renders_label()
            .map(str::to_string)
            .or_else(|| self.row_label(row))
    }

    pub fn set_row_label(&mut self, row: i32, label: Option<&str>) {
        if let Some(descriptor) = self.grid.row_mut(row) {
            descriptor.button.label = label.map(str::to_string);
            self.invalidate_all();
        }
    }

    pub fn set_row_label_visible(&mut self, row: i32, visible: bool) {
        if let Some(descriptor) = self.grid.row_mut(row) {
            descriptor.button.label_visible = visible;
            self.invalidate_all();
        }
    }

    pub fn row_name(&self, row: i32) -> Option<&str> {
        self.grid.row(row)?.name.as_deref()
    }

    pub fn set_row_name(&mut self, row: i32, name: Option<&str>) {
        if let Some(descriptor) = self.grid.row_mut(row) {
            descriptor.name = name.map(str::to_string);
        }
    }

    /// Label shown on the column title button; defaults to the column letters.
    pub fn column_label(&self, col: i32) -> Option<String> {
        let descriptor = self.grid.column(col)?;
        Some(match descriptor.button.label.as_deref() {
            Some(label) => label.to_string(),
            None => col_to_letter(col),
        })
    }

    /// Label actually drawn for the column, `None` when the label is hidden.
    pub fn column_title_text(&self, col: i32) -> Option<String> {
        let descriptor = self.grid.column(col)?;
        if !descriptor.button.label_visible {
            return None;
        }
        descriptor
            .renders_label()
            .map(str::to_string)
            .or_else(|| self.column_label(col))
    }

    pub fn set_column_label(&mut self, col: i32, label: Option<&str>) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.button.label = label.map(str::to_string);
            self.invalidate_all();
        }
    }

    pub fn set_column_label_visible(&mut self, col: i32, visible: bool) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.button.label_visible = visible;
            self.invalidate_all();
        }
    }

    pub fn set_column_label_justification(&mut self, col: i32, justification: Justification) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.button.justification = justification;
            self.invalidate_all();
        }
    }

    /// Host application content inside the column title button.
    pub fn set_column_button_child(&mut self, col: i32, child: Option<CellLink>) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.button.child = child;
            self.invalidate_all();
        }
    }

    pub fn column_button_child(&self, col: i32) -> Option<&CellLink> {
        self.grid.column(col)?.hosts_child_content()
    }

    pub fn set_row_button_child(&mut self, row: i32, child: Option<CellLink>) {
        if let Some(descriptor) = self.grid.row_mut(row) {
            descriptor.button.child = child;
            self.invalidate_all();
        }
    }

    pub fn row_button_child(&self, row: i32) -> Option<&CellLink> {
        self.grid.row(row)?.hosts_child_content()
    }

    pub fn column_title(&self, col: i32) -> Option<&str> {
        self.grid.column(col)?.title.as_deref()
    }

    pub fn set_column_title(&mut self, col: i32, title: Option<&str>) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.title = title.map(str::to_string);
        }
    }

    // ---- Column properties ----

    pub fn column_justification(&self, col: i32) -> Option<Justification> {
        Some(self.grid.column(col)?.justification)
    }

    /// Default justification for cells of `col` without an attribute override.
    pub fn set_column_justification(&mut self, col: i32, justification: Justification) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.justification = justification;
            self.invalidate_range(&SheetRange::new(0, col, self.grid.max_row(), col));
        }
    }

    pub fn column_readonly(&self, col: i32) -> bool {
        self.grid.column(col).is_some_and(|c| c.is_readonly)
    }

    /// A read-only column supersedes the editability of its cells.
    pub fn set_column_readonly(&mut self, col: i32, readonly: bool) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.is_readonly = readonly;
            if self.selection.active.col == col {
                let editable = self.active_cell_editable();
                if let Some(session) = self.editor.session_mut() {
                    session.set_editable(editable);
                }
            }
        }
    }

    // ---- Sensitivity ----

    pub fn set_row_sensitive(&mut self, row: i32, sensitive: bool) {
        if let Some(descriptor) = self.grid.row_mut(row) {
            descriptor.is_sensitive = sensitive;
            self.invalidate_all();
        }
    }

    pub fn set_rows_sensitive(&mut self, sensitive: bool) {
        for descriptor in self.grid.rows_mut() {
            descriptor.is_sensitive = sensitive;
        }
        self.invalidate_all();
    }

    pub fn row_sensitive(&self, row: i32) -> bool {
        self.grid.row(row).is_some_and(|r| r.is_sensitive)
    }

    pub fn set_column_sensitive(&mut self, col: i32, sensitive: bool) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.is_sensitive = sensitive;
            self.invalidate_all();
        }
    }

    pub fn set_columns_sensitive(&mut self, sensitive: bool) {
        for descriptor in self.grid.columns_mut() {
            descriptor.is_sensitive = sensitive;
        }
        self.invalidate_all();
    }

    pub fn column_sensitive(&self, col: i32) -> bool {
        self.grid.column(col).is_some_and(|c| c.is_sensitive)
    }

    // ---- Row and column tooltips ----

    pub fn set_row_tooltip_markup(&mut self, row: i32, markup: Option<&str>) {
        if let Some(descriptor) = self.grid.row_mut(row) {
            descriptor.tooltip_markup = markup.map(str::to_string);
        }
    }

    pub fn row_tooltip_markup(&self, row: i32) -> Option<&str> {
        self.grid.row(row)?.tooltip_markup.as_deref()
    }

    pub fn set_row_tooltip_text(&mut self, row: i32, text: Option<&str>) {
        if let Some(descriptor) = self.grid.row_mut(row) {
            descriptor.tooltip_text = text.map(str::to_string);
        }
    }

    pub fn row_tooltip_text(&self, row: i32) -> Option<&str> {
        self.grid.row(row)?.tooltip_text.as_deref()
    }

    pub fn set_column_tooltip_markup(&mut self, col: i32, markup: Option<&str>) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.tooltip_markup = markup.map(str::to_string);
        }
    }

    pub fn column_tooltip_markup(&self, col: i32) -> Option<&str> {
        self.grid.column(col)?.tooltip_markup.as_deref()
    }

    pub fn set_column_tooltip_text(&mut self, col: i32, text: Option<&str>) {
        if let Some(descriptor) = self.grid.column_mut(col) {
            descriptor.tooltip_text = text.map(str::to_string);
        }
    }

    pub fn column_tooltip_text(&self, col: i32) -> Option<&str> {
        self.grid.column(col)?.tooltip_text.as_deref()
    }

    // ---- Entry passthrough ----

    /// Pending text of the active cell's editor.
    pub fn entry_text(&self) -> Option<String> {
        self.editor.session().map(EditorSession::text)
    }

    /// Replace the pending editor text; it is committed on deactivation.
    pub fn set_entry_text(&mut self, text: &str) {
        if let Some(session) = self.editor.session_mut() {
            session.set_text(text);
        }
    }

    /// Override the editability of the current session only.
    pub fn set_entry_editable(&mut self, editable: bool) {
        if let Some(session) = self.editor.session_mut() {
            session.set_editable(editable);
        }
    }

    pub fn entry_editable(&self) -> bool {
        self.editor.session().is_some_and(EditorSession::is_editable)
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_editing()
    }

    // ---- Queries ----

    /// Logical cell under a widget pixel, `None` outside the cell area or past the grid.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellPos> {
        if x < self.layout.header_width() || y < self.layout.header_height() {
            return None;
        }
        let pos = self.viewport.cell_at(x, y, &self.layout);
        self.grid.contains(pos.row, pos.col).then_some(pos)
    }

    /// Cell rectangle in widget coordinates.
    pub fn cell_area(&self, row: i32, col: i32) -> Option<CellRect> {
        self.viewport.cell_area(row, col, &self.layout)
    }

    /// First and last partially visible row and column.
    pub fn visible_range(&self) -> SheetRange {
        self.viewport.visible_range()
    }

    /// Render snapshots for every visible cell, row-major.
    pub fn render_cells(&self) -> Vec<CellRenderData> {
        let range = self.visible_range();
        let mut out = Vec::new();
        for pos in range.cells() {
            let Some(rect) = self.cell_area(pos.row, pos.col) else {
                continue;
            };
            if rect.width == 0 || rect.height == 0 {
                continue;
            }
            let (attributes, _) = self.overlay.attributes(&self.grid, pos.row, pos.col);
            out.push(CellRenderData {
                row: pos.row,
                col: pos.col,
                text: self.grid.cell(pos.row, pos.col).and_then(|c| c.text.clone()),
                attributes,
                state: self.cell_state(pos.row, pos.col),
                rect,
                is_active: pos == self.selection.active,
            });
        }
        out
    }

    // ---- Internal helpers ----

    /// Recompute offsets, title areas and the visible range.
    pub(crate) fn relayout(&mut self) {
        self.layout.recalc(self.grid.rows(), self.grid.columns());
        let width = if self.config.row_titles_visible {
            self.config.row_title_width
        } else {
            0
        };
        let height = if self.config.column_titles_visible {
            self.config.column_title_height
        } else {
            0
        };
        self.layout.set_header_dimensions(width, height);
        self.viewport.clamp_scroll(&self.layout);
        self.viewport.recalc_visible_range(&self.layout);
    }

    pub(crate) fn invalidate_range(&mut self, range: &SheetRange) {
        if self.freeze_count > 0 || !range.is_set() {
            return;
        }
        self.surface.invalidate(range);
    }

    pub(crate) fn invalidate_all(&mut self) {
        if self.freeze_count > 0 {
            return;
        }
        self.surface.invalidate_all();
    }

    /// Whether `pos` accepts typing.
    pub(crate) fn cell_editable(&self, pos: CellPos) -> bool {
        !self.config.locked && self.overlay.attributes(&self.grid, pos.row, pos.col).0.is_editable
    }

    pub(crate) fn active_cell_editable(&self) -> bool {
        self.cell_editable(self.selection.active)
    }

    /// Open an editor session on `pos` preloaded with its text.
    pub(crate) fn open_editor(&mut self, pos: CellPos) {
        let text = self
            .grid
            .cell(pos.row, pos.col)
            .map(|c| c.text().to_string())
            .unwrap_or_default();
        let editable = self.cell_editable(pos);
        self.editor.open(pos, &text, editable);
    }
}
