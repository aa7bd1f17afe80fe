//! Common test utilities: recording collaborators and pixel helpers.
//!
//! Every collaborator writes into an `Rc<RefCell<_>>` log that the test keeps a
//! handle to, so assertions can run after the sheet took ownership.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use gridsheet::{
    CellPos, PaintSurface, Scheduler, Sheet, SheetConfig, SheetRange, SheetSignals, TimerId,
};

// ============================================================================
// Signals
// ============================================================================

/// One notification raised by the sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Traverse(CellPos, CellPos),
    Deactivate(CellPos, String),
    Activate(CellPos),
    SelectRow(i32),
    SelectColumn(i32),
    SelectRange(SheetRange),
    MoveRange(SheetRange, SheetRange),
    ResizeRange(SheetRange, SheetRange),
    ClipRange(SheetRange),
    Changed(i32, i32),
    ClearCell(i32, i32),
    NewColumnWidth(i32, i32),
    NewRowHeight(i32, i32),
}

#[derive(Debug, Default)]
pub struct SignalLog {
    pub signals: Vec<Signal>,
    pub veto_traverse: bool,
    pub veto_deactivate: bool,
    /// Rewrites the target of every traverse
    pub redirect: Option<CellPos>,
}

impl SignalLog {
    pub fn take(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn count(&self, pred: impl Fn(&Signal) -> bool) -> usize {
        self.signals.iter().filter(|s| pred(s)).count()
    }
}

pub struct RecordingSignals(pub Rc<RefCell<SignalLog>>);

impl SheetSignals for RecordingSignals {
    fn traverse(&mut self, from: CellPos, to: &mut CellPos) -> bool {
        let mut log = self.0.borrow_mut();
        if let Some(redirect) = log.redirect {
            *to = redirect;
        }
        log.signals.push(Signal::Traverse(from, *to));
        !log.veto_traverse
    }

    fn deactivate(&mut self, cell: CellPos, pending_text: &str) -> bool {
        let mut log = self.0.borrow_mut();
        log.signals
            .push(Signal::Deactivate(cell, pending_text.to_string()));
        !log.veto_deactivate
    }

    fn activate(&mut self, cell: CellPos) {
        self.0.borrow_mut().signals.push(Signal::Activate(cell));
    }

    fn select_row(&mut self, row: i32) {
        self.0.borrow_mut().signals.push(Signal::SelectRow(row));
    }

    fn select_column(&mut self, col: i32) {
        self.0.borrow_mut().signals.push(Signal::SelectColumn(col));
    }

    fn select_range(&mut self, range: &SheetRange) {
        self.0.borrow_mut().signals.push(Signal::SelectRange(*range));
    }

    fn move_range(&mut self, old: &SheetRange, new: &SheetRange) {
        self.0
            .borrow_mut()
            .signals
            .push(Signal::MoveRange(*old, *new));
    }

    fn resize_range(&mut self, old: &SheetRange, new: &SheetRange) {
        self.0
            .borrow_mut()
            .signals
            .push(Signal::ResizeRange(*old, *new));
    }

    fn clip_range(&mut self, range: &SheetRange) {
        self.0.borrow_mut().signals.push(Signal::ClipRange(*range));
    }

    fn changed(&mut self, row: i32, col: i32) {
        self.0.borrow_mut().signals.push(Signal::Changed(row, col));
    }

    fn clear_cell(&mut self, row: i32, col: i32) {
        self.0.borrow_mut().signals.push(Signal::ClearCell(row, col));
    }

    fn new_column_width(&mut self, col: i32, width: i32) {
        self.0
            .borrow_mut()
            .signals
            .push(Signal::NewColumnWidth(col, width));
    }

    fn new_row_height(&mut self, row: i32, height: i32) {
        self.0
            .borrow_mut()
            .signals
            .push(Signal::NewRowHeight(row, height));
    }
}

// ============================================================================
// Paint surface
// ============================================================================

#[derive(Debug, Default)]
pub struct PaintLog {
    pub ranges: Vec<SheetRange>,
    pub full: usize,
}

impl PaintLog {
    pub fn total(&self) -> usize {
        self.ranges.len() + self.full
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
        self.full = 0;
    }
}

pub struct RecordingSurface(pub Rc<RefCell<PaintLog>>);

impl PaintSurface for RecordingSurface {
    fn invalidate(&mut self, range: &SheetRange) {
        self.0.borrow_mut().ranges.push(*range);
    }

    fn invalidate_all(&mut self) {
        self.0.borrow_mut().full += 1;
    }
}

// ============================================================================
// Scheduler
// ============================================================================

#[derive(Debug, Default)]
pub struct TimerLog {
    next: u64,
    pub started: Vec<TimerId>,
    pub canceled: Vec<TimerId>,
}

impl TimerLog {
    /// Timers started and not yet canceled
    pub fn running(&self) -> Vec<TimerId> {
        self.started
            .iter()
            .copied()
            .filter(|id| !self.canceled.contains(id))
            .collect()
    }
}

pub struct RecordingScheduler(pub Rc<RefCell<TimerLog>>);

impl Scheduler for RecordingScheduler {
    fn start(&mut self, _interval_ms: u32) -> TimerId {
        let mut log = self.0.borrow_mut();
        log.next += 1;
        let id = TimerId(log.next);
        log.started.push(id);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.0.borrow_mut().canceled.push(id);
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A sheet wired to recording collaborators
pub struct Harness {
    pub sheet: Sheet,
    pub signals: Rc<RefCell<SignalLog>>,
    pub paint: Rc<RefCell<PaintLog>>,
    pub timers: Rc<RefCell<TimerLog>>,
}

impl Harness {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_config(rows, cols, SheetConfig::default())
    }

    pub fn with_config(rows: usize, cols: usize, config: SheetConfig) -> Self {
        let mut sheet = Sheet::with_config(rows, cols, Some("test"), config).unwrap();
        let signals = Rc::new(RefCell::new(SignalLog::default()));
        let paint = Rc::new(RefCell::new(PaintLog::default()));
        let timers = Rc::new(RefCell::new(TimerLog::default()));
        sheet.set_signals(Box::new(RecordingSignals(Rc::clone(&signals))));
        sheet.set_paint_surface(Box::new(RecordingSurface(Rc::clone(&paint))));
        sheet.set_scheduler(Box::new(RecordingScheduler(Rc::clone(&timers))));
        paint.borrow_mut().clear();
        Self {
            sheet,
            signals,
            paint,
            timers,
        }
    }
}

// ============================================================================
// Pixel helpers
// ============================================================================

/// Widget pixel at the center of a cell.
pub fn center(sheet: &Sheet, row: i32, col: i32) -> (i32, i32) {
    let rect = sheet.cell_area(row, col).expect("cell should have an area");
    (rect.x + rect.width / 2, rect.y + rect.height / 2)
}

/// Widget pixel at the lower-right corner of a cell.
pub fn lower_right(sheet: &Sheet, row: i32, col: i32) -> (i32, i32) {
    let rect = sheet.cell_area(row, col).expect("cell should have an area");
    (rect.x + rect.width, rect.y + rect.height)
}
