//! Scroll-related logic for `Sheet`.
//!
//! Includes viewport scroll state management and the autoscroll timer that
//! keeps a drag gesture going once the pointer leaves the cell area.

use tracing::trace;

use super::events::Gesture;
use super::selection::step_visible;
use super::Sheet;
use crate::types::{CellPos, ScrollAlign};

/// Handle for a repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Host timer service.
///
/// While a timer runs the host calls [`Sheet::autoscroll_tick`] every interval.
pub trait Scheduler {
    fn start(&mut self, interval_ms: u32) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

/// Scheduler that only tracks which timer is running; the host drives ticks by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    running: Option<TimerId>,
}

impl ManualScheduler {
    pub fn running(&self) -> Option<TimerId> {
        self.running
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, _interval_ms: u32) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.running = Some(id);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.running == Some(id) {
            self.running = None;
        }
    }
}

impl Sheet {
    /// Resize the widget (title areas included).
    pub fn set_viewport_size(&mut self, width: i32, height: i32) {
        self.viewport.resize(width, height, &self.layout);
        self.invalidate_all();
    }

    /// Scroll to an absolute cell-area offset. Returns whether the view moved.
    pub fn scroll_to(&mut self, x: i32, y: i32) -> bool {
        let moved = self.viewport.set_scroll(x, y, &self.layout);
        if moved {
            self.invalidate_all();
        }
        moved
    }

    /// Scroll by a pixel delta. Returns whether the view moved.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) -> bool {
        let moved = self.viewport.scroll_by(dx, dy, &self.layout);
        if moved {
            self.invalidate_all();
        }
        moved
    }

    /// Scroll so `row`/`col` sits at the requested edge; `None` leaves that axis alone.
    pub fn moveto(
        &mut self,
        row: i32,
        col: i32,
        row_align: Option<ScrollAlign>,
        col_align: Option<ScrollAlign>,
    ) -> bool {
        let moved = self
            .viewport
            .moveto(row, col, row_align, col_align, &self.layout);
        if moved {
            self.invalidate_all();
        }
        moved
    }

    /// Minimal scroll that shows `pos` entirely.
    pub(crate) fn scroll_into_view(&mut self, pos: CellPos) -> bool {
        let moved = self
            .viewport
            .scroll_into_view(pos.row, pos.col, &self.layout);
        if moved {
            self.invalidate_all();
        }
        moved
    }

    pub(crate) fn start_autoscroll(&mut self) {
        if self.config.autoscroll && self.selection.timer.is_none() {
            let id = self.scheduler.start(self.config.autoscroll_interval_ms);
            self.selection.timer = Some(id);
        }
    }

    pub(crate) fn stop_autoscroll(&mut self) {
        if let Some(id) = self.selection.timer.take() {
            self.scheduler.cancel(id);
        }
    }

    pub fn autoscroll_running(&self) -> bool {
        self.selection.timer.is_some()
    }

    /// Timer callback: scroll one entry toward the pointer if it left the cell
    /// area, then re-run the gesture at the pointer. Returns whether the view moved.
    pub fn autoscroll_tick(&mut self) -> bool {
        let gesture = self.selection.gesture;
        if gesture == Gesture::Idle {
            self.stop_autoscroll();
            return false;
        }
        let visible = self.viewport.visible_range();
        if !visible.is_set() {
            return false;
        }
        let (x, y) = self.selection.pointer;
        let vertical = !matches!(gesture, Gesture::SelectColumns | Gesture::ColumnResize { .. });
        let horizontal = !matches!(gesture, Gesture::SelectRows | Gesture::RowResize { .. });

        let mut row_step = None;
        if vertical {
            if y < self.layout.header_height() && visible.row0 > 0 {
                row_step = Some((step_visible(self.grid.rows(), visible.row0, -1), ScrollAlign::Start));
            } else if y >= self.viewport.height && visible.rowi < self.grid.max_row() {
                row_step = Some((step_visible(self.grid.rows(), visible.rowi, 1), ScrollAlign::End));
            }
        }
        let mut col_step = None;
        if horizontal {
            if x < self.layout.header_width() && visible.col0 > 0 {
                col_step = Some((step_visible(self.grid.columns(), visible.col0, -1), ScrollAlign::Start));
            } else if x >= self.viewport.width && visible.coli < self.grid.max_col() {
                col_step = Some((step_visible(self.grid.columns(), visible.coli, 1), ScrollAlign::End));
            }
        }
        if row_step.is_none() && col_step.is_none() {
            return false;
        }

        let moved = self.moveto(
            row_step.map_or(0, |(row, _)| row),
            col_step.map_or(0, |(col, _)| col),
            row_step.map(|(_, align)| align),
            col_step.map(|(_, align)| align),
        );
        trace!(?row_step, ?col_step, moved, "autoscroll tick");
        if moved {
            self.motion(x, y);
        }
        moved
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_tracks_running_timer() {
        let mut scheduler = ManualScheduler::default();
        let first = scheduler.start(20);
        assert_eq!(scheduler.running(), Some(first));
        let second = scheduler.start(20);
        scheduler.cancel(first);
        assert_eq!(scheduler.running(), Some(second));
        scheduler.cancel(second);
        assert_eq!(scheduler.running(), None);
    }
}
