use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::CellAttributes;

/// Opaque application data attached to a cell.
///
/// The sheet never looks inside; it only stores, moves and drops the handle.
#[derive(Clone)]
pub struct CellLink(Rc<dyn Any>);

impl CellLink {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the payload if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// True when both handles point at the same payload.
    pub fn ptr_eq(&self, other: &CellLink) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CellLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellLink(..)")
    }
}

/// A single allocated cell record.
///
/// `row`/`col` are re-tagged whenever a structural edit moves the record.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
    /// Cell text, `None` once cleared
    pub text: Option<String>,
    /// Application handle
    pub link: Option<CellLink>,
    /// Attribute override; `None` falls back to column/sheet defaults
    pub attributes: Option<CellAttributes>,
    /// Tooltip marked up with Pango-style markup
    pub tooltip_markup: Option<String>,
    /// Plain tooltip text
    pub tooltip_text: Option<String>,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self {
            row,
            col,
            ..Self::default()
        }
    }

    /// The text, or `""` when unset.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Release text, link, tooltips and attribute override.
    pub fn release(&mut self) {
        self.text = None;
        self.link = None;
        self.attributes = None;
        self.tooltip_markup = None;
        self.tooltip_text = None;
    }

    /// True when the record carries nothing worth keeping.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.link.is_none()
            && self.attributes.is_none()
            && self.tooltip_markup.is_none()
            && self.tooltip_text.is_none()
    }
}
