//! Row and column descriptors.
//!
//! One descriptor exists per logical row/column whether or not any cell in it
//! has been allocated.

use crate::types::{CellLink, Justification};

/// Size and visibility, the two things the coordinate mapper needs.
pub trait AxisDescriptor {
    /// Height (rows) or width (columns) in pixels
    fn size(&self) -> i32;
    fn is_visible(&self) -> bool;

    /// Pixels this entry occupies on screen: hidden entries take none.
    fn visible_size(&self) -> i32 {
        if self.is_visible() {
            self.size().max(0)
        } else {
            0
        }
    }
}

/// Title button shown in the row/column title area.
#[derive(Debug, Clone, Default)]
pub struct SheetButton {
    pub label: Option<String>,
    pub label_visible: bool,
    pub justification: Justification,
    /// Application content hosted instead of a label
    pub child: Option<CellLink>,
}

impl SheetButton {
    pub fn new() -> Self {
        Self {
            label_visible: true,
            justification: Justification::Center,
            ..Self::default()
        }
    }
}

/// Capabilities of a title button: it may render a label, host child content, or both.
pub trait TitleButton {
    fn button(&self) -> &SheetButton;

    /// The label to draw, if this title renders one.
    fn renders_label(&self) -> Option<&str> {
        let button = self.button();
        if button.label_visible {
            button.label.as_deref()
        } else {
            None
        }
    }

    /// Child content the title hosts, if any.
    fn hosts_child_content(&self) -> Option<&CellLink> {
        self.button().child.as_ref()
    }
}

/// Per-row descriptor
#[derive(Debug, Clone)]
pub struct RowDescriptor {
    pub height: i32,
    pub is_visible: bool,
    /// Whether the row title reacts to clicks
    pub is_sensitive: bool,
    /// Row name for application use
    pub name: Option<String>,
    pub button: SheetButton,
    pub tooltip_markup: Option<String>,
    pub tooltip_text: Option<String>,
}

impl RowDescriptor {
    pub fn new(height: i32) -> Self {
        Self {
            height,
            is_visible: true,
            is_sensitive: true,
            name: None,
            button: SheetButton::new(),
            tooltip_markup: None,
            tooltip_text: None,
        }
    }
}

impl AxisDescriptor for RowDescriptor {
    fn size(&self) -> i32 {
        self.height
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }
}

impl TitleButton for RowDescriptor {
    fn button(&self) -> &SheetButton {
        &self.button
    }
}

/// Per-column descriptor
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub width: i32,
    pub is_visible: bool,
    pub is_sensitive: bool,
    /// Column title for application use
    pub title: Option<String>,
    pub button: SheetButton,
    /// Default justification for cells without an attribute override
    pub justification: Justification,
    /// Supersedes cell editability
    pub is_readonly: bool,
    pub tooltip_markup: Option<String>,
    pub tooltip_text: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(width: i32) -> Self {
        Self {
            width,
            is_visible: true,
            is_sensitive: true,
            title: None,
            button: SheetButton::new(),
            justification: Justification::Left,
            is_readonly: false,
            tooltip_markup: None,
            tooltip_text: None,
        }
    }
}

impl AxisDescriptor for ColumnDescriptor {
    fn size(&self) -> i32 {
        self.width
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }
}

impl TitleButton for ColumnDescriptor {
    fn button(&self) -> &SheetButton {
        &self.button
    }
}
