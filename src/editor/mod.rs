//! The editor collaborator.
//!
//! Exactly one cell is editable at a time. Activating a cell opens a short-lived
//! [`EditorSession`] through the host's [`EditorFactory`]; deactivating commits
//! the session text back into the grid and drops the session.

pub(crate) mod mutation;

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::CellPos;

/// Text entry bound to the active cell
pub trait EditorSession {
    /// Current (possibly uncommitted) text.
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn set_editable(&mut self, editable: bool);
    fn is_editable(&self) -> bool;
}

/// Opens an editor session for a newly activated cell
pub trait EditorFactory {
    fn open(&mut self, cell: CellPos) -> Box<dyn EditorSession>;
}

/// Headless in-memory editor, used when the host does not provide one.
///
/// The text buffer is shared so a host or test can type into a session that the
/// sheet owns.
#[derive(Debug, Clone)]
pub struct TextEditor {
    cell: CellPos,
    buffer: Rc<RefCell<String>>,
    editable: bool,
}

impl TextEditor {
    pub fn new(cell: CellPos) -> Self {
        Self {
            cell,
            buffer: Rc::new(RefCell::new(String::new())),
            editable: true,
        }
    }

    pub fn cell(&self) -> CellPos {
        self.cell
    }

    /// Handle to the live text buffer.
    pub fn buffer(&self) -> Rc<RefCell<String>> {
        Rc::clone(&self.buffer)
    }
}

impl EditorSession for TextEditor {
    fn text(&self) -> String {
        self.buffer.borrow().clone()
    }

    fn set_text(&mut self, text: &str) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.clear();
        buffer.push_str(text);
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    fn is_editable(&self) -> bool {
        self.editable
    }
}

/// Factory producing [`TextEditor`] sessions
#[derive(Debug, Default)]
pub struct TextEditorFactory;

impl EditorFactory for TextEditorFactory {
    fn open(&mut self, cell: CellPos) -> Box<dyn EditorSession> {
        Box::new(TextEditor::new(cell))
    }
}

/// Editor state (separate from the selection state).
pub(crate) struct EditorState {
    factory: Box<dyn EditorFactory>,
    /// Session for the active cell, `None` while no cell is active
    session: Option<Box<dyn EditorSession>>,
    /// Cell the session belongs to
    editing_cell: CellPos,
}

impl EditorState {
    pub(crate) fn new(factory: Box<dyn EditorFactory>) -> Self {
        Self {
            factory,
            session: None,
            editing_cell: CellPos::UNSET,
        }
    }

    pub(crate) fn set_factory(&mut self, factory: Box<dyn EditorFactory>) {
        self.factory = factory;
    }

    /// Open a session on `cell`, preloaded with its text. Any previous session is dropped.
    pub(crate) fn open(&mut self, cell: CellPos, text: &str, editable: bool) {
        let mut session = self.factory.open(cell);
        session.set_text(text);
        session.set_editable(editable);
        self.session = Some(session);
        self.editing_cell = cell;
    }

    /// Drop the session without reading it.
    pub(crate) fn discard(&mut self) {
        self.session = None;
        self.editing_cell = CellPos::UNSET;
    }

    /// Follow the active cell after rows/columns moved underneath it.
    pub(crate) fn retarget(&mut self, cell: CellPos) {
        if self.session.is_some() {
            self.editing_cell = cell;
        }
    }

    pub(crate) fn session(&self) -> Option<&dyn EditorSession> {
        self.session.as_deref()
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut (dyn EditorSession + 'static)> {
        self.session.as_deref_mut()
    }

    pub(crate) fn editing_cell(&self) -> CellPos {
        self.editing_cell
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Box::new(TextEditorFactory))
    }
}
