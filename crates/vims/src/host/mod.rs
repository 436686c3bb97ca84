//! Interfaces to the host editor.
//!
//! The engine never touches text directly. It reads selections and lines,
//! asks the host where a motion lands or which range a text object covers,
//! and sends back text edits.

mod clipboard;
mod document;
mod memory;
mod status;

pub use clipboard::{registers_for, MemoryRegisters, RegisterContent, Registers, SystemClipboard};
pub use document::Document;
pub use memory::MemoryEditor;
pub use status::{NullStatus, SharedStatus, StatusState, StatusSurface};

use anyhow::Result;
use futures_util::future::LocalBoxFuture;
use vims_chord::{Motion, TextObject};

/// A position in a document. `character` counts chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A half-open range between two positions, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Builds a range from two positions in any order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A selection. The cursor is at `active`; an empty selection is a bare
/// cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    pub fn cursor(at: Position) -> Self {
        Self {
            anchor: at,
            active: at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }
}

/// One text edit, expressed against the document before any edit of the
/// same batch is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range,
    pub text: String,
}

impl TextEdit {
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self {
            range: Range { start: at, end: at },
            text: text.into(),
        }
    }

    pub fn delete(range: Range) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }

    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// The host editor: document context, selections, buffer mutation and the
/// motion/text-object provider.
pub trait Editor {
    /// Returns false when there is no document to act on.
    fn has_document(&self) -> bool;

    fn selections(&self) -> Vec<Selection>;

    fn set_selections(&mut self, selections: Vec<Selection>);

    fn line_count(&self) -> usize;

    /// Text of a line without its line break. Out of range lines are empty.
    fn line_text(&self, line: usize) -> String;

    /// Applies a batch of non-overlapping edits. Selections are shifted
    /// through the edits by the host.
    fn apply_edits(&mut self, edits: Vec<TextEdit>) -> LocalBoxFuture<'_, Result<()>>;

    /// Where `motion` lands when started at `from`.
    fn motion_target(&mut self, from: Position, motion: &Motion) -> Position;

    /// Range covered by `object` around `at`, if any.
    fn text_object_range(&self, at: Position, object: &TextObject) -> Option<Range>;
}
