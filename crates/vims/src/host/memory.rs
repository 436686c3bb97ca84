//! In-memory editor used by the CLI and by tests.

use anyhow::Result;
use futures_util::future::{self, FutureExt, LocalBoxFuture};
use vims_chord::{Motion, TextObject};

use super::document::{Document, LastMatch};
use super::{Editor, Position, Range, Selection, TextEdit};

/// An [`Editor`] over a [`Document`] held in memory.
///
/// Buffers can be written in a marked notation: `[` is a selection anchor
/// and `]` its active end, so `"Hello []world"` is a bare cursor before
/// `w` and `"He[llo]"` selects `llo` with the cursor after it.
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    document: Document,
    selections: Vec<Selection>,
    has_document: bool,
    last_match: Option<LastMatch>,
    batches: usize,
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemoryEditor {
    /// An editor over `text` with a cursor at the start.
    pub fn new(text: &str) -> Self {
        Self {
            document: Document::new(text),
            selections: vec![Selection::default()],
            has_document: true,
            last_match: None,
            batches: 0,
        }
    }

    /// Parses the marked notation. Text without markers gets a cursor at
    /// the start; a lone marker is a bare cursor.
    pub fn from_marked(marked: &str) -> Self {
        let mut text = String::new();
        let mut markers: Vec<(char, usize)> = Vec::new();
        let mut offset = 0;
        for c in marked.chars() {
            if c == '[' || c == ']' {
                markers.push((c, offset));
            } else {
                text.push(c);
                offset += 1;
            }
        }

        let mut editor = Self::new(&text);
        let doc = &editor.document;
        let selections: Vec<Selection> = markers
            .chunks(2)
            .map(|pair| {
                let (anchor, active) = match pair {
                    [(a, x), (_, y)] if *a == '[' => (*x, *y),
                    [(_, x), (_, y)] => (*y, *x),
                    [(_, x)] => (*x, *x),
                    _ => (0, 0),
                };
                Selection::new(doc.position(anchor), doc.position(active))
            })
            .collect();
        if !selections.is_empty() {
            editor.selections = selections;
        }
        editor
    }

    /// Renders the buffer in the marked notation.
    pub fn to_marked(&self) -> String {
        let mut markers: Vec<(usize, u8, char)> = Vec::new();
        for s in &self.selections {
            markers.push((self.document.offset(s.anchor), 0, '['));
            markers.push((self.document.offset(s.active), 1, ']'));
        }
        markers.sort();

        let mut out = String::new();
        let mut markers = markers.into_iter().peekable();
        for (i, c) in self.document.text().chars().enumerate() {
            while let Some((_, _, m)) = markers.next_if(|(o, _, _)| *o == i) {
                out.push(m);
            }
            out.push(c);
        }
        out.extend(markers.map(|(_, _, m)| m));
        out
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    /// Simulates closing or opening the active document.
    pub fn set_has_document(&mut self, has_document: bool) {
        self.has_document = has_document;
    }

    /// Number of edit batches applied so far.
    pub fn edit_batches(&self) -> usize {
        self.batches
    }

    fn shift(offset: usize, applied: &[(usize, usize, usize)]) -> usize {
        applied
            .iter()
            .fold(offset, |offset, &(start, removed, inserted)| {
                if offset >= start + removed {
                    offset - removed + inserted
                } else if offset > start {
                    start
                } else {
                    offset
                }
            })
    }
}

impl Editor for MemoryEditor {
    fn has_document(&self) -> bool {
        self.has_document
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections
            .into_iter()
            .map(|s| Selection::new(self.document.clamp(s.anchor), self.document.clamp(s.active)))
            .collect();
    }

    fn line_count(&self) -> usize {
        self.document.line_count()
    }

    fn line_text(&self, line: usize) -> String {
        self.document.line(line).to_string()
    }

    fn apply_edits(&mut self, edits: Vec<TextEdit>) -> LocalBoxFuture<'_, Result<()>> {
        let before: Vec<(usize, usize)> = self
            .selections
            .iter()
            .map(|s| (self.document.offset(s.anchor), self.document.offset(s.active)))
            .collect();

        let applied = self.document.apply(&edits);
        self.batches += 1;

        self.selections = before
            .into_iter()
            .map(|(anchor, active)| {
                Selection::new(
                    self.document.position(Self::shift(anchor, &applied)),
                    self.document.position(Self::shift(active, &applied)),
                )
            })
            .collect();

        future::ready(Ok(())).boxed_local()
    }

    fn motion_target(&mut self, from: Position, motion: &Motion) -> Position {
        self.document.motion_target(from, motion, &mut self.last_match)
    }

    fn text_object_range(&self, at: Position, object: &TextObject) -> Option<Range> {
        self.document.text_object_range(at, object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_roundtrip() {
        for marked in ["Hello []world", "He[llo]", "ab]cd[ef", "a[]\nb[]", "end[]"] {
            assert_eq!(MemoryEditor::from_marked(marked).to_marked(), marked);
        }
    }

    #[test]
    fn test_unmarked_text_has_cursor_at_start() {
        let editor = MemoryEditor::from_marked("abc");
        assert_eq!(editor.selections(), vec![Selection::default()]);
        assert_eq!(editor.to_marked(), "[]abc");
    }

    #[test]
    fn test_reversed_selection() {
        let editor = MemoryEditor::from_marked("ab]cd[ef");
        let s = editor.selections()[0];
        assert!(s.is_reversed());
        assert_eq!(s.anchor, Position::new(0, 4));
        assert_eq!(s.active, Position::new(0, 2));
    }

    #[tokio::test]
    async fn test_edits_shift_selections() {
        let mut editor = MemoryEditor::from_marked("one []two");
        editor
            .apply_edits(vec![TextEdit::insert(Position::new(0, 0), "zero ")])
            .await
            .unwrap();
        assert_eq!(editor.to_marked(), "zero one []two");

        editor
            .apply_edits(vec![TextEdit::delete(Range::new(
                Position::new(0, 5),
                Position::new(0, 9),
            ))])
            .await
            .unwrap();
        assert_eq!(editor.to_marked(), "zero []two");
        assert_eq!(editor.edit_batches(), 2);
    }

    #[tokio::test]
    async fn test_cursor_inside_deleted_range_moves_to_start() {
        let mut editor = MemoryEditor::from_marked("abc[]def");
        editor
            .apply_edits(vec![TextEdit::delete(Range::new(
                Position::new(0, 1),
                Position::new(0, 5),
            ))])
            .await
            .unwrap();
        assert_eq!(editor.to_marked(), "a[]f");
    }
}
