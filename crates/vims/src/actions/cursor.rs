//! Cursor movement and the ranges operators act on.

use anyhow::Result;
use vims_chord::{Motion, MotionKind};

use super::{clamp_normal, line_len, next_pos, prev_pos, visual_cursor, ActionContext};
use crate::host::{Editor, Position, Range, Selection};
use crate::vim::ActionArgs;

/// What an operator covers: characters or whole lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Span {
    Chars(Range),
    Lines(usize, usize),
}

/// Motions with a chord count applied to those that have none.
pub(crate) fn motions(args: &ActionArgs) -> Vec<Motion> {
    args.motions
        .iter()
        .map(|m| {
            let mut m = *m;
            if m.args.n.is_none() {
                m.args.n = args.count;
            }
            m
        })
        .collect()
}

pub(crate) fn target(editor: &mut dyn Editor, from: Position, motions: &[Motion]) -> Position {
    motions
        .iter()
        .fold(from, |at, motion| editor.motion_target(at, motion))
}

/// The span an operator covers when driven by `motions` from `from`.
///
/// For a change, `w` on a word stops at the end of that word.
pub(crate) fn motion_span(
    editor: &mut dyn Editor,
    from: Position,
    motions: &[Motion],
    is_change: bool,
) -> Option<Span> {
    let mut motions = motions.to_vec();
    let on_word = editor
        .line_text(from.line)
        .chars()
        .nth(from.character)
        .is_some_and(|c| !c.is_whitespace());
    if is_change && on_word {
        for m in motions.iter_mut().filter(|m| m.kind == MotionKind::WordNextStart) {
            m.kind = MotionKind::WordNextEnd;
        }
    }

    let last = *motions.last()?;
    let to = target(editor, from, &motions);

    if motions.iter().any(Motion::is_linewise) {
        return Some(Span::Lines(from.line.min(to.line), from.line.max(to.line)));
    }

    let (start, mut end) = if to >= from { (from, to) } else { (to, from) };
    if to >= from && last.is_inclusive() {
        end = Position::new(end.line, (end.character + 1).min(line_len(editor, end.line)));
    }
    // A word motion that leaves the line only deletes to the line end.
    if last.kind == MotionKind::WordNextStart && end.line > start.line {
        end = Position::new(start.line, line_len(editor, start.line));
    }
    Some(Span::Chars(Range::new(start, end)))
}

/// Anchor character of a Visual selection.
fn anchor_char(editor: &dyn Editor, sel: Selection) -> Position {
    if sel.is_reversed() {
        prev_pos(editor, sel.anchor)
    } else {
        sel.anchor
    }
}

/// A Visual selection covering both characters.
pub(crate) fn visual_span(editor: &dyn Editor, anchor: Position, cursor: Position) -> Selection {
    if cursor >= anchor {
        Selection::new(anchor, next_pos(editor, cursor))
    } else {
        Selection::new(next_pos(editor, anchor), cursor)
    }
}

/// A VisualLine selection covering every line between the two.
pub(crate) fn line_span(editor: &dyn Editor, anchor: usize, cursor: usize) -> Selection {
    let below = |line: usize| {
        if line + 1 < editor.line_count() {
            Position::new(line + 1, 0)
        } else {
            Position::new(line, line_len(editor, line))
        }
    };
    if cursor >= anchor {
        Selection::new(Position::new(anchor, 0), below(cursor))
    } else {
        Selection::new(below(anchor), Position::new(cursor, 0))
    }
}

/// Anchor and cursor lines of a VisualLine selection.
pub(crate) fn line_ends(sel: Selection) -> (usize, usize) {
    let step_back = |p: Position, other: Position| {
        if p.character == 0 && p.line > other.line {
            p.line - 1
        } else {
            p.line
        }
    };
    if sel.is_reversed() {
        (step_back(sel.anchor, sel.active), sel.active.line)
    } else {
        (sel.anchor.line, step_back(sel.active, sel.anchor))
    }
}

pub(super) fn move_by_motions(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let motions = motions(args);
    if motions.is_empty() {
        return Ok(());
    }
    let extend = motions.iter().any(|m| m.args.is_selection);
    let add_cursor = motions.iter().any(|m| m.args.is_multicursor);

    let mut out = Vec::new();
    for sel in cx.editor.selections() {
        if args.is_visual_line_mode {
            let (anchor, cursor) = line_ends(sel);
            let to = target(cx.editor, Position::new(cursor, sel.active.character), &motions);
            out.push(line_span(cx.editor, anchor, to.line));
        } else if args.is_visual_mode {
            let anchor = anchor_char(cx.editor, sel);
            let from = visual_cursor(cx.editor, sel);
            let to = target(cx.editor, from, &motions);
            out.push(visual_span(cx.editor, anchor, to));
        } else {
            let mut to = target(cx.editor, sel.active, &motions);
            if args.no_empty_at_line_end {
                to = clamp_normal(cx.editor, to);
            }
            if add_cursor {
                out.push(sel);
                out.push(Selection::cursor(to));
            } else if extend {
                out.push(Selection::new(sel.anchor, to));
            } else {
                out.push(Selection::cursor(to));
            }
        }
    }
    cx.editor.set_selections(out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryEditor;

    #[test]
    fn test_change_word_stops_at_word_end() {
        let mut editor = MemoryEditor::new("foo bar");
        let w = [Motion::new(MotionKind::WordNextStart)];
        let delete = motion_span(&mut editor, Position::new(0, 0), &w, false);
        assert_eq!(
            delete,
            Some(Span::Chars(Range::new(Position::new(0, 0), Position::new(0, 4))))
        );
        let change = motion_span(&mut editor, Position::new(0, 0), &w, true);
        assert_eq!(
            change,
            Some(Span::Chars(Range::new(Position::new(0, 0), Position::new(0, 3))))
        );
    }

    #[test]
    fn test_linewise_motion_span() {
        let mut editor = MemoryEditor::new("a\nb\nc");
        let j = [Motion::new(MotionKind::CharDown)];
        assert_eq!(
            motion_span(&mut editor, Position::new(0, 0), &j, false),
            Some(Span::Lines(0, 1))
        );
    }

    #[test]
    fn test_word_delete_stays_on_line() {
        let mut editor = MemoryEditor::new("foo\nbar");
        let w = [Motion::new(MotionKind::WordNextStart)];
        assert_eq!(
            motion_span(&mut editor, Position::new(0, 0), &w, false),
            Some(Span::Chars(Range::new(Position::new(0, 0), Position::new(0, 3))))
        );
    }

    #[test]
    fn test_line_span_and_ends() {
        let editor = MemoryEditor::new("a\nb\nc");
        let down = line_span(&editor, 0, 1);
        assert_eq!(down, Selection::new(Position::new(0, 0), Position::new(2, 0)));
        assert_eq!(line_ends(down), (0, 1));
        let up = line_span(&editor, 2, 1);
        assert_eq!(up, Selection::new(Position::new(2, 1), Position::new(1, 0)));
        assert_eq!(line_ends(up), (2, 1));
    }
}
