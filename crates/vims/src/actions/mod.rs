//! Built-in edit operations.
//!
//! Every operation works selection by selection, from the last selection in
//! the document to the first, so that an edit never moves the text of a
//! selection that has not been handled yet.

mod cursor;
mod delete;
mod insert;
mod register;
mod selection;
mod transform;

pub(crate) use cursor::{line_ends, line_span};

use anyhow::Result;

use crate::config::EditorConfig;
use crate::error::VimError;
use crate::host::{Editor, Position, Range, Registers, Selection};
use crate::vim::{ActionArgs, EditOp, ModeId};

/// What an operation gets to work with.
pub struct ActionContext<'a> {
    pub editor: &'a mut dyn Editor,
    pub registers: &'a mut dyn Registers,
    pub config: &'a EditorConfig,
    pub mode: ModeId,
}

/// Runs one built-in operation.
///
/// Fails with [`VimError::NoActiveContext`] when the host has no document.
pub async fn run(op: EditOp, args: &ActionArgs, mut cx: ActionContext<'_>) -> Result<()> {
    if !cx.editor.has_document() {
        return Err(VimError::NoActiveContext.into());
    }

    let cx = &mut cx;
    match op {
        EditOp::MoveByMotions => cursor::move_by_motions(cx, args),
        EditOp::DeleteByMotions => delete::by_motions(cx, args).await,
        EditOp::DeleteByTextObject => delete::by_text_object(cx, args).await,
        EditOp::DeleteSelectionsOrRight => delete::selections_or_right(cx, args).await,
        EditOp::DeleteSelectionsOrLeft => delete::selections_or_left(cx, args).await,
        EditOp::DeleteLines => delete::lines(cx, args).await,
        EditOp::DeleteLeft => delete::left(cx, args).await,
        EditOp::DeleteRight => delete::right(cx, args).await,
        EditOp::InsertText => {
            let text = args.text.clone().unwrap_or_default();
            insert::text(cx, &text).await
        }
        EditOp::InsertTab => {
            let unit = cx.config.indent_unit();
            insert::text(cx, &unit).await
        }
        EditOp::OverwriteText => insert::overwrite(cx, args).await,
        EditOp::NewLineAfter => insert::new_line(cx, true).await,
        EditOp::NewLineBefore => insert::new_line(cx, false).await,
        EditOp::JoinLines => insert::join_lines(cx, args).await,
        EditOp::Indent => insert::indent(cx, args, true).await,
        EditOp::Outdent => insert::indent(cx, args, false).await,
        EditOp::ReplaceChars => transform::replace_chars(cx, args).await,
        EditOp::ReplaceSelectionsWithChar => transform::replace_selections(cx, args).await,
        EditOp::SwitchCase => transform::switch_case(cx, args).await,
        EditOp::SwitchCaseSelections => transform::map_selections(cx, toggle_case).await,
        EditOp::LowerCaseSelections => transform::map_selections(cx, str::to_lowercase).await,
        EditOp::UpperCaseSelections => transform::map_selections(cx, str::to_uppercase).await,
        EditOp::YankLines => register::yank_lines(cx, args),
        EditOp::YankByMotions => register::yank_by_motions(cx, args),
        EditOp::YankByTextObject => register::yank_by_text_object(cx, args),
        EditOp::YankSelections => register::yank_selections(cx, args),
        EditOp::PutAfter => register::put(cx, args, true).await,
        EditOp::PutBefore => register::put(cx, args, false).await,
        EditOp::ReplaceSelectionsWithRegister => register::put_over_selections(cx, args).await,
        EditOp::SelectByTextObject => selection::select_text_object(cx, args),
        EditOp::ShrinkToPrimaryActive => selection::shrink_to_primary(cx, args),
        EditOp::ShrinkToActives => selection::shrink_to_actives(cx, args),
        EditOp::ShrinkToStarts => selection::shrink_to_starts(cx),
        EditOp::ShrinkToEnds => selection::shrink_to_ends(cx),
        EditOp::ExpandToOne => selection::expand_to_one(cx),
        EditOp::ExpandToLines => selection::expand_to_lines(cx),
        EditOp::ValidateSelections => selection::validate(cx),
        EditOp::NativeEscape => Ok(()),
    }
}

pub(crate) fn toggle_case(text: &str) -> String {
    text.chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect::<Vec<_>>()
            }
        })
        .collect()
}

pub(crate) fn line_len(editor: &dyn Editor, line: usize) -> usize {
    editor.line_text(line).chars().count()
}

pub(crate) fn first_non_blank(editor: &dyn Editor, line: usize) -> usize {
    let text = editor.line_text(line);
    text.chars()
        .position(|c| !c.is_whitespace())
        .unwrap_or_else(|| text.chars().count())
}

pub(crate) fn leading_whitespace(editor: &dyn Editor, line: usize) -> String {
    editor
        .line_text(line)
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect()
}

/// The position one character forward, wrapping onto the next line.
pub(crate) fn next_pos(editor: &dyn Editor, p: Position) -> Position {
    if p.character < line_len(editor, p.line) {
        Position::new(p.line, p.character + 1)
    } else if p.line + 1 < editor.line_count() {
        Position::new(p.line + 1, 0)
    } else {
        p
    }
}

/// The position one character back, wrapping onto the previous line end.
pub(crate) fn prev_pos(editor: &dyn Editor, p: Position) -> Position {
    if p.character > 0 {
        Position::new(p.line, p.character - 1)
    } else if p.line > 0 {
        Position::new(p.line - 1, line_len(editor, p.line - 1))
    } else {
        p
    }
}

/// The character the cursor is on. A forward Visual selection ends right
/// after it.
pub(crate) fn visual_cursor(editor: &dyn Editor, sel: Selection) -> Position {
    if sel.active > sel.anchor {
        prev_pos(editor, sel.active)
    } else {
        sel.active
    }
}

/// Keeps a Normal mode cursor off the end-of-line column.
pub(crate) fn clamp_normal(editor: &dyn Editor, p: Position) -> Position {
    let len = line_len(editor, p.line);
    if len > 0 && p.character >= len {
        Position::new(p.line, len - 1)
    } else {
        p
    }
}

/// First and last line touched by a selection. A selection ending at column
/// zero does not touch its last line.
pub(crate) fn selection_lines(sel: Selection) -> (usize, usize) {
    let (start, end) = (sel.start(), sel.end());
    if end.character == 0 && end.line > start.line {
        (start.line, end.line - 1)
    } else {
        (start.line, end.line)
    }
}

/// The text covered by a range.
pub(crate) fn text_in(editor: &dyn Editor, range: Range) -> String {
    let mut out = String::new();
    for line in range.start.line..=range.end.line {
        let text = editor.line_text(line);
        let from = if line == range.start.line {
            range.start.character
        } else {
            0
        };
        let to = if line == range.end.line {
            range.end.character
        } else {
            usize::MAX
        };
        out.extend(text.chars().skip(from).take(to.saturating_sub(from)));
        if line < range.end.line {
            out.push('\n');
        }
    }
    out
}

/// Range covering whole lines plus one line break, and their text with a
/// trailing newline per line.
pub(crate) fn full_lines(editor: &dyn Editor, first: usize, last: usize) -> (Range, String) {
    let count = editor.line_count();
    let last = last.min(count.saturating_sub(1));
    let text: String = (first..=last)
        .map(|l| editor.line_text(l) + "\n")
        .collect();

    let range = if last + 1 < count {
        Range::new(Position::new(first, 0), Position::new(last + 1, 0))
    } else if first > 0 {
        Range::new(
            Position::new(first - 1, line_len(editor, first - 1)),
            Position::new(last, line_len(editor, last)),
        )
    } else {
        Range::new(Position::new(first, 0), Position::new(last, line_len(editor, last)))
    };
    (range, text)
}

/// Where the cursor ends up after typing `text` at `start`.
pub(crate) fn advance(start: Position, text: &str) -> Position {
    match text.rsplit_once('\n') {
        Some((head, tail)) => Position::new(
            start.line + head.matches('\n').count() + 1,
            tail.chars().count(),
        ),
        None => Position::new(start.line, start.character + text.chars().count()),
    }
}

/// Selection indices from the last selection in the document to the first.
pub(crate) fn descending(selections: &[Selection]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..selections.len()).collect();
    order.sort_by(|a, b| selections[*b].start().cmp(&selections[*a].start()));
    order
}

pub(crate) fn selection_at(editor: &dyn Editor, index: usize) -> Option<Selection> {
    editor.selections().get(index).copied()
}

pub(crate) fn replace_selection(editor: &mut dyn Editor, index: usize, sel: Selection) {
    let mut all = editor.selections();
    if let Some(slot) = all.get_mut(index) {
        *slot = sel;
        editor.set_selections(all);
    }
}
