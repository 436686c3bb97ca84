use anyhow::Result;

use super::cursor::{self, Span};
use super::{
    descending, first_non_blank, full_lines, leading_whitespace, line_len, replace_selection,
    selection_at, selection_lines, text_in, visual_cursor, ActionContext,
};
use crate::host::{Editor, Position, Range, RegisterContent, Selection, TextEdit};
use crate::vim::ActionArgs;

/// Deletes the span of every selection and leaves a cursor where it started.
///
/// Deleted text is yanked when the arguments ask for it; whole lines make a
/// linewise register.
async fn delete_each(
    cx: &mut ActionContext<'_>,
    args: &ActionArgs,
    mut span_of: impl FnMut(&mut dyn Editor, Selection) -> Option<Span>,
) -> Result<()> {
    let mut yanked = Vec::new();
    let mut linewise = false;

    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let Some(span) = span_of(cx.editor, sel) else {
            continue;
        };

        let cursor = match span {
            Span::Chars(range) => {
                if !range.is_empty() {
                    yanked.push(text_in(cx.editor, range));
                    cx.editor.apply_edits(vec![TextEdit::delete(range)]).await?;
                }
                range.start
            }
            Span::Lines(first, last) => {
                linewise = true;
                let (range, text) = full_lines(cx.editor, first, last);
                yanked.push(text);
                if args.is_change_action {
                    // Changing lines keeps one line with the first line's indent.
                    let indent = leading_whitespace(cx.editor, first);
                    let last = last.min(cx.editor.line_count().saturating_sub(1));
                    let content = Range::new(
                        Position::new(first, 0),
                        Position::new(last, line_len(cx.editor, last)),
                    );
                    cx.editor
                        .apply_edits(vec![TextEdit::replace(content, indent.clone())])
                        .await?;
                    Position::new(first, indent.chars().count())
                } else {
                    cx.editor.apply_edits(vec![TextEdit::delete(range)]).await?;
                    let line = first.min(cx.editor.line_count().saturating_sub(1));
                    Position::new(line, first_non_blank(cx.editor, line))
                }
            }
        };
        replace_selection(cx.editor, i, Selection::cursor(cursor));
    }

    if args.should_yank && !yanked.is_empty() {
        yanked.reverse();
        let text = if linewise {
            yanked.concat()
        } else {
            yanked.join("\n")
        };
        cx.registers.yank(RegisterContent::new(text, linewise))?;
    }
    Ok(())
}

/// Span of a Visual or VisualLine selection.
fn selection_span(args: &ActionArgs, sel: Selection) -> Option<Span> {
    if args.is_visual_line_mode {
        let (first, last) = selection_lines(sel);
        Some(Span::Lines(first, last))
    } else if sel.is_empty() {
        None
    } else {
        Some(Span::Chars(sel.range()))
    }
}

fn is_visual(args: &ActionArgs) -> bool {
    args.is_visual_mode || args.is_visual_line_mode
}

pub(super) async fn by_motions(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let motions = cursor::motions(args);
    if motions.is_empty() {
        return Ok(());
    }
    delete_each(cx, args, |editor, sel| {
        cursor::motion_span(editor, sel.active, &motions, args.is_change_action)
    })
    .await
}

pub(super) async fn by_text_object(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let Some(object) = args.text_object else {
        return Ok(());
    };
    delete_each(cx, args, |editor, sel| {
        let at = visual_cursor(editor, sel);
        editor.text_object_range(at, &object).map(Span::Chars)
    })
    .await
}

/// `x` in Normal, `d` in Visual.
pub(super) async fn selections_or_right(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let n = args.n();
    delete_each(cx, args, |editor, sel| {
        if is_visual(args) {
            return selection_span(args, sel);
        }
        let c = sel.active;
        let end = (c.character + n).min(line_len(editor, c.line));
        Some(Span::Chars(Range::new(c, Position::new(c.line, end))))
    })
    .await
}

/// `X` in Normal.
pub(super) async fn selections_or_left(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let n = args.n();
    delete_each(cx, args, |_, sel| {
        if is_visual(args) {
            return selection_span(args, sel);
        }
        let c = sel.active;
        Some(Span::Chars(Range::new(
            Position::new(c.line, c.character.saturating_sub(n)),
            c,
        )))
    })
    .await
}

/// `d d` and `c c` in Normal, `D` in Visual.
pub(super) async fn lines(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let n = args.n();
    delete_each(cx, args, |editor, sel| {
        if is_visual(args) {
            let (first, last) = selection_lines(sel);
            return Some(Span::Lines(first, last));
        }
        let line = sel.active.line;
        let last = (line + n - 1).min(editor.line_count().saturating_sub(1));
        Some(Span::Lines(line, last))
    })
    .await
}

/// Insert mode backspace.
pub(super) async fn left(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    delete_each(cx, args, |editor, sel| {
        if !sel.is_empty() {
            return Some(Span::Chars(sel.range()));
        }
        let c = sel.active;
        if c.character > 0 {
            Some(Span::Chars(Range::new(
                Position::new(c.line, c.character - 1),
                c,
            )))
        } else if c.line > 0 {
            let prev = c.line - 1;
            Some(Span::Chars(Range::new(
                Position::new(prev, line_len(editor, prev)),
                c,
            )))
        } else {
            None
        }
    })
    .await
}

/// Insert mode delete.
pub(super) async fn right(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    delete_each(cx, args, |editor, sel| {
        if !sel.is_empty() {
            return Some(Span::Chars(sel.range()));
        }
        let c = sel.active;
        if c.character < line_len(editor, c.line) {
            Some(Span::Chars(Range::new(
                c,
                Position::new(c.line, c.character + 1),
            )))
        } else if c.line + 1 < editor.line_count() {
            Some(Span::Chars(Range::new(c, Position::new(c.line + 1, 0))))
        } else {
            None
        }
    })
    .await
}
