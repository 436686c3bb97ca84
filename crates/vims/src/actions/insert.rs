use anyhow::Result;

use super::{
    advance, descending, first_non_blank, leading_whitespace, line_len, replace_selection,
    selection_at, selection_lines, ActionContext,
};
use crate::host::{Position, Range, Selection, TextEdit};
use crate::vim::ActionArgs;

/// Types `text` at every cursor, replacing non-empty selections.
pub(super) async fn text(cx: &mut ActionContext<'_>, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let range = sel.range();
        cx.editor
            .apply_edits(vec![TextEdit::replace(range, text)])
            .await?;
        replace_selection(cx.editor, i, Selection::cursor(advance(range.start, text)));
    }
    Ok(())
}

/// Replace mode typing: overwrites characters up to the line end.
pub(super) async fn overwrite(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let Some(text) = args.text.as_deref() else {
        return Ok(());
    };
    let width = text.chars().take_while(|c| *c != '\n').count();

    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let c = sel.active;
        let end = (c.character + width).min(line_len(cx.editor, c.line));
        cx.editor
            .apply_edits(vec![TextEdit::replace(
                Range::new(c, Position::new(c.line, end)),
                text,
            )])
            .await?;
        replace_selection(cx.editor, i, Selection::cursor(advance(c, text)));
    }
    Ok(())
}

/// `o` and `O`: opens a line with the current line's indent.
pub(super) async fn new_line(cx: &mut ActionContext<'_>, below: bool) -> Result<()> {
    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let line = sel.active.line;
        let indent = leading_whitespace(cx.editor, line);
        let width = indent.chars().count();

        let (edit, cursor) = if below {
            (
                TextEdit::insert(
                    Position::new(line, line_len(cx.editor, line)),
                    format!("\n{}", indent),
                ),
                Position::new(line + 1, width),
            )
        } else {
            (
                TextEdit::insert(Position::new(line, 0), format!("{}\n", indent)),
                Position::new(line, width),
            )
        };
        cx.editor.apply_edits(vec![edit]).await?;
        replace_selection(cx.editor, i, Selection::cursor(cursor));
    }
    Ok(())
}

/// `J`: joins lines, separating them by one space.
pub(super) async fn join_lines(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let visual = args.is_visual_mode || args.is_visual_line_mode;

    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let (line, joins) = if visual {
            let (first, last) = selection_lines(sel);
            (first, (last - first).max(1))
        } else {
            (sel.active.line, args.n().max(2) - 1)
        };

        let mut cursor = sel.active;
        for _ in 0..joins {
            if line + 1 >= cx.editor.line_count() {
                break;
            }
            let current = cx.editor.line_text(line);
            let next = cx.editor.line_text(line + 1);
            let trimmed = next.trim_start();
            let lead = next.chars().count() - trimmed.chars().count();
            let separator = if trimmed.is_empty() || current.ends_with(' ') || trimmed.starts_with(')')
            {
                ""
            } else {
                " "
            };

            let end = current.chars().count();
            cx.editor
                .apply_edits(vec![TextEdit::replace(
                    Range::new(Position::new(line, end), Position::new(line + 1, lead)),
                    separator,
                )])
                .await?;
            cursor = Position::new(line, end);
        }
        replace_selection(cx.editor, i, Selection::cursor(cursor));
    }
    Ok(())
}

/// `>>` and `<<`, or `>` and `<` over a Visual selection.
pub(super) async fn indent(cx: &mut ActionContext<'_>, args: &ActionArgs, deeper: bool) -> Result<()> {
    let visual = args.is_visual_mode || args.is_visual_line_mode;
    let unit = cx.config.indent_unit();
    let tab_size = usize::from(cx.config.tab_size.max(1));

    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let (first, last) = if visual {
            selection_lines(sel)
        } else {
            let line = sel.active.line;
            (line, (line + args.n() - 1).min(cx.editor.line_count().saturating_sub(1)))
        };

        let edits: Vec<TextEdit> = (first..=last)
            .filter_map(|line| {
                let text = cx.editor.line_text(line);
                if deeper {
                    (!text.is_empty()).then(|| TextEdit::insert(Position::new(line, 0), &unit))
                } else {
                    let width = if text.starts_with('\t') {
                        1
                    } else {
                        text.chars().take(tab_size).take_while(|c| *c == ' ').count()
                    };
                    (width > 0).then(|| {
                        TextEdit::delete(Range::new(
                            Position::new(line, 0),
                            Position::new(line, width),
                        ))
                    })
                }
            })
            .collect();

        if !edits.is_empty() {
            cx.editor.apply_edits(edits).await?;
        }
        let cursor = Position::new(first, first_non_blank(cx.editor, first));
        replace_selection(cx.editor, i, Selection::cursor(cursor));
    }
    Ok(())
}
