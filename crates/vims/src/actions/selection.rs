use anyhow::Result;

use super::cursor::{line_ends, line_span};
use super::{
    clamp_normal, line_len, next_pos, prev_pos, selection_lines, visual_cursor, ActionContext,
};
use crate::host::{Position, Selection};
use crate::vim::{ActionArgs, ModeId};

/// Where the cursor sits inside a selection, for the mode it was made in.
fn cursor_of(cx: &ActionContext<'_>, args: &ActionArgs, sel: Selection) -> Position {
    if args.is_visual_line_mode {
        let (_, line) = line_ends(sel);
        let character = if sel.active.line == line {
            sel.active.character
        } else {
            0
        };
        Position::new(line, character)
    } else if args.is_visual_mode {
        visual_cursor(&*cx.editor, sel)
    } else {
        sel.active
    }
}

fn settle(cx: &ActionContext<'_>, at: Position) -> Position {
    if cx.mode == ModeId::Normal || cx.mode.is_visual_like() {
        clamp_normal(&*cx.editor, at)
    } else {
        at
    }
}

pub(super) fn select_text_object(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let Some(object) = args.text_object else {
        return Ok(());
    };
    let out: Vec<Selection> = cx
        .editor
        .selections()
        .into_iter()
        .map(|sel| {
            let at = visual_cursor(&*cx.editor, sel);
            match cx.editor.text_object_range(at, &object) {
                Some(range) if !range.is_empty() => Selection::new(range.start, range.end),
                _ => sel,
            }
        })
        .collect();
    cx.editor.set_selections(out);
    Ok(())
}

/// Drops every selection but the first and collapses it to its cursor.
pub(super) fn shrink_to_primary(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let Some(sel) = cx.editor.selections().first().copied() else {
        return Ok(());
    };
    let at = settle(cx, cursor_of(cx, args, sel));
    cx.editor.set_selections(vec![Selection::cursor(at)]);
    Ok(())
}

pub(super) fn shrink_to_actives(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let out: Vec<Selection> = cx
        .editor
        .selections()
        .into_iter()
        .map(|sel| Selection::cursor(cursor_of(cx, args, sel)))
        .collect();
    cx.editor.set_selections(out);
    Ok(())
}

pub(super) fn shrink_to_starts(cx: &mut ActionContext<'_>) -> Result<()> {
    let out: Vec<Selection> = cx
        .editor
        .selections()
        .into_iter()
        .map(|sel| Selection::cursor(sel.start()))
        .collect();
    cx.editor.set_selections(out);
    Ok(())
}

/// Collapses each selection to just past its last character. A selection
/// ending at column zero of a later line ends on the line before.
pub(super) fn shrink_to_ends(cx: &mut ActionContext<'_>) -> Result<()> {
    let out: Vec<Selection> = cx
        .editor
        .selections()
        .into_iter()
        .map(|sel| {
            let (start, end) = (sel.start(), sel.end());
            if end.character == 0 && end.line > start.line {
                Selection::cursor(prev_pos(&*cx.editor, end))
            } else {
                Selection::cursor(end)
            }
        })
        .collect();
    cx.editor.set_selections(out);
    Ok(())
}

/// Empty selections grow to cover the character under the cursor.
pub(super) fn expand_to_one(cx: &mut ActionContext<'_>) -> Result<()> {
    let out: Vec<Selection> = cx
        .editor
        .selections()
        .into_iter()
        .map(|sel| {
            if !sel.is_empty() {
                return sel;
            }
            let at = clamp_normal(&*cx.editor, sel.active);
            if line_len(&*cx.editor, at.line) == 0 {
                sel
            } else {
                Selection::new(at, next_pos(&*cx.editor, at))
            }
        })
        .collect();
    cx.editor.set_selections(out);
    Ok(())
}

/// Selections grow to cover whole lines, keeping their direction.
pub(super) fn expand_to_lines(cx: &mut ActionContext<'_>) -> Result<()> {
    let out: Vec<Selection> = cx
        .editor
        .selections()
        .into_iter()
        .map(|sel| {
            let (first, last) = selection_lines(sel);
            if sel.is_reversed() {
                line_span(&*cx.editor, last, first)
            } else {
                line_span(&*cx.editor, first, last)
            }
        })
        .collect();
    cx.editor.set_selections(out);
    Ok(())
}

/// Normal keeps cursors off the end-of-line column.
pub(super) fn validate(cx: &mut ActionContext<'_>) -> Result<()> {
    if cx.mode != ModeId::Normal {
        return Ok(());
    }
    let out: Vec<Selection> = cx
        .editor
        .selections()
        .into_iter()
        .map(|sel| {
            if sel.is_empty() {
                Selection::cursor(clamp_normal(&*cx.editor, sel.active))
            } else {
                sel
            }
        })
        .collect();
    cx.editor.set_selections(out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::host::MemoryEditor;
    use crate::host::MemoryRegisters;
    use crate::vim::EditOp;
    use vims_chord::{TextObject, TextObjectKind};

    async fn apply(marked: &str, mode: ModeId, op: EditOp, args: ActionArgs) -> String {
        let mut editor = MemoryEditor::from_marked(marked);
        let mut registers = MemoryRegisters::new();
        let config = EditorConfig::default();
        let cx = ActionContext {
            editor: &mut editor,
            registers: &mut registers,
            config: &config,
            mode,
        };
        super::super::run(op, &args.in_mode(mode), cx).await.unwrap();
        editor.to_marked()
    }

    #[tokio::test]
    async fn test_expand_to_one_and_shrink_back() {
        let out = apply("a[]bc", ModeId::Visual, EditOp::ExpandToOne, ActionArgs::default()).await;
        assert_eq!(out, "a[b]c");
        let out = apply("ab[]", ModeId::Visual, EditOp::ExpandToOne, ActionArgs::default()).await;
        assert_eq!(out, "a[b]");
        let out = apply("a[bc]d", ModeId::Visual, EditOp::ShrinkToActives, ActionArgs::default()).await;
        assert_eq!(out, "ab[]cd");
    }

    #[tokio::test]
    async fn test_expand_to_lines() {
        let out = apply("a\nb[]b\nc", ModeId::VisualLine, EditOp::ExpandToLines, ActionArgs::default()).await;
        assert_eq!(out, "a\n[bb\n]c");
    }

    #[tokio::test]
    async fn test_shrink_to_starts_and_ends() {
        let out = apply("a[bc]d", ModeId::Visual, EditOp::ShrinkToStarts, ActionArgs::default()).await;
        assert_eq!(out, "a[]bcd");
        let out = apply("a[bc]d", ModeId::Visual, EditOp::ShrinkToEnds, ActionArgs::default()).await;
        assert_eq!(out, "abc[]d");
        let out = apply("[ab\n]cd", ModeId::VisualLine, EditOp::ShrinkToEnds, ActionArgs::default()).await;
        assert_eq!(out, "ab[]\ncd");
    }

    #[tokio::test]
    async fn test_shrink_to_primary_keeps_first() {
        let out = apply("[]ab []cd", ModeId::Normal, EditOp::ShrinkToPrimaryActive, ActionArgs::default()).await;
        assert_eq!(out, "[]ab cd");
    }

    #[tokio::test]
    async fn test_validate_clamps_normal_cursor() {
        let out = apply("abc[]", ModeId::Normal, EditOp::ValidateSelections, ActionArgs::default()).await;
        assert_eq!(out, "ab[]c");
        let out = apply("abc[]", ModeId::Insert, EditOp::ValidateSelections, ActionArgs::default()).await;
        assert_eq!(out, "abc[]");
    }

    #[tokio::test]
    async fn test_select_inner_word() {
        let args = ActionArgs {
            text_object: Some(TextObject {
                kind: TextObjectKind::Word,
                inclusive: false,
                blank_separated: false,
            }),
            ..Default::default()
        };
        let out = apply("one t[]wo three", ModeId::Visual, EditOp::SelectByTextObject, args).await;
        assert_eq!(out, "one [two] three");
    }
}
