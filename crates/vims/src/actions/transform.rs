use anyhow::Result;

use super::{
    descending, line_len, replace_selection, selection_at, text_in, toggle_case, ActionContext,
};
use crate::host::{Position, Range, Selection, TextEdit};
use crate::vim::ActionArgs;

/// `r {char}`: replaces the characters under the cursor, or nothing if the
/// line is too short.
pub(super) async fn replace_chars(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let Some(ch) = args.character else {
        return Ok(());
    };
    let n = args.replace_count.or(args.count).unwrap_or(1).max(1);

    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let c = sel.active;
        if c.character + n > line_len(cx.editor, c.line) {
            continue;
        }
        let range = Range::new(c, Position::new(c.line, c.character + n));
        let (text, cursor) = if ch == '\n' {
            ("\n".to_string(), Position::new(c.line + 1, 0))
        } else {
            (
                std::iter::repeat(ch).take(n).collect(),
                Position::new(c.line, c.character + n - 1),
            )
        };
        cx.editor
            .apply_edits(vec![TextEdit::replace(range, text)])
            .await?;
        replace_selection(cx.editor, i, Selection::cursor(cursor));
    }
    Ok(())
}

/// `r {char}` in Visual: every selected character but line breaks.
pub(super) async fn replace_selections(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let Some(ch) = args.character else {
        return Ok(());
    };
    map_each(cx, |text| {
        text.chars()
            .map(|c| if c == '\n' { c } else { ch })
            .collect()
    })
    .await
}

/// `~`: toggles case under the cursor and moves past it.
pub(super) async fn switch_case(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let n = args.n();
    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let c = sel.active;
        let len = line_len(cx.editor, c.line);
        if len == 0 {
            continue;
        }
        let end = (c.character + n).min(len);
        let range = Range::new(c, Position::new(c.line, end));
        let toggled = toggle_case(&text_in(cx.editor, range));
        cx.editor
            .apply_edits(vec![TextEdit::replace(range, toggled)])
            .await?;
        let cursor = Position::new(c.line, end.min(line_len(cx.editor, c.line).saturating_sub(1)));
        replace_selection(cx.editor, i, Selection::cursor(cursor));
    }
    Ok(())
}

/// `~`, `u` and `U` in Visual.
pub(super) async fn map_selections(
    cx: &mut ActionContext<'_>,
    f: impl Fn(&str) -> String,
) -> Result<()> {
    map_each(cx, f).await
}

async fn map_each(cx: &mut ActionContext<'_>, f: impl Fn(&str) -> String) -> Result<()> {
    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        if sel.is_empty() {
            continue;
        }
        let range = sel.range();
        let mapped = f(&text_in(cx.editor, range));
        cx.editor
            .apply_edits(vec![TextEdit::replace(range, mapped)])
            .await?;
        replace_selection(cx.editor, i, Selection::cursor(range.start));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::host::{MemoryEditor, MemoryRegisters};
    use crate::vim::{EditOp, ModeId};

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

    fn char_args(ch: char, count: Option<usize>) -> ActionArgs {
        ActionArgs {
            character: Some(ch),
            count,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_replace_chars() {
        let out = apply("a[]bcd", ModeId::Normal, EditOp::ReplaceChars, char_args('x', Some(2))).await;
        assert_eq!(out, "ax[]xd");
    }

    #[tokio::test]
    async fn test_replace_chars_past_line_end_does_nothing() {
        let out = apply("ab[]c", ModeId::Normal, EditOp::ReplaceChars, char_args('x', Some(5))).await;
        assert_eq!(out, "ab[]c");
    }

    #[tokio::test]
    async fn test_replace_with_newline_splits_line() {
        let out = apply("a[]bc", ModeId::Normal, EditOp::ReplaceChars, char_args('\n', None)).await;
        assert_eq!(out, "a\n[]c");
    }

    #[tokio::test]
    async fn test_replace_selections_keeps_line_breaks() {
        let out = apply(
            "a[b\nc]d",
            ModeId::Visual,
            EditOp::ReplaceSelectionsWithChar,
            char_args('-', None),
        )
        .await;
        assert_eq!(out, "a[]-\n-d");
    }

    #[tokio::test]
    async fn test_switch_case_moves_right() {
        let out = apply("[]abC", ModeId::Normal, EditOp::SwitchCase, ActionArgs::default()).await;
        assert_eq!(out, "A[]bC");
        let args = ActionArgs {
            count: Some(5),
            ..Default::default()
        };
        let out = apply("a[]bC", ModeId::Normal, EditOp::SwitchCase, args).await;
        assert_eq!(out, "aB[]c");
    }

    #[tokio::test]
    async fn test_case_over_selections() {
        let out = apply("[aB]c", ModeId::Visual, EditOp::UpperCaseSelections, ActionArgs::default()).await;
        assert_eq!(out, "[]ABc");
        let out = apply("[aB]c", ModeId::Visual, EditOp::LowerCaseSelections, ActionArgs::default()).await;
        assert_eq!(out, "[]abc");
        let out = apply("[aB]c", ModeId::Visual, EditOp::SwitchCaseSelections, ActionArgs::default()).await;
        assert_eq!(out, "[]Abc");
    }
}
