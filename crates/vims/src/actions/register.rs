use anyhow::Result;

use super::cursor::{self, Span};
use super::{
    advance, descending, first_non_blank, full_lines, line_len, prev_pos, replace_selection,
    selection_at, selection_lines, text_in, visual_cursor, ActionContext,
};
use crate::host::{Position, Range, RegisterContent, Selection, TextEdit};
use crate::vim::ActionArgs;

fn span_text(cx: &ActionContext<'_>, span: Span) -> RegisterContent {
    match span {
        Span::Chars(range) => RegisterContent::new(text_in(&*cx.editor, range), false),
        Span::Lines(first, last) => RegisterContent::new(full_lines(&*cx.editor, first, last).1, true),
    }
}

/// `y y`, `Y`.
pub(super) fn yank_lines(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let Some(sel) = selection_at(cx.editor, 0) else {
        return Ok(());
    };
    let (first, last) = if args.is_visual_mode || args.is_visual_line_mode {
        selection_lines(sel)
    } else {
        let line = sel.active.line;
        (line, line + args.n() - 1)
    };
    let content = span_text(cx, Span::Lines(first, last));
    cx.registers.yank(content)
}

/// `y {motion}`: yanks and moves to the start of what was yanked.
pub(super) fn yank_by_motions(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let motions = cursor::motions(args);
    let Some(sel) = selection_at(cx.editor, 0) else {
        return Ok(());
    };
    let Some(span) = cursor::motion_span(cx.editor, sel.active, &motions, false) else {
        return Ok(());
    };
    let content = span_text(cx, span);
    cx.registers.yank(content)?;
    if let Span::Chars(range) = span {
        replace_selection(cx.editor, 0, Selection::cursor(range.start));
    }
    Ok(())
}

/// `y {textObject}`.
pub(super) fn yank_by_text_object(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let (Some(object), Some(sel)) = (args.text_object, selection_at(cx.editor, 0)) else {
        return Ok(());
    };
    let at = visual_cursor(cx.editor, sel);
    let Some(range) = cx.editor.text_object_range(at, &object) else {
        return Ok(());
    };
    let content = span_text(cx, Span::Chars(range));
    cx.registers.yank(content)?;
    replace_selection(cx.editor, 0, Selection::cursor(range.start));
    Ok(())
}

/// `y` in Visual.
pub(super) fn yank_selections(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let mut selections = cx.editor.selections();
    selections.sort_by_key(|s| s.start());

    let content = if args.is_visual_line_mode {
        let text: String = selections
            .iter()
            .map(|s| {
                let (first, last) = selection_lines(*s);
                full_lines(&*cx.editor, first, last).1
            })
            .collect();
        RegisterContent::new(text, true)
    } else {
        let parts: Vec<String> = selections
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| text_in(&*cx.editor, s.range()))
            .collect();
        if parts.is_empty() {
            return Ok(());
        }
        RegisterContent::new(parts.join("\n"), false)
    };
    cx.registers.yank(content)
}

/// `p` and `P`.
pub(super) async fn put(cx: &mut ActionContext<'_>, args: &ActionArgs, after: bool) -> Result<()> {
    let Some(content) = cx.registers.put()? else {
        return Ok(());
    };
    let n = args.n();

    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let c = sel.active;

        let cursor = if content.linewise {
            let body = content.text.strip_suffix('\n').unwrap_or(&content.text);
            let block = vec![body; n].join("\n");
            let (edit, line) = if after {
                (
                    TextEdit::insert(
                        Position::new(c.line, line_len(cx.editor, c.line)),
                        format!("\n{}", block),
                    ),
                    c.line + 1,
                )
            } else {
                (
                    TextEdit::insert(Position::new(c.line, 0), format!("{}\n", block)),
                    c.line,
                )
            };
            cx.editor.apply_edits(vec![edit]).await?;
            Position::new(line, first_non_blank(cx.editor, line))
        } else {
            let text = content.text.repeat(n);
            let len = line_len(cx.editor, c.line);
            let at = if after && len > 0 {
                Position::new(c.line, (c.character + 1).min(len))
            } else {
                c
            };
            cx.editor
                .apply_edits(vec![TextEdit::insert(at, text.as_str())])
                .await?;
            prev_pos(cx.editor, advance(at, &text))
        };
        replace_selection(cx.editor, i, Selection::cursor(cursor));
    }
    Ok(())
}

/// `p` in Visual: the selections are replaced by the register.
pub(super) async fn put_over_selections(cx: &mut ActionContext<'_>, args: &ActionArgs) -> Result<()> {
    let Some(content) = cx.registers.put()? else {
        return Ok(());
    };
    let text = if content.linewise && !args.is_visual_line_mode {
        format!("\n{}", content.text)
    } else if args.is_visual_line_mode {
        content
            .text
            .strip_suffix('\n')
            .unwrap_or(&content.text)
            .to_string()
    } else {
        content.text.clone()
    };

    for i in descending(&cx.editor.selections()) {
        let Some(sel) = selection_at(cx.editor, i) else {
            continue;
        };
        let range = if args.is_visual_line_mode {
            let (first, last) = selection_lines(sel);
            Range::new(
                Position::new(first, 0),
                Position::new(last, line_len(cx.editor, last)),
            )
        } else {
            sel.range()
        };
        cx.editor
            .apply_edits(vec![TextEdit::replace(range, text.as_str())])
            .await?;
        replace_selection(cx.editor, i, Selection::cursor(range.start));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::host::{MemoryEditor, MemoryRegisters, Registers};
    use crate::vim::{EditOp, ModeId};

    async fn apply(
        marked: &str,
        mode: ModeId,
        op: EditOp,
        args: ActionArgs,
        register: Option<RegisterContent>,
    ) -> (String, Option<RegisterContent>) {
        let mut editor = MemoryEditor::from_marked(marked);
        let mut registers = MemoryRegisters::new();
        if let Some(content) = register {
            registers.yank(content).unwrap();
        }
        let config = EditorConfig::default();
        let cx = ActionContext {
            editor: &mut editor,
            registers: &mut registers,
            config: &config,
            mode,
        };
        super::super::run(op, &args.in_mode(mode), cx).await.unwrap();
        (editor.to_marked(), registers.put().unwrap())
    }

    #[tokio::test]
    async fn test_yank_lines_with_count() {
        let args = ActionArgs {
            count: Some(2),
            ..Default::default()
        };
        let (text, reg) = apply("a[]\nb\nc", ModeId::Normal, EditOp::YankLines, args, None).await;
        assert_eq!(text, "a[]\nb\nc");
        assert_eq!(reg, Some(RegisterContent::new("a\nb\n", true)));
    }

    #[tokio::test]
    async fn test_put_linewise_after_and_before() {
        let reg = Some(RegisterContent::new("  x\n", true));
        let (text, _) = apply("a[]\nb", ModeId::Normal, EditOp::PutAfter, ActionArgs::default(), reg.clone()).await;
        assert_eq!(text, "a\n  []x\nb");
        let (text, _) = apply("a\n[]b", ModeId::Normal, EditOp::PutBefore, ActionArgs::default(), reg).await;
        assert_eq!(text, "a\n  []x\nb");
    }

    #[tokio::test]
    async fn test_put_charwise_after() {
        let reg = Some(RegisterContent::new("XY", false));
        let (text, _) = apply("[]ab", ModeId::Normal, EditOp::PutAfter, ActionArgs::default(), reg.clone()).await;
        assert_eq!(text, "aX[]Yb");
        let (text, _) = apply("[]ab", ModeId::Normal, EditOp::PutBefore, ActionArgs::default(), reg).await;
        assert_eq!(text, "X[]Yab");
    }

    #[tokio::test]
    async fn test_visual_yank_and_put_over() {
        let (_, reg) = apply("a[bc]d", ModeId::Visual, EditOp::YankSelections, ActionArgs::default(), None).await;
        assert_eq!(reg, Some(RegisterContent::new("bc", false)));

        let reg = Some(RegisterContent::new("Z", false));
        let (text, _) = apply(
            "a[bc]d",
            ModeId::Visual,
            EditOp::ReplaceSelectionsWithRegister,
            ActionArgs::default(),
            reg,
        )
        .await;
        assert_eq!(text, "a[]Zd");
    }

    #[tokio::test]
    async fn test_yank_word_moves_to_start() {
        let args = ActionArgs {
            motions: vec![vims_chord::Motion::new(vims_chord::MotionKind::WordPrevStart)],
            ..Default::default()
        };
        let (text, reg) = apply("foo ba[]r", ModeId::Normal, EditOp::YankByMotions, args, None).await;
        assert_eq!(text, "foo []bar");
        assert_eq!(reg, Some(RegisterContent::new("ba", false)));
    }
}
