use vims_chord::MotionKind;

use super::{changing, clamped, counted, edit, motion, to, yanking};
use crate::vim::binding::{Action, ActionArgs, EditOp};
use crate::vim::table::CommandTable;
use crate::vim::ModeId;

pub(super) fn register(table: &mut CommandTable) {
    use EditOp::*;

    // Movement
    counted(table, "{motion}", vec![edit(MoveByMotions)], clamped());
    counted(table, "{*motion}", vec![edit(MoveByMotions)], clamped());
    counted(
        table,
        "backspace",
        vec![edit(MoveByMotions)],
        motion(MotionKind::CharLeft),
    );

    // Entering Insert and Replace
    table
        .map("i", vec![to(ModeId::Insert)])
        .map_with(
            "I",
            vec![edit(MoveByMotions), to(ModeId::Insert)],
            motion(MotionKind::LineFirstNonBlank),
        )
        .map_with(
            "a",
            vec![edit(MoveByMotions), to(ModeId::Insert)],
            motion(MotionKind::CharRight),
        )
        .map_with(
            "A",
            vec![edit(MoveByMotions), to(ModeId::Insert)],
            motion(MotionKind::LineEnd),
        )
        .map("o", vec![edit(NewLineAfter), to(ModeId::Insert)])
        .map("O", vec![edit(NewLineBefore), to(ModeId::Insert)])
        .map("R", vec![to(ModeId::Replace)]);
    counted(
        table,
        "s",
        vec![edit(DeleteSelectionsOrRight), to(ModeId::Insert)],
        changing(),
    );

    // Deleting
    counted(table, "x", vec![edit(DeleteSelectionsOrRight)], yanking());
    counted(table, "X", vec![edit(DeleteSelectionsOrLeft)], yanking());
    table.map_with("delete", vec![edit(DeleteSelectionsOrRight)], yanking());
    counted(table, "d {motion}", vec![edit(DeleteByMotions)], yanking());
    table.map_with("d {N} {motion}", vec![edit(DeleteByMotions)], yanking());
    table.map_with("d {textObject}", vec![edit(DeleteByTextObject)], yanking());
    counted(table, "d d", vec![edit(DeleteLines)], yanking());
    table.map_with("d {N} d", vec![edit(DeleteLines)], yanking());
    table.map_with(
        "D",
        vec![edit(DeleteByMotions)],
        ActionArgs {
            should_yank: true,
            ..motion(MotionKind::LineEnd)
        },
    );

    // Changing
    let change = vec![edit(DeleteByMotions), to(ModeId::Insert)];
    counted(table, "c {motion}", change.clone(), changing());
    table.map_with("c {N} {motion}", change.clone(), changing());
    table.map_with(
        "c {textObject}",
        vec![edit(DeleteByTextObject), to(ModeId::Insert)],
        changing(),
    );
    counted(
        table,
        "c c",
        vec![edit(DeleteLines), to(ModeId::Insert)],
        changing(),
    );
    table.map_with("S", vec![edit(DeleteLines), to(ModeId::Insert)], changing());
    table.map_with(
        "C",
        change,
        ActionArgs {
            is_change_action: true,
            should_yank: true,
            ..motion(MotionKind::LineEnd)
        },
    );
    counted(table, "J", vec![edit(JoinLines)], ActionArgs::default());
    counted(table, "r {char}", vec![edit(ReplaceChars)], ActionArgs::default());
    counted(table, "~", vec![edit(SwitchCase)], ActionArgs::default());
    counted(table, "> >", vec![edit(Indent)], ActionArgs::default());
    counted(table, "< <", vec![edit(Outdent)], ActionArgs::default());

    // Yank and put
    counted(table, "y {motion}", vec![edit(YankByMotions)], ActionArgs::default());
    table.map("y {N} {motion}", vec![edit(YankByMotions)]);
    table.map("y {textObject}", vec![edit(YankByTextObject)]);
    counted(table, "y y", vec![edit(YankLines)], ActionArgs::default());
    table.map("y {N} y", vec![edit(YankLines)]);
    counted(table, "Y", vec![edit(YankLines)], ActionArgs::default());
    counted(table, "p", vec![edit(PutAfter)], ActionArgs::default());
    counted(table, "P", vec![edit(PutBefore)], ActionArgs::default());

    // Visual modes
    table
        .map("v", vec![to(ModeId::Visual)])
        .map("V", vec![to(ModeId::VisualLine)]);

    table.map("escape", vec![edit(NativeEscape), edit(ShrinkToPrimaryActive)]);
    counted(table, ".", vec![Action::repeat()], ActionArgs::default());

    for (keys, description) in [
        ("d d", "delete line"),
        ("d {motion}", "delete to motion"),
        ("c c", "change line"),
        ("c {motion}", "change to motion"),
        ("y y", "yank line"),
        ("y {motion}", "yank to motion"),
        ("x", "delete character"),
        (".", "repeat last change"),
    ] {
        table
            .describe(keys, description)
            .describe(&format!("{{N}} {keys}"), description);
    }
}
