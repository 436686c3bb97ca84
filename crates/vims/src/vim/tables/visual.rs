use super::{changing, counted, edit, to, yanking};
use crate::vim::binding::{ActionArgs, EditOp};
use crate::vim::table::CommandTable;
use crate::vim::ModeId;

/// Visual and VisualLine share one layout; the line variants come from the
/// mode flags the dispatcher puts on the arguments.
pub(super) fn register(table: &mut CommandTable, mode: ModeId) {
    use EditOp::*;

    counted(table, "{motion}", vec![edit(MoveByMotions)], ActionArgs::default());
    counted(table, "{*motion}", vec![edit(MoveByMotions)], ActionArgs::default());
    table.map("{textObject}", vec![edit(SelectByTextObject)]);

    let delete = vec![edit(DeleteSelectionsOrRight), to(ModeId::Normal)];
    for key in ["d", "x", "delete", "backspace"] {
        table.map_with(key, delete.clone(), yanking());
    }
    for key in ["D", "X"] {
        table.map_with(key, vec![edit(DeleteLines), to(ModeId::Normal)], yanking());
    }
    for key in ["c", "s"] {
        table.map_with(
            key,
            vec![edit(DeleteSelectionsOrRight), to(ModeId::Insert)],
            changing(),
        );
    }
    for key in ["C", "S"] {
        table.map_with(
            key,
            vec![edit(DeleteLines), edit(NewLineBefore), to(ModeId::Insert)],
            changing(),
        );
    }

    table
        .map("y", vec![edit(YankSelections), edit(ShrinkToStarts), to(ModeId::Normal)])
        .map("p", vec![edit(ReplaceSelectionsWithRegister), to(ModeId::Normal)])
        .map("P", vec![edit(ReplaceSelectionsWithRegister), to(ModeId::Normal)])
        .map(
            "r {char}",
            vec![edit(ReplaceSelectionsWithChar), edit(ShrinkToStarts), to(ModeId::Normal)],
        )
        .map(
            "~",
            vec![edit(SwitchCaseSelections), edit(ShrinkToStarts), to(ModeId::Normal)],
        )
        .map(
            "u",
            vec![edit(LowerCaseSelections), edit(ShrinkToStarts), to(ModeId::Normal)],
        )
        .map(
            "U",
            vec![edit(UpperCaseSelections), edit(ShrinkToStarts), to(ModeId::Normal)],
        )
        .map("J", vec![edit(JoinLines), edit(ShrinkToStarts), to(ModeId::Normal)])
        .map(">", vec![edit(Indent), edit(ShrinkToStarts), to(ModeId::Normal)])
        .map("<", vec![edit(Outdent), edit(ShrinkToStarts), to(ModeId::Normal)])
        .map(
            "Y",
            vec![
                edit(YankLines),
                edit(ExpandToLines),
                edit(ShrinkToStarts),
                to(ModeId::Normal),
            ],
        )
        .map("I", vec![edit(ShrinkToStarts), to(ModeId::Insert)])
        .map("A", vec![edit(ShrinkToEnds), to(ModeId::Insert)]);

    for key in ["escape", "ctrl+c", "ctrl+["] {
        table.map(
            key,
            vec![edit(NativeEscape), edit(ShrinkToActives), to(ModeId::Normal)],
        );
    }

    match mode {
        ModeId::VisualLine => {
            table
                .map("v", vec![to(ModeId::Visual)])
                .map("V", vec![edit(ShrinkToActives), to(ModeId::Normal)]);
        }
        _ => {
            table
                .map("v", vec![edit(ShrinkToActives), to(ModeId::Normal)])
                .map("V", vec![to(ModeId::VisualLine)]);
        }
    }
}
