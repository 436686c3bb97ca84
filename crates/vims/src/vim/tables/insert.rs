use vims_chord::MotionKind;

use super::{edit, motion, to};
use crate::vim::binding::{ActionArgs, EditOp};
use crate::vim::table::CommandTable;
use crate::vim::ModeId;

/// Insert and Replace. Keys without a chord are typed as text by the mode
/// machine.
pub(super) fn register(table: &mut CommandTable, mode: ModeId) {
    use EditOp::*;

    for key in ["escape", "ctrl+c", "ctrl+["] {
        table.map(key, vec![to(ModeId::Normal)]);
    }

    table.map("{*motion}", vec![edit(MoveByMotions)]);
    for (key, kind) in [
        ("left", MotionKind::CharLeft),
        ("right", MotionKind::CharRight),
        ("up", MotionKind::CharUp),
        ("down", MotionKind::CharDown),
        ("home", MotionKind::LineStart),
        ("end", MotionKind::LineEnd),
    ] {
        table.map_with(key, vec![edit(MoveByMotions)], motion(kind));
    }

    table
        .map("delete", vec![edit(DeleteRight)])
        .map("tab", vec![edit(InsertTab)])
        .map_with("enter", vec![edit(InsertText)], ActionArgs::text("\n"));

    match mode {
        ModeId::Replace => {
            table.map_with(
                "backspace",
                vec![edit(MoveByMotions)],
                motion(MotionKind::CharLeft),
            );
        }
        _ => {
            table.map("backspace", vec![edit(DeleteLeft)]);
        }
    }
}
