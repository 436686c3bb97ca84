//! Default command tables for every mode.

mod insert;
mod normal;
mod visual;

use vims_chord::{Motion, MotionKind};

use super::binding::{Action, ActionArgs, EditOp};
use super::table::CommandTable;
use super::ModeId;

/// The default table of `mode`.
pub fn default_table(mode: ModeId) -> CommandTable {
    let mut table = CommandTable::new(mode);
    match mode {
        ModeId::Normal => normal::register(&mut table),
        ModeId::Visual | ModeId::VisualLine => visual::register(&mut table, mode),
        ModeId::Insert | ModeId::Replace => insert::register(&mut table, mode),
    }
    table
}

fn edit(op: EditOp) -> Action {
    Action::edit(op)
}

fn to(mode: ModeId) -> Action {
    Action::switch_mode(mode)
}

fn motion(kind: MotionKind) -> ActionArgs {
    ActionArgs::motions(vec![Motion::new(kind)])
}

fn yanking() -> ActionArgs {
    ActionArgs {
        should_yank: true,
        ..Default::default()
    }
}

fn changing() -> ActionArgs {
    ActionArgs {
        should_yank: true,
        is_change_action: true,
        ..Default::default()
    }
}

fn clamped() -> ActionArgs {
    ActionArgs {
        no_empty_at_line_end: true,
        ..Default::default()
    }
}

/// Registers `keys` plain and with a leading `{N}`.
fn counted(table: &mut CommandTable, keys: &str, actions: Vec<Action>, args: ActionArgs) {
    table.map_with(&format!("{{N}} {keys}"), actions.clone(), args.clone());
    table.map_with(keys, actions, args);
}
