//! Vim command layer: modes, bindings and per-mode command tables.
//!
//! # Architecture
//!
//! - `ModeId`: the current editing mode
//! - `Binding`: what a chord does, as an ordered list of `Action`s
//! - `CommandTable`: the chords of one mode, matched incrementally
//!
//! # Usage
//!
//! ```ignore
//! let table = default_table(ModeId::Normal);
//! match table.match_tokens(&tokenize("d 2 w")) {
//!     TableMatch::Found { binding, args, .. } => queue.push((binding, args)),
//!     TableMatch::Waiting => show_hint(),
//!     TableMatch::Failed => clear_input(),
//! }
//! ```

mod binding;
mod mode;
mod table;
pub mod tables;

pub use binding::{Action, ActionArgs, Binding, CustomAction, EditOp, Op};
pub use mode::ModeId;
pub use table::{CommandTable, Suggestion, TableMatch};
pub use tables::default_table;
