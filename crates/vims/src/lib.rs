//! vims: a modal, chord-based editing engine in the style of Vim.
//!
//! Keys are matched against per-mode command tables, matched bindings run
//! one at a time against a host [`host::Editor`], and the last change is
//! recorded so `.` can replay it.

pub mod actions;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod input;
pub mod vim;

pub use config::Config;
pub use engine::{channel, Dispatcher, Event, Feed, Handle};
pub use error::VimError;
pub use host::{Editor, MemoryEditor, Position, Selection};
pub use vim::ModeId;
