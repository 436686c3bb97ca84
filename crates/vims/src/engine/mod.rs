//! The engine: mode machine, dispatch loop and change recording.

mod dispatcher;
mod machine;
mod record;

pub use dispatcher::{channel, Dispatcher, Event, Handle, Stats};
pub use machine::{Feed, ModeMachine, Pending};
pub use record::{line_diff, Extent, LineDiff, Recorded, Recorder, Settle};
