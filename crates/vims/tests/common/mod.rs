//! Test utilities for vims integration tests.
//!
//! Buffers are written in the marked notation of [`MemoryEditor`]: `[]` is a
//! cursor, `[abc]` a selection with the cursor after `c`.

#![allow(dead_code)]

use vims::host::SharedStatus;
use vims::{Config, Dispatcher, MemoryEditor};

/// A started dispatcher over `marked` with the default configuration.
pub async fn dispatcher(marked: &str) -> Dispatcher<MemoryEditor> {
    dispatcher_with(marked, Config::default(), SharedStatus::new()).await
}

pub async fn dispatcher_with(
    marked: &str,
    config: Config,
    status: SharedStatus,
) -> Dispatcher<MemoryEditor> {
    let mut dispatcher =
        Dispatcher::new(MemoryEditor::from_marked(marked), config).with_status(status);
    dispatcher.start().await;
    dispatcher
}

/// Feeds a space separated key script, one token at a time.
pub async fn keys(dispatcher: &mut Dispatcher<MemoryEditor>, script: &str) {
    for token in vims_chord::tokenize(script) {
        dispatcher.input(&token).await;
    }
}

pub fn marked(dispatcher: &Dispatcher<MemoryEditor>) -> String {
    dispatcher.editor().to_marked()
}
