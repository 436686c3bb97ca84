//! Arguments collected while resolving wildcard placeholders.

use crate::motion::{Motion, TextObject};

/// Structured arguments produced by the wildcard resolvers of one match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChordArgs {
    /// `{N}` that was not consumed by a following motion
    pub count: Option<usize>,
    /// `{char}`
    pub character: Option<char>,
    /// `{motion}`, `{*motion}` or `{shift+motion}`
    pub motions: Vec<Motion>,
    /// `{textObject}`
    pub text_object: Option<TextObject>,
}

impl ChordArgs {
    pub fn is_empty(&self) -> bool {
        self.count.is_none()
            && self.character.is_none()
            && self.motions.is_empty()
            && self.text_object.is_none()
    }
}
