//! # vims-chord
//!
//! Incremental matching of Vim-style key chords.
//!
//! Patterns are space separated tokens where each token is either a literal
//! key (`d`, `escape`, `ctrl+b`) or a typed wildcard placeholder:
//!
//! - `{N}` a repeat count
//! - `{motion}`, `{*motion}`, `{shift+motion}` the motion families
//! - `{textObject}` a text object such as `i w`
//! - `{char}` any single character
//!
//! Placeholders that could start on the same token are resolved once, when a
//! pattern is registered, by a fixed priority order. Matching is therefore
//! deterministic no matter in which order patterns were added.
//!
//! ## Example
//!
//! ```rust
//! use vims_chord::{tokenize, ChordMatch, ChordPattern, ChordTrie, MotionKind, Resolvers};
//!
//! let mut trie = ChordTrie::new(Resolvers::standard());
//! trie.insert(ChordPattern::parse("d {N} {motion}").unwrap(), "delete").unwrap();
//!
//! assert!(matches!(trie.match_tokens(&tokenize("d 3")), ChordMatch::Waiting));
//!
//! if let ChordMatch::Found(found) = trie.match_tokens(&tokenize("d 3 w")) {
//!     assert_eq!(*found.value, "delete");
//!     assert_eq!(found.args.motions[0].kind, MotionKind::WordNextStart);
//!     assert_eq!(found.args.motions[0].args.n, Some(3));
//! }
//! ```

mod args;
mod motion;
mod token;
mod trie;
pub mod wildcard;

pub use args::ChordArgs;
pub use motion::{Motion, MotionArgs, MotionKind, TextObject, TextObjectKind};
pub use token::{
    char_token, is_escape, token_char, tokenize, ChordPattern, PatternError, Segment, Wildcard,
    ESCAPE,
};
pub use trie::{ChordMatch, ChordTrie, Found, MatchStatus, Registration, Terminal};
pub use wildcard::{Resolution, Resolver, Resolvers, MAX_COUNT};
