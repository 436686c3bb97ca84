use super::{Resolution, Resolver, Resolvers};
use crate::args::ChordArgs;
use crate::motion::{Motion, MotionArgs, MotionKind};
use crate::token::{ChordPattern, Wildcard};
use crate::trie::{ChordMatch, ChordTrie};

type MotionBuilder = fn(MotionArgs) -> Vec<Motion>;

/// One catalog entry: how to build motions from the resolved arguments.
#[derive(Debug, Clone, Copy)]
pub struct MotionEntry {
    build: MotionBuilder,
    defaults: MotionArgs,
}

/// A motion family resolver (`{motion}`, `{*motion}` or `{shift+motion}`).
///
/// Each family is a small chord trie of its own, so multi-token motions such
/// as `g e` or `f {char}` are matched the same way top level chords are.
#[derive(Debug)]
pub struct MotionCatalog {
    wildcard: Wildcard,
    trie: ChordTrie<MotionEntry>,
    completions: Vec<String>,
}

fn single(kind: MotionKind, args: MotionArgs) -> Vec<Motion> {
    vec![Motion::with_args(kind, args)]
}

fn then_first_non_blank(kind: MotionKind, args: MotionArgs) -> Vec<Motion> {
    vec![
        Motion::with_args(kind, args),
        Motion::new(MotionKind::LineFirstNonBlank),
    ]
}

const BLANK: MotionArgs = MotionArgs {
    n: None,
    character: None,
    is_till: false,
    is_reverse: false,
    blank_separated: true,
    is_selection: false,
    is_multicursor: false,
};

const TILL: MotionArgs = MotionArgs {
    is_till: true,
    blank_separated: false,
    ..BLANK
};

const REVERSE: MotionArgs = MotionArgs {
    is_reverse: true,
    blank_separated: false,
    ..BLANK
};

const SELECTION: MotionArgs = MotionArgs {
    is_selection: true,
    blank_separated: false,
    ..BLANK
};

const MULTICURSOR: MotionArgs = MotionArgs {
    is_multicursor: true,
    blank_separated: false,
    ..BLANK
};

impl MotionCatalog {
    fn new(wildcard: Wildcard) -> Self {
        Self {
            wildcard,
            trie: ChordTrie::new(Resolvers::chars_only()),
            completions: Vec::new(),
        }
    }

    fn add(&mut self, keys: &str, build: MotionBuilder) -> &mut Self {
        self.add_with(keys, build, MotionArgs::default())
    }

    fn add_with(&mut self, keys: &str, build: MotionBuilder, defaults: MotionArgs) -> &mut Self {
        let inserted = ChordPattern::parse(keys)
            .and_then(|pattern| self.trie.insert(pattern, MotionEntry { build, defaults }));
        match inserted {
            Ok(_) => self.completions.push(keys.to_string()),
            Err(e) => tracing::error!(keys, error = %e, "invalid motion pattern"),
        }
        self
    }

    /// `{motion}`: the classic cursor motions.
    pub fn motions() -> Self {
        use MotionKind::*;

        let mut catalog = Self::new(Wildcard::Motion);
        catalog
            .add("h", |a| single(CharLeft, a))
            .add("left", |a| single(CharLeft, a))
            .add("l", |a| single(CharRight, a))
            .add("right", |a| single(CharRight, a))
            .add("k", |a| single(CharUp, a))
            .add("up", |a| single(CharUp, a))
            .add("j", |a| single(CharDown, a))
            .add("down", |a| single(CharDown, a))
            .add("w", |a| single(WordNextStart, a))
            .add_with("W", |a| single(WordNextStart, a), BLANK)
            .add("e", |a| single(WordNextEnd, a))
            .add_with("E", |a| single(WordNextEnd, a), BLANK)
            .add("b", |a| single(WordPrevStart, a))
            .add_with("B", |a| single(WordPrevStart, a), BLANK)
            .add("g e", |a| single(WordPrevEnd, a))
            .add_with("g E", |a| single(WordPrevEnd, a), BLANK)
            .add("f {char}", |a| single(MatchNext, a))
            .add("F {char}", |a| single(MatchPrev, a))
            .add_with("t {char}", |a| single(MatchNext, a), TILL)
            .add_with("T {char}", |a| single(MatchPrev, a), TILL)
            .add(";", |a| single(MatchRepeatLast, a))
            .add(".", |a| single(MatchRepeatLast, a))
            .add_with(",", |a| single(MatchRepeatLast, a), REVERSE)
            .add("%", |a| match a.n {
                Some(_) => single(DocumentLinePercent, a),
                None => single(MatchPair, a),
            })
            .add("^", |a| single(LineFirstNonBlank, a))
            .add("0", |a| single(LineStart, a))
            .add("$", |a| single(LineEnd, a))
            .add("g ^", |a| single(WrappedLineFirstNonBlank, a))
            .add("g 0", |a| single(WrappedLineStart, a))
            .add("g $", |a| single(WrappedLineEnd, a))
            .add("g m", |a| single(WrappedLineMiddle, a))
            .add("g k", |a| single(WrappedLineUp, a))
            .add("g j", |a| single(WrappedLineDown, a))
            .add("-", |a| then_first_non_blank(CharUp, a))
            .add("+", |a| then_first_non_blank(CharDown, a))
            .add("_", |a| {
                let down = MotionArgs {
                    n: Some(a.n.unwrap_or(1).saturating_sub(1)),
                    ..a
                };
                then_first_non_blank(CharDown, down)
            })
            .add("g g", |a| single(DocumentLineOrFirst, a))
            .add("G", |a| single(DocumentLineOrLast, a))
            .add("space", |a| single(DirectionNext, a))
            .add("g d", |a| single(Declaration, a))
            .add("g D", |a| single(TypeDefinition, a));
        catalog
    }

    /// `{*motion}`: paragraph and indentation motions, with `shift+`
    /// (extend selection) and `alt+` (add cursor) variants.
    pub fn universal_motions() -> Self {
        use MotionKind::*;

        let mut catalog = Self::new(Wildcard::UniversalMotion);
        for (prefix, defaults) in [
            ("*", MotionArgs::default()),
            ("shift+", SELECTION),
            ("alt+", MULTICURSOR),
        ] {
            catalog
                .add_with(&format!("{prefix}q"), |a| single(ParagraphPrev, a), defaults)
                .add_with(&format!("{prefix}Q"), |a| single(ParagraphNext, a), defaults)
                .add_with(
                    &format!("{prefix}«"),
                    |a| then_first_non_blank(SameIndentationPrev, a),
                    defaults,
                )
                .add_with(
                    &format!("{prefix}»"),
                    |a| then_first_non_blank(SameIndentationNext, a),
                    defaults,
                )
                .add_with(
                    &format!("{prefix}“"),
                    |a| then_first_non_blank(IndentationLevelDownNext, a),
                    defaults,
                )
                .add_with(
                    &format!("{prefix}„"),
                    |a| then_first_non_blank(IndentationLevelUpPrev, a),
                    defaults,
                )
                .add_with(
                    &format!("{prefix}‘"),
                    |a| then_first_non_blank(IndentationLevelUpNext, a),
                    defaults,
                )
                .add_with(
                    &format!("{prefix}’"),
                    |a| then_first_non_blank(IndentationLevelDownPrev, a),
                    defaults,
                );
        }
        catalog
    }

    /// `{shift+motion}`: the selection extending paragraph and indentation
    /// motions on their own.
    pub fn selectable_motions() -> Self {
        use MotionKind::*;

        let mut catalog = Self::new(Wildcard::SelectableMotion);
        catalog
            .add("shift+q", |a| single(ParagraphPrev, a))
            .add("shift+Q", |a| single(ParagraphNext, a))
            .add("shift+«", |a| then_first_non_blank(SameIndentationPrev, a))
            .add("shift+»", |a| then_first_non_blank(SameIndentationNext, a))
            .add("shift+“", |a| {
                then_first_non_blank(IndentationLevelDownNext, a)
            })
            .add("shift+„", |a| then_first_non_blank(IndentationLevelUpPrev, a))
            .add("shift+‘", |a| then_first_non_blank(IndentationLevelUpNext, a))
            .add("shift+’", |a| {
                then_first_non_blank(IndentationLevelDownPrev, a)
            });
        catalog
    }
}

impl Resolver for MotionCatalog {
    fn wildcard(&self) -> Wildcard {
        self.wildcard
    }

    fn resolve(&self, tokens: &[String], args: &mut ChordArgs, after_count: bool) -> Resolution {
        match self.trie.match_tokens(tokens) {
            ChordMatch::Found(found) => {
                let mut motion_args = found.value.defaults;
                motion_args.character = found.args.character;
                if after_count {
                    motion_args.n = args.count.take();
                }
                args.motions = (found.value.build)(motion_args);
                Resolution::Matched(found.consumed)
            }
            ChordMatch::Waiting => Resolution::Partial,
            ChordMatch::Failed => Resolution::NoMatch,
        }
    }

    fn first_tokens(&self) -> Vec<String> {
        self.trie.first_tokens()
    }

    fn can_start(&self, token: &str) -> bool {
        self.trie.can_start(token)
    }

    fn completions(&self) -> Vec<String> {
        self.completions.clone()
    }

    fn conflicts_with(&self, other: Wildcard) -> bool {
        other == Wildcard::Char
    }
}
