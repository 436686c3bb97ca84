use super::{Resolution, Resolver, Resolvers};
use crate::args::ChordArgs;
use crate::motion::{TextObject, TextObjectKind};
use crate::token::{ChordPattern, Wildcard};
use crate::trie::{ChordMatch, ChordTrie};

const INVOKERS: [&str; 2] = ["a", "i"];

const OBJECTS: &[(&[&str], TextObjectKind, bool)] = &[
    (&["b", "(", ")"], TextObjectKind::Parentheses, false),
    (&["[", "]"], TextObjectKind::Brackets, false),
    (&["B", "{", "}"], TextObjectKind::Braces, false),
    (&["<", ">"], TextObjectKind::Chevrons, false),
    (&["'"], TextObjectKind::SingleQuotes, false),
    (&["\""], TextObjectKind::DoubleQuotes, false),
    (&["`"], TextObjectKind::Backticks, false),
    (&["t"], TextObjectKind::Tag, false),
    (&["w"], TextObjectKind::Word, false),
    (&["W"], TextObjectKind::Word, true),
];

/// Resolves `{textObject}`: `a` or `i` followed by an object character.
#[derive(Debug)]
pub struct TextObjectResolver {
    trie: ChordTrie<TextObject>,
    completions: Vec<String>,
}

impl TextObjectResolver {
    pub fn new() -> Self {
        let mut trie = ChordTrie::new(Resolvers::new());
        let mut completions = Vec::new();

        for invoker in INVOKERS {
            for (characters, kind, blank_separated) in OBJECTS {
                for character in characters.iter() {
                    let keys = format!("{invoker} {character}");
                    let object = TextObject {
                        kind: *kind,
                        inclusive: invoker == "a",
                        blank_separated: *blank_separated,
                    };
                    match ChordPattern::parse(&keys).and_then(|p| trie.insert(p, object)) {
                        Ok(_) => completions.push(keys),
                        Err(e) => tracing::error!(keys, error = %e, "invalid text object pattern"),
                    }
                }
            }
        }

        Self { trie, completions }
    }
}

impl Default for TextObjectResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for TextObjectResolver {
    fn wildcard(&self) -> Wildcard {
        Wildcard::TextObject
    }

    fn resolve(&self, tokens: &[String], args: &mut ChordArgs, _after_count: bool) -> Resolution {
        match self.trie.match_tokens(tokens) {
            ChordMatch::Found(found) => {
                args.text_object = Some(*found.value);
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
