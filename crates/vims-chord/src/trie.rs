//! Prefix matching over chord patterns.
//!
//! Each node has literal children keyed by token, wildcard children kept in
//! priority order, and an optional terminal value. Matching walks the input
//! one token at a time: literal children are always consulted first, then the
//! wildcard children in priority order. There is no backtracking once a
//! branch has been taken.

use std::collections::BTreeMap;

use crate::args::ChordArgs;
use crate::token::{is_escape, ChordPattern, PatternError, Segment, Wildcard};
use crate::wildcard::{Resolution, Resolvers};

/// A registered pattern and its value.
#[derive(Debug, Clone)]
pub struct Terminal<T> {
    pub pattern: ChordPattern,
    pub value: T,
}

#[derive(Debug)]
struct Node<T> {
    literals: BTreeMap<String, Node<T>>,
    slots: Vec<(Wildcard, Node<T>)>,
    terminal: Option<Terminal<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            literals: BTreeMap::new(),
            slots: Vec::new(),
            terminal: None,
        }
    }
}

impl<T> Node<T> {
    fn is_leaf(&self) -> bool {
        self.literals.is_empty() && self.slots.is_empty()
    }

    fn count(&self) -> usize {
        usize::from(self.terminal.is_some())
            + self.literals.values().map(Node::count).sum::<usize>()
            + self.slots.iter().map(|(_, n)| n.count()).sum::<usize>()
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Terminal<T>>) {
        if let Some(terminal) = &self.terminal {
            out.push(terminal);
        }
        for child in self.literals.values() {
            child.collect(out);
        }
        for (_, child) in &self.slots {
            child.collect(out);
        }
    }

    /// Makes room for a wildcard child, pruning overlapping siblings.
    ///
    /// Returns false when a higher priority sibling already overlaps
    /// `wildcard`, in which case the caller's pattern is dropped.
    fn admit_slot(&mut self, wildcard: Wildcard, resolvers: &Resolvers, pattern: &ChordPattern) -> bool {
        if self.slots.iter().any(|(w, _)| *w == wildcard) {
            return true;
        }

        if let Some((higher, _)) = self
            .slots
            .iter()
            .find(|(w, _)| *w < wildcard && resolvers.overlap(*w, wildcard))
        {
            tracing::warn!(
                pattern = %pattern,
                pruned = %wildcard,
                kept = %higher,
                "wildcard shadowed by a higher priority placeholder"
            );
            return false;
        }

        self.slots.retain(|(lower, node)| {
            let keep = !(*lower > wildcard && resolvers.overlap(wildcard, *lower));
            if !keep {
                tracing::warn!(
                    pattern = %pattern,
                    pruned = %lower,
                    kept = %wildcard,
                    dropped_patterns = node.count(),
                    "wildcard shadowed by a higher priority placeholder"
                );
            }
            keep
        });

        let at = self
            .slots
            .iter()
            .position(|(w, _)| *w > wildcard)
            .unwrap_or(self.slots.len());
        self.slots.insert(at, (wildcard, Node::default()));
        true
    }

    fn slot_mut(&mut self, wildcard: Wildcard) -> Option<&mut Node<T>> {
        self.slots
            .iter_mut()
            .find(|(w, _)| *w == wildcard)
            .map(|(_, n)| n)
    }
}

/// Result of registering a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    /// The pattern was already registered; its value was overwritten.
    Replaced,
    /// A placeholder in the pattern conflicts with a higher priority one at
    /// the same position, so the pattern can never match.
    Pruned,
}

/// Coarse status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Waiting,
    Found,
    Failed,
}

/// A terminal reached by a match.
#[derive(Debug, Clone)]
pub struct Found<'a, T> {
    pub pattern: &'a ChordPattern,
    pub value: &'a T,
    /// Number of input tokens that belong to this chord.
    pub consumed: usize,
    pub args: ChordArgs,
}

/// Result of matching input tokens against a trie.
#[derive(Debug, Clone)]
pub enum ChordMatch<'a, T> {
    /// The input is a strict prefix of at least one pattern.
    Waiting,
    Found(Found<'a, T>),
    Failed,
}

impl<T> ChordMatch<'_, T> {
    pub fn status(&self) -> MatchStatus {
        match self {
            ChordMatch::Waiting => MatchStatus::Waiting,
            ChordMatch::Found(_) => MatchStatus::Found,
            ChordMatch::Failed => MatchStatus::Failed,
        }
    }
}

/// A trie of chord patterns.
#[derive(Debug)]
pub struct ChordTrie<T> {
    root: Node<T>,
    resolvers: Resolvers,
}

impl<T> ChordTrie<T> {
    pub fn new(resolvers: Resolvers) -> Self {
        Self {
            root: Node::default(),
            resolvers,
        }
    }

    pub fn resolvers(&self) -> &Resolvers {
        &self.resolvers
    }

    /// Registers a pattern, overwriting any previous value for it.
    pub fn insert(&mut self, pattern: ChordPattern, value: T) -> Result<Registration, PatternError> {
        for segment in pattern.segments() {
            if let Segment::Slot(wildcard) = segment {
                if !self.resolvers.contains(*wildcard) {
                    return Err(PatternError::UnsupportedPlaceholder(*wildcard));
                }
            }
        }

        let resolvers = &self.resolvers;
        let mut node = &mut self.root;
        for segment in pattern.segments() {
            node = match segment {
                Segment::Key(key) => node.literals.entry(key.clone()).or_default(),
                Segment::Slot(wildcard) => {
                    if !node.admit_slot(*wildcard, resolvers, &pattern) {
                        return Ok(Registration::Pruned);
                    }
                    match node.slot_mut(*wildcard) {
                        Some(child) => child,
                        None => return Ok(Registration::Pruned),
                    }
                }
            };
        }

        let previous = node.terminal.replace(Terminal { pattern, value });
        Ok(match previous {
            Some(_) => Registration::Replaced,
            None => Registration::Inserted,
        })
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }

    /// Looks up the value registered for exactly this pattern.
    pub fn get(&self, pattern: &ChordPattern) -> Option<&T> {
        let mut node = &self.root;
        for segment in pattern.segments() {
            node = match segment {
                Segment::Key(key) => node.literals.get(key)?,
                Segment::Slot(wildcard) => {
                    node.slots.iter().find(|(w, _)| w == wildcard).map(|(_, n)| n)?
                }
            };
        }
        node.terminal.as_ref().map(|t| &t.value)
    }

    /// All registered patterns, literal branches first.
    pub fn entries(&self) -> Vec<&Terminal<T>> {
        let mut out = Vec::new();
        self.root.collect(&mut out);
        out
    }

    /// Literal tokens at the root plus the start tokens of root wildcards.
    pub fn first_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.root.literals.keys().cloned().collect();
        for (wildcard, _) in &self.root.slots {
            if let Some(resolver) = self.resolvers.get(*wildcard) {
                tokens.extend(resolver.first_tokens());
            }
        }
        tokens
    }

    /// Returns true if some pattern can start with `token`.
    pub fn can_start(&self, token: &str) -> bool {
        self.root.literals.contains_key(token)
            || self.root.slots.iter().any(|(wildcard, _)| {
                self.resolvers
                    .get(*wildcard)
                    .is_some_and(|r| r.can_start(token))
            })
    }

    /// Matches live input.
    ///
    /// A pattern that is complete but also a prefix of a longer pattern
    /// reports `Waiting` until more input arrives or [`commit`] is called.
    ///
    /// [`commit`]: ChordTrie::commit
    pub fn match_tokens(&self, tokens: &[String]) -> ChordMatch<'_, T> {
        self.walk(tokens, false)
    }

    /// Matches input that is known to be complete.
    pub fn commit(&self, tokens: &[String]) -> ChordMatch<'_, T> {
        self.walk(tokens, true)
    }

    fn walk(&self, tokens: &[String], complete: bool) -> ChordMatch<'_, T> {
        if tokens.is_empty() {
            return ChordMatch::Failed;
        }
        if tokens.len() > 1 && tokens.iter().any(|t| is_escape(t)) {
            return ChordMatch::Failed;
        }

        let mut node = &self.root;
        let mut pos = 0;
        let mut args = ChordArgs::default();
        let mut last_slot: Option<Wildcard> = None;
        let mut fallback: Option<Found<'_, T>> = None;

        'walk: loop {
            if let Some(terminal) = &node.terminal {
                let found = Found {
                    pattern: &terminal.pattern,
                    value: &terminal.value,
                    consumed: pos,
                    args: args.clone(),
                };
                if pos == tokens.len() && (complete || node.is_leaf()) {
                    return ChordMatch::Found(found);
                }
                fallback = Some(found);
            }

            if pos == tokens.len() {
                return if complete {
                    fallback.map_or(ChordMatch::Failed, ChordMatch::Found)
                } else {
                    ChordMatch::Waiting
                };
            }

            let token = &tokens[pos];
            if let Some(child) = node.literals.get(token) {
                node = child;
                pos += 1;
                last_slot = None;
                continue;
            }

            for (wildcard, child) in &node.slots {
                let Some(resolver) = self.resolvers.get(*wildcard) else {
                    continue;
                };
                let mut trial = args.clone();
                let after_count = last_slot == Some(Wildcard::Count);
                match resolver.resolve(&tokens[pos..], &mut trial, after_count) {
                    Resolution::Matched(consumed) if consumed > 0 => {
                        node = child;
                        pos += consumed;
                        args = trial;
                        last_slot = Some(*wildcard);
                        continue 'walk;
                    }
                    Resolution::Partial if !complete => return ChordMatch::Waiting,
                    Resolution::Partial => break,
                    Resolution::Matched(_) | Resolution::NoMatch => {}
                }
            }

            return fallback.map_or(ChordMatch::Failed, ChordMatch::Found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MotionKind;
    use crate::token::tokenize;

    fn trie(patterns: &[&str]) -> ChordTrie<String> {
        let mut trie = ChordTrie::new(Resolvers::standard());
        for p in patterns {
            trie.insert(ChordPattern::parse(p).unwrap(), p.to_string())
                .unwrap();
        }
        trie
    }

    fn status(trie: &ChordTrie<String>, input: &str) -> MatchStatus {
        trie.match_tokens(&tokenize(input)).status()
    }

    fn found(trie: &ChordTrie<String>, input: &str) -> (String, usize, ChordArgs) {
        match trie.match_tokens(&tokenize(input)) {
            ChordMatch::Found(f) => (f.value.clone(), f.consumed, f.args),
            other => panic!("expected Found for {:?}, got {:?}", input, other.status()),
        }
    }

    #[test]
    fn test_prefixes_wait_and_full_patterns_are_found() {
        let t = trie(&["d d", "d {N} {motion}", "g g u"]);
        assert_eq!(status(&t, "d"), MatchStatus::Waiting);
        assert_eq!(status(&t, "d 2"), MatchStatus::Waiting);
        assert_eq!(status(&t, "g g"), MatchStatus::Waiting);
        assert_eq!(found(&t, "d d").0, "d d");
        assert_eq!(found(&t, "g g u").0, "g g u");

        let (value, consumed, args) = found(&t, "d 2 w");
        assert_eq!(value, "d {N} {motion}");
        assert_eq!(consumed, 3);
        assert_eq!(args.count, None);
        assert_eq!(args.motions[0].kind, MotionKind::WordNextStart);
        assert_eq!(args.motions[0].args.n, Some(2));
    }

    #[test]
    fn test_non_prefix_fails() {
        let t = trie(&["d d", "y y"]);
        assert_eq!(status(&t, "q"), MatchStatus::Failed);
        assert_eq!(status(&t, "d y"), MatchStatus::Failed);
        assert_eq!(status(&t, ""), MatchStatus::Failed);
    }

    #[test]
    fn test_literal_zero_beats_count() {
        let t = trie(&["{N} x", "0"]);
        assert_eq!(found(&t, "0").0, "0");
        assert_eq!(status(&t, "1 0"), MatchStatus::Waiting);
        let (value, _, args) = found(&t, "1 0 x");
        assert_eq!(value, "{N} x");
        assert_eq!(args.count, Some(10));
    }

    #[test]
    fn test_zero_resolves_to_start_of_line_motion() {
        let t = trie(&["{N} {motion}", "{motion}"]);
        let (value, _, args) = found(&t, "0");
        assert_eq!(value, "{motion}");
        assert_eq!(args.motions[0].kind, MotionKind::LineStart);
    }

    #[test]
    fn test_count_threads_into_find_motion() {
        let t = trie(&["{N} {motion}"]);
        assert_eq!(status(&t, "2 f"), MatchStatus::Waiting);
        let (_, consumed, args) = found(&t, "2 f x");
        assert_eq!(consumed, 3);
        let motion = args.motions[0];
        assert_eq!(motion.kind, MotionKind::MatchNext);
        assert_eq!(motion.args.n, Some(2));
        assert_eq!(motion.args.character, Some('x'));
    }

    #[test]
    fn test_escape_aborts_partial_chord() {
        let t = trie(&["d d", "escape"]);
        assert_eq!(status(&t, "d escape"), MatchStatus::Failed);
        assert_eq!(found(&t, "escape").0, "escape");
    }

    #[test]
    fn test_terminal_that_is_also_prefix_waits() {
        let t = trie(&["g", "g g"]);
        assert_eq!(status(&t, "g"), MatchStatus::Waiting);
        match t.commit(&tokenize("g")) {
            ChordMatch::Found(f) => assert_eq!(f.value, "g"),
            other => panic!("expected Found, got {:?}", other.status()),
        }
        // A following token that does not continue falls back to the shorter chord.
        let (value, consumed, _) = found(&t, "g x");
        assert_eq!(value, "g");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_char_is_pruned_next_to_motion_regardless_of_order() {
        let first = trie(&["r {char}", "r {motion}"]);
        let second = trie(&["r {motion}", "r {char}"]);
        for t in [&first, &second] {
            assert_eq!(t.len(), 1);
            assert_eq!(found(t, "r w").0, "r {motion}");
            assert_eq!(status(t, "r q"), MatchStatus::Failed);
        }
    }

    #[test]
    fn test_insert_reports_pruned_and_replaced() {
        let mut t = trie(&["r {motion}"]);
        let pruned = t
            .insert(ChordPattern::parse("r {char}").unwrap(), "char".into())
            .unwrap();
        assert_eq!(pruned, Registration::Pruned);
        let replaced = t
            .insert(ChordPattern::parse("r {motion}").unwrap(), "again".into())
            .unwrap();
        assert_eq!(replaced, Registration::Replaced);
        assert_eq!(found(&t, "r l").0, "again");
    }

    #[test]
    fn test_literal_shadows_wildcard() {
        let t = trie(&["{motion}", "."]);
        assert_eq!(found(&t, ".").0, ".");
        assert_eq!(found(&t, ",").0, "{motion}");
    }

    #[test]
    fn test_text_object_and_char() {
        let t = trie(&["d {textObject}", "r {char}"]);
        let (_, _, args) = found(&t, "d i w");
        assert!(args.text_object.is_some());
        let (_, _, args) = found(&t, "r space");
        assert_eq!(args.character, Some(' '));
        assert_eq!(status(&t, "d i"), MatchStatus::Waiting);
    }

    #[test]
    fn test_unsupported_placeholder() {
        let mut t: ChordTrie<()> = ChordTrie::new(Resolvers::chars_only());
        assert_eq!(
            t.insert(ChordPattern::parse("{N} x").unwrap(), ()),
            Err(PatternError::UnsupportedPlaceholder(Wildcard::Count))
        );
        assert!(t.is_empty());
    }

    #[test]
    fn test_entries_and_get() {
        let t = trie(&["x", "d d"]);
        assert_eq!(t.entries().len(), 2);
        let pattern = ChordPattern::parse("d d").unwrap();
        assert_eq!(t.get(&pattern), Some(&"d d".to_string()));
    }
}
