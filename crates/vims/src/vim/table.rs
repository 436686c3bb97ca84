//! Per-mode command tables.

use std::rc::Rc;

use vims_chord::{
    ChordMatch, ChordPattern, ChordTrie, PatternError, Registration, Resolvers, Segment, Wildcard,
};

use super::binding::{Action, ActionArgs, Binding};
use super::ModeId;

/// Result of matching typed tokens against a table.
#[derive(Debug, Clone)]
pub enum TableMatch {
    Waiting,
    Found {
        binding: Rc<Binding>,
        args: ActionArgs,
        /// Tokens that belong to the chord; the rest is input for the next one.
        consumed: usize,
    },
    Failed,
}

/// A chord that completes what has been typed, with what it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub chord: String,
    pub description: String,
}

/// The chords of one mode.
#[derive(Debug)]
pub struct CommandTable {
    mode: ModeId,
    trie: ChordTrie<Rc<Binding>>,
}

impl CommandTable {
    pub fn new(mode: ModeId) -> Self {
        Self {
            mode,
            trie: ChordTrie::new(Resolvers::standard()),
        }
    }

    pub fn mode(&self) -> ModeId {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Registers `keys`, replacing any binding with the same pattern.
    pub fn register(&mut self, binding: Binding) -> Result<Registration, PatternError> {
        let pattern = ChordPattern::parse(&binding.keys)?;
        let registration = self.trie.insert(pattern, Rc::new(binding))?;
        if registration == Registration::Pruned {
            tracing::debug!(mode = %self.mode, "binding can never match");
        }
        Ok(registration)
    }

    pub fn map(&mut self, keys: &str, actions: Vec<Action>) -> &mut Self {
        self.map_with(keys, actions, ActionArgs::default())
    }

    pub fn map_with(&mut self, keys: &str, actions: Vec<Action>, args: ActionArgs) -> &mut Self {
        if let Err(e) = self.register(Binding::new(keys, actions).with_args(args)) {
            tracing::error!(mode = %self.mode, keys, error = %e, "invalid chord pattern");
        }
        self
    }

    /// Sets the text listed for the binding registered as `keys`.
    pub fn describe(&mut self, keys: &str, description: &str) -> &mut Self {
        match self.get(keys) {
            Some(binding) => {
                let binding = (*binding).clone().describe(description);
                if let Err(e) = self.register(binding) {
                    tracing::error!(mode = %self.mode, keys, error = %e, "invalid chord pattern");
                }
            }
            None => tracing::warn!(mode = %self.mode, keys, "describing an unknown chord"),
        }
        self
    }

    pub fn get(&self, keys: &str) -> Option<Rc<Binding>> {
        let pattern = ChordPattern::parse(keys).ok()?;
        self.trie.get(&pattern).cloned()
    }

    pub fn match_tokens(&self, tokens: &[String]) -> TableMatch {
        Self::found(self.trie.match_tokens(tokens))
    }

    /// Matches tokens as a complete chord.
    pub fn commit(&self, tokens: &[String]) -> TableMatch {
        Self::found(self.trie.commit(tokens))
    }

    fn found(result: ChordMatch<'_, Rc<Binding>>) -> TableMatch {
        match result {
            ChordMatch::Waiting => TableMatch::Waiting,
            ChordMatch::Found(found) => TableMatch::Found {
                args: ActionArgs::merged(found.args, &found.value.args),
                binding: Rc::clone(found.value),
                consumed: found.consumed,
            },
            ChordMatch::Failed => TableMatch::Failed,
        }
    }

    /// Chords that can complete the typed tokens.
    ///
    /// A placeholder right after the typed prefix is expanded into its
    /// completions; a `{N}` that was typed shows the typed digits.
    pub fn suggestions(&self, typed: &[String]) -> Vec<Suggestion> {
        let resolvers = self.trie.resolvers();
        let mut out = Vec::new();

        for terminal in self.trie.entries() {
            let segments = terminal.pattern.segments();
            let Some((rendered, next)) = render_prefix(resolvers, segments, typed) else {
                continue;
            };
            let description = terminal.value.summary();
            let mut push = |chord: String| {
                out.push(Suggestion {
                    chord,
                    description: description.clone(),
                })
            };

            let rest: Vec<String> = segments[next..].iter().map(segment_text).collect();
            match segments.get(next) {
                Some(Segment::Slot(w)) if *w != Wildcard::Count => {
                    let completions = resolvers.completions(*w);
                    if completions.is_empty() {
                        push(join(&rendered, &rest));
                    }
                    for completion in completions {
                        let mut tail = rest.clone();
                        tail[0] = completion;
                        push(join(&rendered, &tail));
                    }
                }
                _ => push(join(&rendered, &rest)),
            }
        }

        // Different patterns can render the same chord; the first one listed wins.
        out.sort_by(|a, b| a.chord.cmp(&b.chord));
        out.dedup_by(|a, b| a.chord == b.chord);
        out
    }
}

fn segment_text(segment: &Segment) -> String {
    match segment {
        Segment::Key(k) => k.clone(),
        Segment::Slot(w) => w.indicator().to_string(),
    }
}

fn join(head: &[String], tail: &[String]) -> String {
    head.iter()
        .chain(tail.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks that `typed` is a prefix of the pattern. Returns the typed part
/// rendered for display and the index of the first segment not yet typed.
fn render_prefix(
    resolvers: &Resolvers,
    segments: &[Segment],
    typed: &[String],
) -> Option<(Vec<String>, usize)> {
    let mut rendered = Vec::new();
    let mut i = 0;
    let mut seg = 0;

    while i < typed.len() {
        match segments.get(seg)? {
            Segment::Key(k) => {
                if *k != typed[i] {
                    return None;
                }
                rendered.push(k.clone());
                i += 1;
            }
            Segment::Slot(Wildcard::Count) => {
                let digits = typed[i..]
                    .iter()
                    .take_while(|t| t.chars().all(|c| c.is_ascii_digit()))
                    .count();
                if digits == 0 || typed[i].starts_with('0') {
                    return None;
                }
                rendered.extend(typed[i..i + digits].iter().cloned());
                i += digits;
            }
            // Tokens typed into any other placeholder are taken as-is.
            Segment::Slot(w) => {
                if !resolvers.get(*w).is_some_and(|r| r.can_start(&typed[i])) {
                    return None;
                }
                rendered.extend(typed[i..].iter().cloned());
                return Some((rendered, segments.len()));
            }
        }
        seg += 1;
    }
    Some((rendered, seg))
}
