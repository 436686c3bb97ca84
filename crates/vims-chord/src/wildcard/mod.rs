//! Wildcard resolvers.
//!
//! Each placeholder category owns a resolver that knows how to consume one or
//! more tokens, which tokens it can start with (used to prune overlapping
//! placeholders at registration) and which completions it offers.

mod character;
mod count;
mod motion;
mod text_object;

pub use character::CharResolver;
pub use count::{CountResolver, MAX_COUNT};
pub use motion::{MotionCatalog, MotionEntry};
pub use text_object::TextObjectResolver;

use std::fmt;
use std::sync::Arc;

use crate::args::ChordArgs;
use crate::token::Wildcard;

/// Outcome of asking a resolver to consume tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The placeholder consumed this many tokens (always at least one).
    Matched(usize),
    /// The tokens are a strict prefix of something the resolver accepts.
    Partial,
    NoMatch,
}

/// Sub-matcher for one placeholder category.
pub trait Resolver: fmt::Debug + Send + Sync {
    fn wildcard(&self) -> Wildcard;

    /// Resolves the placeholder at the start of `tokens`, which is never empty.
    ///
    /// `after_count` is true when the segment matched right before this one
    /// was a `{N}`; motion resolvers then take the count for themselves.
    fn resolve(&self, tokens: &[String], args: &mut ChordArgs, after_count: bool) -> Resolution;

    /// A finite sample of tokens this resolver starts with.
    ///
    /// Open ended resolvers such as `{char}` return an empty list and rely on
    /// `can_start` instead.
    fn first_tokens(&self) -> Vec<String>;

    fn can_start(&self, token: &str) -> bool;

    /// Completion strings, written in pattern notation.
    fn completions(&self) -> Vec<String>;

    /// Categories that must never share a trie node with this one, whether
    /// or not their start tokens overlap.
    fn conflicts_with(&self, _other: Wildcard) -> bool {
        false
    }
}

/// Returns true if the two resolvers cannot share a trie node.
pub fn overlaps(a: &dyn Resolver, b: &dyn Resolver) -> bool {
    a.conflicts_with(b.wildcard())
        || b.conflicts_with(a.wildcard())
        || a.first_tokens().iter().any(|t| b.can_start(t))
        || b.first_tokens().iter().any(|t| a.can_start(t))
}

/// The set of resolvers a trie consults, kept in priority order.
#[derive(Clone, Default)]
pub struct Resolvers {
    entries: Vec<Arc<dyn Resolver>>,
}

impl Resolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every category: count, the three motion families, text objects and
    /// characters.
    pub fn standard() -> Self {
        Self::new()
            .with(CountResolver)
            .with(MotionCatalog::motions())
            .with(MotionCatalog::universal_motions())
            .with(MotionCatalog::selectable_motions())
            .with(TextObjectResolver::new())
            .with(CharResolver)
    }

    /// Only `{char}`, as used inside motion catalogs for `f {char}`.
    pub fn chars_only() -> Self {
        Self::new().with(CharResolver)
    }

    /// Adds a resolver, replacing any existing one for the same category.
    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        let wildcard = resolver.wildcard();
        self.entries.retain(|r| r.wildcard() != wildcard);
        self.entries.push(Arc::new(resolver));
        self.entries.sort_by_key(|r| r.wildcard());
        self
    }

    pub fn get(&self, wildcard: Wildcard) -> Option<&dyn Resolver> {
        self.entries
            .iter()
            .find(|r| r.wildcard() == wildcard)
            .map(|r| r.as_ref())
    }

    pub fn contains(&self, wildcard: Wildcard) -> bool {
        self.get(wildcard).is_some()
    }

    /// Returns true if the two categories cannot share a trie node.
    pub fn overlap(&self, a: Wildcard, b: Wildcard) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => overlaps(a, b),
            _ => false,
        }
    }

    /// Completions for a category, empty if no resolver is registered.
    pub fn completions(&self, wildcard: Wildcard) -> Vec<String> {
        self.get(wildcard)
            .map(|r| r.completions())
            .unwrap_or_default()
    }
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|r| r.wildcard()))
            .finish()
    }
}
