//! Chord tokens and pattern parsing.
//!
//! A token is one atomic input unit: a literal key name such as `d`, `escape`,
//! `space` or `ctrl+b`. Patterns are written as space separated tokens where a
//! token may also be a wildcard placeholder like `{N}` or `{motion}`.

use std::fmt;
use std::str::FromStr;

/// Token that aborts any chord in progress.
pub const ESCAPE: &str = "escape";

/// Wildcard placeholder categories.
///
/// The declaration order is the match priority: when two placeholders hang
/// off the same trie node, the earlier category is tried first and a later
/// category that overlaps it is pruned at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Wildcard {
    /// `{N}`: a repeat count.
    Count,
    /// `{motion}`: a cursor motion.
    Motion,
    /// `{*motion}`: paragraph and indentation motions usable in every mode.
    UniversalMotion,
    /// `{shift+motion}`: selection extending motions.
    SelectableMotion,
    /// `{textObject}`: a text object such as `i w` or `a (`.
    TextObject,
    /// `{char}`: any single printable character.
    Char,
}

impl Wildcard {
    /// All categories, highest priority first.
    pub const PRIORITY: [Wildcard; 6] = [
        Wildcard::Count,
        Wildcard::Motion,
        Wildcard::UniversalMotion,
        Wildcard::SelectableMotion,
        Wildcard::TextObject,
        Wildcard::Char,
    ];

    /// The placeholder text used in patterns.
    pub fn indicator(&self) -> &'static str {
        match self {
            Wildcard::Count => "{N}",
            Wildcard::Motion => "{motion}",
            Wildcard::UniversalMotion => "{*motion}",
            Wildcard::SelectableMotion => "{shift+motion}",
            Wildcard::TextObject => "{textObject}",
            Wildcard::Char => "{char}",
        }
    }

    pub fn from_indicator(s: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|w| w.indicator() == s)
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.indicator())
    }
}

/// One position of a chord pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Slot(Wildcard),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Slot(wildcard) => f.write_str(wildcard.indicator()),
        }
    }
}

/// Error parsing a chord pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern has no tokens
    Empty,
    /// A `{...}` token that names no known wildcard
    UnknownPlaceholder(String),
    /// The placeholder is valid but the trie has no resolver for it
    UnsupportedPlaceholder(Wildcard),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => write!(f, "Empty chord pattern"),
            PatternError::UnknownPlaceholder(p) => write!(f, "Unknown placeholder: {}", p),
            PatternError::UnsupportedPlaceholder(w) => {
                write!(f, "No resolver registered for placeholder: {}", w)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// A parsed chord pattern such as `d {N} {motion}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordPattern {
    segments: Vec<Segment>,
}

impl ChordPattern {
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        let segments = s
            .split_whitespace()
            .map(|token| {
                if token.len() > 2 && token.starts_with('{') && token.ends_with('}') {
                    Wildcard::from_indicator(token)
                        .map(Segment::Slot)
                        .ok_or_else(|| PatternError::UnknownPlaceholder(token.to_string()))
                } else {
                    Ok(Segment::Key(token.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if segments.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if any segment is a wildcard placeholder.
    pub fn has_wildcards(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Slot(_)))
    }
}

impl FromStr for ChordPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChordPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Returns true for the escape token.
pub fn is_escape(token: &str) -> bool {
    token == ESCAPE
}

/// Returns the character a token stands for when typed as text.
///
/// Single character tokens map to themselves; `space`, `tab` and `enter`
/// map to their whitespace character. Other named keys have no character.
pub fn token_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => match token {
            "space" => Some(' '),
            "tab" => Some('\t'),
            "enter" => Some('\n'),
            _ => None,
        },
    }
}

/// Converts a typed character to the token that the chord tables use.
pub fn char_token(c: char) -> String {
    match c {
        ' ' => "space".to_string(),
        '\t' => "tab".to_string(),
        '\n' | '\r' => "enter".to_string(),
        c => c.to_string(),
    }
}

/// Splits a whitespace separated key script into tokens.
pub fn tokenize(script: &str) -> Vec<String> {
    script.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_and_slots() {
        let pattern = ChordPattern::parse("d {N} {motion}").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Key("d".to_string()),
                Segment::Slot(Wildcard::Count),
                Segment::Slot(Wildcard::Motion),
            ]
        );
        assert!(pattern.has_wildcards());
        assert_eq!(pattern.to_string(), "d {N} {motion}");
    }

    #[test]
    fn test_parse_rejects_empty_and_unknown() {
        assert_eq!(ChordPattern::parse("   "), Err(PatternError::Empty));
        assert_eq!(
            ChordPattern::parse("d {bogus}"),
            Err(PatternError::UnknownPlaceholder("{bogus}".to_string()))
        );
    }

    #[test]
    fn test_braces_alone_are_literal_keys() {
        let pattern: ChordPattern = "i {".parse().unwrap();
        assert_eq!(pattern.segments()[1], Segment::Key("{".to_string()));
        let pattern: ChordPattern = "{}".parse().unwrap();
        assert_eq!(pattern.segments()[0], Segment::Key("{}".to_string()));
    }

    #[test]
    fn test_wildcard_priority_order() {
        let mut sorted = Wildcard::PRIORITY.to_vec();
        sorted.sort();
        assert_eq!(sorted, Wildcard::PRIORITY.to_vec());
        assert!(Wildcard::Count < Wildcard::Char);
    }

    #[test]
    fn test_token_char() {
        assert_eq!(token_char("x"), Some('x'));
        assert_eq!(token_char("space"), Some(' '));
        assert_eq!(token_char("«"), Some('«'));
        assert_eq!(token_char("escape"), None);
        assert_eq!(token_char("ctrl+b"), None);
    }

    #[test]
    fn test_char_token_roundtrip_for_whitespace() {
        assert_eq!(char_token(' '), "space");
        assert_eq!(token_char(&char_token('\n')), Some('\n'));
    }
}
