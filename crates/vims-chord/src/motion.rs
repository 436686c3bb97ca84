//! Motion and text-object descriptors.
//!
//! Resolvers only describe *what* was typed. Computing the target position
//! of a motion or the range of a text object is left to the host editor.

/// What a motion moves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    CharLeft,
    CharRight,
    CharUp,
    CharDown,
    WordNextStart,
    WordNextEnd,
    WordPrevStart,
    WordPrevEnd,
    /// `f`/`t`: next occurrence of `args.character` on the line
    MatchNext,
    /// `F`/`T`: previous occurrence of `args.character` on the line
    MatchPrev,
    /// `;`/`,`: repeat the last character match
    MatchRepeatLast,
    MatchPair,
    DocumentLinePercent,
    DocumentLineOrFirst,
    DocumentLineOrLast,
    LineFirstNonBlank,
    LineStart,
    LineEnd,
    WrappedLineFirstNonBlank,
    WrappedLineStart,
    WrappedLineEnd,
    WrappedLineMiddle,
    WrappedLineUp,
    WrappedLineDown,
    DirectionNext,
    Declaration,
    TypeDefinition,
    ParagraphPrev,
    ParagraphNext,
    SameIndentationPrev,
    SameIndentationNext,
    IndentationLevelDownNext,
    IndentationLevelDownPrev,
    IndentationLevelUpNext,
    IndentationLevelUpPrev,
}

/// Arguments carried by a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MotionArgs {
    /// Repeat count (or target line for document motions)
    pub n: Option<usize>,
    /// Target character for match motions
    pub character: Option<char>,
    /// Stop one character before the match (`t`/`T`)
    pub is_till: bool,
    /// Repeat the last match in the opposite direction (`,`)
    pub is_reverse: bool,
    /// WORD style: words are separated by blanks only
    pub blank_separated: bool,
    /// Extend the selection instead of moving the cursor
    pub is_selection: bool,
    /// Add a cursor at the target instead of moving
    pub is_multicursor: bool,
}

/// A resolved motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Motion {
    pub kind: MotionKind,
    pub args: MotionArgs,
}

impl Motion {
    pub fn new(kind: MotionKind) -> Self {
        Self {
            kind,
            args: MotionArgs::default(),
        }
    }

    pub fn with_args(kind: MotionKind, args: MotionArgs) -> Self {
        Self { kind, args }
    }

    /// Repeat count, defaulting to one.
    pub fn count(&self) -> usize {
        self.args.n.unwrap_or(1).max(1)
    }

    /// Operators on an inclusive motion include the character under the target.
    pub fn is_inclusive(&self) -> bool {
        matches!(
            self.kind,
            MotionKind::WordNextEnd
                | MotionKind::WordPrevEnd
                | MotionKind::MatchNext
                | MotionKind::LineEnd
                | MotionKind::WrappedLineEnd
                | MotionKind::MatchPair
        )
    }

    /// Operators on a linewise motion act on whole lines.
    pub fn is_linewise(&self) -> bool {
        matches!(
            self.kind,
            MotionKind::CharUp
                | MotionKind::CharDown
                | MotionKind::DocumentLinePercent
                | MotionKind::DocumentLineOrFirst
                | MotionKind::DocumentLineOrLast
                | MotionKind::ParagraphPrev
                | MotionKind::ParagraphNext
        )
    }
}

/// Delimiter family of a text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextObjectKind {
    Parentheses,
    Brackets,
    Braces,
    Chevrons,
    SingleQuotes,
    DoubleQuotes,
    Backticks,
    Tag,
    Word,
}

impl TextObjectKind {
    /// Opening and closing characters for pair and quote objects.
    pub fn delimiters(&self) -> Option<(char, char)> {
        match self {
            TextObjectKind::Parentheses => Some(('(', ')')),
            TextObjectKind::Brackets => Some(('[', ']')),
            TextObjectKind::Braces => Some(('{', '}')),
            TextObjectKind::Chevrons => Some(('<', '>')),
            TextObjectKind::SingleQuotes => Some(('\'', '\'')),
            TextObjectKind::DoubleQuotes => Some(('"', '"')),
            TextObjectKind::Backticks => Some(('`', '`')),
            TextObjectKind::Tag | TextObjectKind::Word => None,
        }
    }
}

/// A resolved text object such as `i w` or `a (`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextObject {
    pub kind: TextObjectKind,
    /// `a` objects include the delimiters (or trailing blanks for words)
    pub inclusive: bool,
    pub blank_separated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_count_defaults_to_one() {
        assert_eq!(Motion::new(MotionKind::CharLeft).count(), 1);
        let args = MotionArgs {
            n: Some(0),
            ..Default::default()
        };
        assert_eq!(Motion::with_args(MotionKind::CharLeft, args).count(), 1);
    }

    #[test]
    fn test_inclusive_and_linewise() {
        assert!(Motion::new(MotionKind::WordNextEnd).is_inclusive());
        assert!(!Motion::new(MotionKind::WordNextStart).is_inclusive());
        assert!(Motion::new(MotionKind::CharDown).is_linewise());
        assert!(!Motion::new(MotionKind::LineEnd).is_linewise());
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(TextObjectKind::Braces.delimiters(), Some(('{', '}')));
        assert_eq!(TextObjectKind::Word.delimiters(), None);
    }
}
