//! Plain text document with reference motion and text-object math.
//!
//! This is what [`MemoryEditor`](super::MemoryEditor) uses to answer motion
//! and text-object queries. Hosts with their own buffer model are free to
//! ignore it.

use vims_chord::{Motion, MotionKind, TextObject, TextObjectKind};

use super::{Position, Range, TextEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Blank,
    Word,
    Punct,
}

fn class(c: char, blank_separated: bool) -> Class {
    if c.is_whitespace() {
        Class::Blank
    } else if blank_separated || c.is_alphanumeric() || c == '_' {
        Class::Word
    } else {
        Class::Punct
    }
}

/// The last `f`/`F`/`t`/`T` search, repeated by `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMatch {
    pub forward: bool,
    pub character: char,
    pub till: bool,
}

/// A text buffer as a list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> &str {
        self.lines.get(line).map(String::as_str).unwrap_or("")
    }

    pub fn line_len(&self, line: usize) -> usize {
        self.line(line).chars().count()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    /// Clamps a position into the document; the column may sit at line end.
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        Position::new(line, pos.character.min(self.line_len(line)))
    }

    /// Char offset of a position, counting one char per line break.
    pub fn offset(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        let before: usize = self.lines[..pos.line]
            .iter()
            .map(|l| l.chars().count() + 1)
            .sum();
        before + pos.character
    }

    pub fn position(&self, offset: usize) -> Position {
        let mut remaining = offset;
        for (line, text) in self.lines.iter().enumerate() {
            let len = text.chars().count();
            if remaining <= len {
                return Position::new(line, remaining);
            }
            remaining -= len + 1;
        }
        let last = self.last_line();
        Position::new(last, self.line_len(last))
    }

    fn chars(&self) -> Vec<char> {
        self.text().chars().collect()
    }

    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line).chars().nth(pos.character)
    }

    pub fn slice(&self, range: Range) -> String {
        let start = self.offset(range.start);
        let end = self.offset(range.end);
        self.chars()[start..end.max(start)].iter().collect()
    }

    /// Column of the first non-blank character, or the line length.
    pub fn first_non_blank(&self, line: usize) -> usize {
        self.line(line)
            .chars()
            .position(|c| !c.is_whitespace())
            .unwrap_or_else(|| self.line_len(line))
    }

    fn indent(&self, line: usize) -> usize {
        self.line(line)
            .chars()
            .take_while(|c| c.is_whitespace())
            .count()
    }

    fn is_blank(&self, line: usize) -> bool {
        self.line(line).trim().is_empty()
    }

    /// Applies non-overlapping edits given in pre-edit coordinates.
    ///
    /// Returns `(start, removed, inserted)` char offsets per edit, ordered from
    /// the last edit in the document to the first.
    pub fn apply(&mut self, edits: &[TextEdit]) -> Vec<(usize, usize, usize)> {
        let mut spans: Vec<(usize, usize, &str)> = edits
            .iter()
            .map(|e| (self.offset(e.range.start), self.offset(e.range.end), e.text.as_str()))
            .collect();
        spans.sort_by(|a, b| b.0.cmp(&a.0));

        let mut chars = self.chars();
        let mut applied = Vec::with_capacity(spans.len());
        for (start, end, text) in spans {
            let end = end.max(start).min(chars.len());
            let start = start.min(end);
            let inserted: Vec<char> = text.chars().collect();
            let inserted_len = inserted.len();
            chars.splice(start..end, inserted);
            applied.push((start, end - start, inserted_len));
        }

        let text: String = chars.into_iter().collect();
        *self = Document::new(&text);
        applied
    }

    /// Where `motion` lands from `from`. Motions that cannot move return
    /// `from` unchanged.
    pub fn motion_target(
        &self,
        from: Position,
        motion: &Motion,
        last_match: &mut Option<LastMatch>,
    ) -> Position {
        let from = self.clamp(from);
        let n = motion.count();
        let args = &motion.args;

        match motion.kind {
            MotionKind::CharLeft => {
                Position::new(from.line, from.character.saturating_sub(n))
            }
            MotionKind::CharRight => Position::new(
                from.line,
                (from.character + n).min(self.line_len(from.line)),
            ),
            MotionKind::CharUp | MotionKind::WrappedLineUp => {
                let line = from.line.saturating_sub(n);
                Position::new(line, from.character.min(self.line_len(line)))
            }
            MotionKind::CharDown | MotionKind::WrappedLineDown => {
                // `_` asks for zero lines down.
                let step = if motion.args.n == Some(0) { 0 } else { n };
                let line = (from.line + step).min(self.last_line());
                Position::new(line, from.character.min(self.line_len(line)))
            }
            MotionKind::WordNextStart => self.repeat_offset(from, n, |c, o| {
                Document::next_word_start(c, o, args.blank_separated)
            }),
            MotionKind::WordNextEnd => self.repeat_offset(from, n, |c, o| {
                Document::next_word_end(c, o, args.blank_separated)
            }),
            MotionKind::WordPrevStart => self.repeat_offset(from, n, |c, o| {
                Document::prev_word_start(c, o, args.blank_separated)
            }),
            MotionKind::WordPrevEnd => self.repeat_offset(from, n, |c, o| {
                Document::prev_word_end(c, o, args.blank_separated)
            }),
            MotionKind::MatchNext | MotionKind::MatchPrev => {
                let Some(character) = args.character else {
                    return from;
                };
                let search = LastMatch {
                    forward: motion.kind == MotionKind::MatchNext,
                    character,
                    till: args.is_till,
                };
                *last_match = Some(search);
                self.find_in_line(from, search, n)
            }
            MotionKind::MatchRepeatLast => match *last_match {
                Some(mut search) => {
                    if args.is_reverse {
                        search.forward = !search.forward;
                    }
                    self.find_in_line(from, search, n)
                }
                None => from,
            },
            MotionKind::MatchPair => self.match_pair(from).unwrap_or(from),
            MotionKind::DocumentLinePercent => {
                let percent = args.n.unwrap_or(100).min(100);
                let line = (percent * self.line_count()).div_ceil(100).max(1) - 1;
                Position::new(line, self.first_non_blank(line))
            }
            MotionKind::DocumentLineOrFirst => {
                let line = args.n.map_or(0, |l| l.saturating_sub(1)).min(self.last_line());
                Position::new(line, self.first_non_blank(line))
            }
            MotionKind::DocumentLineOrLast => {
                let line = args
                    .n
                    .map_or(self.last_line(), |l| l.saturating_sub(1))
                    .min(self.last_line());
                Position::new(line, self.first_non_blank(line))
            }
            MotionKind::LineFirstNonBlank | MotionKind::WrappedLineFirstNonBlank => {
                Position::new(from.line, self.first_non_blank(from.line))
            }
            MotionKind::LineStart | MotionKind::WrappedLineStart => Position::new(from.line, 0),
            MotionKind::LineEnd | MotionKind::WrappedLineEnd => {
                let line = (from.line + n - 1).min(self.last_line());
                Position::new(line, self.line_len(line))
            }
            MotionKind::WrappedLineMiddle => {
                Position::new(from.line, self.line_len(from.line) / 2)
            }
            MotionKind::DirectionNext => {
                let chars = self.chars();
                let mut offset = self.offset(from);
                for _ in 0..n {
                    if offset + 1 < chars.len() && chars[offset + 1] == '\n' {
                        offset += 2;
                    } else {
                        offset += 1;
                    }
                }
                self.position(offset.min(chars.len().saturating_sub(1)))
            }
            // No language services behind a plain document.
            MotionKind::Declaration | MotionKind::TypeDefinition => from,
            MotionKind::ParagraphNext => self.repeat_line(from, n, |d, l| d.paragraph_next(l)),
            MotionKind::ParagraphPrev => self.repeat_line(from, n, |d, l| d.paragraph_prev(l)),
            MotionKind::SameIndentationNext => {
                self.repeat_line(from, n, |d, l| d.find_indent(l, true, |a, b| a == b))
            }
            MotionKind::SameIndentationPrev => {
                self.repeat_line(from, n, |d, l| d.find_indent(l, false, |a, b| a == b))
            }
            MotionKind::IndentationLevelDownNext => {
                self.repeat_line(from, n, |d, l| d.find_indent(l, true, |a, b| a > b))
            }
            MotionKind::IndentationLevelDownPrev => {
                self.repeat_line(from, n, |d, l| d.find_indent(l, false, |a, b| a > b))
            }
            MotionKind::IndentationLevelUpNext => {
                self.repeat_line(from, n, |d, l| d.find_indent(l, true, |a, b| a < b))
            }
            MotionKind::IndentationLevelUpPrev => {
                self.repeat_line(from, n, |d, l| d.find_indent(l, false, |a, b| a < b))
            }
        }
    }

    fn repeat_offset(
        &self,
        from: Position,
        n: usize,
        step: impl Fn(&[char], usize) -> usize,
    ) -> Position {
        let chars = self.chars();
        let mut offset = self.offset(from);
        for _ in 0..n {
            offset = step(&chars, offset);
        }
        self.position(offset)
    }

    fn repeat_line(
        &self,
        from: Position,
        n: usize,
        step: impl Fn(&Document, usize) -> usize,
    ) -> Position {
        let mut line = from.line;
        for _ in 0..n {
            line = step(self, line);
        }
        if line == from.line {
            from
        } else {
            Position::new(line, 0)
        }
    }

    fn find_in_line(&self, from: Position, search: LastMatch, n: usize) -> Position {
        let chars: Vec<char> = self.line(from.line).chars().collect();
        let col = from.character;
        let hits: Vec<usize> = if search.forward {
            // Repeating a till search must not stick in front of the same match.
            let skip = if search.till { 2 } else { 1 };
            (col + skip..chars.len())
                .filter(|&i| chars[i] == search.character)
                .collect()
        } else {
            let skip = if search.till { 1 } else { 0 };
            (0..col.saturating_sub(skip))
                .rev()
                .filter(|&i| chars[i] == search.character)
                .collect()
        };

        match hits.get(n - 1) {
            Some(&i) if search.till && search.forward => Position::new(from.line, i - 1),
            Some(&i) if search.till => Position::new(from.line, i + 1),
            Some(&i) => Position::new(from.line, i),
            None => from,
        }
    }

    fn match_pair(&self, from: Position) -> Option<Position> {
        const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

        let chars = self.chars();
        let line_start = self.offset(Position::new(from.line, 0));
        let line_end = line_start + self.line_len(from.line);
        let start = self.offset(from);
        let at = (start..line_end).find(|&i| PAIRS.iter().any(|(o, c)| chars[i] == *o || chars[i] == *c))?;

        let c = chars[at];
        if let Some(&(open, close)) = PAIRS.iter().find(|(o, _)| *o == c) {
            let mut depth = 0usize;
            for (i, &ch) in chars.iter().enumerate().skip(at) {
                if ch == open {
                    depth += 1;
                } else if ch == close {
                    depth -= 1;
                    if depth == 0 {
                        return Some(self.position(i));
                    }
                }
            }
        } else if let Some(&(open, close)) = PAIRS.iter().find(|(_, cl)| *cl == c) {
            let mut depth = 0usize;
            for i in (0..=at).rev() {
                if chars[i] == close {
                    depth += 1;
                } else if chars[i] == open {
                    depth -= 1;
                    if depth == 0 {
                        return Some(self.position(i));
                    }
                }
            }
        }
        None
    }

    fn next_word_start(chars: &[char], offset: usize, blank: bool) -> usize {
        let n = chars.len();
        if offset >= n {
            return n;
        }
        let mut i = offset;
        let start = class(chars[i], blank);
        if start != Class::Blank {
            while i < n && class(chars[i], blank) == start {
                i += 1;
            }
        }
        while i < n && class(chars[i], blank) == Class::Blank {
            // An empty line counts as a word of its own.
            if chars[i] == '\n' && i + 1 < n && chars[i + 1] == '\n' {
                return i + 1;
            }
            i += 1;
        }
        i
    }

    fn next_word_end(chars: &[char], offset: usize, blank: bool) -> usize {
        let n = chars.len();
        let mut i = offset + 1;
        while i < n && class(chars[i], blank) == Class::Blank {
            i += 1;
        }
        if i >= n {
            return n.saturating_sub(1).max(offset);
        }
        let word = class(chars[i], blank);
        while i + 1 < n && class(chars[i + 1], blank) == word {
            i += 1;
        }
        i
    }

    fn prev_word_start(chars: &[char], offset: usize, blank: bool) -> usize {
        if offset == 0 || chars.is_empty() {
            return 0;
        }
        let mut i = (offset - 1).min(chars.len() - 1);
        while i > 0 && class(chars[i], blank) == Class::Blank {
            i -= 1;
        }
        let word = class(chars[i], blank);
        while i > 0 && class(chars[i - 1], blank) == word {
            i -= 1;
        }
        i
    }

    fn prev_word_end(chars: &[char], offset: usize, blank: bool) -> usize {
        if offset == 0 || chars.is_empty() {
            return 0;
        }
        let mut i = offset.min(chars.len() - 1);
        let word = class(chars[i], blank);
        if word != Class::Blank {
            while i > 0 && class(chars[i], blank) == word {
                i -= 1;
            }
        }
        while i > 0 && class(chars[i], blank) == Class::Blank {
            i -= 1;
        }
        i
    }

    fn paragraph_next(&self, line: usize) -> usize {
        let mut l = line;
        while l < self.last_line() && self.is_blank(l) {
            l += 1;
        }
        while l < self.last_line() && !self.is_blank(l) {
            l += 1;
        }
        l
    }

    fn paragraph_prev(&self, line: usize) -> usize {
        let mut l = line;
        while l > 0 && self.is_blank(l) {
            l -= 1;
        }
        while l > 0 && !self.is_blank(l) {
            l -= 1;
        }
        l
    }

    fn find_indent(&self, line: usize, forward: bool, accept: impl Fn(usize, usize) -> bool) -> usize {
        let current = self.indent(line);
        let candidates: Box<dyn Iterator<Item = usize>> = if forward {
            Box::new(line + 1..self.line_count())
        } else {
            Box::new((0..line).rev())
        };
        candidates
            .filter(|&l| !self.is_blank(l))
            .find(|&l| accept(self.indent(l), current))
            .unwrap_or(line)
    }

    /// Range covered by a text object around `at`.
    pub fn text_object_range(&self, at: Position, object: &TextObject) -> Option<Range> {
        let at = self.clamp(at);
        let (start, end) = match object.kind {
            TextObjectKind::Word => self.word_object(at, object)?,
            TextObjectKind::SingleQuotes
            | TextObjectKind::DoubleQuotes
            | TextObjectKind::Backticks => {
                let (quote, _) = object.kind.delimiters()?;
                self.quote_object(at, quote, object.inclusive)?
            }
            TextObjectKind::Tag => self.tag_object(at, object.inclusive)?,
            _ => {
                let (open, close) = object.kind.delimiters()?;
                self.pair_object(at, open, close, object.inclusive)?
            }
        };
        Some(Range::new(self.position(start), self.position(end)))
    }

    fn word_object(&self, at: Position, object: &TextObject) -> Option<(usize, usize)> {
        let blank = object.blank_separated;
        let line: Vec<char> = self.line(at.line).chars().collect();
        let col = at.character.min(line.len().checked_sub(1)?);
        let kind = class(line[col], blank);

        let mut start = col;
        while start > 0 && class(line[start - 1], blank) == kind {
            start -= 1;
        }
        let mut end = col + 1;
        while end < line.len() && class(line[end], blank) == kind {
            end += 1;
        }

        if object.inclusive && kind != Class::Blank {
            let trailing = end;
            while end < line.len() && class(line[end], blank) == Class::Blank {
                end += 1;
            }
            if end == trailing {
                while start > 0 && class(line[start - 1], blank) == Class::Blank {
                    start -= 1;
                }
            }
        }

        let base = self.offset(Position::new(at.line, 0));
        Some((base + start, base + end))
    }

    fn quote_object(&self, at: Position, quote: char, inclusive: bool) -> Option<(usize, usize)> {
        let line: Vec<char> = self.line(at.line).chars().collect();
        let quotes: Vec<usize> = line
            .iter()
            .enumerate()
            .filter(|(i, &c)| c == quote && (*i == 0 || line[i - 1] != '\\'))
            .map(|(i, _)| i)
            .collect();

        let (open, close) = quotes
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .find(|&(_, close)| at.character <= close)?;

        let base = self.offset(Position::new(at.line, 0));
        Some(if inclusive {
            (base + open, base + close + 1)
        } else {
            (base + open + 1, base + close)
        })
    }

    fn pair_object(
        &self,
        at: Position,
        open: char,
        close: char,
        inclusive: bool,
    ) -> Option<(usize, usize)> {
        let chars = self.chars();
        let offset = self.offset(at).min(chars.len().checked_sub(1)?);

        // Find the unmatched opener at or before the cursor.
        let mut depth = 0usize;
        let mut opener = None;
        let scan_from = if chars[offset] == close && offset > 0 {
            depth = 1;
            offset - 1
        } else {
            offset
        };
        for i in (0..=scan_from).rev() {
            if chars[i] == close && i != offset {
                depth += 1;
            } else if chars[i] == open {
                if depth == 0 {
                    opener = Some(i);
                    break;
                }
                depth -= 1;
            }
        }
        let opener = opener?;

        let mut depth = 0usize;
        let closer = chars
            .iter()
            .enumerate()
            .skip(opener + 1)
            .find_map(|(i, &c)| {
                if c == open {
                    depth += 1;
                } else if c == close {
                    if depth == 0 {
                        return Some(i);
                    }
                    depth -= 1;
                }
                None
            })?;

        Some(if inclusive {
            (opener, closer + 1)
        } else {
            (opener + 1, closer)
        })
    }

    fn tag_object(&self, at: Position, inclusive: bool) -> Option<(usize, usize)> {
        let chars = self.chars();
        let offset = self.offset(at);

        // (name, tag start, tag end) for every opening tag still open.
        let mut stack: Vec<(String, usize, usize)> = Vec::new();
        let mut best: Option<(usize, usize, usize, usize)> = None;
        let mut i = 0;
        while i < chars.len() {
            if chars[i] != '<' {
                i += 1;
                continue;
            }
            let Some(gt) = (i + 1..chars.len()).find(|&j| chars[j] == '>') else {
                break;
            };
            let inner: String = chars[i + 1..gt].iter().collect();
            let closing = inner.starts_with('/');
            let name: String = inner
                .trim_start_matches('/')
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect();

            if closing {
                if let Some(pos) = stack.iter().rposition(|(n, _, _)| *n == name) {
                    let (_, open_start, open_end) = stack[pos].clone();
                    stack.truncate(pos);
                    let close_end = gt + 1;
                    if open_start <= offset && offset < close_end {
                        let tighter = best.is_none_or(|(s, _, _, _)| open_start > s);
                        if tighter {
                            best = Some((open_start, open_end, i, close_end));
                        }
                    }
                }
            } else if !name.is_empty() && !inner.ends_with('/') {
                stack.push((name, i, gt + 1));
            }
            i = gt + 1;
        }

        let (open_start, open_end, close_start, close_end) = best?;
        Some(if inclusive {
            (open_start, close_end)
        } else {
            (open_end, close_start)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vims_chord::MotionArgs;

    fn motion(kind: MotionKind) -> Motion {
        Motion::new(kind)
    }

    fn target(doc: &Document, from: (usize, usize), m: Motion) -> (usize, usize) {
        let mut last = None;
        let p = doc.motion_target(Position::new(from.0, from.1), &m, &mut last);
        (p.line, p.character)
    }

    fn object(kind: TextObjectKind, inclusive: bool) -> TextObject {
        TextObject {
            kind,
            inclusive,
            blank_separated: false,
        }
    }

    #[test]
    fn test_offsets_roundtrip() {
        let doc = Document::new("ab\ncde\n\nf");
        assert_eq!(doc.offset(Position::new(1, 2)), 5);
        assert_eq!(doc.position(5), Position::new(1, 2));
        assert_eq!(doc.position(7), Position::new(2, 0));
        assert_eq!(doc.offset(Position::new(9, 9)), doc.text().chars().count());
    }

    #[test]
    fn test_apply_edits_in_any_order() {
        let mut doc = Document::new("Hello world");
        let applied = doc.apply(&[
            TextEdit::insert(Position::new(0, 0), ">> "),
            TextEdit::delete(Range::new(Position::new(0, 5), Position::new(0, 11))),
        ]);
        assert_eq!(doc.text(), ">> Hello");
        assert_eq!(applied, vec![(5, 6, 0), (0, 0, 3)]);
    }

    #[test]
    fn test_word_motions() {
        let doc = Document::new("foo bar.baz  qux");
        assert_eq!(target(&doc, (0, 0), motion(MotionKind::WordNextStart)), (0, 4));
        assert_eq!(target(&doc, (0, 4), motion(MotionKind::WordNextStart)), (0, 7));
        assert_eq!(target(&doc, (0, 0), motion(MotionKind::WordNextEnd)), (0, 2));
        assert_eq!(target(&doc, (0, 13), motion(MotionKind::WordPrevStart)), (0, 8));
        let big = Motion::with_args(
            MotionKind::WordNextStart,
            MotionArgs {
                blank_separated: true,
                ..Default::default()
            },
        );
        assert_eq!(target(&doc, (0, 4), big), (0, 13));
    }

    #[test]
    fn test_word_motion_crosses_lines() {
        let doc = Document::new("foo\n  bar");
        assert_eq!(target(&doc, (0, 0), motion(MotionKind::WordNextStart)), (1, 2));
        assert_eq!(target(&doc, (1, 2), motion(MotionKind::WordPrevStart)), (0, 0));
    }

    #[test]
    fn test_find_and_repeat() {
        let doc = Document::new("a,b,c,d");
        let mut last = None;
        let find = Motion::with_args(
            MotionKind::MatchNext,
            MotionArgs {
                character: Some(','),
                ..Default::default()
            },
        );
        let p = doc.motion_target(Position::new(0, 0), &find, &mut last);
        assert_eq!(p, Position::new(0, 1));
        let again = motion(MotionKind::MatchRepeatLast);
        let p = doc.motion_target(p, &again, &mut last);
        assert_eq!(p, Position::new(0, 3));
        let back = Motion::with_args(
            MotionKind::MatchRepeatLast,
            MotionArgs {
                is_reverse: true,
                ..Default::default()
            },
        );
        assert_eq!(doc.motion_target(p, &back, &mut last), Position::new(0, 1));
    }

    #[test]
    fn test_till() {
        let doc = Document::new("call(x)");
        let till = Motion::with_args(
            MotionKind::MatchNext,
            MotionArgs {
                character: Some('('),
                is_till: true,
                ..Default::default()
            },
        );
        assert_eq!(target(&doc, (0, 0), till), (0, 3));
    }

    #[test]
    fn test_line_motions() {
        let doc = Document::new("   indented\nx");
        assert_eq!(target(&doc, (0, 8), motion(MotionKind::LineFirstNonBlank)), (0, 3));
        assert_eq!(target(&doc, (0, 8), motion(MotionKind::LineStart)), (0, 0));
        assert_eq!(target(&doc, (0, 0), motion(MotionKind::LineEnd)), (0, 11));
        assert_eq!(target(&doc, (1, 0), motion(MotionKind::DocumentLineOrFirst)), (0, 3));
        assert_eq!(target(&doc, (0, 0), motion(MotionKind::DocumentLineOrLast)), (1, 0));
    }

    #[test]
    fn test_match_pair() {
        let doc = Document::new("f(a, (b))");
        assert_eq!(target(&doc, (0, 0), motion(MotionKind::MatchPair)), (0, 8));
        assert_eq!(target(&doc, (0, 8), motion(MotionKind::MatchPair)), (0, 1));
    }

    #[test]
    fn test_paragraphs() {
        let doc = Document::new("a\nb\n\nc\nd");
        assert_eq!(target(&doc, (0, 0), motion(MotionKind::ParagraphNext)), (2, 0));
        assert_eq!(target(&doc, (4, 0), motion(MotionKind::ParagraphPrev)), (2, 0));
    }

    #[test]
    fn test_word_object() {
        let doc = Document::new("foo bar baz");
        let inner = doc
            .text_object_range(Position::new(0, 5), &object(TextObjectKind::Word, false))
            .unwrap();
        assert_eq!(doc.slice(inner), "bar");
        let around = doc
            .text_object_range(Position::new(0, 5), &object(TextObjectKind::Word, true))
            .unwrap();
        assert_eq!(doc.slice(around), "bar ");
    }

    #[test]
    fn test_pair_objects() {
        let doc = Document::new("f(a, [b], c)");
        let inner = doc
            .text_object_range(Position::new(0, 3), &object(TextObjectKind::Parentheses, false))
            .unwrap();
        assert_eq!(doc.slice(inner), "a, [b], c");
        let around = doc
            .text_object_range(Position::new(0, 6), &object(TextObjectKind::Brackets, true))
            .unwrap();
        assert_eq!(doc.slice(around), "[b]");
    }

    #[test]
    fn test_quote_object() {
        let doc = Document::new(r#"say "hello" now"#);
        let inner = doc
            .text_object_range(Position::new(0, 6), &object(TextObjectKind::DoubleQuotes, false))
            .unwrap();
        assert_eq!(doc.slice(inner), "hello");
    }

    #[test]
    fn test_tag_object() {
        let doc = Document::new("<div><b>bold</b> text</div>");
        let inner = doc
            .text_object_range(Position::new(0, 9), &object(TextObjectKind::Tag, false))
            .unwrap();
        assert_eq!(doc.slice(inner), "bold");
        let outer = doc
            .text_object_range(Position::new(0, 18), &object(TextObjectKind::Tag, true))
            .unwrap();
        assert_eq!(doc.slice(outer), "<div><b>bold</b> text</div>");
    }
}
