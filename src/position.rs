//! Source positions: the lexer cursor and the spans it hands out.

use std::fmt;

/// Returned by [`Cursor::peek`] once the cursor has reached end of input.
pub const END_CHAR: char = '\0';

/// A location in the source text, detached from the text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    pub const START: Position = Position { offset: 0, line: 1, column: 1 };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A cursor over the source text.
///
/// `Cursor` is `Copy`: every copy is an independent snapshot and advancing
/// one never moves another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    text: &'a str,
    position: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, position: Position::START }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn offset(&self) -> usize {
        self.position.offset
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    /// The unread part of the source.
    pub fn rest(&self) -> &'a str {
        &self.text[self.position.offset..]
    }

    pub fn is_end(&self) -> bool {
        self.position.offset >= self.text.len()
    }

    /// The character under the cursor, or [`END_CHAR`] at end of input.
    pub fn peek(&self) -> char {
        self.rest().chars().next().unwrap_or(END_CHAR)
    }

    pub fn is_whitespace(&self) -> bool {
        !self.is_end() && self.peek().is_whitespace()
    }

    /// Moves one character forward. Does nothing at end of input.
    pub fn advance(&mut self) {
        let Some(c) = self.rest().chars().next() else {
            return;
        };
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        self.position.offset += c.len_utf8();
    }

    /// Moves `count` characters forward. `count` must be positive.
    pub fn advance_n(&mut self, count: usize) {
        debug_assert!(count > 0, "advance_n called with a zero count");
        for _ in 0..count {
            self.advance();
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.is_whitespace() {
            self.advance();
        }
    }

    pub fn snapshot(&self) -> Cursor<'a> {
        *self
    }

    /// The raw source between two snapshots of the same text.
    pub fn text_between(start: &Cursor<'a>, end: &Cursor<'a>) -> &'a str {
        debug_assert!(start.offset() <= end.offset());
        debug_assert!(std::ptr::eq(start.text, end.text));
        &start.text[start.offset()..end.offset()]
    }
}

/// The half-open source range `[start, end)` of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn between(start: &Cursor<'_>, end: &Cursor<'_>) -> Self {
        Self::new(start.position(), end.position())
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slices the covered text out of `source`, which must be the text the
    /// span was taken from.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start.offset..self.end.offset]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}
