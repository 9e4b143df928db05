//! The expression lexer.
//!
//! At each position the lexer runs every matcher from [`crate::matcher`],
//! keeps the longest match and emits every candidate of that length as one
//! [`Lexeme`]. A keyword spelled like an identifier therefore comes out as a
//! two-candidate lexeme, and the parser picks one.
//!
//! Text no matcher accepts is skipped up to the next whitespace and
//! reported to the [`DiagnosticSink`] as [`LexError::UnrecognizedSequence`].
//! Scanning then continues.
//!
//! ```text
//! "a <= 10 AND b"
//!   [1:1-1:2]   identifier(a)
//!   [1:3-1:5]   symbol(<=)
//!   [1:6-1:8]   int(10)
//!   [1:9-1:12]  identifier(AND) | keyword(and)
//!   [1:13-1:14] identifier(b)
//! ```

use smallvec::SmallVec;
use std::iter::FusedIterator;

use crate::config::SymbolTable;
use crate::diagnostic::DiagnosticSink;
use crate::error::LexError;
use crate::matcher::{Match, MATCHERS};
use crate::position::{Cursor, Span};
use crate::token::Lexeme;

pub struct Lexer<'a, S = Vec<LexError>> {
    cursor: Cursor<'a>,
    table: &'a SymbolTable,
    sink: S,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer that collects diagnostics into a `Vec`.
    pub fn new(input: &'a str, table: &'a SymbolTable) -> Self {
        Self::with_sink(input, table, Vec::new())
    }
}

impl<'a, S: DiagnosticSink> Lexer<'a, S> {
    pub fn with_sink(input: &'a str, table: &'a SymbolTable, sink: S) -> Self {
        Lexer {
            cursor: Cursor::new(input),
            table,
            sink,
        }
    }

    /// Current read position.
    pub fn cursor(&self) -> Cursor<'a> {
        self.cursor
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Skips an unrecognized run up to the next whitespace and reports it.
    fn recover(&mut self, start: Cursor<'a>) {
        while !self.cursor.is_end() && !self.cursor.is_whitespace() {
            self.cursor.advance();
        }
        let error = LexError::UnrecognizedSequence {
            text: Cursor::text_between(&start, &self.cursor).to_string(),
            span: Span::between(&start, &self.cursor),
        };
        log::debug!("{}", error);
        self.sink.report(error);
    }
}

impl<'a, S: DiagnosticSink> Iterator for Lexer<'a, S> {
    type Item = Lexeme<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_end() {
                return None;
            }

            let start = self.cursor.snapshot();
            let rest = start.rest();
            let matches: SmallVec<[Match<'a>; 8]> = MATCHERS
                .iter()
                .filter_map(|(_, matcher)| matcher(rest, self.table))
                .collect();
            let max_len = matches.iter().map(|m| m.len).max().unwrap_or(0);

            if max_len == 0 {
                self.recover(start);
                continue;
            }

            self.cursor.advance_n(rest[..max_len].chars().count());
            let lexeme = Lexeme {
                span: Span::between(&start, &self.cursor),
                candidates: matches
                    .into_iter()
                    .filter(|m| m.len == max_len)
                    .map(|m| m.kind)
                    .collect(),
            };
            log::trace!("{}", lexeme);
            return Some(lexeme);
        }
    }
}

impl<S: DiagnosticSink> FusedIterator for Lexer<'_, S> {}

/// Lexes all of `input`, returning the lexemes and the diagnostics.
pub fn tokenize<'a>(input: &'a str, table: &'a SymbolTable) -> (Vec<Lexeme<'a>>, Vec<LexError>) {
    let mut lexer = Lexer::new(input, table);
    let lexemes = lexer.by_ref().collect();
    (lexemes, lexer.into_sink())
}
