//! Token definitions for the expression language.

use chrono::{NaiveDate, NaiveDateTime};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

use crate::position::Span;

/// The kind of a token together with its decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    // Literals
    Int(i64),
    Float(f64),
    Str(Cow<'a, str>), // Unquoted, with '' collapsed to '
    Date(NaiveDate),
    Datetime(NaiveDateTime),

    Identifier(&'a str),
    Keyword(&'a str), // Lowercase spelling from the symbol table
    Symbol(&'a str),
}

impl fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(v) => write!(f, "int({})", v),
            TokenKind::Float(v) => write!(f, "float({})", v),
            TokenKind::Str(v) => write!(f, "string({:?})", v),
            TokenKind::Date(v) => write!(f, "date({})", v),
            TokenKind::Datetime(v) => write!(f, "datetime({})", v),
            TokenKind::Identifier(v) => write!(f, "identifier({})", v),
            TokenKind::Keyword(v) => write!(f, "keyword({})", v),
            TokenKind::Symbol(v) => write!(f, "symbol({})", v),
        }
    }
}

/// One interpretation of a lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

/// Every interpretation that tied for the longest match at one position.
///
/// Never empty. All candidates share the same span and appear in matcher
/// order. Choosing between them is left to the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'a> {
    pub span: Span,
    pub candidates: SmallVec<[TokenKind<'a>; 2]>,
}

impl<'a> Lexeme<'a> {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    /// Returns the only candidate, or `None` when the lexeme is ambiguous.
    pub fn single(&self) -> Option<&TokenKind<'a>> {
        match self.candidates.as_slice() {
            [kind] => Some(kind),
            _ => None,
        }
    }

    pub fn contains(&self, kind: &TokenKind<'_>) -> bool {
        self.candidates.iter().any(|c| c == kind)
    }

    /// Expands the lexeme into standalone tokens.
    pub fn tokens(&self) -> impl Iterator<Item = Token<'a>> + '_ {
        self.candidates.iter().map(move |kind| Token {
            kind: kind.clone(),
            span: self.span,
        })
    }
}

impl fmt::Display for Lexeme<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.span)?;
        for (i, kind) in self.candidates.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", kind)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use smallvec::smallvec;

    #[test]
    fn test_lexeme_expands_to_tokens() {
        let span = Span::new(
            Position::START,
            Position { offset: 2, line: 1, column: 3 },
        );
        let lexeme = Lexeme {
            span,
            candidates: smallvec![TokenKind::Identifier("or"), TokenKind::Keyword("or")],
        };

        assert!(lexeme.is_ambiguous());
        assert!(lexeme.contains(&TokenKind::Keyword("or")));
        assert!(!lexeme.contains(&TokenKind::Symbol("or")));

        let tokens: Vec<_> = lexeme.tokens().collect();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.span == span));
        assert_eq!(tokens[1].kind, TokenKind::Keyword("or"));
        assert_eq!(lexeme.to_string(), "[1:1-1:3] identifier(or) | keyword(or)");
    }
}
