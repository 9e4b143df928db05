//! Front end of the multidb query-expression engine: the lexer that turns
//! expression text into ambiguous token candidates, and the convolution pass
//! that simplifies expression trees before they are rendered for a backend.

pub mod ast;
pub mod config;
pub mod convolution;
pub mod decode;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod position;
pub mod token;

pub use ast::{ArithOp, BoolOp, ColumnRef, CompOp, Expr, Literal};
pub use config::SymbolTable;
pub use convolution::simplify;
pub use diagnostic::{DiagnosticSink, IgnoreSink, LogSink};
pub use error::{ConfigError, ConstructionError, LexError};
pub use lexer::{tokenize, Lexer};
pub use position::{Cursor, Position, Span};
pub use token::{Lexeme, Token, TokenKind};
