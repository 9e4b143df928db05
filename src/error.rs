//! Error types for the lexer, literal construction and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::position::Span;

/// A lexical error. The lexer reports these and keeps scanning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unrecognized sequence '{text}' at {span}")]
    UnrecognizedSequence { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnrecognizedSequence { span, .. } => *span,
        }
    }
}

/// Failure to build an expression node from an external value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("unsupported literal type: {kind} ({value})")]
    UnsupportedLiteral { kind: &'static str, value: String },

    #[error("malformed expression: {0}")]
    Malformed(String),
}

/// Failure to load a symbol table.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid symbol table: {0}")]
    Invalid(String),
}
