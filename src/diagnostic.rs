//! Where the lexer sends the errors it recovers from.

use crate::error::LexError;

/// Receives lexical errors as the lexer finds them.
pub trait DiagnosticSink {
    fn report(&mut self, error: LexError);
}

impl DiagnosticSink for Vec<LexError> {
    fn report(&mut self, error: LexError) {
        self.push(error);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, error: LexError) {
        (**self).report(error);
    }
}

/// Forwards every diagnostic to the `log` facade at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, error: LexError) {
        log::warn!("{}", error);
    }
}

/// Drops every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreSink;

impl DiagnosticSink for IgnoreSink {
    fn report(&mut self, _: LexError) {}
}
