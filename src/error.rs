use thiserror::Error as ThisError;

use crate::token::{Location, Token, Type};

/// Tracks whether a static (scan/parse/resolve) or runtime error has been
/// reported during the current run. Owned by the [`crate::Rocks`] driver and
/// threaded through the scanner/parser/resolver/interpreter by reference --
/// deliberately *not* a process-wide global, so that a REPL session can
/// reset it between lines and so that the interpreter stays reentrant within
/// a single process (e.g. for embedding or testing).
#[derive(Debug, Default)]
pub struct ErrorReporter {
    had_error: bool,
    had_runtime_error: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        ErrorReporter::default()
    }

    /// True if a scan, parse, resolve, or runtime error has been reported.
    pub fn did_error(&self) -> bool {
        self.had_error || self.had_runtime_error
    }

    pub fn did_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Resets both flags. Used by the REPL driver between lines.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    fn mark_static_error(&mut self) {
        self.had_error = true;
    }

    fn mark_runtime_error(&mut self) {
        self.had_runtime_error = true;
    }
}

/// Every diagnostic type implements this so the driver can report it and
/// mark the appropriate flag on the reporter without matching on a specific
/// error enum.
pub trait Diagnostic {
    /// Prints the error message to stderr and flags the reporter.
    fn throw(&self, reporter: &mut ErrorReporter);
}

/// A lexical error: malformed source that the scanner could not tokenize.
#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct ScanError {
    pub location: Location,
    pub message: String,
}

impl Diagnostic for ScanError {
    fn throw(&self, reporter: &mut ErrorReporter) {
        eprintln!(
            "[line {line}:{column}] Error: {message}",
            line = self.location.line,
            column = self.location.column,
            message = self.message
        );
        reporter.mark_static_error();
    }
}

/// A syntax error: a well-formed token stream that does not match the grammar.
#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for ParseError {
    fn throw(&self, reporter: &mut ErrorReporter) {
        if self.token.r#type == Type::EOF {
            eprintln!(
                "[line {line}:{column}] Error at end: {message}",
                line = self.token.location.line,
                column = self.token.location.column,
                message = self.message
            );
        } else {
            eprintln!(
                "[line {line}:{column}] Error at '{lexeme}': {message}",
                line = self.token.location.line,
                column = self.token.location.column,
                lexeme = self.token.lexeme,
                message = self.message
            );
        }
        reporter.mark_static_error();
    }
}

/// A static semantic error caught by the resolver: bad `this`/`super`/
/// `return`, self-inheritance, local redeclaration, self-initializer.
#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for ResolveError {
    fn throw(&self, reporter: &mut ErrorReporter) {
        eprintln!(
            "[line {line}:{column}] Error at '{lexeme}': {message}",
            line = self.token.location.line,
            column = self.token.location.column,
            lexeme = self.token.lexeme,
            message = self.message
        );
        reporter.mark_static_error();
    }
}

/// An error only detectable while evaluating the AST: type mismatches,
/// arity mismatches, undefined names, non-callable calls.
#[derive(Debug, Clone, ThisError)]
#[error("{message}")]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for RuntimeError {
    fn throw(&self, reporter: &mut ErrorReporter) {
        eprintln!(
            "[line {line}:{column}] Error at '{lexeme}': {message}",
            line = self.token.location.line,
            column = self.token.location.column,
            lexeme = self.token.lexeme,
            message = self.message
        );
        reporter.mark_runtime_error();
    }
}
