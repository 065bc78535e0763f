#![allow(clippy::needless_return)]

//! Rocks is a programming language written in Rust. It is a dynamically typed language with
//! lexical scoping, first-class functions, and single-inheritance classes. Rocks is a
//! tree-walk interpreter with a hand-written recursive descent parser.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a string
//! of characters into a list of tokens. The scanner is implemented in the [`scanner`] module as a
//! hand-written state machine over a peekable character iterator. It reports lexical errors (an
//! unterminated string, an unexpected character) as a [`error::ScanError`] and keeps scanning past
//! them so a single run can surface more than one mistake.
//!
//! ## Parsing
//! The second step is parsing: converting the token list into an abstract syntax tree. The parser
//! is implemented in the [`parser`] module as a recursive descent parser over [`expr::Expr`] and
//! [`stmt::Stmt`]. It reports syntax errors as a [`error::ParseError`] and recovers from them by
//! synchronizing at the next statement boundary, so it too can report more than one error per run.
//!
//! ## Resolving
//! The third step is resolving: a static pass over the AST that determines, for every variable,
//! `this`, and `super` reference, how many lexical scopes out the binding lives. This is
//! implemented in the [`resolver`] module and reports semantically (rather than syntactically)
//! invalid programs as a [`error::ResolveError`] -- a variable read from its own initializer, a
//! `return` outside a function, a class inheriting from itself, a `break` outside a loop.
//!
//! ## Interpreting
//! The final step is interpreting: walking the resolved AST and evaluating it. This is
//! implemented in the [`interpreter`] module. Errors only detectable at evaluation time -- type
//! mismatches, arity mismatches, undefined names -- are reported as a [`error::RuntimeError`].
//!
//! All four stages report through a single [`error::ErrorReporter`] owned by the [`Rocks`]
//! driver, rather than a process-wide global, so a REPL session can reset it between lines.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use log::{debug, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::ErrorReporter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Exit code for a CLI usage error (Crafting Interpreters' `sysexits.h` convention).
pub const EX_USAGE: i32 = 64;
/// Exit code for a static (scan/parse/resolve) error.
pub const EX_DATAERR: i32 = 65;
/// Exit code for a runtime error.
pub const EX_SOFTWARE: i32 = 70;

const HISTORY_FILE: &str = ".rocks_history";

/// Drives the scan -> parse -> resolve -> interpret pipeline over either a script file or an
/// interactive REPL session.
pub struct Rocks {
    interpreter: Interpreter,
    reporter: ErrorReporter,
}

impl Rocks {
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Builds a driver that writes `print` output to `output` instead of stdout, so a caller
    /// (e.g. an integration test) can capture it.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Rocks {
            interpreter: Interpreter::with_output(output),
            reporter: ErrorReporter::new(),
        }
    }

    /// Runs a script file to completion, exiting the process with [`EX_DATAERR`]/[`EX_SOFTWARE`]
    /// if it reported a static or runtime error.
    pub fn run_file(&mut self, path: &str) -> Result<()> {
        let contents = fs::read_to_string(path).with_context(|| format!("could not read '{path}'"))?;

        self.run(&contents);

        if self.reporter.did_runtime_error() {
            process::exit(EX_SOFTWARE);
        }
        if self.reporter.did_error() {
            process::exit(EX_DATAERR);
        }

        Ok(())
    }

    /// Runs an interactive REPL. Each line is run in isolation: an error on one line does not
    /// prevent the next line from running. History is persisted to `~/.rocks_history` across
    /// sessions via `rustyline`.
    pub fn run_prompt(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        let history_path = history_path();
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line);
                    self.reporter.reset();
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }

        Ok(())
    }

    /// Runs `source` in place without exiting the process. Intended for embedding and tests;
    /// use [`run_file`](Self::run_file) for a CLI-style "exit on error" run.
    pub fn run_str(&mut self, source: &str) {
        self.run(source);
    }

    fn run(&mut self, source: &str) {
        debug!("scanning {} bytes", source.len());
        let tokens = Scanner::new(source, &mut self.reporter).scan_tokens();
        if self.reporter.did_error() {
            return;
        }

        debug!("parsing {} tokens", tokens.len());
        let statements = Parser::new(tokens, &mut self.reporter).parse();
        if self.reporter.did_error() {
            return;
        }

        debug!("resolving {} statements", statements.len());
        Resolver::new(&mut self.interpreter, &mut self.reporter).resolve(&statements);
        if self.reporter.did_error() {
            return;
        }

        info!("interpreting");
        self.interpreter.interpret(&statements, &mut self.reporter);
    }
}

impl Default for Rocks {
    fn default() -> Self {
        Self::new()
    }
}

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|mut path| {
        path.push(HISTORY_FILE);
        path
    })
}
