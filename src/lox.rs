//! One interpreter session: the pipeline driver used by the CLI, the REPL and
//! the integration tests.
//!
//! Each call to [`Lox::run`] is one execution unit: scan, parse, resolve,
//! interpret, stopping after any stage that reported a static error. Globals,
//! the hop‑count table and the expression‑id counter persist between calls,
//! so functions and classes defined by one REPL entry stay usable in the next.

use log::{debug, info};

use crate::ast::{ExprId, Stmt};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::reporter::{ConsoleReporter, Reporter};
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::token::Token;

pub struct Lox<R: Reporter = ConsoleReporter> {
    interpreter: Interpreter,
    reporter: R,
    next_id: ExprId,
}

impl Lox<ConsoleReporter> {
    /// Stdout for `print`, stderr for diagnostics.
    pub fn new() -> Self {
        Self::with_parts(Interpreter::new(), ConsoleReporter::new())
    }
}

impl Default for Lox<ConsoleReporter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Reporter> Lox<R> {
    pub fn with_parts(interpreter: Interpreter, reporter: R) -> Self {
        Self {
            interpreter,
            reporter,
            next_id: ExprId(0),
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn scan(&mut self, source: &str) -> Vec<Token> {
        Scanner::new(source).scan_tokens(&mut self.reporter)
    }

    /// Scan and parse, continuing the session's id numbering.
    pub fn parse(&mut self, source: &str) -> Vec<Stmt> {
        let tokens: Vec<Token> = self.scan(source);

        let mut parser = Parser::new(&tokens, &mut self.reporter).starting_at(self.next_id);
        let statements: Vec<Stmt> = parser.parse();
        self.next_id = parser.next_id();

        statements
    }

    /// Runs one execution unit. Diagnostics land in the reporter; query its
    /// flags afterwards.
    pub fn run(&mut self, source: &str) {
        info!("Running {} bytes of source", source.len());

        let statements: Vec<Stmt> = self.parse(source);

        if self.reporter.had_error() {
            debug!("Syntax errors reported, skipping resolution");
            return;
        }

        Resolver::new(&mut self.interpreter, &mut self.reporter).resolve(&statements);

        if self.reporter.had_error() {
            debug!("Resolution errors reported, skipping evaluation");
            return;
        }

        self.interpreter.interpret(&statements, &mut self.reporter);
    }

    /// Clears both error flags before the next REPL entry.
    pub fn reset_errors(&mut self) {
        self.reporter.reset_error();
        self.reporter.reset_runtime_error();
    }
}
