//! Error‑reporting sink shared by every pipeline stage.
//!
//! The scanner, parser and resolver report *static* diagnostics and keep
//! going; the interpreter reports at most one *runtime* error per run. The
//! sink remembers which kind it has seen so the driver can skip later stages
//! and pick an exit code. Both flags are reset independently between REPL
//! entries.

use log::{debug, error};

use crate::error::LoxError;

pub trait Reporter {
    /// Record one diagnostic. Static and runtime errors raise separate flags.
    fn report(&mut self, error: LoxError);

    /// Has a lexical, syntax or resolution error been reported?
    fn had_error(&self) -> bool;

    /// Has a runtime error been reported?
    fn had_runtime_error(&self) -> bool;

    fn reset_error(&mut self);

    fn reset_runtime_error(&mut self);
}

/// Prints diagnostics to stderr as they arrive.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    had_error: bool,
    had_runtime_error: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, err: LoxError) {
        error!("{}", err);

        eprintln!("{}", err);

        if err.is_static() {
            self.had_error = true;
        } else {
            self.had_runtime_error = true;
        }
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    fn reset_error(&mut self) {
        self.had_error = false;
    }

    fn reset_runtime_error(&mut self) {
        self.had_runtime_error = false;
    }
}

/// Keeps every diagnostic in arrival order instead of printing it.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Vec<LoxError>,
    had_error: bool,
    had_runtime_error: bool,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered diagnostics, one string per report.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|e| e.to_string()).collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, err: LoxError) {
        debug!("Collected diagnostic: {}", err);

        if err.is_static() {
            self.had_error = true;
        } else {
            self.had_runtime_error = true;
        }

        self.diagnostics.push(err);
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    fn reset_error(&mut self) {
        self.had_error = false;
    }

    fn reset_runtime_error(&mut self) {
        self.had_runtime_error = false;
    }
}
