#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use treelox::interpreter::Interpreter;
use treelox::reporter::{CollectingReporter, Reporter};
use treelox::Lox;

/// In-memory `print` sink that the test keeps a handle to.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    /// Printed lines so far.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.borrow())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn session() -> (Lox<CollectingReporter>, SharedBuf) {
    let out = SharedBuf::default();
    let interpreter = Interpreter::with_output(Box::new(out.clone()));
    (Lox::with_parts(interpreter, CollectingReporter::new()), out)
}

pub struct Outcome {
    pub output: Vec<String>,
    pub errors: Vec<String>,
    pub had_error: bool,
    pub had_runtime_error: bool,
}

/// Runs `source` as one script in a fresh session.
pub fn run(source: &str) -> Outcome {
    let (mut lox, out) = session();
    lox.run(source);

    Outcome {
        output: out.lines(),
        errors: lox.reporter().messages(),
        had_error: lox.reporter().had_error(),
        had_runtime_error: lox.reporter().had_runtime_error(),
    }
}

/// Runs `source` and asserts it finished without any diagnostic.
pub fn run_ok(source: &str) -> Vec<String> {
    let outcome = run(source);
    assert!(
        outcome.errors.is_empty(),
        "unexpected diagnostics: {:?}",
        outcome.errors
    );
    outcome.output
}
