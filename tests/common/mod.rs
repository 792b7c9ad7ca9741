#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::{Lox, RunReport};

/// A writer that can be handed to the interpreter while the test keeps a
/// handle on what was printed.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session wired to a fresh buffer.
pub fn session() -> (Lox, SharedBuffer) {
    let out = SharedBuffer::default();
    (Lox::with_output(out.clone()), out)
}

/// Run `source` in a fresh session, returning what it printed.
pub fn run(source: &str) -> (String, RunReport) {
    let (mut lox, out) = session();
    let report = lox.run(source);
    (out.contents(), report)
}

/// Run `source` and return its output, failing the test on any diagnostic.
pub fn run_ok(source: &str) -> String {
    let (output, report) = run(source);
    assert!(
        report.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        report.diagnostics
    );
    output
}

/// Messages of every diagnostic, without line decoration.
pub fn messages(report: &RunReport) -> Vec<String> {
    report.diagnostics.iter().map(|e| e.message()).collect()
}
