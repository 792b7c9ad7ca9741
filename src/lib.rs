//! A tree-walking interpreter for the Lox language.
//!
//! Source text flows through four stages: [`scanner`] → [`parser`] →
//! [`resolver`] → [`interpreter`]. [`Lox`] strings them together and keeps one
//! interpreter alive between calls, so a prompt can build on earlier lines.
//!
//! ```
//! let report = rox::run("var a = 1; print a + 2;");
//! assert!(report.executed);
//! assert!(report.diagnostics.is_empty());
//! ```

pub mod ast;
pub mod ast_printer;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
mod stack;
pub mod token;
pub mod value;

use std::io::Write;

use log::info;

use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;

/// Outcome of running one chunk of source.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Every error reported, in the order it was found.
    pub diagnostics: Vec<LoxError>,

    /// `true` once the program passed all static stages and started running.
    pub executed: bool,
}

impl RunReport {
    pub fn had_static_error(&self) -> bool {
        self.diagnostics.iter().any(LoxError::is_static)
    }

    pub fn had_runtime_error(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|e| matches!(e, LoxError::Runtime { .. }))
    }
}

/// A session: one interpreter whose globals persist across [`Lox::run`].
pub struct Lox {
    interpreter: Interpreter,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// Session whose `print` output goes to `out` instead of stdout.
    pub fn with_output(out: impl Write + 'static) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    /// For registering natives before running anything.
    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Scan, parse, resolve and execute `source`.
    ///
    /// Lexical and syntax errors are reported together; resolution only runs
    /// on a tree that parsed cleanly, and execution only on one that resolved
    /// cleanly.
    pub fn run(&mut self, source: &str) -> RunReport {
        let (tokens, mut diagnostics) = scanner::scan_tokens(source);

        let (statements, parse_errors) = Parser::new(tokens).parse();
        diagnostics.extend(parse_errors);

        if !diagnostics.is_empty() {
            info!("Static errors found, skipping execution");
            return RunReport {
                diagnostics,
                executed: false,
            };
        }

        let resolve_errors = Resolver::new().resolve(&statements);
        if !resolve_errors.is_empty() {
            info!("Resolution failed with {} error(s)", resolve_errors.len());
            return RunReport {
                diagnostics: resolve_errors,
                executed: false,
            };
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            diagnostics.push(e);
        }

        RunReport {
            diagnostics,
            executed: true,
        }
    }
}

/// Run `source` in a fresh session printing to stdout.
pub fn run(source: &str) -> RunReport {
    Lox::new().run(source)
}
