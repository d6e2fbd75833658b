//! User interface module - output sinks and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Where formatted lines are written

use std::io::{self, Write};

pub mod formatter;

pub use formatter::{created_line, failure_line, group_line, would_create_line};

/// Success and error streams of one invocation.
///
/// The binary wires these to stdout/stderr; tests pass in-memory buffers.
pub struct Console<O: Write, E: Write> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Console { out, err }
    }

    /// Write `lines` to the success stream as one buffer.
    pub fn lines(&mut self, lines: &[String]) -> io::Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let mut buf = String::new();
        for line in lines {
            buf.push_str(line);
            buf.push('\n');
        }
        self.out.write_all(buf.as_bytes())?;
        self.out.flush()
    }

    /// Write a failure report to the error stream.
    ///
    /// A broken error stream has nowhere left to be reported, so write errors
    /// are dropped.
    pub fn failure(&mut self, message: &str) {
        let _ = writeln!(self.err, "{}", failure_line(message));
        let _ = self.err.flush();
    }

    /// Give back the underlying streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl Console<io::Stdout, io::Stderr> {
    /// Console bound to the process's standard streams.
    pub fn stdio() -> Self {
        Console::new(io::stdout(), io::stderr())
    }
}
