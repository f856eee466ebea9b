//! Write trait abstractions for stdout, stderr and file output.

use crate::options::serialization::Format;
use crate::report::Report;
use anyhow::{Context, Result};
use std::fmt::{self, Debug, Formatter};
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind::BrokenPipe, Write};
use std::path::Path;

/// `Writer` dynamic dispatches the `Write` trait.
pub type Writer = Box<dyn Write>;

/// `Output` writes to either a file or stream like stdout or stderr.
pub struct Output {
    writer: Writer,
}

impl Debug for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("writer", &"<dyn Write>")
            .finish()
    }
}

impl Default for Output {
    /// Default output is stdout
    fn default() -> Self {
        Self::stdout()
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Output {
    /// Creates an `Output` from an optional path, choosing between file or stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn new(output: Option<&Path>) -> Result<Self> {
        match output {
            Some(path) if path == Path::new("-") => Ok(Self::stdout()),
            Some(path) => Self::file(path),
            None => Ok(Self::stdout()),
        }
    }

    /// Creates an `Output` that writes to a file with error context.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn file(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file: {}", path.display()))?;
        let writer: Writer = Box::new(BufWriter::new(file));

        Ok(Self { writer })
    }

    /// Creates an `Output` that writes to stdout.
    pub fn stdout() -> Self {
        Self {
            writer: Box::new(io::stdout().lock()),
        }
    }

    /// Creates an `Output` that writes to stderr.
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(io::stderr().lock()),
        }
    }

    /// Creates an `Output` from a writer.
    pub fn from_writer<W: Write + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    /// Writes a chunk of text, handling `BrokenPipe` errors gracefully.
    ///
    /// # Errors
    ///
    /// Returns any write error other than a broken pipe.
    pub fn write_chunk(&mut self, chunk: &str) -> Result<()> {
        Self::handle_broken_pipe(self.writer.write_all(chunk.as_bytes()))
    }

    /// Flushes the writer, ensuring all output is written.
    ///
    /// # Errors
    ///
    /// Returns any flush error other than a broken pipe.
    pub fn flush(&mut self) -> Result<()> {
        Self::handle_broken_pipe(self.writer.flush())
    }

    /// Writes the report in the given format, then flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized or written.
    pub fn write_report(&mut self, report: &Report, format: Format) -> Result<()> {
        let mut rendered = report
            .render(format)
            .context("failed to serialize benchmark results")?;

        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }

        self.write_chunk(&rendered)?;
        self.flush()
    }

    /// Processes the result of a write, handling `BrokenPipe` errors gracefully.
    fn handle_broken_pipe(result: io::Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) => match err.kind() {
                BrokenPipe => Ok(()),
                _ => Err(err.into()),
            },
        }
    }
}
