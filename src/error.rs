//! Error types for copy-bench.

use std::{io, path::Path};

use thiserror::Error;

use crate::exit_code::ExitCode;
use crate::options::{buffer_size::BufferSize, strategy::Strategy};

/// Structured error types for copy-bench.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid command-line usage.
    #[error("usage: {0}")]
    Usage(String),

    /// A copy finished but reported a different length than the source file.
    #[error(
        "{strategy} copied {actual} bytes with buffer size {}, expected {expected}",
        BufferSize::display_optional(*buffer_size)
    )]
    ByteCountMismatch {
        /// Strategy that produced the short or long copy.
        strategy: Strategy,
        /// Buffer size of the combination, if the strategy uses one.
        buffer_size: Option<BufferSize>,
        /// Length of the source file at setup.
        expected: u64,
        /// Byte count reported by the copy.
        actual: u64,
    },

    /// A forked benchmark process failed.
    #[error("fork {index} failed: {message}")]
    Fork {
        /// One-based fork index.
        index: u16,
        /// Failure description.
        message: String,
    },

    /// A forked benchmark process reported its own failure through its exit code.
    #[error("fork {index} failed with exit code {}", u8::from(*code))]
    ForkExit {
        /// One-based fork index.
        index: u16,
        /// Exit code of the child.
        code: ExitCode,
    },

    /// JSON serialization error.
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error("CSV serialization failed")]
    Csv(#[from] csv::Error),

    /// I/O error with context.
    #[error("{message}: {path}")]
    Io {
        /// File path where error occurred.
        path: String,
        /// Error description.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Configuration error.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Wraps an I/O error with the path and operation it occurred on.
    pub fn io(path: &Path, message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: message.into(),
            source,
        }
    }
}
