//! Copy strategy implementations.
//!
//! Each strategy is a self-contained function that copies one file to another and
//! returns the number of bytes copied. They differ only in their I/O primitives:
//!
//! - [`stream`]: Unbuffered and buffered read/write loops over `File` handles
//! - [`channel`]: Loops over a positional [`Channel`], one with a reusable
//!   off-heap [`DirectBuffer`]
//! - [`transfer`]: Whole-range transfers delegated to the kernel
//!
//! All strategies share the same contract: the source is fully drained, every byte
//! written is flushed before returning, and any I/O failure aborts the copy.

pub mod channel;
pub mod direct;
pub mod stream;
mod sys;
pub mod transfer;

use std::{
    fs::{self, File},
    io::{self, Read},
    path::Path,
};

pub use self::{channel::Channel, direct::DirectBuffer};
use crate::error::Error;

/// Opens the source file for reading with enhanced error context.
///
/// # Errors
///
/// Returns `Error::Io` with specific messages for:
/// - File not found
/// - Permission denied
/// - Other I/O errors
pub fn open_source(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|source| {
        let message = match source.kind() {
            io::ErrorKind::NotFound => "no such source file",
            io::ErrorKind::PermissionDenied => "permission denied reading source",
            _ => "failed to open source",
        };

        Error::io(path, message, source)
    })
}

/// Creates or truncates the target file with enhanced error context.
///
/// # Errors
///
/// Returns `Error::Io` with specific messages for:
/// - Missing parent directory
/// - Permission denied
/// - Other I/O errors
pub fn create_target(path: &Path) -> Result<File, Error> {
    File::create(path).map_err(|source| {
        let message = match source.kind() {
            io::ErrorKind::NotFound => "no such directory for target",
            io::ErrorKind::PermissionDenied => "permission denied writing target",
            _ => "failed to create target",
        };

        Error::io(path, message, source)
    })
}

/// Whether two paths name the same existing file, through links and aliases.
///
/// A path that does not exist is never the same file as anything.
#[cfg(unix)]
pub fn is_same_file(left: &Path, right: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(left), fs::metadata(right)) {
        (Ok(left), Ok(right)) => left.dev() == right.dev() && left.ino() == right.ino(),
        _ => false,
    }
}

/// Whether two paths name the same existing file, through links and aliases.
///
/// A path that does not exist is never the same file as anything.
#[cfg(not(unix))]
pub fn is_same_file(left: &Path, right: &Path) -> bool {
    match (fs::canonicalize(left), fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

/// Reads one chunk, retrying reads interrupted by a signal.
///
/// Returns the number of bytes actually read, zero at end of file.
pub(crate) fn read_chunk<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    path: &Path,
) -> Result<usize, Error> {
    loop {
        match reader.read(buf) {
            Ok(read) => return Ok(read),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => return Err(Error::io(path, "failed to read source", source)),
        }
    }
}

