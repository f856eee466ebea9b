//! Positional channel over a file, and the copies built on it.

use std::{
    fmt::{self, Display, Formatter},
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use super::{DirectBuffer, create_target, open_source, sys};
use crate::error::Error;
use crate::options::buffer_size::BufferSize;

/// A sequential, position-aware view of a file.
///
/// Reads and writes go to the channel's own position rather than the descriptor's
/// cursor, and whole ranges can be handed to the kernel with [`Channel::transfer_to`]
/// and [`Channel::transfer_from`].
#[derive(Debug)]
pub struct Channel {
    file: File,
    path: PathBuf,
    position: u64,
}

impl Channel {
    /// Opens a read channel on an existing file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, Error> {
        Ok(Self {
            file: open_source(path)?,
            path: path.to_path_buf(),
            position: 0,
        })
    }

    /// Opens a write channel, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, Error> {
        Ok(Self {
            file: create_target(path)?,
            path: path.to_path_buf(),
            position: 0,
        })
    }

    /// Gets the path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the current position.
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Gets the current size of the underlying file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file metadata cannot be read.
    pub fn size(&self) -> Result<u64, Error> {
        self.file
            .metadata()
            .map(|metadata| metadata.len())
            .map_err(|err| Error::io(&self.path, "failed to read file size", err))
    }

    /// Reads into `buf` at the current position and advances by the bytes read.
    ///
    /// Returns zero at end of file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the read fails.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let read = sys::read_at(&self.file, buf, self.position)
            .map_err(|err| Error::io(&self.path, "failed to read channel", err))?;
        self.position += read as u64;

        Ok(read)
    }

    /// Writes all of `buf` at the current position and advances past it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the write fails.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), Error> {
        sys::write_all_at(&self.file, buf, self.position)
            .map_err(|err| Error::io(&self.path, "failed to write channel", err))?;
        self.position += buf.len() as u64;

        Ok(())
    }

    /// Flushes anything the channel holds for the underlying file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the flush fails.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.file
            .flush()
            .map_err(|err| Error::io(&self.path, "failed to flush channel", err))
    }

    /// Transfers up to `count` bytes starting at `position` of this channel into
    /// `target` at its current position, in the kernel.
    ///
    /// This channel's position is unchanged; the target advances by the bytes moved.
    /// Returns fewer than `count` bytes only when this file ends first.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the kernel transfer fails.
    pub fn transfer_to(&self, position: u64, count: u64, target: &mut Self) -> Result<u64, Error> {
        let moved = sys::send_range(&self.file, position, &target.file, target.position, count)
            .map_err(|err| Error::io(&self.path, "failed to transfer to target", err))?;
        target.position += moved;

        Ok(moved)
    }

    /// Transfers up to `count` bytes from `source` at its current position into this
    /// channel at `position`, in the kernel.
    ///
    /// This channel's position is unchanged; the source advances by the bytes moved.
    /// Returns fewer than `count` bytes only when the source ends first.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the kernel transfer fails.
    pub fn transfer_from(
        &mut self,
        source: &mut Self,
        position: u64,
        count: u64,
    ) -> Result<u64, Error> {
        let moved = sys::copy_range(&source.file, source.position, &self.file, position, count)
            .map_err(|err| Error::io(&self.path, "failed to transfer from source", err))?;
        source.position += moved;

        Ok(moved)
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path.display(), self.position)
    }
}

/// Copies by reading through a channel into a heap buffer and writing through a
/// buffered stream.
///
/// # Errors
///
/// Returns `Error::Io` if the source cannot be read or the target cannot be written.
pub fn copy_using_in_channel_out_buffered_stream(
    source: &Path,
    target: &Path,
    buffer_size: BufferSize,
) -> Result<u64, Error> {
    let capacity = buffer_size.get();
    let mut input = Channel::open(source)?;
    let mut output = BufWriter::with_capacity(capacity, create_target(target)?);
    let mut buffer = vec![0_u8; capacity];
    let mut copied = 0;

    loop {
        let read = input.read(&mut buffer)?;
        if read == 0 {
            break;
        }

        output
            .write_all(&buffer[..read])
            .map_err(|err| Error::io(target, "failed to write target", err))?;
        copied += read as u64;
    }

    output
        .into_inner()
        .map_err(|err| Error::io(target, "failed to flush target", err.into_error()))?;

    Ok(copied)
}

/// Copies channel to channel through one off-heap buffer reused for every chunk.
///
/// # Errors
///
/// Returns `Error::Io` if the source cannot be read or the target cannot be written,
/// and `Error::Config` if the direct buffer cannot be mapped.
pub fn copy_using_channel_with_direct_buffer(
    source: &Path,
    target: &Path,
    buffer_size: BufferSize,
) -> Result<u64, Error> {
    let mut input = Channel::open(source)?;
    let mut output = Channel::create(target)?;
    let mut buffer = DirectBuffer::allocate(buffer_size)?;
    let mut copied = 0;

    loop {
        let read = input.read(&mut buffer)?;
        if read == 0 {
            break;
        }

        output.write_all(&buffer[..read])?;
        copied += read as u64;
    }

    output.flush()?;

    Ok(copied)
}
