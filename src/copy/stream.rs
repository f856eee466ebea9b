//! Stream copies over `File` handles, unbuffered and buffered.

use std::{
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use super::{create_target, open_source, read_chunk};
use crate::error::Error;
use crate::options::buffer_size::BufferSize;

/// Copies with a read/write loop on raw file handles.
///
/// Every chunk costs one `read` and one `write` system call, so small buffers expose
/// the per-call overhead.
///
/// # Errors
///
/// Returns `Error::Io` if the source cannot be read or the target cannot be written.
pub fn copy_using_streams(
    source: &Path,
    target: &Path,
    buffer_size: BufferSize,
) -> Result<u64, Error> {
    let mut input = open_source(source)?;
    let mut output = create_target(target)?;
    let mut buffer = vec![0_u8; buffer_size.get()];
    let mut copied = 0;

    loop {
        let read = read_chunk(&mut input, &mut buffer, source)?;
        if read == 0 {
            break;
        }

        output
            .write_all(&buffer[..read])
            .map_err(|err| Error::io(target, "failed to write target", err))?;
        copied += read as u64;
    }

    output
        .flush()
        .map_err(|err| Error::io(target, "failed to flush target", err))?;

    Ok(copied)
}

/// Copies with the same loop, the handles wrapped in buffers of `buffer_size`.
///
/// The writer is unwrapped before returning so a failed final flush surfaces as an
/// error rather than being lost on drop.
///
/// # Errors
///
/// Returns `Error::Io` if the source cannot be read or the target cannot be written.
pub fn copy_using_buffered_streams(
    source: &Path,
    target: &Path,
    buffer_size: BufferSize,
) -> Result<u64, Error> {
    let capacity = buffer_size.get();
    let mut input = BufReader::with_capacity(capacity, open_source(source)?);
    let mut output = BufWriter::with_capacity(capacity, create_target(target)?);
    let mut buffer = vec![0_u8; capacity];
    let mut copied = 0;

    loop {
        let read = read_chunk(&mut input, &mut buffer, source)?;
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
