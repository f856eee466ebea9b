//! Platform primitives behind [`Channel`](super::Channel).
//!
//! Positional reads and writes use `pread`/`pwrite` on Unix. Whole-range transfers use
//! `copy_file_range` and `sendfile` on Linux, falling back to a user-space copy when the
//! kernel or filesystem does not support them. Elsewhere everything seeks first.

use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
};

#[cfg(unix)]
use std::os::unix::fs::FileExt;

/// Reads at `offset` without moving the descriptor's cursor.
#[cfg(unix)]
pub(super) fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    loop {
        match file.read_at(buf, offset) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

/// Writes all of `buf` at `offset` without moving the descriptor's cursor.
#[cfg(unix)]
pub(super) fn write_all_at(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    file.write_all_at(buf, offset)
}

/// Reads at `offset` after seeking there.
#[cfg(not(unix))]
pub(super) fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut reader = file;
    reader.seek(SeekFrom::Start(offset))?;

    loop {
        match reader.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

/// Writes all of `buf` at `offset` after seeking there.
#[cfg(not(unix))]
pub(super) fn write_all_at(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    use std::io::Write;

    let mut writer = file;
    writer.seek(SeekFrom::Start(offset))?;
    writer.write_all(buf)
}

/// Copies `count` bytes from `source` at `source_offset` to `target` at `target_offset`,
/// in the kernel with `copy_file_range`.
#[cfg(target_os = "linux")]
pub(super) fn copy_range(
    source: &File,
    source_offset: u64,
    target: &File,
    target_offset: u64,
    count: u64,
) -> io::Result<u64> {
    use nix::{errno::Errno, fcntl::copy_file_range, libc::loff_t};

    let mut off_in = to_offset::<loff_t>(source_offset)?;
    let mut off_out = to_offset::<loff_t>(target_offset)?;
    let mut moved = 0;

    while moved < count {
        let chunk = usize::try_from(count - moved).unwrap_or(usize::MAX);
        match copy_file_range(source, Some(&mut off_in), target, Some(&mut off_out), chunk) {
            Ok(0) => break,
            Ok(copied) => moved += copied as u64,
            Err(Errno::EINTR) => {}
            Err(errno) if moved == 0 && is_unsupported(errno) => {
                return user_space_copy(source, source_offset, target, target_offset, count);
            }
            Err(errno) => return Err(errno.into()),
        }
    }

    Ok(moved)
}

/// Sends `count` bytes from `source` at `source_offset` to `target` at `target_offset`,
/// in the kernel with `sendfile`.
#[cfg(target_os = "linux")]
pub(super) fn send_range(
    source: &File,
    source_offset: u64,
    target: &File,
    target_offset: u64,
    count: u64,
) -> io::Result<u64> {
    use nix::{errno::Errno, libc::off_t, sys::sendfile::sendfile};

    // `sendfile` writes at the target's cursor.
    let mut writer = target;
    writer.seek(SeekFrom::Start(target_offset))?;

    let mut offset = to_offset::<off_t>(source_offset)?;
    let mut moved = 0;

    while moved < count {
        let chunk = usize::try_from(count - moved).unwrap_or(usize::MAX);
        match sendfile(target, source, Some(&mut offset), chunk) {
            Ok(0) => break,
            Ok(sent) => moved += sent as u64,
            Err(Errno::EINTR) => {}
            Err(errno) if moved == 0 && is_unsupported(errno) => {
                return user_space_copy(source, source_offset, target, target_offset, count);
            }
            Err(errno) => return Err(errno.into()),
        }
    }

    Ok(moved)
}

/// Copies `count` bytes from `source` at `source_offset` to `target` at `target_offset`.
#[cfg(not(target_os = "linux"))]
pub(super) fn copy_range(
    source: &File,
    source_offset: u64,
    target: &File,
    target_offset: u64,
    count: u64,
) -> io::Result<u64> {
    user_space_copy(source, source_offset, target, target_offset, count)
}

/// Sends `count` bytes from `source` at `source_offset` to `target` at `target_offset`.
#[cfg(not(target_os = "linux"))]
pub(super) fn send_range(
    source: &File,
    source_offset: u64,
    target: &File,
    target_offset: u64,
    count: u64,
) -> io::Result<u64> {
    user_space_copy(source, source_offset, target, target_offset, count)
}

/// Errors meaning the kernel can't do this transfer, rather than that it failed.
#[cfg(target_os = "linux")]
fn is_unsupported(errno: nix::errno::Errno) -> bool {
    use nix::errno::Errno;

    matches!(errno, Errno::ENOSYS | Errno::EXDEV | Errno::EINVAL | Errno::EOPNOTSUPP)
}

/// Converts a file offset into the kernel's signed offset type.
#[cfg(target_os = "linux")]
fn to_offset<T: TryFrom<u64>>(offset: u64) -> io::Result<T> {
    T::try_from(offset).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("offset {offset} exceeds the platform limit"),
        )
    })
}

/// Bounded seek-and-copy through the standard library.
fn user_space_copy(
    source: &File,
    source_offset: u64,
    target: &File,
    target_offset: u64,
    count: u64,
) -> io::Result<u64> {
    let mut reader = source;
    let mut writer = target;
    reader.seek(SeekFrom::Start(source_offset))?;
    writer.seek(SeekFrom::Start(target_offset))?;

    io::copy(&mut reader.take(count), &mut writer)
}
