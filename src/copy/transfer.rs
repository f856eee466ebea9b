//! Channel-to-channel copies that hand the whole byte range to the kernel.
//!
//! Neither strategy takes a buffer size: the transport picks its own chunking.

use std::path::Path;

use super::Channel;
use crate::error::Error;

/// Copies by having the target channel pull the full source range.
///
/// # Errors
///
/// Returns `Error::Io` if either channel cannot be opened or the transfer fails.
pub fn copy_using_transfer_from(source: &Path, target: &Path) -> Result<u64, Error> {
    let mut input = Channel::open(source)?;
    let mut output = Channel::create(target)?;
    let size = input.size()?;

    let copied = output.transfer_from(&mut input, 0, size)?;
    output.flush()?;

    Ok(copied)
}

/// Copies by having the source channel push its full range to the target.
///
/// # Errors
///
/// Returns `Error::Io` if either channel cannot be opened or the transfer fails.
pub fn copy_using_transfer_to(source: &Path, target: &Path) -> Result<u64, Error> {
    let input = Channel::open(source)?;
    let mut output = Channel::create(target)?;
    let size = input.size()?;

    let copied = input.transfer_to(0, size, &mut output)?;
    output.flush()?;

    Ok(copied)
}
