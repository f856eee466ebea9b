//! Deterministic source files for benchmarking.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::error::Error;

/// Bytes generated per write.
const CHUNK_LEN: usize = 64 * 1024;

/// Seed of the byte generator; equal lengths always produce equal files.
const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Writes a file of exactly `len` pseudo-random bytes, creating parent directories.
///
/// The content is a fixed xorshift sequence, so it neither compresses nor varies
/// between runs.
///
/// # Errors
///
/// Returns `Error::Io` if a directory or the file cannot be created or written.
pub fn create(path: &Path, len: u64) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| Error::io(parent, "failed to create fixture directory", err))?;
    }

    let file = File::create(path).map_err(|err| Error::io(path, "failed to create fixture", err))?;
    let mut writer = BufWriter::new(file);

    let mut state = SEED;
    let mut chunk = vec![0_u8; CHUNK_LEN];
    let mut remaining = len;

    while remaining > 0 {
        let take = usize::try_from(remaining).map_or(CHUNK_LEN, |left| left.min(CHUNK_LEN));
        for byte in &mut chunk[..take] {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            *byte = state.to_le_bytes()[0];
        }

        writer
            .write_all(&chunk[..take])
            .map_err(|err| Error::io(path, "failed to write fixture", err))?;
        remaining -= take as u64;
    }

    writer
        .flush()
        .map_err(|err| Error::io(path, "failed to write fixture", err))
}
