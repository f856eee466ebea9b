//! Benchmark state shared by every invocation of a run.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

use super::Combination;
use crate::copy::{create_target, is_same_file, open_source};
use crate::error::Error;

/// Fixed source and target files, and the byte count every copy must report.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    source: PathBuf,
    target: PathBuf,
    expected_len: u64,
}

impl Benchmark {
    /// Checks both files are usable and records the source length.
    ///
    /// The target is created, or truncated if it exists, to prove it is writable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the source cannot be opened or the target cannot be
    /// created, and `Error::Config` if the source is not a regular file or the target
    /// is the source itself.
    pub fn setup(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<Self, Error> {
        let (source, target) = (source.as_ref(), target.as_ref());

        let metadata = open_source(source)?
            .metadata()
            .map_err(|err| Error::io(source, "failed to read source metadata", err))?;
        if !metadata.is_file() {
            return Err(Error::Config(format!(
                "source is not a regular file: {}",
                source.display()
            )));
        }

        // Truncating the target must never touch the source.
        if is_same_file(source, target) {
            return Err(Error::Config(format!(
                "target is the source file: {}",
                target.display()
            )));
        }

        create_target(target)?;

        Ok(Self {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            expected_len: metadata.len(),
        })
    }

    /// Get the source path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Get the target path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Get the byte count every copy must report.
    pub const fn expected_len(&self) -> u64 {
        self.expected_len
    }

    /// Runs one copy for `combination` and returns how long it took.
    ///
    /// # Errors
    ///
    /// Returns the copy's `Error::Io` on failure, and `Error::ByteCountMismatch` if the
    /// copy reported a length other than the expected one.
    pub fn invoke(&self, combination: Combination) -> Result<Duration, Error> {
        let started = Instant::now();
        let copied = combination
            .strategy()
            .copy(&self.source, &self.target, combination.buffer_size())?;
        let elapsed = started.elapsed();

        self.validate(combination, copied)?;

        Ok(elapsed)
    }

    /// Checks a copy's reported length.
    ///
    /// # Errors
    ///
    /// Returns `Error::ByteCountMismatch` if `copied` isn't the expected length.
    pub fn validate(&self, combination: Combination, copied: u64) -> Result<(), Error> {
        if copied == self.expected_len {
            Ok(())
        } else {
            Err(Error::ByteCountMismatch {
                strategy: combination.strategy(),
                buffer_size: combination.buffer_size(),
                expected: self.expected_len,
                actual: copied,
            })
        }
    }
}
