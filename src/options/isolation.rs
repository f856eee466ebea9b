//! Fork isolation and thread configuration.

use clap::ValueEnum;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Error;

/// Determines how each fork is isolated from the others.
///
/// - **Process**: Every fork runs in a fresh OS process, so caches, allocator state and
///   open handles never leak from one fork into the next.
///
/// - **InProcess**: Forks run one after another in the current process with a cooldown
///   gap between them. Cheaper, but only approximates isolation.
///
/// # Examples
///
/// ```
/// use copy_bench::Isolation;
///
/// assert_eq!(Isolation::default(), Isolation::Process);
/// assert_eq!(Isolation::InProcess.to_string(), "in-process");
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Isolation {
    /// Run every fork in a fresh process
    #[default]
    Process,

    /// Restart the benchmark loop in this process after a cooldown
    InProcess,
}

impl Isolation {
    /// Default pause between in-process forks.
    pub const COOLDOWN: Duration = Duration::from_millis(500);
}

impl Display for Isolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process => write!(f, "process"),
            Self::InProcess => write!(f, "in-process"),
        }
    }
}

/// Number of threads invoking the strategy concurrently.
///
/// Measurements stay comparable only when a single thread owns the target file, so any
/// other count is rejected by [`Threads::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Threads(u16);

impl Threads {
    /// Creates a thread count.
    pub const fn new(count: u16) -> Self {
        Self(count)
    }

    /// Get the thread count.
    pub const fn count(self) -> u16 {
        self.0
    }

    /// Checks the count is supported.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` unless the count is exactly one.
    pub fn validate(self) -> Result<(), Error> {
        if self.0 == 1 {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "{} threads requested, but copies must run on exactly 1 thread",
                self.0
            )))
        }
    }
}

impl Default for Threads {
    fn default() -> Self {
        Self(1)
    }
}

impl Display for Threads {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Threads {
    fn from(count: u16) -> Self {
        Self::new(count)
    }
}
