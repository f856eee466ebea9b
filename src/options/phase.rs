//! Iteration bounds for the warm-up and measurement phases.

use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How many iterations a phase runs and how long each iteration lasts.
///
/// An iteration invokes the strategy back to back until `time` has elapsed, and always
/// at least once. The bound applies to the iteration as a whole, never to a single copy.
///
/// # Examples
///
/// ```
/// use copy_bench::Phase;
/// use std::time::Duration;
///
/// let warmup = Phase::WARMUP;
/// assert_eq!(warmup.iterations(), 2);
/// assert_eq!(warmup.time(), Duration::from_secs(5));
/// assert_eq!(warmup.to_string(), "2 iterations, 5s each");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Phase {
    /// Number of iterations.
    iterations: u32,

    /// Duration of each iteration.
    time: Duration,
}

impl Phase {
    /// Two warm-up iterations of five seconds each.
    pub const WARMUP: Self = Self::new(2, Duration::from_secs(5));

    /// Five measurement iterations of ten seconds each.
    pub const MEASUREMENT: Self = Self::new(5, Duration::from_secs(10));

    /// Creates a phase with an iteration count and a per-iteration time bound.
    pub const fn new(iterations: u32, time: Duration) -> Self {
        Self { iterations, time }
    }

    /// Set the iteration count.
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the time bound of each iteration.
    pub const fn with_time(mut self, time: Duration) -> Self {
        self.time = time;
        self
    }

    /// Get the iteration count.
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Get the time bound of each iteration.
    pub const fn time(&self) -> Duration {
        self.time
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} iterations, {:?} each", self.iterations, self.time)
    }
}
