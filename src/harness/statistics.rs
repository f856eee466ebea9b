//! Mergeable summary statistics over elapsed-time samples.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Running count, mean, variance and range of a set of samples, in nanoseconds.
///
/// Samples are folded in with Welford's update and whole accumulators combine with
/// Chan's parallel formula, so per-iteration and per-fork statistics can be merged
/// without retaining the samples themselves.
///
/// # Examples
///
/// ```
/// use copy_bench::Statistics;
/// use std::time::Duration;
///
/// let stats = Statistics::from_samples(&[
///     Duration::from_millis(2),
///     Duration::from_millis(4),
/// ]);
/// assert_eq!(stats.count(), 2);
/// assert_eq!(stats.mean_nanos(), Some(3_000_000.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    count: u64,
    mean: f64,
    m2: f64,
    min: u64,
    max: u64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: u64::MAX,
            max: 0,
        }
    }
}

impl Statistics {
    /// Creates statistics from a slice of samples.
    pub fn from_samples(samples: &[Duration]) -> Self {
        let mut stats = Self::default();
        samples.iter().for_each(|&sample| stats.record(sample));
        stats
    }

    /// Adds one sample.
    pub fn record(&mut self, sample: Duration) {
        let nanos = u64::try_from(sample.as_nanos()).unwrap_or(u64::MAX);
        let value = nanos as f64;

        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(nanos);
        self.max = self.max.max(nanos);
    }

    /// Folds another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }

        if self.count == 0 {
            *self = *other;
            return;
        }

        let count = self.count + other.count;
        let (a, b, n) = (self.count as f64, other.count as f64, count as f64);
        let delta = other.mean - self.mean;

        self.mean += delta * b / n;
        self.m2 += other.m2 + delta * delta * a * b / n;
        self.count = count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Number of samples.
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Whether no samples have been recorded.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Arithmetic mean in nanoseconds.
    pub fn mean_nanos(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample standard deviation in nanoseconds, which needs at least two samples.
    pub fn std_dev_nanos(&self) -> Option<f64> {
        (self.count > 1).then(|| (self.m2 / (self.count - 1) as f64).sqrt())
    }

    /// Fastest sample in nanoseconds.
    pub fn min_nanos(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min as f64)
    }

    /// Slowest sample in nanoseconds.
    pub fn max_nanos(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max as f64)
    }
}
