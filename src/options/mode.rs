//! Benchmark mode and reporting time unit.

use clap::ValueEnum;
use core::fmt::{self, Display, Formatter};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Determines what a result row's score means.
///
/// # Examples
///
/// ```
/// use copy_bench::{Mode, TimeUnit};
///
/// assert_eq!(Mode::default(), Mode::AverageTime);
/// assert_eq!(Mode::AverageTime.unit_label(TimeUnit::Milliseconds), "ms/op");
/// assert_eq!(Mode::Throughput.unit_label(TimeUnit::Seconds), "ops/s");
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
pub enum Mode {
    /// Arithmetic mean of the time of one copy
    #[default]
    #[value(name = "avgt")]
    AverageTime,

    /// Copies completed per time unit
    #[value(name = "thrpt")]
    Throughput,

    /// One copy per iteration, time bound ignored
    #[value(name = "ss")]
    SingleShotTime,
}

impl Mode {
    /// Whether every iteration is exactly one invocation.
    pub const fn is_single_shot(self) -> bool {
        matches!(self, Self::SingleShotTime)
    }

    /// Unit of the score in this mode, for example `ms/op` or `ops/ms`.
    pub fn unit_label(self, unit: TimeUnit) -> String {
        match self {
            Self::AverageTime | Self::SingleShotTime => format!("{}/op", unit.abbreviation()),
            Self::Throughput => format!("ops/{}", unit.abbreviation()),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::AverageTime => write!(f, "avgt"),
            Self::Throughput => write!(f, "thrpt"),
            Self::SingleShotTime => write!(f, "ss"),
        }
    }
}

/// Time unit results are reported in.
///
/// # Examples
///
/// ```
/// use copy_bench::TimeUnit;
///
/// assert_eq!(TimeUnit::default(), TimeUnit::Milliseconds);
/// assert_eq!(TimeUnit::Milliseconds.from_nanos(2_500_000.0), 2.5);
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
pub enum TimeUnit {
    /// Nanoseconds
    #[value(name = "ns")]
    Nanoseconds,

    /// Microseconds
    #[value(name = "us")]
    Microseconds,

    /// Milliseconds
    #[default]
    #[value(name = "ms")]
    Milliseconds,

    /// Seconds
    #[value(name = "s")]
    Seconds,
}

impl TimeUnit {
    /// Nanoseconds in one unit.
    pub const fn nanos_per_unit(self) -> f64 {
        match self {
            Self::Nanoseconds => 1.0,
            Self::Microseconds => 1_000.0,
            Self::Milliseconds => 1_000_000.0,
            Self::Seconds => 1_000_000_000.0,
        }
    }

    /// Converts a nanosecond quantity into this unit.
    pub fn from_nanos(self, nanos: f64) -> f64 {
        nanos / self.nanos_per_unit()
    }

    /// Short unit name as used in report headers.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "us",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("ns") => Ok(Self::Nanoseconds),
            s if s.eq_ignore_ascii_case("us") => Ok(Self::Microseconds),
            s if s.eq_ignore_ascii_case("ms") => Ok(Self::Milliseconds),
            s if s.eq_ignore_ascii_case("s") => Ok(Self::Seconds),
            other => Err(Error::Config(format!("unknown time unit: {other:?}"))),
        }
    }
}
