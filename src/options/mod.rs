//! Configuration options for a benchmark run.
//!
//! This module provides the [`Options`] struct, a unified container for every setting
//! that shapes a run. Options are fixed before the first measurement and never change
//! while one is in progress.
//!
//! # Structure
//!
//! - **Strategy** ([`Strategy`]): Which copy strategies to benchmark
//! - **BufferSizes** ([`BufferSizes`]): The buffer-size sweep for loop strategies
//! - **Phase** ([`Phase`]): Warm-up and measurement iteration bounds
//! - **Isolation** ([`Isolation`]): How forks are kept apart, and how many run
//! - **Threads** ([`Threads`]): Invoking thread count, always one
//! - **Mode** ([`Mode`]) and **TimeUnit** ([`TimeUnit`]): What the score means
//! - **Format** ([`Format`]): How results are written
//!
//! # Usage
//!
//! ```
//! use copy_bench::{Isolation, Mode, Options, Phase, Strategy, TimeUnit};
//! use std::time::Duration;
//!
//! // Defaults reproduce the classic configuration
//! let options = Options::default();
//! assert_eq!(options.forks(), 1);
//! assert_eq!(options.time_unit(), TimeUnit::Milliseconds);
//! assert_eq!(options.combinations().len(), 18);
//!
//! // A quick run over two strategies
//! let options = Options::default()
//!     .with_strategies([Strategy::Streams, Strategy::ChannelTransferTo])
//!     .with_measurement(Phase::new(3, Duration::from_millis(100)))
//!     .with_isolation(Isolation::InProcess)
//!     .with_mode(Mode::Throughput);
//! assert_eq!(options.combinations().len(), 5);
//! ```
//!
//! # Environment Variables
//!
//! - `COPY_BENCH_FORKS`: Fork count (default: 1)
//! - `COPY_BENCH_WARMUP_ITERATIONS`: Warm-up iterations (default: 2)
//! - `COPY_BENCH_MEASUREMENT_ITERATIONS`: Measurement iterations (default: 5)
//! - `COPY_BENCH_BUFFER_SIZES`: Comma-separated sweep (default: 1024,4096,16384,65536)
//! - `COPY_BENCH_TIME_UNIT`: `ns`, `us`, `ms` or `s` (default: ms)

pub mod buffer_size;
pub mod isolation;
pub mod mode;
pub mod phase;
pub mod serialization;
pub mod strategy;

use self::buffer_size::BufferSizes;
use self::isolation::{Isolation, Threads};
use self::mode::{Mode, TimeUnit};
use self::phase::Phase;
use self::serialization::Format;
use self::strategy::Strategy;
use crate::error::Error;
use crate::harness::Combination;
use core::fmt::{self, Display, Formatter};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Unified configuration for a benchmark run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Strategies to benchmark, in order.
    strategies: Box<[Strategy]>,

    /// Buffer sizes swept for each loop strategy.
    buffer_sizes: BufferSizes,

    /// Warm-up iterations, discarded.
    warmup: Phase,

    /// Measurement iterations, recorded.
    measurement: Phase,

    /// Number of forks; zero runs once in process without forking.
    forks: u16,

    /// How forks are isolated from each other.
    isolation: Isolation,

    /// Pause between in-process forks.
    cooldown: Duration,

    /// Invoking thread count.
    threads: Threads,

    /// Benchmark mode.
    mode: Mode,

    /// Reporting time unit.
    time_unit: TimeUnit,

    /// Report format.
    format: Format,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strategies: Strategy::ALL.into(),
            buffer_sizes: BufferSizes::default(),
            warmup: Phase::WARMUP,
            measurement: Phase::MEASUREMENT,
            forks: Self::FORKS,
            isolation: Isolation::default(),
            cooldown: Isolation::COOLDOWN,
            threads: Threads::default(),
            mode: Mode::default(),
            time_unit: TimeUnit::default(),
            format: Format::default(),
        }
    }
}

impl Options {
    /// One fork.
    const FORKS: u16 = 1;

    // Environment variable names for configuration.
    const ENV_FORKS: &'static str = "COPY_BENCH_FORKS";
    const ENV_WARMUP_ITERATIONS: &'static str = "COPY_BENCH_WARMUP_ITERATIONS";
    const ENV_MEASUREMENT_ITERATIONS: &'static str = "COPY_BENCH_MEASUREMENT_ITERATIONS";
    const ENV_BUFFER_SIZES: &'static str = "COPY_BENCH_BUFFER_SIZES";
    const ENV_TIME_UNIT: &'static str = "COPY_BENCH_TIME_UNIT";

    /// Create options from the defaults and any environment variables present.
    ///
    /// Unparsable values are ignored in favor of the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            buffer_sizes: Self::parse_env_var(
                Self::ENV_BUFFER_SIZES,
                defaults.buffer_sizes.clone(),
            ),
            warmup: defaults.warmup.with_iterations(Self::parse_env_var(
                Self::ENV_WARMUP_ITERATIONS,
                defaults.warmup.iterations(),
            )),
            measurement: defaults.measurement.with_iterations(Self::parse_env_var(
                Self::ENV_MEASUREMENT_ITERATIONS,
                defaults.measurement.iterations(),
            )),
            forks: Self::parse_env_var(Self::ENV_FORKS, defaults.forks),
            time_unit: Self::parse_env_var(Self::ENV_TIME_UNIT, defaults.time_unit),
            ..defaults
        }
    }

    /// Set the strategies to benchmark.
    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = Strategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    /// Set the buffer-size sweep.
    pub fn with_buffer_sizes(mut self, buffer_sizes: BufferSizes) -> Self {
        self.buffer_sizes = buffer_sizes;
        self
    }

    /// Set the warm-up phase.
    pub const fn with_warmup(mut self, warmup: Phase) -> Self {
        self.warmup = warmup;
        self
    }

    /// Set the measurement phase.
    pub const fn with_measurement(mut self, measurement: Phase) -> Self {
        self.measurement = measurement;
        self
    }

    /// Set the fork count.
    pub const fn with_forks(mut self, forks: u16) -> Self {
        self.forks = forks;
        self
    }

    /// Set the fork isolation.
    pub const fn with_isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = isolation;
        self
    }

    /// Set the pause between in-process forks.
    pub const fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the thread count.
    pub const fn with_threads(mut self, threads: Threads) -> Self {
        self.threads = threads;
        self
    }

    /// Set the benchmark mode.
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the reporting time unit.
    pub const fn with_time_unit(mut self, time_unit: TimeUnit) -> Self {
        self.time_unit = time_unit;
        self
    }

    /// Set the report format.
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Get the strategies.
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Get the buffer-size sweep.
    pub const fn buffer_sizes(&self) -> &BufferSizes {
        &self.buffer_sizes
    }

    /// Get the warm-up phase.
    pub const fn warmup(&self) -> Phase {
        self.warmup
    }

    /// Get the measurement phase.
    pub const fn measurement(&self) -> Phase {
        self.measurement
    }

    /// Get the fork count.
    pub const fn forks(&self) -> u16 {
        self.forks
    }

    /// Get the fork isolation.
    pub const fn isolation(&self) -> Isolation {
        self.isolation
    }

    /// Get the pause between in-process forks.
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Get the thread count.
    pub const fn threads(&self) -> Threads {
        self.threads
    }

    /// Get the benchmark mode.
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the reporting time unit.
    pub const fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Get the report format.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Every (strategy, buffer size) pair to benchmark, in run order.
    ///
    /// Loop strategies get one combination per buffer size. Transfer strategies ignore
    /// the buffer size and get exactly one combination without one.
    pub fn combinations(&self) -> Vec<Combination> {
        self.strategies
            .iter()
            .flat_map(|&strategy| {
                if strategy.uses_buffer() {
                    self.buffer_sizes
                        .iter()
                        .map(|size| Combination::new(strategy, Some(size)))
                        .collect::<Vec<_>>()
                } else {
                    vec![Combination::new(strategy, None)]
                }
            })
            .collect()
    }

    /// Checks the options describe a runnable benchmark.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no strategies are selected, the sweep is empty while a
    /// loop strategy is selected, the measurement phase has no iterations, or the thread
    /// count is not one.
    pub fn validate(&self) -> Result<(), Error> {
        if self.strategies.is_empty() {
            return Err(Error::Config("no strategies selected".into()));
        }

        if self.buffer_sizes.is_empty() && self.strategies.iter().any(|s| s.uses_buffer()) {
            return Err(Error::Config(
                "buffer-size sweep is empty but a buffered strategy is selected".into(),
            ));
        }

        if self.measurement.iterations() == 0 {
            return Err(Error::Config("measurement needs at least one iteration".into()));
        }

        self.threads.validate()
    }

    // Env-parsing helpers

    /// Parse an environment variable with fallback to a default value.
    fn parse_env_var<T: FromStr>(name: &str, default: T) -> T {
        env::var(name)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }
}

impl Display for Options {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let strategies: Vec<String> = self.strategies.iter().map(ToString::to_string).collect();

        write!(
            f,
            "Options {{ strategies: {}, buffer_sizes: {}, warmup: {}, measurement: {}, \
             forks: {}, isolation: {}, threads: {}, mode: {}, time_unit: {} }}",
            strategies.join(","),
            self.buffer_sizes,
            self.warmup,
            self.measurement,
            self.forks,
            self.isolation,
            self.threads,
            self.mode,
            self.time_unit
        )
    }
}
