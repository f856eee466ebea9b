//! The benchmark driver.
//!
//! A run is an explicit loop: for each fork, for each [`Combination`], a warm-up phase
//! whose timings are discarded followed by a measurement phase whose per-copy times are
//! folded into [`Statistics`]. Fork results are merged and turned into a [`Report`].
//!
//! - [`Benchmark`]: Source, target and expected length, plus one timed invocation
//! - [`Runner`]: The warm-up and measurement loops of a single fork
//! - [`fork`]: Running a fork in a fresh process
//! - [`Harness`]: Forks, isolation and aggregation

pub mod benchmark;
pub mod fork;
pub mod runner;
pub mod statistics;

use std::{
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
    thread,
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use self::{
    benchmark::Benchmark,
    fork::ForkSpec,
    runner::{ForkResult, Measurement, Runner},
    statistics::Statistics,
};
use crate::error::Error;
use crate::options::{Options, buffer_size::BufferSize, isolation::Isolation, strategy::Strategy};
use crate::report::Report;
use crate::verbose::Verbose;

/// One benchmark key: a strategy and the buffer size it runs with, if it uses one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    strategy: Strategy,
    buffer_size: Option<BufferSize>,
}

impl Combination {
    /// Creates a combination. The buffer size is dropped for strategies that ignore it.
    pub const fn new(strategy: Strategy, buffer_size: Option<BufferSize>) -> Self {
        let buffer_size = if strategy.uses_buffer() {
            buffer_size
        } else {
            None
        };

        Self {
            strategy,
            buffer_size,
        }
    }

    /// Get the strategy.
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the buffer size.
    pub const fn buffer_size(&self) -> Option<BufferSize> {
        self.buffer_size
    }
}

impl Display for Combination {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.buffer_size {
            Some(size) => write!(f, "{} (buffer size {size})", self.strategy),
            None => write!(f, "{}", self.strategy),
        }
    }
}

/// Drives a full run: validation, forks, and aggregation into a [`Report`].
///
/// # Examples
///
/// ```no_run
/// use copy_bench::{Harness, Isolation, Options, Verbose};
/// use anyhow::Result;
///
/// # fn example() -> Result<()> {
/// let options = Options::default().with_isolation(Isolation::InProcess);
/// let harness = Harness::new(&options, "input.bin", "output.bin")?;
/// let report = harness.run(&mut Verbose::disabled())?;
/// assert_eq!(report.results().len(), 18);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Harness<'a> {
    options: &'a Options,
    benchmark: Benchmark,
    program: Option<PathBuf>,
}

impl<'a> Harness<'a> {
    /// Validates the options and sets up the benchmark files.
    ///
    /// Every configuration and setup problem surfaces here, before anything is measured.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid options or a non-file source, and
    /// `Error::Io` if the source can't be opened or the target can't be created.
    pub fn new(
        options: &'a Options,
        source: impl AsRef<Path>,
        target: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        options.validate()?;
        let benchmark = Benchmark::setup(source, target)?;

        Ok(Self {
            options,
            benchmark,
            program: None,
        })
    }

    /// Set the executable launched for process-isolated forks.
    ///
    /// Defaults to the running executable, which must handle the fork-child argument.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Get the benchmark state.
    pub const fn benchmark(&self) -> &Benchmark {
        &self.benchmark
    }

    /// Get the options.
    pub const fn options(&self) -> &Options {
        self.options
    }

    /// Runs every fork and aggregates the results.
    ///
    /// With zero forks a single pass runs in this process. Otherwise each fork runs in a
    /// fresh process or, with [`Isolation::InProcess`], here after a cooldown pause.
    ///
    /// # Errors
    ///
    /// Fails on the first failed or mis-sized copy in any fork; no partial report is
    /// produced.
    pub fn run(&self, verbose: &mut Verbose) -> Result<Report> {
        verbose.write_config(self.options, &self.benchmark)?;

        let forks = self.options.forks();
        let mut merged: Vec<Measurement> = self
            .options
            .combinations()
            .into_iter()
            .map(|combination| Measurement {
                combination,
                statistics: Statistics::default(),
            })
            .collect();

        if forks == 0 {
            let result = Runner::new(self.options, &self.benchmark, verbose).run()?;
            Self::merge(&mut merged, &result, 0)?;
        }

        for index in 1..=forks {
            verbose.write_fork(index, forks)?;

            let result = match self.options.isolation() {
                Isolation::Process => self.run_process(index, verbose.is_enabled())?,
                Isolation::InProcess => {
                    if index > 1 {
                        thread::sleep(self.options.cooldown());
                    }
                    Runner::new(self.options, &self.benchmark, verbose).run()?
                }
            };

            Self::merge(&mut merged, &result, index)?;
        }

        Ok(Report::new(self.options, &merged))
    }

    /// Runs one fork in a child process.
    fn run_process(&self, index: u16, verbose: bool) -> Result<ForkResult, Error> {
        let program = match &self.program {
            Some(program) => program.clone(),
            None => fork::current_program()?,
        };

        let spec = ForkSpec {
            index,
            options: self.options.clone(),
            benchmark: self.benchmark.clone(),
            verbose,
        };

        fork::spawn(&program, &spec)
    }

    /// Folds one fork's measurements into the running totals.
    fn merge(merged: &mut [Measurement], result: &ForkResult, index: u16) -> Result<(), Error> {
        if merged.len() != result.measurements.len() {
            return Err(Error::Fork {
                index,
                message: format!(
                    "expected {} combinations, got {}",
                    merged.len(),
                    result.measurements.len()
                ),
            });
        }

        for (total, measurement) in merged.iter_mut().zip(&result.measurements) {
            if total.combination != measurement.combination {
                return Err(Error::Fork {
                    index,
                    message: format!(
                        "expected {}, got {}",
                        total.combination, measurement.combination
                    ),
                });
            }

            total.statistics.merge(&measurement.statistics);
        }

        Ok(())
    }
}
