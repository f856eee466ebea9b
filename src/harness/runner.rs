//! Warm-up and measurement loops for one fork.

use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{Benchmark, Combination, Statistics};
use crate::options::{Options, phase::Phase};
use crate::verbose::Verbose;

/// Statistics gathered for one combination in one fork.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// The benchmarked combination.
    pub combination: Combination,
    /// Samples from every measurement iteration.
    pub statistics: Statistics,
}

/// Everything one fork measured, in combination order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForkResult {
    /// Per-combination measurements.
    pub measurements: Vec<Measurement>,
}

/// Runs every combination sequentially on the calling thread.
#[derive(Debug)]
pub struct Runner<'a> {
    options: &'a Options,
    benchmark: &'a Benchmark,
    verbose: &'a mut Verbose,
}

impl<'a> Runner<'a> {
    /// Creates a runner for one fork.
    pub const fn new(
        options: &'a Options,
        benchmark: &'a Benchmark,
        verbose: &'a mut Verbose,
    ) -> Self {
        Self {
            options,
            benchmark,
            verbose,
        }
    }

    /// Warms up and measures every combination.
    ///
    /// # Errors
    ///
    /// Fails on the first copy that errors or reports the wrong byte count, and if a
    /// progress line cannot be written. Nothing measured so far is returned.
    pub fn run(&mut self) -> Result<ForkResult> {
        let combinations = self.options.combinations();
        let mut measurements = Vec::with_capacity(combinations.len());

        for combination in combinations {
            let statistics = self.run_combination(combination)?;
            measurements.push(Measurement {
                combination,
                statistics,
            });
        }

        Ok(ForkResult { measurements })
    }

    /// Runs the warm-up phase, then returns the merged measurement-phase samples.
    fn run_combination(&mut self, combination: Combination) -> Result<Statistics> {
        let (mode, unit) = (self.options.mode(), self.options.time_unit());
        self.verbose.write_combination(&combination)?;

        let warmup = self.options.warmup();
        for index in 1..=warmup.iterations() {
            let stats = self.iteration(combination, warmup)?;
            self.verbose
                .write_iteration("Warmup Iteration", index, &stats, mode, unit)?;
        }

        let measurement = self.options.measurement();
        let mut total = Statistics::default();
        for index in 1..=measurement.iterations() {
            let stats = self.iteration(combination, measurement)?;
            self.verbose
                .write_iteration("Iteration", index, &stats, mode, unit)?;
            total.merge(&stats);
        }

        Ok(total)
    }

    /// Invokes the copy until the phase's iteration time elapses, at least once.
    fn iteration(&self, combination: Combination, phase: Phase) -> Result<Statistics> {
        let single_shot = self.options.mode().is_single_shot();
        let started = Instant::now();
        let mut stats = Statistics::default();

        loop {
            stats.record(self.benchmark.invoke(combination)?);

            if single_shot || started.elapsed() >= phase.time() {
                break;
            }
        }

        Ok(stats)
    }
}
