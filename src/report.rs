//! The aggregated result set of a run.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::harness::{Combination, Measurement, Statistics};
use crate::options::{
    Options,
    buffer_size::BufferSize,
    mode::{Mode, TimeUnit},
    serialization::Format,
    strategy::Strategy,
};

/// One row of the result set: a combination's score and the samples behind it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    strategy: Strategy,
    buffer_size: Option<BufferSize>,
    mode: Mode,
    count: u64,
    score: f64,
    std_dev: Option<f64>,
    min: f64,
    max: f64,
    unit: String,
}

impl BenchmarkResult {
    /// Converts a combination's statistics into a scored row, `None` without samples.
    pub fn new(
        combination: Combination,
        statistics: &Statistics,
        mode: Mode,
        unit: TimeUnit,
    ) -> Option<Self> {
        let mean = statistics.mean_nanos()?;
        let fastest = statistics.min_nanos()?;
        let slowest = statistics.max_nanos()?;

        let (score, std_dev, min, max) = match mode {
            Mode::AverageTime | Mode::SingleShotTime => (
                unit.from_nanos(mean),
                statistics.std_dev_nanos().map(|sd| unit.from_nanos(sd)),
                unit.from_nanos(fastest),
                unit.from_nanos(slowest),
            ),
            Mode::Throughput => {
                // Clocks can report a zero-length copy.
                let per_unit = |nanos: f64| unit.nanos_per_unit() / nanos.max(1.0);
                let score = per_unit(mean);
                (
                    score,
                    statistics
                        .std_dev_nanos()
                        .map(|sd| score * sd / mean.max(1.0)),
                    per_unit(slowest),
                    per_unit(fastest),
                )
            }
        };

        Some(Self {
            strategy: combination.strategy(),
            buffer_size: combination.buffer_size(),
            mode,
            count: statistics.count(),
            score,
            std_dev,
            min,
            max,
            unit: mode.unit_label(unit),
        })
    }

    /// Get the strategy.
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the buffer size, `None` for strategies that ignore it.
    pub const fn buffer_size(&self) -> Option<BufferSize> {
        self.buffer_size
    }

    /// Get the benchmark mode.
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of timed copies behind the score.
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Mean time per copy, or copies per unit in throughput mode.
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Standard deviation of the score, with at least two samples.
    pub const fn std_dev(&self) -> Option<f64> {
        self.std_dev
    }

    /// Lowest per-copy value, in the score's unit.
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Highest per-copy value, in the score's unit.
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Unit of the score, such as `ms/op`.
    pub fn unit(&self) -> &str {
        &self.unit
    }
}

/// Rows for every combination exercised, in run order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    results: Box<[BenchmarkResult]>,
}

impl Report {
    /// Scores merged measurements with the run's mode and unit.
    pub fn new(options: &Options, measurements: &[Measurement]) -> Self {
        let results = measurements
            .iter()
            .filter_map(|measurement| {
                BenchmarkResult::new(
                    measurement.combination,
                    &measurement.statistics,
                    options.mode(),
                    options.time_unit(),
                )
            })
            .collect();

        Self { results }
    }

    /// Get the rows.
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Finds the row for a strategy and buffer size.
    pub fn get(
        &self,
        strategy: Strategy,
        buffer_size: Option<BufferSize>,
    ) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .find(|row| row.strategy == strategy && row.buffer_size == buffer_size)
    }

    /// Renders the rows in the given format.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` or `Error::Csv` if serialization fails.
    pub fn render(&self, format: Format) -> Result<String, Error> {
        match format {
            Format::Text => Ok(self.to_text()),
            Format::Json => self.to_json(),
            Format::Csv => self.to_csv(),
        }
    }

    /// Aligned plain text table.
    pub fn to_text(&self) -> String {
        let strategy_width = self
            .results
            .iter()
            .map(|row| row.strategy.to_string().len())
            .chain(["Benchmark".len()])
            .max()
            .unwrap_or_default();

        let mut text = format!(
            "{:<strategy_width$}  {:>10}  {:>5}  {:>8}  {:>12}  {:>12}  Units\n",
            "Benchmark", "BufferSize", "Mode", "Cnt", "Score", "StdDev"
        );

        for row in &*self.results {
            let std_dev = row
                .std_dev
                .map_or_else(|| "-".to_string(), |sd| format!("{sd:.3}"));

            text.push_str(&format!(
                "{:<strategy_width$}  {:>10}  {:>5}  {:>8}  {:>12.3}  {:>12}  {}\n",
                row.strategy.to_string(),
                BufferSize::display_optional(row.buffer_size),
                row.mode.to_string(),
                row.count,
                row.score,
                std_dev,
                row.unit
            ));
        }

        text
    }

    /// JSON array of rows.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.results)?)
    }

    /// CSV with a header row.
    ///
    /// # Errors
    ///
    /// Returns `Error::Csv` if serialization fails.
    pub fn to_csv(&self) -> Result<String, Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &*self.results {
            writer.serialize(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| Error::Csv(csv::Error::from(err.into_error())))?;

        String::from_utf8(bytes)
            .map_err(|err| Error::Config(format!("CSV output is not UTF-8: {err}")))
    }
}
