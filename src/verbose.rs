//! Verbose logging of the run configuration and per-iteration progress.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::Output;
use crate::harness::{Benchmark, Combination, Statistics};
use crate::options::{
    Options,
    mode::{Mode, TimeUnit},
    serialization::Format,
};

/// Writes diagnostics to stderr when enabled, and nothing otherwise.
#[derive(Debug)]
pub struct Verbose {
    output: Option<Output>,
    format: Format,
}

impl Default for Verbose {
    /// Default verbose logger is disabled.
    fn default() -> Self {
        Self::disabled()
    }
}

/// Verbose data that can be serialized to both JSON and CSV.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerboseData<'a> {
    source: String,
    target: String,
    source_bytes: u64,
    strategies: String,
    buffer_sizes: String,
    warmup: String,
    measurement: String,
    forks: u16,
    isolation: String,
    threads: u16,
    mode: String,
    time_unit: &'a str,
}

impl<'a> VerboseData<'a> {
    /// Create from `Options` and the benchmark state.
    fn new(options: &'a Options, benchmark: &Benchmark) -> Self {
        let strategies: Vec<String> = options
            .strategies()
            .iter()
            .map(ToString::to_string)
            .collect();

        Self {
            source: benchmark.source().display().to_string(),
            target: benchmark.target().display().to_string(),
            source_bytes: benchmark.expected_len(),
            strategies: strategies.join(","),
            buffer_sizes: options.buffer_sizes().to_string(),
            warmup: options.warmup().to_string(),
            measurement: options.measurement().to_string(),
            forks: options.forks(),
            isolation: options.isolation().to_string(),
            threads: options.threads().count(),
            mode: options.mode().to_string(),
            time_unit: options.time_unit().abbreviation(),
        }
    }

    /// Get all fields as name-value pairs.
    fn field_pairs(&self) -> Vec<(&str, String)> {
        vec![
            ("source", self.source.clone()),
            ("target", self.target.clone()),
            ("source-bytes", self.source_bytes.to_string()),
            ("strategies", self.strategies.clone()),
            ("buffer-sizes", self.buffer_sizes.clone()),
            ("warmup", self.warmup.clone()),
            ("measurement", self.measurement.clone()),
            ("forks", self.forks.to_string()),
            ("isolation", self.isolation.clone()),
            ("threads", self.threads.to_string()),
            ("mode", self.mode.clone()),
            ("time-unit", self.time_unit.to_string()),
        ]
    }
}

impl Verbose {
    /// A logger that writes nothing.
    pub const fn disabled() -> Self {
        Self {
            output: None,
            format: Format::Text,
        }
    }

    /// A logger writing to stderr, configuration in `format`.
    pub fn stderr(format: Format) -> Self {
        Self::new(Output::stderr(), format)
    }

    /// A logger writing to any output.
    pub const fn new(output: Output, format: Format) -> Self {
        Self {
            output: Some(output),
            format,
        }
    }

    /// Whether anything is written.
    pub const fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    /// Writes the effective configuration of a run.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_config(&mut self, options: &Options, benchmark: &Benchmark) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let data = VerboseData::new(options, benchmark);

        match self.format {
            Format::Json => self.write_json(&data),
            Format::Csv => self.write_csv(&data),
            Format::Text => self.write_text(&data),
        }
    }

    /// Writes the fork header.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_fork(&mut self, index: u16, forks: u16) -> Result<()> {
        self.write_line(&format!("# Fork: {index} of {forks}"))
    }

    /// Writes the header of a combination.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_combination(&mut self, combination: &Combination) -> Result<()> {
        self.write_line(&format!("# Benchmark: {combination}"))
    }

    /// Writes the score of one finished iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_iteration(
        &mut self,
        label: &str,
        index: u32,
        stats: &Statistics,
        mode: Mode,
        unit: TimeUnit,
    ) -> Result<()> {
        let Some(mean) = stats.mean_nanos() else {
            return Ok(());
        };

        let score = match mode {
            Mode::AverageTime | Mode::SingleShotTime => unit.from_nanos(mean),
            Mode::Throughput => unit.nanos_per_unit() / mean.max(1.0),
        };

        self.write_line(&format!(
            "{label} {index:>3}: {score:.3} {} ({} copies)",
            mode.unit_label(unit),
            stats.count()
        ))
    }

    /// Writes verbose info in JSON format.
    fn write_json(&mut self, data: &VerboseData<'_>) -> Result<()> {
        let json = serde_json::to_string(data).context("failed to serialize configuration")?;

        self.write_line(&format!("{json}\n"))
    }

    /// Write verbose info in CSV format.
    fn write_csv(&mut self, data: &VerboseData<'_>) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let field_pairs = data.field_pairs();

        // Write headers directly from iterator
        writer.write_record(field_pairs.iter().map(|(name, _)| *name))?;

        // Write data values directly from iterator
        writer.write_record(field_pairs.iter().map(|(_, value)| value))?;

        let csv = String::from_utf8(writer.into_inner()?)
            .context("failed to convert CSV output to UTF-8")?;

        self.write_line(&csv)
    }

    /// Write verbose info in text format.
    fn write_text(&mut self, data: &VerboseData<'_>) -> Result<()> {
        data.field_pairs()
            .into_iter()
            .try_for_each(|(field_name, value)| self.write_line(&format!("{field_name} {value}")))?;

        self.write_line("")
    }

    /// Writes one line if enabled.
    fn write_line(&mut self, line: &str) -> Result<()> {
        match self.output.as_mut() {
            Some(output) => {
                output.write_chunk(line)?;
                output.write_chunk("\n")?;
                output.flush()
            }
            None => Ok(()),
        }
    }
}
