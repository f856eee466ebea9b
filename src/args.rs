use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use copy_bench::{BufferSizes, Format, Isolation, Mode, Options, Strategy, Threads, TimeUnit};

/// Default source file, relative to the working directory.
const DEFAULT_SOURCE: &str = "testfiles/input-1000KB.jpg";

/// Default target file, relative to the working directory.
const DEFAULT_TARGET: &str = "testfiles/output-1000KB.jpg";

#[derive(Debug, Parser)]
#[command(about, version)]
pub(crate) struct Args {
    /// File to copy from.
    #[arg(default_value = DEFAULT_SOURCE, value_name = "SOURCE")]
    pub(crate) source: PathBuf,

    /// File to copy to, replaced on every copy.
    #[arg(default_value = DEFAULT_TARGET, value_name = "TARGET")]
    pub(crate) target: PathBuf,

    /// Strategies to benchmark, comma-delimited [default: all].
    #[arg(short, long, value_enum, value_delimiter = ',', value_name = "STRATEGIES")]
    strategies: Option<Vec<Strategy>>,

    /// Buffer sizes in bytes, comma-delimited [default: 1024,4096,16384,65536].
    #[arg(short, long, value_name = "SIZES")]
    buffer_sizes: Option<BufferSizes>,

    /// Warm-up iterations per combination [default: 2].
    #[arg(long, value_name = "COUNT")]
    warmup_iterations: Option<u32>,

    /// Seconds per warm-up iteration [default: 5].
    #[arg(long, value_parser = parse_seconds, value_name = "SECONDS")]
    warmup_time: Option<Duration>,

    /// Measurement iterations per combination [default: 5].
    #[arg(short = 'i', long, value_name = "COUNT")]
    measurement_iterations: Option<u32>,

    /// Seconds per measurement iteration [default: 10].
    #[arg(long, value_parser = parse_seconds, value_name = "SECONDS")]
    measurement_time: Option<Duration>,

    /// Forks; zero runs a single pass in this process [default: 1].
    #[arg(short, long, value_name = "COUNT")]
    forks: Option<u16>,

    /// Invoking threads; only one is supported.
    #[arg(short, long, default_value_t = 1, value_name = "COUNT")]
    threads: u16,

    /// How forks are isolated from each other.
    #[arg(long, default_value_t, value_enum, value_name = "ISOLATION")]
    isolation: Isolation,

    /// Seconds to pause between in-process forks [default: 0.5].
    #[arg(long, value_parser = parse_seconds, value_name = "SECONDS")]
    cooldown: Option<Duration>,

    /// Benchmark mode.
    #[arg(short, long, default_value_t, value_enum, value_name = "MODE")]
    mode: Mode,

    /// Unit of reported scores [default: ms].
    #[arg(short = 'u', long, value_enum, value_name = "UNIT")]
    time_unit: Option<TimeUnit>,

    /// Output format.
    #[arg(short = 'F', long, default_value_t, value_enum, value_name = "FORMAT")]
    pub(crate) format: Format,

    /// Write output to file rather than stdout.
    #[arg(short, long, value_name = "PATH")]
    pub(crate) output: Option<PathBuf>,

    /// Print verbose details.
    #[arg(short = 'v', long)]
    pub(crate) verbose: bool,

    /// Write a deterministic source file of this many bytes first.
    #[arg(long, value_name = "BYTES")]
    pub(crate) create_source: Option<u64>,

    /// Run as a fork child with the given JSON fork spec.
    #[arg(long, hide = true, value_name = "JSON")]
    pub(crate) fork_child: Option<String>,
}

impl Args {
    /// Layers command-line flags over the environment-derived options.
    pub(crate) fn get_options(&self) -> Options {
        let base = Options::from_env();

        let mut options = base
            .clone()
            .with_warmup(
                base.warmup()
                    .with_iterations(self.warmup_iterations.unwrap_or(base.warmup().iterations()))
                    .with_time(self.warmup_time.unwrap_or(base.warmup().time())),
            )
            .with_measurement(
                base.measurement()
                    .with_iterations(
                        self.measurement_iterations
                            .unwrap_or(base.measurement().iterations()),
                    )
                    .with_time(self.measurement_time.unwrap_or(base.measurement().time())),
            )
            .with_forks(self.forks.unwrap_or(base.forks()))
            .with_isolation(self.isolation)
            .with_cooldown(self.cooldown.unwrap_or(base.cooldown()))
            .with_threads(Threads::new(self.threads))
            .with_mode(self.mode)
            .with_time_unit(self.time_unit.unwrap_or(base.time_unit()))
            .with_format(self.format);

        if let Some(strategies) = &self.strategies {
            options = options.with_strategies(strategies.iter().copied());
        }

        if let Some(buffer_sizes) = &self.buffer_sizes {
            options = options.with_buffer_sizes(buffer_sizes.clone());
        }

        options
    }
}

/// Parses a non-negative, possibly fractional, number of seconds.
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{s}` is not a number of seconds"))?;

    Duration::try_from_secs_f64(seconds).map_err(|err| format!("`{s}`: {err}"))
}

