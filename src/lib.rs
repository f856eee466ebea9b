//! Measures the wall-clock time of copying one file with different I/O strategies.
//!
//! `copy-bench` copies a fixed source file to a target file over and over, once per
//! invocation, and reports the average time a copy takes. Six strategies are compared,
//! from plain read/write loops to whole-range kernel transfers, and the loop strategies
//! are swept across several buffer sizes.
//!
//! Every copy is validated: a strategy that reports a byte count different from the
//! source length aborts the run.
//!
//! ## Module structure
//!
//! - `copy/`: The copy strategies and the I/O primitives they share
//! - `error.rs`: Structured error types
//! - `exit_code.rs`: Exit code definitions and handling
//! - `fixture.rs`: Deterministic source files
//! - `harness/`: Warm-up, measurement, forks and statistics
//! - `options/`: Configuration of a run
//! - `output.rs`: Writing to stdout, stderr or a file
//! - `report.rs`: Scored results and their formats
//! - `verbose.rs`: Logging and diagnostic information
//!
//! # Options
//!
//! The [`Options`] struct configures a run:
//!
//! * [`Strategy`]: Which copy strategies run
//! * [`BufferSizes`]: The buffer sizes swept for loop strategies
//! * [`Phase`]: Warm-up and measurement iteration counts and lengths
//! * [`Isolation`]: Whether forks run in fresh processes
//! * [`Mode`] and [`TimeUnit`]: What a score measures and in which unit
//! * [`Format`]: Text, CSV or JSON results
//!
//! # Examples
//!
//! ```no_run
//! use copy_bench::{Harness, Isolation, Options, Phase, Strategy, Verbose};
//! use anyhow::Result;
//! use std::time::Duration;
//!
//! # fn example() -> Result<()> {
//! let options = Options::default()
//!     .with_strategies([Strategy::BufferedStreams])
//!     .with_warmup(Phase::new(1, Duration::from_millis(200)))
//!     .with_measurement(Phase::new(3, Duration::from_millis(500)))
//!     .with_isolation(Isolation::InProcess);
//!
//! let harness = Harness::new(&options, "input.bin", "output.bin")?;
//! let report = harness.run(&mut Verbose::disabled())?;
//!
//! for row in report.results() {
//!     println!("{:?} {:.3} {}", row.buffer_size(), row.score(), row.unit());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A single copy can also be made directly:
//!
//! ```no_run
//! use copy_bench::{BufferSize, Strategy};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), copy_bench::Error> {
//! let size = BufferSize::new(4096)?;
//! let copied = Strategy::ChannelWithDirectBuffer.copy(
//!     Path::new("input.bin"),
//!     Path::new("output.bin"),
//!     Some(size),
//! )?;
//! assert_eq!(copied, 1_024_000);
//! # Ok(())
//! # }
//! ```

pub mod copy;
pub mod error;
pub mod exit_code;
pub mod fixture;
pub mod harness;
pub mod options;
pub mod output;
pub mod report;
pub mod verbose;

pub use error::Error;
pub use error::Error as CopyBenchError;
pub use exit_code::ExitCode;
pub use harness::{Benchmark, Combination, Harness, Statistics};
pub use options::{
    Options,
    buffer_size::{BufferSize, BufferSizes},
    isolation::{Isolation, Threads},
    mode::{Mode, TimeUnit},
    phase::Phase,
    serialization::Format,
    strategy::Strategy,
};
pub use output::Output;
pub use report::{BenchmarkResult, Report};
pub use verbose::Verbose;
