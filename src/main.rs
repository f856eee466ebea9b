//! `copy-bench` measures how long different file copy strategies take.

pub(crate) mod args;

use std::{path::Path, process};

use anyhow::Result;
use args::Args;
use clap::Parser;
use copy_bench::{
    CopyBenchError, ExitCode, Harness, Output, Verbose, copy, fixture,
    harness::fork::{self, ForkSpec},
};

fn main() -> process::ExitCode {
    match run() {
        Ok(()) => ExitCode::Success.into(),
        Err(err) => {
            match err.downcast_ref::<clap::Error>() {
                // Help and version go to stdout, usage errors to stderr
                Some(clap_err) => {
                    clap_err.print().ok();
                }
                None => eprintln!("copy-bench: {err:#}"),
            }

            ExitCode::from_error(&err).into()
        }
    }
}

fn run() -> Result<()> {
    let args = Args::try_parse()?;

    if let Some(json) = &args.fork_child {
        return run_fork_child(json);
    }

    if let Some(path) = args
        .output
        .as_deref()
        .filter(|path| overwrites(path, &args.source) || overwrites(path, &args.target))
    {
        return Err(CopyBenchError::Usage(format!(
            "report output would overwrite a benchmark file: {}",
            path.display()
        ))
        .into());
    }

    if let Some(len) = args.create_source {
        fixture::create(&args.source, len)?;
    }

    let options = args.get_options();
    let harness = Harness::new(&options, &args.source, &args.target)?;
    let mut output = Output::new(args.output.as_deref())?;

    let mut verbose = if args.verbose {
        Verbose::stderr(args.format)
    } else {
        Verbose::disabled()
    };

    let report = harness.run(&mut verbose)?;
    output.write_report(&report, args.format)
}

/// Whether writing the report to `output` would clobber `file`.
fn overwrites(output: &Path, file: &Path) -> bool {
    output == file || copy::is_same_file(output, file)
}

/// Runs one fork and prints its measurements as JSON for the parent.
fn run_fork_child(json: &str) -> Result<()> {
    let spec: ForkSpec = serde_json::from_str(json).map_err(CopyBenchError::from)?;
    let result = fork::run_child(&spec)?;
    let json = serde_json::to_string(&result).map_err(CopyBenchError::from)?;

    let mut output = Output::stdout();
    output.write_chunk(&json)?;
    output.flush()
}
