//! Process isolation: running a fork in a fresh copy of the executable.
//!
//! The parent serializes a [`ForkSpec`] to JSON and passes it after [`FORK_ARG`]. The
//! child runs every combination once via [`run_child`] and prints its [`ForkResult`] as
//! JSON on stdout. Progress lines go to the inherited stderr.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{Benchmark, ForkResult, Runner};
use crate::error::Error;
use crate::exit_code::ExitCode;
use crate::options::Options;
use crate::verbose::Verbose;

/// Hidden argument that switches the executable into fork-child mode.
pub const FORK_ARG: &str = "--fork-child";

/// Everything a child process needs to run one fork.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkSpec {
    /// One-based index of this fork.
    pub index: u16,
    /// Options of the run.
    pub options: Options,
    /// Benchmark state as set up by the parent.
    pub benchmark: Benchmark,
    /// Whether the child writes progress lines to stderr.
    pub verbose: bool,
}

/// Launches `program` as a fork child and waits for its result.
///
/// # Errors
///
/// Returns `Error::ForkExit` carrying the child's exit code if it failed with a known
/// one, and `Error::Fork` if it cannot be started, dies otherwise, or prints something
/// other than a fork result.
pub fn spawn(program: &Path, spec: &ForkSpec) -> Result<ForkResult, Error> {
    let index = spec.index;
    let json = serde_json::to_string(spec)?;

    let output = Command::new(program)
        .arg(FORK_ARG)
        .arg(json)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|err| Error::Fork {
            index,
            message: format!("failed to launch {}: {err}", program.display()),
        })?;

    if !output.status.success() {
        // A child that failed on its own reports why through a sysexits code.
        return Err(output.status.code().and_then(ExitCode::from_status).map_or_else(
            || Error::Fork {
                index,
                message: format!("child exited with {}", output.status),
            },
            |code| Error::ForkExit { index, code },
        ));
    }

    serde_json::from_slice(&output.stdout).map_err(|err| Error::Fork {
        index,
        message: format!("unreadable result from child: {err}"),
    })
}

/// Runs one fork inside a child process.
///
/// # Errors
///
/// Fails if the source changed since the parent set it up, or on any benchmark error.
pub fn run_child(spec: &ForkSpec) -> Result<ForkResult> {
    let mut verbose = if spec.verbose {
        Verbose::stderr(spec.options.format())
    } else {
        Verbose::disabled()
    };

    Runner::new(&spec.options, &spec.benchmark, &mut verbose).run()
}

/// Path of the running executable, used to launch fork children.
///
/// # Errors
///
/// Returns `Error::Fork` if the executable path cannot be determined.
pub fn current_program() -> Result<PathBuf, Error> {
    std::env::current_exe().map_err(|err| Error::Fork {
        index: 0,
        message: format!("cannot locate the running executable: {err}"),
    })
}
