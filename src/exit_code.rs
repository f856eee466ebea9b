//! Exit codes following Unix sysexits.h conventions.

use std::{io, process};

use clap::error::ErrorKind as ClapErrorKind;

use crate::error::Error as CopyBenchError;

/// Exit codes following Unix sysexits.h convention
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ExitCode {
    /// Successful termination
    Success = 0,
    /// General failure
    Failure = 1,
    /// Command line usage error
    Usage = 64,
    /// Data format error
    Data = 65,
    /// Cannot open input
    NoInput = 66,
    /// Internal software error
    Software = 70,
    /// Cannot create output
    CannotCreate = 73,
    /// I/O error
    Io = 74,
    /// Permission denied
    NoPermission = 77,
    /// Configuration error
    Config = 78,
}

impl ExitCode {
    /// Maps an application error to its exit code.
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self::from(err)
    }

    /// Recognizes a failing process status as one of these codes.
    pub const fn from_status(status: i32) -> Option<Self> {
        match status {
            1 => Some(Self::Failure),
            64 => Some(Self::Usage),
            65 => Some(Self::Data),
            66 => Some(Self::NoInput),
            70 => Some(Self::Software),
            73 => Some(Self::CannotCreate),
            74 => Some(Self::Io),
            77 => Some(Self::NoPermission),
            78 => Some(Self::Config),
            _ => None,
        }
    }
}

impl From<&io::Error> for ExitCode {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NoInput,
            io::ErrorKind::PermissionDenied => Self::NoPermission,
            io::ErrorKind::AlreadyExists => Self::CannotCreate,
            _ => Self::Io,
        }
    }
}

impl From<&clap::Error> for ExitCode {
    fn from(err: &clap::Error) -> Self {
        match err.kind() {
            // Successful `--help` or `--version` display
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => Self::Success,
            // Clap usage errors
            _ => Self::Usage,
        }
    }
}

impl From<&CopyBenchError> for ExitCode {
    fn from(err: &CopyBenchError) -> Self {
        match err {
            CopyBenchError::Usage(_) => Self::Usage,
            CopyBenchError::Config(_) => Self::Config,
            CopyBenchError::ByteCountMismatch { .. }
            | CopyBenchError::Json(_)
            | CopyBenchError::Csv(_) => Self::Data,
            CopyBenchError::Fork { .. } => Self::Software,
            CopyBenchError::ForkExit { code, .. } => *code,
            CopyBenchError::Io { source, .. } => Self::from(source),
        }
    }
}

impl From<&anyhow::Error> for ExitCode {
    fn from(err: &anyhow::Error) -> Self {
        err.downcast_ref::<io::Error>()
            .map(Self::from)
            .or_else(|| err.downcast_ref::<clap::Error>().map(Self::from))
            .or_else(|| err.downcast_ref::<CopyBenchError>().map(Self::from))
            .unwrap_or(Self::Failure)
    }
}

impl From<ExitCode> for u8 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(u8::from(code))
    }
}
