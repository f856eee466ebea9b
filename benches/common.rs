//! Shared benchmark utilities.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use criterion::{Criterion, measurement::WallTime};
use fake::{Fake, Faker};
use tempfile::TempDir;

/// Length of the classic benchmark source, 1000KB.
pub const SOURCE_LEN: usize = 1_024_000;

/// A temporary source file with random contents and a target path beside it.
#[derive(Debug)]
pub struct Files {
    _dir: TempDir,
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Generate random bytes for a benchmark source.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|_| Faker.fake::<u8>()).collect()
}

/// Create a source of `len` random bytes.
///
/// # Panics
///
/// Panics if:
/// - Failed to create a temporary directory
/// - Failed to write the source file
#[must_use]
pub fn create_files(len: usize) -> Files {
    let dir = TempDir::new().expect("create temp dir");
    let source = dir.path().join("input.bin");
    let target = dir.path().join("output.bin");

    let mut file = std::fs::File::create(&source).expect("create source");
    file.write_all(&random_bytes(len)).expect("write source");
    file.flush().expect("flush source");

    Files {
        _dir: dir,
        source,
        target,
    }
}

/// Standard Criterion configuration.
#[must_use]
pub fn standard_criterion_config() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(20)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
}

/// Create named benchmark group.
pub fn create_bench_group<'a>(
    c: &'a mut Criterion,
    name: &str,
) -> criterion::BenchmarkGroup<'a, WallTime> {
    c.benchmark_group(name)
}
