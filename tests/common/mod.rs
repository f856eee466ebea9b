//! Shared fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use copy_bench::{Isolation, Options, Phase, fixture};
use fake::{Fake, Faker};
use tempfile::TempDir;

/// Length of the default benchmark source.
pub const SOURCE_LEN: u64 = 1_024_000;

/// A temporary directory holding a source file and a target path.
#[derive(Debug)]
pub struct Workspace {
    pub dir: TempDir,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Workspace {
    /// Creates a workspace whose source holds `bytes`.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let source = dir.path().join("input.bin");
        let target = dir.path().join("output.bin");
        fs::write(&source, bytes).expect("write source");

        Self {
            dir,
            source,
            target,
        }
    }

    /// Creates a workspace whose source is `len` random bytes.
    pub fn with_random(len: usize) -> Self {
        Self::with_bytes(&random_bytes(len))
    }

    /// Creates a workspace whose source is a `len`-byte fixture.
    pub fn with_fixture(len: u64) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let source = dir.path().join("input-1000KB.jpg");
        let target = dir.path().join("output-1000KB.jpg");
        fixture::create(&source, len).expect("create fixture");

        Self {
            dir,
            source,
            target,
        }
    }

    /// Reads the source contents.
    pub fn source_bytes(&self) -> Vec<u8> {
        fs::read(&self.source).expect("read source")
    }

    /// Reads the target contents.
    pub fn target_bytes(&self) -> Vec<u8> {
        fs::read(&self.target).expect("read target")
    }

    /// A path inside the workspace.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Random bytes of the given length.
pub fn random_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|_| Faker.fake::<u8>()).collect()
}

/// Options that run every combination once per iteration, in this process.
pub fn quick_options() -> Options {
    Options::default()
        .with_warmup(Phase::new(1, Duration::ZERO))
        .with_measurement(Phase::new(2, Duration::ZERO))
        .with_isolation(Isolation::InProcess)
        .with_cooldown(Duration::ZERO)
}

/// Whether two files hold the same bytes.
pub fn same_contents(left: &Path, right: &Path) -> bool {
    fs::read(left).expect("read left") == fs::read(right).expect("read right")
}
