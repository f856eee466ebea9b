//! Buffer size parameter and the sweep of sizes to benchmark.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Chunk size in bytes for one read/write call of a loop strategy.
///
/// # Examples
///
/// ```
/// use copy_bench::BufferSize;
///
/// let size: BufferSize = "4096".parse().unwrap();
/// assert_eq!(size.get(), 4096);
/// assert!("0".parse::<BufferSize>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct BufferSize(usize);

impl BufferSize {
    /// Fallback chunk size when a loop strategy is given none, 8KB.
    pub const DEFAULT: usize = 8 * 1024;

    /// Creates a buffer size, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `bytes` is zero.
    pub fn new(bytes: usize) -> Result<Self, Error> {
        if bytes == 0 {
            return Err(Error::Config("buffer size must be greater than zero".into()));
        }

        Ok(Self(bytes))
    }

    /// Get the size in bytes.
    pub const fn get(self) -> usize {
        self.0
    }

    /// Formats an optional buffer size, `-` when absent.
    pub fn display_optional(size: Option<Self>) -> String {
        size.map_or_else(|| "-".to_string(), |size| size.to_string())
    }
}

impl Default for BufferSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl Display for BufferSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for BufferSize {
    type Error = Error;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl From<BufferSize> for usize {
    fn from(size: BufferSize) -> Self {
        size.0
    }
}

impl FromStr for BufferSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s
            .trim()
            .parse::<usize>()
            .map_err(|_| Error::Config(format!("invalid buffer size: {s:?}")))?;

        Self::new(bytes)
    }
}

/// The ordered, deduplicated set of buffer sizes swept for each loop strategy.
///
/// # Examples
///
/// ```
/// use copy_bench::BufferSizes;
///
/// let sizes = BufferSizes::default();
/// let bytes: Vec<usize> = sizes.iter().map(|size| size.get()).collect();
/// assert_eq!(bytes, [1024, 4096, 16384, 65536]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BufferSizes(Box<[BufferSize]>);

impl BufferSizes {
    /// The 1KB, 4KB, 16KB and 64KB sweep.
    pub const DEFAULT_SWEEP: [usize; 4] = [1024, 4096, 16_384, 65_536];

    /// Creates a sweep from sizes, sorting and removing duplicates.
    pub fn new(sizes: impl IntoIterator<Item = BufferSize>) -> Self {
        let mut sizes: Vec<_> = sizes.into_iter().collect();
        sizes.sort_unstable();
        sizes.dedup();

        Self(sizes.into_boxed_slice())
    }

    /// Get the sizes as a slice.
    pub fn as_slice(&self) -> &[BufferSize] {
        &self.0
    }

    /// Iterate over the sizes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = BufferSize> + '_ {
        self.0.iter().copied()
    }

    /// Number of sizes in the sweep.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sweep is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for BufferSizes {
    fn default() -> Self {
        Self(Self::DEFAULT_SWEEP.into_iter().map(BufferSize).collect())
    }
}

impl Display for BufferSizes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sizes: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", sizes.join(","))
    }
}

impl FromStr for BufferSizes {
    type Err = Error;

    /// Parses a comma-separated list such as `1024,4096`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sizes = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<BufferSize>, _>>()?;

        Ok(Self::new(sizes))
    }
}

impl From<Vec<BufferSize>> for BufferSizes {
    fn from(sizes: Vec<BufferSize>) -> Self {
        Self::new(sizes)
    }
}
