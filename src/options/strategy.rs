//! Copy strategy selection.

use std::path::Path;

use clap::ValueEnum;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};

use crate::copy;
use crate::error::Error;
use crate::options::buffer_size::BufferSize;

/// Determines how bytes move from the source file to the target file.
///
/// Performance characteristics:
/// - **Streams**: Unbuffered read/write loop on raw file handles. One system call per
///   chunk in each direction, so small buffers pay the most per-call overhead.
///
/// - **BufferedStreams**: The same loop with the reader and writer each wrapped in an
///   in-process buffer of the configured size.
///
/// - **InChannelOutBufferedStream**: Reads through a positional channel, writes through
///   a buffered stream. Measures the cost of mixing both abstractions.
///
/// - **ChannelWithDirectBuffer**: Channel to channel through a single buffer mapped
///   outside the heap and reused for the whole copy.
///
/// - **ChannelTransferFrom** and **ChannelTransferTo**: Hand the whole byte range to the
///   kernel in one call. The kernel picks its own chunking so the buffer size is ignored.
///
/// # Examples
///
/// ```
/// use copy_bench::Strategy;
///
/// assert_eq!(Strategy::default(), Strategy::Streams);
/// assert_eq!(Strategy::ChannelTransferTo.to_string(), "channel-transfer-to");
/// assert!(!Strategy::ChannelTransferFrom.uses_buffer());
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Unbuffered read/write loop on raw file handles
    #[default]
    Streams,

    /// Read/write loop through in-process buffered readers and writers
    BufferedStreams,

    /// Channel reads into a heap buffer, buffered stream writes
    InChannelOutBufferedStream,

    /// Channel to channel through one reusable off-heap buffer
    ChannelWithDirectBuffer,

    /// Target channel pulls the whole range from the source in the kernel
    ChannelTransferFrom,

    /// Source channel pushes the whole range to the target in the kernel
    ChannelTransferTo,
}

impl Strategy {
    /// Every strategy, in the order they are benchmarked.
    pub const ALL: [Self; 6] = [
        Self::Streams,
        Self::BufferedStreams,
        Self::InChannelOutBufferedStream,
        Self::ChannelWithDirectBuffer,
        Self::ChannelTransferFrom,
        Self::ChannelTransferTo,
    ];

    /// Whether the strategy chunks the copy itself and so consumes a buffer size.
    pub const fn uses_buffer(self) -> bool {
        !matches!(self, Self::ChannelTransferFrom | Self::ChannelTransferTo)
    }

    /// Copies `source` to `target`, returning the number of bytes copied.
    ///
    /// The target is created or truncated first. Strategies that chunk the copy use
    /// `buffer_size`, falling back to [`BufferSize::default`] when none is given.
    /// Transfer strategies ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if either file cannot be opened, read, written or flushed.
    /// A failed copy is never retried.
    pub fn copy(
        self,
        source: &Path,
        target: &Path,
        buffer_size: Option<BufferSize>,
    ) -> Result<u64, Error> {
        let buffer_size = buffer_size.unwrap_or_default();

        match self {
            Self::Streams => copy::stream::copy_using_streams(source, target, buffer_size),
            Self::BufferedStreams => {
                copy::stream::copy_using_buffered_streams(source, target, buffer_size)
            }
            Self::InChannelOutBufferedStream => {
                copy::channel::copy_using_in_channel_out_buffered_stream(
                    source,
                    target,
                    buffer_size,
                )
            }
            Self::ChannelWithDirectBuffer => {
                copy::channel::copy_using_channel_with_direct_buffer(source, target, buffer_size)
            }
            Self::ChannelTransferFrom => copy::transfer::copy_using_transfer_from(source, target),
            Self::ChannelTransferTo => copy::transfer::copy_using_transfer_to(source, target),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Streams => write!(f, "streams"),
            Self::BufferedStreams => write!(f, "buffered-streams"),
            Self::InChannelOutBufferedStream => write!(f, "in-channel-out-buffered-stream"),
            Self::ChannelWithDirectBuffer => write!(f, "channel-with-direct-buffer"),
            Self::ChannelTransferFrom => write!(f, "channel-transfer-from"),
            Self::ChannelTransferTo => write!(f, "channel-transfer-to"),
        }
    }
}
