//! Off-heap transfer buffer backed by an anonymous memory mapping.

use std::ops::{Deref, DerefMut};

use memmap2::MmapMut;

use crate::error::Error;
use crate::options::buffer_size::BufferSize;

/// A page-aligned buffer allocated outside the heap.
///
/// The mapping is owned by one copy and unmapped when the buffer is dropped, which
/// happens on every exit path of the copy, failures included.
#[derive(Debug)]
pub struct DirectBuffer {
    map: MmapMut,
}

impl DirectBuffer {
    /// Maps `size` bytes of zeroed anonymous memory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the operating system refuses the mapping.
    pub fn allocate(size: BufferSize) -> Result<Self, Error> {
        let map = MmapMut::map_anon(size.get()).map_err(|err| {
            Error::Config(format!("failed to map a {size} byte direct buffer: {err}"))
        })?;

        Ok(Self { map })
    }

    /// Capacity of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.map.len()
    }
}

impl Deref for DirectBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl DerefMut for DirectBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.map
    }
}
