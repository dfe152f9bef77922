//! Coordinates into linear memory.
//!
//! A [`Region`] is just an `(offset, length)` pair. A [`View`] pins a
//! region to the growth epoch it was taken at, so reads through a view can
//! detect that the memory has since been reallocated.

/// A byte range `[ptr, ptr + len)` in linear memory.
///
/// Not an owning type: the bytes belong to the memory and are overwritten
/// by later calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Region {
    /// Start offset in bytes.
    pub ptr: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Region {
    /// Create a region.
    pub const fn new(ptr: usize, len: usize) -> Self {
        Self { ptr, len }
    }

    /// One past the last byte of the region, or `None` on overflow.
    pub fn checked_end(&self) -> Option<usize> {
        self.ptr.checked_add(self.len)
    }

    /// One past the last byte of the region.
    ///
    /// # Panics
    ///
    /// Panics if `ptr + len` overflows. Regions produced by
    /// [`LinearMemory`](crate::LinearMemory) never do.
    pub fn end(&self) -> usize {
        self.ptr + self.len
    }

    /// Whether the region covers zero bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A [`Region`] tagged with the memory epoch it was taken at.
///
/// Obtained from [`LinearMemory::view`](crate::LinearMemory::view) and read
/// back with [`LinearMemory::read`](crate::LinearMemory::read), which
/// rejects the view once the memory has grown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct View {
    region: Region,
    epoch: u64,
}

impl View {
    pub(crate) fn new(region: Region, epoch: u64) -> Self {
        Self { region, epoch }
    }

    /// The viewed region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// The growth epoch this view belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
