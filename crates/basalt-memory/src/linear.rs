//! The growable linear memory itself.
//!
//! [`LinearMemory`] is a `Vec<u8>` whose length is always a whole number of
//! pages. It never shrinks. Every growth event bumps the epoch so that
//! outstanding [`View`]s can be detected as stale.

use tracing::trace;

use crate::config::MemoryConfig;
use crate::error::MemoryError;
use crate::region::{Region, View};
use crate::PAGE_SIZE;

/// A contiguous, byte-addressable, grow-only memory region.
///
/// All offsets are byte offsets from the start of the memory. Accessors
/// are bounds-checked against the active size and return
/// [`MemoryError::OutOfBounds`] instead of panicking.
#[derive(Debug)]
pub struct LinearMemory {
    /// Backing storage. `data.len()` is always a multiple of `PAGE_SIZE`.
    data: Vec<u8>,
    max_pages: usize,
    /// Incremented on every successful growth.
    epoch: u64,
    /// Total pages added since creation.
    pages_grown: u64,
}

impl LinearMemory {
    /// Create a zero-filled memory with `config.initial_pages` pages.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidConfig`] if the config fails
    /// validation, or [`MemoryError::HostAllocationFailed`] if the initial
    /// pages cannot be allocated.
    pub fn new(config: &MemoryConfig) -> Result<Self, MemoryError> {
        config.validate()?;
        let bytes = config.initial_pages * PAGE_SIZE;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| MemoryError::HostAllocationFailed { bytes })?;
        data.resize(bytes, 0);
        Ok(Self {
            data,
            max_pages: config.max_pages,
            epoch: 0,
            pages_grown: 0,
        })
    }

    /// Current size in pages.
    pub fn page_count(&self) -> usize {
        self.data.len() / PAGE_SIZE
    }

    /// Current size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Configured maximum page count.
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Current growth epoch. Starts at 0, +1 per growth event.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Total number of pages added by growth since creation.
    pub fn pages_grown(&self) -> u64 {
        self.pages_grown
    }

    /// Grow the memory by `delta` pages.
    ///
    /// Returns the page count before growth. New pages are zero-filled.
    /// `grow(0)` is a no-op and does not bump the epoch.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::GrowFailed`] if the new size would exceed
    /// `max_pages`, or [`MemoryError::HostAllocationFailed`] if the
    /// allocator cannot provide the storage. The memory is unchanged on
    /// error.
    pub fn grow(&mut self, delta: usize) -> Result<usize, MemoryError> {
        let current = self.page_count();
        let fits = current
            .checked_add(delta)
            .is_some_and(|new| new <= self.max_pages);
        if !fits {
            return Err(MemoryError::GrowFailed {
                current_pages: current,
                requested_pages: delta,
                max_pages: self.max_pages,
            });
        }
        if delta == 0 {
            return Ok(current);
        }

        let additional = delta * PAGE_SIZE;
        self.data
            .try_reserve_exact(additional)
            .map_err(|_| MemoryError::HostAllocationFailed { bytes: additional })?;
        self.data.resize(self.data.len() + additional, 0);
        self.epoch += 1;
        self.pages_grown += delta as u64;
        trace!(
            from_pages = current,
            to_pages = current + delta,
            epoch = self.epoch,
            "linear memory grew"
        );
        Ok(current)
    }

    /// Make `[ptr, ptr + target_len)` addressable, growing if needed.
    ///
    /// If fewer than `target_len` bytes are available from `ptr`, grows by
    /// `ceil((target_len - available) / PAGE_SIZE)` pages. Returns the
    /// number of pages grown (0 if the range already fit).
    ///
    /// Any growth invalidates all outstanding [`View`]s.
    ///
    /// # Errors
    ///
    /// Same as [`grow`](Self::grow). An `ptr + target_len` overflow is
    /// reported as [`MemoryError::GrowFailed`].
    pub fn ensure(&mut self, ptr: usize, target_len: usize) -> Result<usize, MemoryError> {
        let size = self.size();
        let Some(end) = ptr.checked_add(target_len) else {
            return Err(MemoryError::GrowFailed {
                current_pages: self.page_count(),
                requested_pages: target_len.div_ceil(PAGE_SIZE),
                max_pages: self.max_pages,
            });
        };
        if end <= size {
            return Ok(0);
        }
        let pages = (end - size).div_ceil(PAGE_SIZE);
        self.grow(pages)?;
        Ok(pages)
    }

    fn check(&self, ptr: usize, len: usize) -> Result<std::ops::Range<usize>, MemoryError> {
        match ptr.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(ptr..end),
            _ => Err(MemoryError::OutOfBounds {
                ptr,
                len,
                size: self.data.len(),
            }),
        }
    }

    /// Shared slice of `[ptr, ptr + len)`.
    pub fn slice(&self, ptr: usize, len: usize) -> Result<&[u8], MemoryError> {
        let range = self.check(ptr, len)?;
        Ok(&self.data[range])
    }

    /// Mutable slice of `[ptr, ptr + len)`.
    pub fn slice_mut(&mut self, ptr: usize, len: usize) -> Result<&mut [u8], MemoryError> {
        let range = self.check(ptr, len)?;
        Ok(&mut self.data[range])
    }

    /// Read one byte.
    pub fn read_u8(&self, ptr: usize) -> Result<u8, MemoryError> {
        self.data.get(ptr).copied().ok_or(MemoryError::OutOfBounds {
            ptr,
            len: 1,
            size: self.data.len(),
        })
    }

    /// Write one byte.
    pub fn write_u8(&mut self, ptr: usize, value: u8) -> Result<(), MemoryError> {
        let size = self.data.len();
        let slot = self
            .data
            .get_mut(ptr)
            .ok_or(MemoryError::OutOfBounds { ptr, len: 1, size })?;
        *slot = value;
        Ok(())
    }

    /// Copy `bytes` into memory starting at `ptr`.
    pub fn write_bytes(&mut self, ptr: usize, bytes: &[u8]) -> Result<(), MemoryError> {
        self.slice_mut(ptr, bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Take an epoch-tagged view of `region`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfBounds`] if the region is not inside the
    /// active memory.
    pub fn view(&self, region: Region) -> Result<View, MemoryError> {
        self.check(region.ptr, region.len)?;
        Ok(View::new(region, self.epoch))
    }

    /// Read the bytes behind a view.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::StaleView`] if the memory has grown since the
    /// view was taken.
    pub fn read(&self, view: &View) -> Result<&[u8], MemoryError> {
        if view.epoch() != self.epoch {
            return Err(MemoryError::StaleView {
                view_epoch: view.epoch(),
                current_epoch: self.epoch,
            });
        }
        let region = view.region();
        self.slice(region.ptr, region.len)
    }

    /// The whole active memory.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The whole active memory, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(initial: usize, max: usize) -> LinearMemory {
        LinearMemory::new(&MemoryConfig::new(initial, max)).unwrap()
    }

    #[test]
    fn new_memory_is_zeroed_and_page_sized() {
        let mem = small(2, 8);
        assert_eq!(mem.page_count(), 2);
        assert_eq!(mem.size(), 2 * PAGE_SIZE);
        assert!(mem.as_slice().iter().all(|&b| b == 0));
        assert_eq!(mem.epoch(), 0);
    }

    #[test]
    fn invalid_config_rejected() {
        let result = LinearMemory::new(&MemoryConfig::new(3, 2));
        assert!(matches!(result, Err(MemoryError::InvalidConfig { .. })));
    }

    #[test]
    fn ensure_within_bounds_does_not_grow() {
        let mut mem = small(1, 4);
        assert_eq!(mem.ensure(0, PAGE_SIZE).unwrap(), 0);
        assert_eq!(mem.ensure(100, 200).unwrap(), 0);
        assert_eq!(mem.page_count(), 1);
        assert_eq!(mem.epoch(), 0);
    }

    #[test]
    fn ensure_grows_by_whole_pages() {
        let mut mem = small(1, 8);
        // One byte past the end needs exactly one page.
        assert_eq!(mem.ensure(PAGE_SIZE - 10, 11).unwrap(), 1);
        assert_eq!(mem.page_count(), 2);
        // 100_000 bytes from the start of page 2 needs two more pages.
        assert_eq!(mem.ensure(2 * PAGE_SIZE, 100_000).unwrap(), 2);
        assert_eq!(mem.page_count(), 4);
        assert_eq!(mem.pages_grown(), 3);
    }

    #[test]
    fn ensure_past_current_end() {
        // A pointer beyond the current size still grows enough to cover it.
        let mut mem = small(1, 8);
        mem.ensure(3 * PAGE_SIZE, 1).unwrap();
        assert_eq!(mem.page_count(), 4);
    }

    #[test]
    fn grow_beyond_max_fails_and_leaves_memory_unchanged() {
        let mut mem = small(1, 2);
        let err = mem.ensure(0, 3 * PAGE_SIZE).unwrap_err();
        assert_eq!(
            err,
            MemoryError::GrowFailed {
                current_pages: 1,
                requested_pages: 2,
                max_pages: 2,
            }
        );
        assert!(err.is_growth_failure());
        assert_eq!(mem.page_count(), 1);
        assert_eq!(mem.epoch(), 0);
    }

    #[test]
    fn ensure_overflow_is_grow_failure() {
        let mut mem = small(1, 2);
        let err = mem.ensure(usize::MAX, 2).unwrap_err();
        assert!(err.is_growth_failure());
    }

    #[test]
    fn grow_returns_previous_page_count() {
        let mut mem = small(2, 8);
        assert_eq!(mem.grow(3).unwrap(), 2);
        assert_eq!(mem.page_count(), 5);
        assert_eq!(mem.grow(0).unwrap(), 5);
        assert_eq!(mem.epoch(), 1);
    }

    #[test]
    fn growth_preserves_existing_bytes() {
        let mut mem = small(1, 4);
        mem.write_bytes(PAGE_SIZE - 3, b"abc").unwrap();
        mem.grow(1).unwrap();
        assert_eq!(mem.slice(PAGE_SIZE - 3, 3).unwrap(), b"abc");
        assert_eq!(mem.read_u8(PAGE_SIZE).unwrap(), 0);
    }

    #[test]
    fn view_goes_stale_after_growth() {
        let mut mem = small(1, 4);
        mem.write_bytes(0, b"hello").unwrap();
        let view = mem.view(Region::new(0, 5)).unwrap();
        assert_eq!(mem.read(&view).unwrap(), b"hello");

        mem.ensure(0, 2 * PAGE_SIZE).unwrap();
        assert_eq!(
            mem.read(&view),
            Err(MemoryError::StaleView {
                view_epoch: 0,
                current_epoch: 1,
            })
        );

        // Re-acquiring the view after growth works.
        let fresh = mem.view(view.region()).unwrap();
        assert_eq!(mem.read(&fresh).unwrap(), b"hello");
    }

    #[test]
    fn view_survives_non_growing_ensure() {
        let mut mem = small(1, 4);
        let view = mem.view(Region::new(0, 4)).unwrap();
        mem.ensure(0, 16).unwrap();
        assert!(mem.read(&view).is_ok());
    }

    #[test]
    fn out_of_bounds_accesses_are_errors() {
        let mut mem = small(1, 1);
        assert!(matches!(
            mem.slice(PAGE_SIZE - 1, 2),
            Err(MemoryError::OutOfBounds { .. })
        ));
        assert!(mem.read_u8(PAGE_SIZE).is_err());
        assert!(mem.write_u8(PAGE_SIZE, 1).is_err());
        assert!(mem.write_bytes(PAGE_SIZE - 1, b"xy").is_err());
        assert!(mem.view(Region::new(PAGE_SIZE, 1)).is_err());
        assert!(mem.slice(usize::MAX, 2).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ensure_grows_minimally(
                initial in 1usize..4,
                ptr in 0usize..(6 * PAGE_SIZE),
                len in 0usize..(4 * PAGE_SIZE),
            ) {
                let mut mem = small(initial, 16);
                let before = mem.page_count();
                let grown = mem.ensure(ptr, len).unwrap();

                prop_assert!(mem.size() >= ptr + len);
                prop_assert_eq!(mem.size() % PAGE_SIZE, 0);
                prop_assert_eq!(mem.page_count(), before + grown);
                if grown > 0 {
                    // One page fewer would not have been enough.
                    prop_assert!(mem.size() - PAGE_SIZE < ptr + len);
                }
            }
        }
    }
}
