//! Page-granular linear memory for the Basalt compiled codec engine.
//!
//! The engine works on a single contiguous byte region addressed by plain
//! offsets. The host drives it by placing input at an offset, asking the
//! engine to write output at another, and copying the result back out.
//! This crate owns that region and the bookkeeping around it.
//!
//! # Architecture
//!
//! ```text
//! LinearMemory
//! ├── Vec<u8> backing store (always a whole number of 64 KiB pages)
//! ├── epoch (bumped on every growth event)
//! └── MemoryConfig (initial / maximum page counts)
//!
//! Region { ptr, len }   plain coordinates, not owning
//! View   { region, epoch }   coordinates that go stale on growth
//! ```
//!
//! # Growth model
//!
//! Memory only grows, one page at a time or more, through
//! [`LinearMemory::ensure`] or [`LinearMemory::grow`]. Growth may move the
//! backing allocation, so every [`View`] taken before it is rejected
//! afterwards with [`MemoryError::StaleView`]. Borrowed slices cannot
//! outlive a growing call in the first place.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod linear;
pub mod region;

pub use config::MemoryConfig;
pub use error::MemoryError;
pub use linear::LinearMemory;
pub use region::{Region, View};

/// Size of one linear memory page in bytes (64 KiB).
pub const PAGE_SIZE: usize = 65_536;

/// Hard upper bound on the page count of any linear memory.
///
/// 65536 pages is the full 32-bit address space.
pub const MAX_PAGES_LIMIT: usize = 65_536;
