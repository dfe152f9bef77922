//! Linear memory error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during linear memory operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemoryError {
    /// Growing would exceed the configured maximum page count.
    GrowFailed {
        /// Page count before the failed growth.
        current_pages: usize,
        /// Number of additional pages requested.
        requested_pages: usize,
        /// Configured maximum page count.
        max_pages: usize,
    },
    /// The host allocator refused to provide the backing storage.
    HostAllocationFailed {
        /// Number of additional bytes requested from the allocator.
        bytes: usize,
    },
    /// An access fell outside the active memory.
    OutOfBounds {
        /// Start offset of the access.
        ptr: usize,
        /// Length of the access in bytes.
        len: usize,
        /// Active memory size in bytes at the time of the access.
        size: usize,
    },
    /// A [`View`](crate::View) taken before a growth event was used after it.
    StaleView {
        /// Epoch recorded in the view.
        view_epoch: u64,
        /// Current memory epoch.
        current_epoch: u64,
    },
    /// A [`MemoryConfig`](crate::MemoryConfig) failed validation.
    InvalidConfig {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl MemoryError {
    /// Whether this error came from a failed growth attempt.
    ///
    /// Growth failures leave the owning engine in an unknown state and are
    /// treated as fatal for it.
    pub fn is_growth_failure(&self) -> bool {
        matches!(
            self,
            Self::GrowFailed { .. } | Self::HostAllocationFailed { .. }
        )
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GrowFailed {
                current_pages,
                requested_pages,
                max_pages,
            } => {
                write!(
                    f,
                    "memory grow failed: {current_pages} pages + {requested_pages} requested, \
                     maximum {max_pages} pages"
                )
            }
            Self::HostAllocationFailed { bytes } => {
                write!(f, "host allocation of {bytes} bytes failed")
            }
            Self::OutOfBounds { ptr, len, size } => {
                write!(
                    f,
                    "out of bounds access: [{ptr}, {ptr}+{len}) beyond memory size {size}"
                )
            }
            Self::StaleView {
                view_epoch,
                current_epoch,
            } => {
                write!(
                    f,
                    "stale view: taken at epoch {view_epoch}, memory is at epoch {current_epoch}"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid memory config: {reason}"),
        }
    }
}

impl Error for MemoryError {}
