//! Linear memory configuration parameters.

use crate::error::MemoryError;
use crate::MAX_PAGES_LIMIT;

/// Configuration for a [`LinearMemory`](crate::LinearMemory).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Number of pages allocated up front.
    ///
    /// Default: 2 (128 KiB), the footprint of the reference engine image.
    pub initial_pages: usize,

    /// Maximum number of pages the memory may ever grow to.
    ///
    /// Default: 32768 (2 GiB). Offsets handed to the engine are signed
    /// 32-bit values in the reference engine, so anything past 2 GiB would
    /// not be addressable by it anyway.
    pub max_pages: usize,
}

impl MemoryConfig {
    /// Default initial page count.
    pub const DEFAULT_INITIAL_PAGES: usize = 2;

    /// Default maximum page count (2 GiB).
    pub const DEFAULT_MAX_PAGES: usize = 32_768;

    /// Create a config with explicit page counts.
    pub fn new(initial_pages: usize, max_pages: usize) -> Self {
        Self {
            initial_pages,
            max_pages,
        }
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidConfig`] if `max_pages` is zero or
    /// exceeds [`MAX_PAGES_LIMIT`], or if `initial_pages > max_pages`.
    pub fn validate(&self) -> Result<(), MemoryError> {
        if self.max_pages == 0 {
            return Err(MemoryError::InvalidConfig {
                reason: "max_pages must be at least 1".to_string(),
            });
        }
        if self.max_pages > MAX_PAGES_LIMIT {
            return Err(MemoryError::InvalidConfig {
                reason: format!(
                    "max_pages {} exceeds the {MAX_PAGES_LIMIT}-page address space",
                    self.max_pages
                ),
            });
        }
        if self.initial_pages > self.max_pages {
            return Err(MemoryError::InvalidConfig {
                reason: format!(
                    "initial_pages {} exceeds max_pages {}",
                    self.initial_pages, self.max_pages
                ),
            });
        }
        Ok(())
    }

    /// Maximum size of the memory in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_pages * crate::PAGE_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_PAGES, Self::DEFAULT_MAX_PAGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MemoryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_bytes(), 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn zero_max_pages_rejected() {
        let config = MemoryConfig::new(0, 0);
        assert!(matches!(
            config.validate(),
            Err(MemoryError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn initial_above_max_rejected() {
        let config = MemoryConfig::new(4, 2);
        assert!(matches!(
            config.validate(),
            Err(MemoryError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn max_above_address_space_rejected() {
        let config = MemoryConfig::new(1, MAX_PAGES_LIMIT + 1);
        assert!(config.validate().is_err());
        assert!(MemoryConfig::new(1, MAX_PAGES_LIMIT).validate().is_ok());
    }
}
