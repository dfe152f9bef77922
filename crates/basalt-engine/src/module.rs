//! The engine module image.
//!
//! An [`EngineModule`] is the static part of the compiled engine: how many
//! pages it starts with, where its lookup tables live, and where the free
//! heap begins. Instantiation copies the data segment into a fresh linear
//! memory; the exports then read their tables from that memory.
//!
//! Layout of the standard image:
//!
//! ```text
//! 0        1024           1280        1345           66896        131072
//! ├────────┼──────────────┼───────────┼──────────────┼────────────┤
//! │ unused │ decode table │ alphabet  │ stack/unused │ heap ...   │
//! │        │  256 bytes   │ 64 + NUL  │              │            │
//! ```

use basalt_memory::{MemoryConfig, PAGE_SIZE};

use crate::error::EngineError;

/// The RFC 4648 standard alphabet.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Decode table entry for bytes outside the alphabet (including `=` and NUL).
pub const INVALID_SEXTET: u8 = 64;

/// Offset of the data segment in the standard image.
pub const DATA_OFFSET: usize = 1024;

/// Offset of the free heap in the standard image.
pub const HEAP_BASE: usize = 66_896;

/// Initial page count of the standard image.
pub const INITIAL_PAGES: usize = 2;

/// A byte blob copied into linear memory at instantiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataSegment {
    /// Destination offset in linear memory.
    pub offset: usize,
    /// Segment contents.
    pub bytes: Vec<u8>,
}

impl DataSegment {
    /// One past the last byte of the segment.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.bytes.len())
    }
}

/// Static description of a compiled engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineModule {
    /// Minimum page count the module needs at instantiation.
    pub initial_pages: usize,
    /// First byte of memory free for host use.
    pub heap_base: usize,
    /// Offset of the 256-entry byte → sextet table.
    pub decode_table_offset: usize,
    /// Offset of the 64-entry sextet → byte alphabet.
    pub encode_table_offset: usize,
    /// Static data copied in at instantiation.
    pub data: DataSegment,
}

impl EngineModule {
    /// The standard base64 engine image.
    pub fn standard() -> Self {
        let mut bytes = Vec::with_capacity(256 + ALPHABET.len() + 1);
        bytes.extend_from_slice(&decode_table());
        bytes.extend_from_slice(ALPHABET);
        bytes.push(0);
        Self {
            initial_pages: INITIAL_PAGES,
            heap_base: HEAP_BASE,
            decode_table_offset: DATA_OFFSET,
            encode_table_offset: DATA_OFFSET + 256,
            data: DataSegment {
                offset: DATA_OFFSET,
                bytes,
            },
        }
    }

    /// Check that the image is self-consistent and fits `memory`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidModule`] if the tables fall outside
    /// the data segment, the data segment or heap base fall outside the
    /// initial memory, the heap overlaps the data segment, or the module
    /// needs more pages than `memory.max_pages` allows.
    pub fn validate(&self, memory: &MemoryConfig) -> Result<(), EngineError> {
        let invalid = |reason: String| Err(EngineError::InvalidModule { reason });
        let initial_bytes = self.initial_pages.saturating_mul(PAGE_SIZE);

        if self.initial_pages > memory.max_pages {
            return invalid(format!(
                "module needs {} pages but memory is capped at {}",
                self.initial_pages, memory.max_pages
            ));
        }
        if self.data.end() > initial_bytes {
            return invalid(format!(
                "data segment ends at {} beyond initial memory of {initial_bytes} bytes",
                self.data.end()
            ));
        }
        let in_segment = |offset: usize, len: usize| {
            offset >= self.data.offset && offset.saturating_add(len) <= self.data.end()
        };
        if !in_segment(self.decode_table_offset, 256) {
            return invalid("decode table is not inside the data segment".to_string());
        }
        if !in_segment(self.encode_table_offset, ALPHABET.len()) {
            return invalid("alphabet is not inside the data segment".to_string());
        }
        if self.heap_base < self.data.end() {
            return invalid(format!(
                "heap base {} overlaps data segment ending at {}",
                self.heap_base,
                self.data.end()
            ));
        }
        if self.heap_base >= initial_bytes {
            return invalid(format!(
                "heap base {} is outside initial memory of {initial_bytes} bytes",
                self.heap_base
            ));
        }
        Ok(())
    }
}

impl Default for EngineModule {
    fn default() -> Self {
        Self::standard()
    }
}

/// Build the byte → sextet table for [`ALPHABET`].
fn decode_table() -> [u8; 256] {
    let mut table = [INVALID_SEXTET; 256];
    for (sextet, &byte) in ALPHABET.iter().enumerate() {
        table[byte as usize] = sextet as u8;
    }
    table
}
