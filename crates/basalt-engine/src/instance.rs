//! An instantiated engine and its exports.
//!
//! [`EngineInstance`] owns the linear memory and exposes the engine's five
//! exports. Every export works on raw offsets into that memory:
//!
//! | Export | Signature | Result |
//! |--------|-----------|--------|
//! | `heap_base` | `() -> ptr` | first free byte |
//! | `decode_len` | `(coded) -> len` | upper bound, includes NUL slot |
//! | `decode` | `(plain, coded) -> len` | exact decoded length |
//! | `encode_len` | `(len) -> len` | exact, includes NUL slot |
//! | `encode` | `(encoded, plain, len) -> len` | written length incl. NUL |

use basalt_memory::{LinearMemory, MemoryConfig};
use tracing::debug;

use crate::error::{EngineError, EngineTrap};
use crate::module::EngineModule;

/// A live engine: linear memory plus the table offsets of its image.
#[derive(Debug)]
pub struct EngineInstance {
    memory: LinearMemory,
    heap_base: usize,
    decode_table: usize,
    encode_table: usize,
}

impl EngineInstance {
    /// Instantiate `module` into a fresh linear memory.
    ///
    /// The memory starts with `max(module.initial_pages, config.initial_pages)`
    /// pages and may grow up to `config.max_pages`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidModule`] if the image fails
    /// validation against `config`, or [`EngineError::Memory`] if the
    /// memory cannot be created.
    pub async fn instantiate(
        module: &EngineModule,
        config: &MemoryConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        module.validate(config)?;

        let memory_config = MemoryConfig::new(
            module.initial_pages.max(config.initial_pages),
            config.max_pages,
        );
        let mut memory = LinearMemory::new(&memory_config)?;
        memory.write_bytes(module.data.offset, &module.data.bytes)?;

        debug!(
            pages = memory.page_count(),
            max_pages = memory.max_pages(),
            heap_base = module.heap_base,
            "engine instantiated"
        );
        Ok(Self {
            memory,
            heap_base: module.heap_base,
            decode_table: module.decode_table_offset,
            encode_table: module.encode_table_offset,
        })
    }

    /// The engine's linear memory.
    pub fn memory(&self) -> &LinearMemory {
        &self.memory
    }

    /// The engine's linear memory, mutably.
    pub fn memory_mut(&mut self) -> &mut LinearMemory {
        &mut self.memory
    }

    /// Export `heap_base`: first byte free for host data.
    pub fn heap_base(&self) -> usize {
        self.heap_base
    }

    /// Count the alphabet bytes starting at `coded`, up to the first
    /// non-alphabet byte.
    fn symbol_count(&self, coded: usize) -> Result<usize, EngineTrap> {
        let mem = self.memory.as_slice();
        let table = &mem[self.decode_table..self.decode_table + 256];
        let input = mem
            .get(coded..)
            .filter(|rest| !rest.is_empty())
            .ok_or(EngineTrap::OutOfBounds { ptr: coded, len: 1 })?;
        input
            .iter()
            .position(|&b| table[b as usize] > 63)
            .ok_or(EngineTrap::UnterminatedInput { ptr: coded })
    }

    /// Export `decode_len`: upper bound on the decoded size of the text at
    /// `coded`, plus one byte for the output terminator.
    ///
    /// The scan stops at the first non-alphabet byte, so padding and the
    /// marshalled NUL both end it.
    pub fn decode_len(&self, coded: usize) -> Result<usize, EngineTrap> {
        let n = self.symbol_count(coded)?;
        Ok((n + 3) / 4 * 3 + 1)
    }

    /// Export `decode`: decode the text at `coded` into `plain`.
    ///
    /// Writes the decoded bytes followed by a NUL and returns the decoded
    /// length (without the NUL). A trailing single symbol carries fewer
    /// than eight bits and is dropped.
    pub fn decode(&mut self, plain: usize, coded: usize) -> Result<usize, EngineTrap> {
        let n = self.symbol_count(coded)?;
        let decoded = (n + 3) / 4 * 3 - ((4 - n % 4) & 3);
        self.check(plain, decoded + 1)?;

        let table = self.decode_table;
        let mem = self.memory.as_mut_slice();
        let mut input = coded;
        let mut out = plain;
        let mut remaining = n;

        while remaining > 4 {
            let s0 = sextet(mem, table, input);
            let s1 = sextet(mem, table, input + 1);
            let s2 = sextet(mem, table, input + 2);
            let s3 = sextet(mem, table, input + 3);
            mem[out] = (s0 << 2) | (s1 >> 4);
            mem[out + 1] = (s1 << 4) | (s2 >> 2);
            mem[out + 2] = (s2 << 6) | s3;
            input += 4;
            out += 3;
            remaining -= 4;
        }

        if remaining > 1 {
            mem[out] = (sextet(mem, table, input) << 2) | (sextet(mem, table, input + 1) >> 4);
            out += 1;
        }
        if remaining > 2 {
            mem[out] =
                (sextet(mem, table, input + 1) << 4) | (sextet(mem, table, input + 2) >> 2);
            out += 1;
        }
        if remaining > 3 {
            mem[out] = (sextet(mem, table, input + 2) << 6) | sextet(mem, table, input + 3);
            out += 1;
        }
        mem[out] = 0;

        debug_assert_eq!(out - plain, decoded);
        Ok(decoded)
    }

    /// Export `encode_len`: encoded size of `len` input bytes, plus one byte
    /// for the terminator.
    pub fn encode_len(&self, len: usize) -> usize {
        (len / 3 + usize::from(len % 3 != 0))
            .saturating_mul(4)
            .saturating_add(1)
    }

    /// Export `encode`: encode `len` bytes at `plain` into `encoded`.
    ///
    /// Writes padded base64 followed by a NUL and returns the number of
    /// bytes written including the NUL.
    pub fn encode(&mut self, encoded: usize, plain: usize, len: usize) -> Result<usize, EngineTrap> {
        self.check(plain, len)?;
        self.check(encoded, self.encode_len(len))?;

        let table = self.encode_table;
        let mem = self.memory.as_mut_slice();
        let mut i = 0;
        let mut p = encoded;

        while i + 2 < len {
            let b0 = mem[plain + i];
            let b1 = mem[plain + i + 1];
            let b2 = mem[plain + i + 2];
            mem[p] = symbol(mem, table, b0 >> 2);
            mem[p + 1] = symbol(mem, table, ((b0 & 0x03) << 4) | (b1 >> 4));
            mem[p + 2] = symbol(mem, table, ((b1 & 0x0F) << 2) | (b2 >> 6));
            mem[p + 3] = symbol(mem, table, b2 & 0x3F);
            i += 3;
            p += 4;
        }

        if i < len {
            let b0 = mem[plain + i];
            mem[p] = symbol(mem, table, b0 >> 2);
            if i == len - 1 {
                mem[p + 1] = symbol(mem, table, (b0 & 0x03) << 4);
                mem[p + 2] = b'=';
            } else {
                let b1 = mem[plain + i + 1];
                mem[p + 1] = symbol(mem, table, ((b0 & 0x03) << 4) | (b1 >> 4));
                mem[p + 2] = symbol(mem, table, (b1 & 0x0F) << 2);
            }
            mem[p + 3] = b'=';
            p += 4;
        }
        mem[p] = 0;
        p += 1;

        Ok(p - encoded)
    }

    fn check(&self, ptr: usize, len: usize) -> Result<(), EngineTrap> {
        match ptr.checked_add(len) {
            Some(end) if end <= self.memory.size() => Ok(()),
            _ => Err(EngineTrap::OutOfBounds { ptr, len }),
        }
    }
}

fn sextet(mem: &[u8], table: usize, at: usize) -> u8 {
    mem[table + mem[at] as usize]
}

fn symbol(mem: &[u8], table: usize, sextet: u8) -> u8 {
    mem[table + sextet as usize]
}
