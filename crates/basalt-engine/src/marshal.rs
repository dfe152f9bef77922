//! Host-to-engine marshalling.
//!
//! Input always lands at the engine's heap base and is followed by a single
//! NUL. The returned [`Region`] covers the payload only; the terminator sits
//! at `region.end()` and is not counted. Each call overwrites the previous
//! call's input.

use basalt_memory::Region;

use crate::error::EngineError;
use crate::instance::EngineInstance;

/// Copy `text` into engine memory as UTF-8 and terminate it.
///
/// `str::len` is the exact UTF-8 byte count, so the memory reserved is
/// exactly the payload plus terminator.
pub fn write_str(instance: &mut EngineInstance, text: &str) -> Result<Region, EngineError> {
    place(instance, text.as_bytes())
}

/// Copy `bytes` verbatim into engine memory and terminate them.
pub fn write_bytes(instance: &mut EngineInstance, bytes: &[u8]) -> Result<Region, EngineError> {
    place(instance, bytes)
}

fn place(instance: &mut EngineInstance, bytes: &[u8]) -> Result<Region, EngineError> {
    let ptr = instance.heap_base();
    let len = bytes.len();
    let memory = instance.memory_mut();
    memory.ensure(ptr, len + 1)?;
    memory.write_bytes(ptr, bytes)?;
    memory.write_u8(ptr + len, 0)?;
    Ok(Region::new(ptr, len))
}
