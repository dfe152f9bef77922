//! Copying results out of engine memory.
//!
//! Engine output regions are reused by the next call and move when memory
//! grows, so results leave the engine either as owned copies or as a
//! borrow scoped to a closure.

use basalt_memory::{LinearMemory, Region};

use crate::error::EngineError;

/// Copy `region` into a new, independently owned buffer.
pub fn copy_bytes(memory: &LinearMemory, region: Region) -> Result<Vec<u8>, EngineError> {
    let view = memory.view(region)?;
    Ok(memory.read(&view)?.to_vec())
}

/// Copy `region` into a new `String`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidOutput`] if the bytes are not UTF-8. The
/// encoder only emits ASCII, so this indicates a corrupted engine.
pub fn copy_text(memory: &LinearMemory, region: Region) -> Result<String, EngineError> {
    let view = memory.view(region)?;
    let bytes = memory.read(&view)?;
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| EngineError::InvalidOutput {
            reason: format!("encoded output is not text: {e}"),
        })
}

/// Lend `region` to `f` without copying.
///
/// The slice cannot escape `f`, so it can never be observed after the next
/// call overwrites or relocates it.
pub fn lend<R>(
    memory: &LinearMemory,
    region: Region,
    f: impl FnOnce(&[u8]) -> R,
) -> Result<R, EngineError> {
    let view = memory.view(region)?;
    Ok(f(memory.read(&view)?))
}
