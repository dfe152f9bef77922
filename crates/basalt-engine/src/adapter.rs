//! Sequencing of engine calls.
//!
//! Both directions follow the same shape: marshal the input, ask the engine
//! how much output space it needs, place the output region directly after
//! the input (over the input terminator), make it addressable, run the
//! engine, and report where the result is.
//!
//! The returned [`Region`]s point into engine memory and are only valid
//! until the next call.

use basalt_memory::Region;
use tracing::trace;

use crate::error::EngineError;
use crate::instance::EngineInstance;
use crate::marshal;

/// Decode base64 `text` inside the engine.
///
/// Returns the region holding the decoded bytes. The length is the exact
/// count reported by the engine, which may be smaller than the
/// `decode_len` estimate used to size the output.
pub fn decode(instance: &mut EngineInstance, text: &str) -> Result<Region, EngineError> {
    let input = marshal::write_str(instance, text)?;
    let estimate = instance.decode_len(input.ptr)?;

    let out = input.end();
    instance.memory_mut().ensure(out, estimate)?;
    let actual = instance.decode(out, input.ptr)?;
    trace!(input_len = input.len, estimate, actual, "engine decode");

    if actual >= estimate {
        return Err(EngineError::InvalidOutput {
            reason: format!("decoded {actual} bytes, estimate was {estimate} including NUL"),
        });
    }
    Ok(Region::new(out, actual))
}

/// Encode `bytes` as base64 inside the engine.
///
/// Returns the region holding the encoded text, excluding the terminator.
pub fn encode(instance: &mut EngineInstance, bytes: &[u8]) -> Result<Region, EngineError> {
    let input = marshal::write_bytes(instance, bytes)?;
    let encoded_len = instance.encode_len(input.len);

    let out = input.end();
    instance.memory_mut().ensure(out, encoded_len)?;
    let written = instance.encode(out, input.ptr, input.len)?;
    trace!(input_len = input.len, encoded_len, "engine encode");

    if written != encoded_len {
        return Err(EngineError::InvalidOutput {
            reason: format!("encode wrote {written} bytes, encode_len promised {encoded_len}"),
        });
    }
    // The last byte is the terminator.
    Ok(Region::new(out, encoded_len - 1))
}
