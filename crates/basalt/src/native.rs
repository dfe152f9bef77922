//! [`NativeCodec`]: the `base64` crate behind the codec interface.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine as _};

use crate::error::{CodecError, MalformedReason};

/// Standard padded base64 through the `base64` crate.
///
/// Needs no initialization and owns no memory between calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeCodec;

impl NativeCodec {
    /// A ready native codec.
    pub fn new() -> Self {
        Self
    }

    /// Encode `bytes` to padded base64 text.
    pub fn encode(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    /// Decode padded base64 `text`.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        STANDARD.decode(text).map_err(malformed)
    }
}

fn malformed(e: DecodeError) -> CodecError {
    let (offset, reason) = match e {
        DecodeError::InvalidByte(offset, byte) => (offset, MalformedReason::InvalidSymbol { byte }),
        DecodeError::InvalidLastSymbol(offset, _) => (offset, MalformedReason::NonZeroTrailingBits),
        other => (
            0,
            MalformedReason::Rejected {
                detail: other.to_string(),
            },
        ),
    };
    CodecError::MalformedInput { offset, reason }
}
