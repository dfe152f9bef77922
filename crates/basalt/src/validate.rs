//! Strict base64 validation shared by both backends.
//!
//! Accepts exactly the canonical RFC 4648 encodings: length a multiple of
//! four, alphabet characters only, `=` only as the last one or two
//! characters, and zero unused bits in the symbol before the padding.
//! Reports the first offending offset.

use crate::error::{CodecError, MalformedReason};

/// Check that `text` is canonical padded base64.
pub fn validate(text: &[u8]) -> Result<(), CodecError> {
    let len = text.len();
    let rem = len % 4;
    if rem != 0 {
        return Err(malformed(len - rem, MalformedReason::InvalidLength { len }));
    }

    let pad_start = text.iter().position(|&b| b == b'=').unwrap_or(len);
    if let Some(offset) = text[..pad_start].iter().position(|&b| sextet(b).is_none()) {
        let byte = text[offset];
        return Err(malformed(offset, MalformedReason::InvalidSymbol { byte }));
    }

    let padding = &text[pad_start..];
    if padding.iter().any(|&b| b != b'=') {
        return Err(malformed(pad_start, MalformedReason::MisplacedPadding));
    }
    let mask = match padding.len() {
        0 => return Ok(()),
        1 => 0x03,
        2 => 0x0F,
        count => return Err(malformed(pad_start, MalformedReason::ExcessPadding { count })),
    };

    // len is a multiple of 4 and at most two pads, so pad_start >= 2.
    let last = pad_start - 1;
    match sextet(text[last]) {
        Some(value) if value & mask == 0 => Ok(()),
        _ => Err(malformed(last, MalformedReason::NonZeroTrailingBits)),
    }
}

fn malformed(offset: usize, reason: MalformedReason) -> CodecError {
    CodecError::MalformedInput { offset, reason }
}

fn sextet(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}
