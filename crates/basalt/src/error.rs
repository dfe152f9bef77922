//! Error types for the codec facade.
//!
//! [`CodecError`] is the single error type of the public API. Engine and
//! memory errors are folded into it so that callers can tell the fatal
//! cases (`UnsupportedPlatform`, `InstantiationFailed`, `OutOfMemory`,
//! `Poisoned`) from the per-call ones (`MalformedInput`, `NotInitialized`).

use std::error::Error;
use std::fmt;

use basalt_engine::EngineError;
use basalt_memory::MemoryError;

/// Why a base64 input was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MalformedReason {
    /// A byte outside the base64 alphabet.
    InvalidSymbol {
        /// The offending byte.
        byte: u8,
    },
    /// The input length is not a multiple of four.
    InvalidLength {
        /// Total input length in bytes.
        len: usize,
    },
    /// A `=` followed by a non-padding character.
    MisplacedPadding,
    /// More than two padding characters.
    ExcessPadding {
        /// Number of padding characters found.
        count: usize,
    },
    /// The last symbol before padding carries non-zero unused bits, so the
    /// text is not the canonical encoding of any input.
    NonZeroTrailingBits,
    /// The native codec rejected the input for another reason.
    Rejected {
        /// The native codec's description.
        detail: String,
    },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSymbol { byte } => write!(f, "byte {byte:#04x} is not base64"),
            Self::InvalidLength { len } => {
                write!(f, "length {len} is not a multiple of 4")
            }
            Self::MisplacedPadding => write!(f, "padding before end of input"),
            Self::ExcessPadding { count } => write!(f, "{count} padding characters"),
            Self::NonZeroTrailingBits => write!(f, "non-zero trailing bits"),
            Self::Rejected { detail } => write!(f, "{detail}"),
        }
    }
}

/// Errors from codec construction and codec calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// Neither backend can run on this host.
    UnsupportedPlatform {
        /// Capabilities that were required but absent.
        missing: Vec<&'static str>,
    },
    /// The compiled engine could not be instantiated. Not retried.
    InstantiationFailed(EngineError),
    /// An operation was called before initialization completed, or after
    /// it failed.
    NotInitialized,
    /// Linear memory could not grow. The engine is poisoned afterwards.
    OutOfMemory(MemoryError),
    /// The input is not valid base64.
    MalformedInput {
        /// Byte offset of the first offending character.
        offset: usize,
        /// What is wrong with it.
        reason: MalformedReason,
    },
    /// An earlier growth failure disabled the compiled engine.
    Poisoned,
    /// The compiled engine failed for a reason other than memory growth.
    Engine(EngineError),
    /// The codec configuration is invalid.
    Config(MemoryError),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPlatform { missing } => {
                write!(f, "platform unsupported: missing {}", missing.join(", "))
            }
            Self::InstantiationFailed(e) => write!(f, "engine instantiation failed: {e}"),
            Self::NotInitialized => write!(f, "codec is not initialized"),
            Self::OutOfMemory(e) => write!(f, "out of memory: {e}"),
            Self::MalformedInput { offset, reason } => {
                write!(f, "malformed base64 at offset {offset}: {reason}")
            }
            Self::Poisoned => write!(f, "codec poisoned by an earlier growth failure"),
            Self::Engine(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "invalid codec config: {e}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InstantiationFailed(e) | Self::Engine(e) => Some(e),
            Self::OutOfMemory(e) | Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for CodecError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Memory(m) if m.is_growth_failure() => Self::OutOfMemory(m),
            EngineError::Poisoned => Self::Poisoned,
            other => Self::Engine(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_failure_maps_to_out_of_memory() {
        let grow = MemoryError::GrowFailed {
            current_pages: 2,
            requested_pages: 1,
            max_pages: 2,
        };
        assert_eq!(
            CodecError::from(EngineError::Memory(grow.clone())),
            CodecError::OutOfMemory(grow)
        );
        assert_eq!(
            CodecError::from(EngineError::Poisoned),
            CodecError::Poisoned
        );
    }

    #[test]
    fn other_engine_errors_pass_through() {
        let oob = EngineError::Memory(MemoryError::OutOfBounds {
            ptr: 1,
            len: 2,
            size: 0,
        });
        assert!(matches!(CodecError::from(oob), CodecError::Engine(_)));
    }

    #[test]
    fn unsupported_platform_lists_missing_capabilities() {
        let e = CodecError::UnsupportedPlatform {
            missing: vec!["byte_arrays", "typed_views"],
        };
        assert_eq!(
            e.to_string(),
            "platform unsupported: missing byte_arrays, typed_views"
        );
    }

    #[test]
    fn malformed_input_display() {
        let e = CodecError::MalformedInput {
            offset: 3,
            reason: MalformedReason::InvalidSymbol { byte: b'!' },
        };
        assert_eq!(e.to_string(), "malformed base64 at offset 3: byte 0x21 is not base64");
    }
}
