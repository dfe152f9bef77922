//! Engine error types.

use std::error::Error;
use std::fmt;

use basalt_memory::MemoryError;

/// A fault raised by an engine export.
///
/// Exports never read or write outside active memory; where the reference
/// engine would have undefined behavior, this engine traps instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineTrap {
    /// An export touched bytes outside the active memory.
    OutOfBounds {
        /// Start offset of the faulting access.
        ptr: usize,
        /// Length of the faulting access.
        len: usize,
    },
    /// No terminator byte was found between the input pointer and the end
    /// of memory.
    UnterminatedInput {
        /// The input pointer that was scanned.
        ptr: usize,
    },
}

impl fmt::Display for EngineTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { ptr, len } => {
                write!(f, "out of bounds access at {ptr} (+{len})")
            }
            Self::UnterminatedInput { ptr } => {
                write!(f, "input at {ptr} has no terminator before end of memory")
            }
        }
    }
}

impl Error for EngineTrap {}

/// Errors from engine instantiation and engine calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The module image failed validation at instantiation.
    InvalidModule {
        /// Description of what is wrong with the image.
        reason: String,
    },
    /// A linear memory operation failed.
    Memory(MemoryError),
    /// An engine export trapped.
    Trap(EngineTrap),
    /// A previous growth failure left the engine unusable.
    Poisoned,
    /// The engine produced output that does not match its own length
    /// contract or is not valid text.
    InvalidOutput {
        /// Description of the mismatch.
        reason: String,
    },
}

impl EngineError {
    /// Whether this error came from a failed memory growth.
    pub fn is_growth_failure(&self) -> bool {
        matches!(self, Self::Memory(e) if e.is_growth_failure())
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidModule { reason } => write!(f, "invalid engine module: {reason}"),
            Self::Memory(e) => write!(f, "engine memory: {e}"),
            Self::Trap(t) => write!(f, "engine trap: {t}"),
            Self::Poisoned => write!(f, "engine poisoned by an earlier growth failure"),
            Self::InvalidOutput { reason } => write!(f, "invalid engine output: {reason}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Memory(e) => Some(e),
            Self::Trap(t) => Some(t),
            _ => None,
        }
    }
}

impl From<MemoryError> for EngineError {
    fn from(e: MemoryError) -> Self {
        Self::Memory(e)
    }
}

impl From<EngineTrap> for EngineError {
    fn from(t: EngineTrap) -> Self {
        Self::Trap(t)
    }
}
