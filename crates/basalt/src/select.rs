//! Backend selection from host capabilities.
//!
//! Selection happens once, when a [`Codec`](crate::Codec) is constructed.
//! The compiled engine is preferred whenever the host can run it; the
//! native codec is the fallback.

use tracing::debug;

use crate::error::CodecError;

/// What the host offers to the codec backends.
///
/// [`detect()`](Self::detect) reports the current host. Embedders running
/// under a restricted environment describe it explicitly instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host can instantiate and run the compiled engine.
    pub vm: bool,
    /// The host has native growable byte containers.
    pub byte_arrays: bool,
    /// The host can view byte containers as typed slices.
    pub typed_views: bool,
}

impl HostCapabilities {
    /// Capabilities of the current host.
    ///
    /// The compiled engine addresses memory with offsets up to
    /// `MAX_PAGES_LIMIT * PAGE_SIZE`, which needs at least 32-bit pointers.
    pub fn detect() -> Self {
        Self {
            vm: usize::BITS >= 32,
            byte_arrays: true,
            typed_views: true,
        }
    }

    /// A host that offers nothing.
    pub fn none() -> Self {
        Self {
            vm: false,
            byte_arrays: false,
            typed_views: false,
        }
    }

    /// A host that can only run the native codec.
    pub fn native_only() -> Self {
        Self {
            vm: false,
            byte_arrays: true,
            typed_views: true,
        }
    }

    fn supports(&self, kind: BackendKind) -> bool {
        match kind {
            BackendKind::Compiled => self.vm,
            BackendKind::Native => self.byte_arrays && self.typed_views,
        }
    }

    fn missing(&self, kind: BackendKind) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match kind {
            BackendKind::Compiled => {
                if !self.vm {
                    missing.push("vm");
                }
            }
            BackendKind::Native => {
                if !self.byte_arrays {
                    missing.push("byte_arrays");
                }
                if !self.typed_views {
                    missing.push("typed_views");
                }
            }
        }
        missing
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// Which backend the caller wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendPreference {
    /// The compiled engine if the host can run it, else the native codec.
    #[default]
    Auto,
    /// The compiled engine only.
    Compiled,
    /// The native codec only.
    Native,
}

/// The backend a codec ended up with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// The compiled linear-memory engine.
    Compiled,
    /// The `base64` crate.
    Native,
}

impl BackendKind {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compiled => "compiled",
            Self::Native => "native",
        }
    }
}

/// Pick a backend for `caps` honouring `preference`.
///
/// A forced preference is still checked against the host; it never falls
/// back to the other backend.
pub fn select_backend(
    caps: &HostCapabilities,
    preference: BackendPreference,
) -> Result<BackendKind, CodecError> {
    let kind = match preference {
        BackendPreference::Auto => {
            if caps.supports(BackendKind::Compiled) {
                BackendKind::Compiled
            } else if caps.supports(BackendKind::Native) {
                BackendKind::Native
            } else {
                let mut missing = caps.missing(BackendKind::Compiled);
                missing.extend(caps.missing(BackendKind::Native));
                return Err(CodecError::UnsupportedPlatform { missing });
            }
        }
        BackendPreference::Compiled => BackendKind::Compiled,
        BackendPreference::Native => BackendKind::Native,
    };
    if !caps.supports(kind) {
        return Err(CodecError::UnsupportedPlatform {
            missing: caps.missing(kind),
        });
    }
    debug!(backend = kind.name(), ?preference, "selected codec backend");
    Ok(kind)
}
