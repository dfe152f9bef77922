//! Codec configuration.

use basalt_engine::EngineModule;
use basalt_memory::MemoryConfig;

use crate::error::CodecError;
use crate::select::BackendPreference;

/// Configuration for constructing a [`Codec`](crate::Codec).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Which backend to use. Default: [`BackendPreference::Auto`].
    pub backend: BackendPreference,
    /// Linear memory limits for the compiled engine. Ignored by the native
    /// codec.
    pub memory: MemoryConfig,
    /// Reject malformed base64 before it reaches a backend. Default: `true`.
    ///
    /// With `false`, malformed input is backend-defined: the compiled
    /// engine decodes up to the first non-alphabet byte, the native codec
    /// rejects it.
    pub strict_decode: bool,
    /// The compiled engine's module image.
    pub module: EngineModule,
}

impl CodecConfig {
    /// Check the memory limits.
    ///
    /// The module image is checked against these limits when the engine is
    /// instantiated; a bad image surfaces as
    /// [`CodecError::InstantiationFailed`].
    pub fn validate(&self) -> Result<(), CodecError> {
        self.memory.validate().map_err(CodecError::Config)
    }

    /// This config with `strict_decode` turned off.
    pub fn lenient(mut self) -> Self {
        self.strict_decode = false;
        self
    }

    /// This config with a forced backend.
    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            memory: MemoryConfig::default(),
            strict_decode: true,
            module: EngineModule::standard(),
        }
    }
}
