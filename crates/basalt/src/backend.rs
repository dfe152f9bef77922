//! The closed set of codec backends.

use basalt_engine::CompiledEngine;
use basalt_memory::LinearMemory;

use crate::error::CodecError;
use crate::native::NativeCodec;
use crate::select::BackendKind;

/// A ready backend. Fixed for the lifetime of its [`Codec`](crate::Codec).
#[derive(Debug)]
pub enum Backend {
    /// The compiled engine over its own linear memory.
    Compiled(CompiledEngine),
    /// The `base64` crate.
    Native(NativeCodec),
}

impl Backend {
    /// Which backend this is.
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Compiled(_) => BackendKind::Compiled,
            Self::Native(_) => BackendKind::Native,
        }
    }

    /// Encode `bytes` to padded base64 text.
    pub fn encode(&mut self, bytes: &[u8]) -> Result<String, CodecError> {
        match self {
            Self::Compiled(engine) => Ok(engine.encode(bytes)?),
            Self::Native(codec) => Ok(codec.encode(bytes)),
        }
    }

    /// Decode `text` without validating it first.
    pub fn decode(&mut self, text: &str) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Compiled(engine) => Ok(engine.decode(text)?),
            Self::Native(codec) => codec.decode(text),
        }
    }

    /// Decode `text` and lend the bytes to `f`.
    ///
    /// The compiled engine lends its output region directly; the native
    /// codec lends a temporary buffer.
    pub fn with_decoded<R>(
        &mut self,
        text: &str,
        f: impl FnOnce(&[u8]) -> R,
    ) -> Result<R, CodecError> {
        match self {
            Self::Compiled(engine) => Ok(engine.with_decoded(text, f)?),
            Self::Native(codec) => {
                let bytes = codec.decode(text)?;
                Ok(f(&bytes))
            }
        }
    }

    /// Whether a growth failure has disabled this backend.
    pub fn is_poisoned(&self) -> bool {
        match self {
            Self::Compiled(engine) => engine.is_poisoned(),
            Self::Native(_) => false,
        }
    }

    /// The backend's linear memory, if it has one.
    pub fn memory(&self) -> Option<&LinearMemory> {
        match self {
            Self::Compiled(engine) => Some(engine.memory()),
            Self::Native(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_engine::EngineModule;
    use basalt_memory::MemoryConfig;
    use futures::executor::block_on;

    fn compiled() -> Backend {
        let engine =
            block_on(CompiledEngine::instantiate(&EngineModule::standard(), &MemoryConfig::default()))
                .unwrap();
        Backend::Compiled(engine)
    }

    #[test]
    fn both_backends_agree() {
        let mut backends = [compiled(), Backend::Native(NativeCodec::new())];
        for backend in &mut backends {
            assert_eq!(backend.encode(b"foobar").unwrap(), "Zm9vYmFy");
            assert_eq!(backend.decode("Zm9vYg==").unwrap(), b"foob");
            let len = backend.with_decoded("Zm9vYmE=", <[u8]>::len).unwrap();
            assert_eq!(len, 5);
        }
    }

    #[test]
    fn only_compiled_has_memory() {
        assert_eq!(compiled().kind(), BackendKind::Compiled);
        assert!(compiled().memory().is_some());
        let native = Backend::Native(NativeCodec::new());
        assert_eq!(native.kind(), BackendKind::Native);
        assert!(native.memory().is_none());
        assert!(!native.is_poisoned());
    }
}
