//! [`CompiledEngine`]: the host-facing wrapper around an engine instance.
//!
//! Runs the adapter and extractor for each call and tracks poisoning. A
//! failed memory growth may leave the engine's bookkeeping half-updated, so
//! after one the engine refuses all further calls with
//! [`EngineError::Poisoned`]. Other failures (traps, invalid output) only
//! abort the current call.

use basalt_memory::{LinearMemory, MemoryConfig};
use tracing::warn;

use crate::adapter;
use crate::error::EngineError;
use crate::extract;
use crate::instance::EngineInstance;
use crate::module::EngineModule;

/// A compiled base64 engine with its own linear memory.
#[derive(Debug)]
pub struct CompiledEngine {
    instance: EngineInstance,
    poisoned: bool,
}

impl CompiledEngine {
    /// Instantiate `module` with the given memory limits.
    ///
    /// This is the engine's only suspension point; every call afterwards
    /// runs synchronously.
    pub async fn instantiate(
        module: &EngineModule,
        config: &MemoryConfig,
    ) -> Result<Self, EngineError> {
        let instance = EngineInstance::instantiate(module, config).await?;
        Ok(Self {
            instance,
            poisoned: false,
        })
    }

    /// Encode `bytes` to base64 text.
    pub fn encode(&mut self, bytes: &[u8]) -> Result<String, EngineError> {
        self.check_poisoned()?;
        let result = adapter::encode(&mut self.instance, bytes)
            .and_then(|region| extract::copy_text(self.instance.memory(), region));
        self.observe(result)
    }

    /// Decode base64 `text` to an owned byte buffer.
    ///
    /// Decoding stops at the first byte outside the alphabet; the engine
    /// does not reject malformed input on its own.
    pub fn decode(&mut self, text: &str) -> Result<Vec<u8>, EngineError> {
        self.with_decoded(text, <[u8]>::to_vec)
    }

    /// Decode `text` and lend the decoded bytes to `f` without copying.
    pub fn with_decoded<R>(
        &mut self,
        text: &str,
        f: impl FnOnce(&[u8]) -> R,
    ) -> Result<R, EngineError> {
        self.check_poisoned()?;
        let result = adapter::decode(&mut self.instance, text)
            .and_then(|region| extract::lend(self.instance.memory(), region, f));
        self.observe(result)
    }

    /// Whether a growth failure has disabled this engine.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// The engine's linear memory.
    pub fn memory(&self) -> &LinearMemory {
        self.instance.memory()
    }

    /// The underlying instance, for direct export access.
    pub fn instance(&self) -> &EngineInstance {
        &self.instance
    }

    fn check_poisoned(&self) -> Result<(), EngineError> {
        if self.poisoned {
            Err(EngineError::Poisoned)
        } else {
            Ok(())
        }
    }

    fn observe<T>(&mut self, result: Result<T, EngineError>) -> Result<T, EngineError> {
        if let Err(e) = &result {
            if e.is_growth_failure() {
                warn!(error = %e, "engine poisoned by memory growth failure");
                self.poisoned = true;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_memory::MemoryError;
    use futures::executor::block_on;

    fn engine(config: MemoryConfig) -> CompiledEngine {
        block_on(CompiledEngine::instantiate(&EngineModule::standard(), &config)).unwrap()
    }

    #[test]
    fn reference_vectors() {
        let mut e = engine(MemoryConfig::default());
        assert_eq!(e.encode(b"").unwrap(), "");
        assert_eq!(e.encode(b"foo").unwrap(), "Zm9v");
        assert_eq!(e.decode("Zm9v").unwrap(), b"foo");
        assert_eq!(e.decode("Zm8=").unwrap(), b"fo");
    }

    #[test]
    fn growth_failure_poisons_engine() {
        // Two pages is the module minimum, leaving ~64 KiB of heap.
        let mut e = engine(MemoryConfig::new(2, 2));
        assert_eq!(e.encode(b"fine").unwrap(), "ZmluZQ==");

        let err = e.encode(&vec![0u8; 100_000]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Memory(MemoryError::GrowFailed { .. })
        ));
        assert!(e.is_poisoned());
        assert_eq!(e.encode(b"fine"), Err(EngineError::Poisoned));
        assert_eq!(e.decode("Zm9v"), Err(EngineError::Poisoned));
    }

    #[test]
    fn with_decoded_lends_without_copy() {
        let mut e = engine(MemoryConfig::default());
        let sum = e
            .with_decoded("AQID", |bytes| bytes.iter().map(|&b| b as u32).sum::<u32>())
            .unwrap();
        assert_eq!(sum, 6);
    }

    #[test]
    fn malformed_input_decodes_best_effort() {
        let mut e = engine(MemoryConfig::default());
        // Decoding stops at the first non-alphabet byte.
        assert_eq!(e.decode("Zm9v!!!!").unwrap(), b"foo");
        assert_eq!(e.decode("!Zm9v").unwrap(), b"");
        assert!(!e.is_poisoned());
    }
}
