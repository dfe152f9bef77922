//! [`Codec`]: the public facade over the selected backend.
//!
//! A codec picks its backend once, at construction, and keeps it. The
//! native codec is ready immediately. The compiled engine starts
//! [`Uninitialized`](Lifecycle::Uninitialized) and becomes ready when
//! [`initialized()`](Codec::initialized) (or a deferred operation) awaits
//! its instantiation. Instantiation runs at most once: the pending module
//! is consumed whether it succeeds or not.

use basalt_engine::{CompiledEngine, EngineModule};
use basalt_memory::MemoryConfig;
use tracing::debug;

use crate::backend::Backend;
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::metrics::CodecMetrics;
use crate::native::NativeCodec;
use crate::select::{select_backend, BackendKind, HostCapabilities};
use crate::validate::validate;

/// What the compiled engine needs to instantiate.
#[derive(Debug)]
struct PendingEngine {
    module: EngineModule,
    memory: MemoryConfig,
}

#[derive(Debug)]
enum Lifecycle {
    /// `pending` is `None` once instantiation has been attempted and failed.
    Uninitialized { pending: Option<PendingEngine> },
    Ready(Backend),
}

/// A base64 codec bound to one backend.
///
/// Calls take `&mut self`; one instance serves one caller at a time.
/// Separate instances share nothing.
#[derive(Debug)]
pub struct Codec {
    lifecycle: Lifecycle,
    kind: BackendKind,
    strict_decode: bool,
    metrics: CodecMetrics,
}

impl Codec {
    /// Select a backend for `caps` and build an unstarted codec.
    ///
    /// A native codec is ready on return. A compiled one needs
    /// [`initialized()`](Self::initialized) first.
    pub fn new(config: CodecConfig, caps: HostCapabilities) -> Result<Self, CodecError> {
        config.validate()?;
        let kind = select_backend(&caps, config.backend)?;
        let lifecycle = match kind {
            BackendKind::Compiled => Lifecycle::Uninitialized {
                pending: Some(PendingEngine {
                    module: config.module,
                    memory: config.memory,
                }),
            },
            BackendKind::Native => Lifecycle::Ready(Backend::Native(NativeCodec::new())),
        };
        Ok(Self {
            lifecycle,
            kind,
            strict_decode: config.strict_decode,
            metrics: CodecMetrics::default(),
        })
    }

    /// Finish initialization and return the ready codec.
    pub async fn initialized(mut self) -> Result<Self, CodecError> {
        self.initialize().await?;
        Ok(self)
    }

    async fn initialize(&mut self) -> Result<(), CodecError> {
        let pending = match &mut self.lifecycle {
            Lifecycle::Ready(_) => return Ok(()),
            Lifecycle::Uninitialized { pending } => pending.take(),
        };
        let Some(pending) = pending else {
            return Err(CodecError::NotInitialized);
        };
        let engine = CompiledEngine::instantiate(&pending.module, &pending.memory)
            .await
            .map_err(CodecError::InstantiationFailed)?;
        self.metrics.observe_memory(engine.memory());
        debug!(
            pages = engine.memory().page_count(),
            heap_base = engine.instance().heap_base(),
            "compiled engine ready"
        );
        self.lifecycle = Lifecycle::Ready(Backend::Compiled(engine));
        Ok(())
    }

    /// Encode `bytes` to padded base64 text.
    pub fn encode(&mut self, bytes: &[u8]) -> Result<String, CodecError> {
        let result = self.backend_mut()?.encode(bytes);
        self.metrics
            .record_encode(bytes.len(), result.as_ref().ok().map(String::len));
        self.refresh_memory();
        result
    }

    /// Decode base64 `text` to bytes.
    pub fn decode(&mut self, text: &str) -> Result<Vec<u8>, CodecError> {
        self.with_decoded(text, <[u8]>::to_vec)
    }

    /// Decode `text` and lend the decoded bytes to `f` for the duration of
    /// the call.
    pub fn with_decoded<R>(
        &mut self,
        text: &str,
        f: impl FnOnce(&[u8]) -> R,
    ) -> Result<R, CodecError> {
        if !self.is_ready() {
            return Err(CodecError::NotInitialized);
        }
        let mut decoded_len = 0;
        let checked = if self.strict_decode {
            validate(text.as_bytes())
        } else {
            Ok(())
        };
        let result = checked.and_then(|()| {
            self.backend_mut()?.with_decoded(text, |bytes| {
                decoded_len = bytes.len();
                f(bytes)
            })
        });
        self.metrics
            .record_decode(text.len(), result.is_ok().then_some(decoded_len));
        self.refresh_memory();
        result
    }

    /// Wait for initialization, then encode.
    pub async fn encode_deferred(&mut self, bytes: &[u8]) -> Result<String, CodecError> {
        self.initialize().await?;
        self.encode(bytes)
    }

    /// Wait for initialization, then decode.
    pub async fn decode_deferred(&mut self, text: &str) -> Result<Vec<u8>, CodecError> {
        self.initialize().await?;
        self.decode(text)
    }

    /// Whether calls can be made.
    pub fn is_ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready(_))
    }

    /// The backend selected at construction.
    pub fn backend_kind(&self) -> BackendKind {
        self.kind
    }

    /// The ready backend, if any.
    pub fn backend(&self) -> Option<&Backend> {
        match &self.lifecycle {
            Lifecycle::Ready(backend) => Some(backend),
            Lifecycle::Uninitialized { .. } => None,
        }
    }

    /// Whether a growth failure has disabled the backend.
    pub fn is_poisoned(&self) -> bool {
        self.backend().is_some_and(Backend::is_poisoned)
    }

    /// Whether decode input is validated before reaching the backend.
    pub fn is_strict(&self) -> bool {
        self.strict_decode
    }

    /// Counters accumulated since construction.
    pub fn metrics(&self) -> &CodecMetrics {
        &self.metrics
    }

    fn backend_mut(&mut self) -> Result<&mut Backend, CodecError> {
        match &mut self.lifecycle {
            Lifecycle::Ready(backend) => Ok(backend),
            Lifecycle::Uninitialized { .. } => Err(CodecError::NotInitialized),
        }
    }

    fn refresh_memory(&mut self) {
        if let Lifecycle::Ready(backend) = &self.lifecycle {
            if let Some(memory) = backend.memory() {
                self.metrics.observe_memory(memory);
            }
        }
    }
}

/// Build a codec for the current host with default settings and wait for
/// it to be ready.
pub async fn create_codec() -> Result<Codec, CodecError> {
    create_codec_with(CodecConfig::default(), HostCapabilities::detect()).await
}

/// Build a codec from `config` for a host with `caps` and wait for it to
/// be ready.
pub async fn create_codec_with(
    config: CodecConfig,
    caps: HostCapabilities,
) -> Result<Codec, CodecError> {
    Codec::new(config, caps)?.initialized().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn assert_send<T: Send>() {}

    #[test]
    fn codec_is_send() {
        assert_send::<Codec>();
    }

    #[test]
    fn native_is_ready_immediately() {
        let codec = Codec::new(CodecConfig::default(), HostCapabilities::native_only()).unwrap();
        assert!(codec.is_ready());
        assert_eq!(codec.backend_kind(), BackendKind::Native);
    }

    #[test]
    fn compiled_waits_for_initialization() {
        let mut codec = Codec::new(CodecConfig::default(), HostCapabilities::detect()).unwrap();
        assert!(!codec.is_ready());
        assert!(codec.backend().is_none());
        assert_eq!(codec.encode(b"foo"), Err(CodecError::NotInitialized));
        assert_eq!(codec.decode("Zm9v"), Err(CodecError::NotInitialized));

        let mut codec = block_on(codec.initialized()).unwrap();
        assert!(codec.is_ready());
        assert_eq!(codec.encode(b"foo").unwrap(), "Zm9v");
    }

    #[test]
    fn initialization_is_memoized() {
        let mut codec = block_on(create_codec()).unwrap();
        let pages = codec.metrics().memory_pages;
        block_on(codec.initialize()).unwrap();
        assert!(codec.is_ready());
        assert_eq!(codec.metrics().memory_pages, pages);
    }

    #[test]
    fn metrics_count_calls() {
        let mut codec = block_on(create_codec()).unwrap();
        codec.encode(b"foob").unwrap();
        codec.decode("Zm9vYg==").unwrap();
        assert!(codec.decode("Zm9!").is_err());
        let m = codec.metrics();
        assert_eq!(m.encode_calls, 1);
        assert_eq!(m.decode_calls, 2);
        assert_eq!(m.failed_calls, 1);
        assert_eq!(m.bytes_in, 4 + 8);
        assert_eq!(m.bytes_out, 8 + 4);
        assert_eq!(m.memory_pages, 2);
    }

    #[test]
    fn not_initialized_is_not_counted() {
        let mut codec = Codec::new(CodecConfig::default(), HostCapabilities::detect()).unwrap();
        let _ = codec.encode(b"x");
        assert_eq!(codec.metrics(), &CodecMetrics::default());
    }
}
