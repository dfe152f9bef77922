//! Basalt: a base64 codec with two interchangeable backends.
//!
//! This is the top-level facade crate. A [`Codec`] selects one backend when
//! it is built and keeps it for its whole lifetime:
//!
//! - the **compiled engine** (`basalt-engine`), which encodes and decodes
//!   inside its own growable linear memory through an offset-based ABI;
//! - the **native codec**, backed by the `base64` crate, used when the host
//!   cannot run the engine.
//!
//! Both backends produce standard padded RFC 4648 text and agree on every
//! input.
//!
//! # Quick start
//!
//! ```rust
//! use basalt::prelude::*;
//! use futures::executor::block_on;
//!
//! let mut codec = block_on(create_codec()).unwrap();
//! assert_eq!(codec.backend_kind(), BackendKind::Compiled);
//! assert_eq!(codec.encode(b"foo").unwrap(), "Zm9v");
//! assert_eq!(codec.decode("Zm8=").unwrap(), b"fo");
//!
//! // Malformed input is rejected before it reaches the backend.
//! assert!(matches!(
//!     codec.decode("Zm9!"),
//!     Err(CodecError::MalformedInput { offset: 3, .. })
//! ));
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`codec`] | [`Codec`], [`create_codec`], [`create_codec_with`] |
//! | [`select`] | Host capabilities and backend selection |
//! | [`backend`] | The closed [`Backend`] enum |
//! | [`native`] | [`NativeCodec`] over the `base64` crate |
//! | [`validate`] | Strict input validation |
//! | [`config`] | [`CodecConfig`] |
//! | [`metrics`] | [`CodecMetrics`] |
//! | [`error`] | [`CodecError`], [`MalformedReason`] |
//! | [`memory`] | Re-export of `basalt-memory` |
//! | [`engine`] | Re-export of `basalt-engine` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod metrics;
pub mod native;
pub mod select;
pub mod validate;

/// Linear memory, regions, and views (`basalt-memory`).
pub use basalt_memory as memory;

/// The compiled engine and its host-side protocol (`basalt-engine`).
pub use basalt_engine as engine;

pub use backend::Backend;
pub use codec::{create_codec, create_codec_with, Codec};
pub use config::CodecConfig;
pub use error::{CodecError, MalformedReason};
pub use metrics::CodecMetrics;
pub use native::NativeCodec;
pub use select::{select_backend, BackendKind, BackendPreference, HostCapabilities};

/// Common imports for typical Basalt usage.
///
/// ```rust
/// use basalt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::codec::{create_codec, create_codec_with, Codec};
    pub use crate::config::CodecConfig;
    pub use crate::error::{CodecError, MalformedReason};
    pub use crate::metrics::CodecMetrics;
    pub use crate::select::{BackendKind, BackendPreference, HostCapabilities};

    pub use basalt_memory::MemoryConfig;
}
