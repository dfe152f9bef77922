//! Compiled base64 engine for Basalt.
//!
//! The engine is a self-contained module image (lookup tables in a data
//! segment, a fixed heap base) that is instantiated into its own
//! [`LinearMemory`](basalt_memory::LinearMemory) and driven purely through
//! offsets, the way a host drives a compiled module through its exports.
//!
//! # Call protocol
//!
//! ```text
//! host bytes ──marshal──▶ [heap_base .. +len] NUL
//!                                         │ decode_len / encode_len
//!                                         ▼
//!                         ensure(out, len) ──▶ decode / encode
//!                                         │
//! host copy ◀──extract── [out .. +actual]
//! ```
//!
//! - [`marshal`] places host input at the heap base and terminates it.
//! - [`adapter`] sequences the length query, growth and the engine call.
//! - [`extract`] copies the output region back into host-owned values.
//! - [`CompiledEngine`] ties these together and poisons itself on growth
//!   failure.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod engine;
pub mod error;
pub mod extract;
pub mod instance;
pub mod marshal;
pub mod module;

pub use engine::CompiledEngine;
pub use error::{EngineError, EngineTrap};
pub use instance::EngineInstance;
pub use module::EngineModule;
