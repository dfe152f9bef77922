//! Test utilities for Basalt development.
//!
//! Provides the RFC 4648 reference vectors ([`RFC4648_VECTORS`]), a few
//! deliberately malformed inputs ([`MALFORMED_INPUTS`]), and deterministic
//! payload generators in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{filled, random_payload, sized_payloads};

/// `(plain, encoded)` pairs from RFC 4648 §10.
pub const RFC4648_VECTORS: &[(&[u8], &str)] = &[
    (b"", ""),
    (b"f", "Zg=="),
    (b"fo", "Zm8="),
    (b"foo", "Zm9v"),
    (b"foob", "Zm9vYg=="),
    (b"fooba", "Zm9vYmE="),
    (b"foobar", "Zm9vYmFy"),
];

/// Inputs that strict decoding must reject, with the offset of the first
/// offending character.
pub const MALFORMED_INPUTS: &[(&str, usize)] = &[
    // Not a multiple of four: offset of the incomplete quartet.
    ("Zm9", 0),
    ("Zm9vY", 4),
    // Outside the alphabet.
    ("Zm9!", 3),
    ("Zm-v", 2),
    ("Zm9v\n", 4),
    // Padding in the middle.
    ("Zg==Zm9v", 2),
    ("Z===", 1),
    // Non-zero trailing bits.
    ("Zh==", 1),
    ("Zm9=", 2),
];
