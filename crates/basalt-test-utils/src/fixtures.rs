//! Deterministic payload generators.
//!
//! Everything is seeded so that failures reproduce exactly.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `len` pseudo-random bytes from a ChaCha8 stream seeded with `seed`.
pub fn random_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}

/// `len` copies of `byte`.
pub fn filled(len: usize, byte: u8) -> Vec<u8> {
    vec![byte; len]
}

/// Random payloads covering every padding case around page boundaries.
///
/// Lengths are 0..=8, then `PAGE - 1 ..= PAGE + 1` and `2 * PAGE + 2` for a
/// 64 KiB page.
pub fn sized_payloads(seed: u64) -> Vec<Vec<u8>> {
    const PAGE: usize = 65_536;
    let lengths = (0..=8).chain([PAGE - 1, PAGE, PAGE + 1, 2 * PAGE + 2]);
    lengths
        .enumerate()
        .map(|(i, len)| random_payload(len, seed.wrapping_add(i as u64)))
        .collect()
}
