//! Benchmark payload profiles for the Basalt codec.
//!
//! - [`small_profile`]: 1 KiB, fits the engine's initial memory
//! - [`large_profile`]: 1 MiB, forces linear memory growth on first use
//! - [`encoded`]: the padded base64 text of a profile, for decode benches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use basalt::NativeCodec;
use basalt_test_utils::random_payload;

/// A named benchmark payload.
pub struct Profile {
    /// Name used in benchmark ids.
    pub name: &'static str,
    /// Payload bytes.
    pub bytes: Vec<u8>,
}

/// 1 KiB of seeded random bytes.
pub fn small_profile(seed: u64) -> Profile {
    Profile {
        name: "1k",
        bytes: random_payload(1024, seed),
    }
}

/// 1 MiB of seeded random bytes.
pub fn large_profile(seed: u64) -> Profile {
    Profile {
        name: "1m",
        bytes: random_payload(1 << 20, seed),
    }
}

/// Both profiles, smallest first.
pub fn profiles(seed: u64) -> Vec<Profile> {
    vec![small_profile(seed), large_profile(seed)]
}

/// Standard padded base64 of `bytes`, for decode benchmarks.
pub fn encoded(bytes: &[u8]) -> String {
    NativeCodec::new().encode(bytes)
}
