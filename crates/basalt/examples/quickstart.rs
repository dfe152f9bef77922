//! Basalt Quickstart: build a codec, encode, decode, and inspect it.
//!
//! Demonstrates:
//!   1. Creating a codec for the current host
//!   2. Encoding and decoding, including a zero-copy decode
//!   3. Strict rejection of malformed input
//!   4. Forcing the native backend
//!   5. Reading codec metrics after memory growth
//!
//! Run with:
//!   cargo run --example quickstart

use basalt::prelude::*;
use futures::executor::block_on;

fn main() -> Result<(), CodecError> {
    // ─── 1. Create ──────────────────────────────────────────────
    let mut codec = block_on(create_codec())?;
    println!("backend: {}", codec.backend_kind().name());

    // ─── 2. Encode / decode ─────────────────────────────────────
    let text = codec.encode(b"Many hands make light work.")?;
    println!("encoded: {text}");
    let bytes = codec.decode(&text)?;
    println!("decoded: {}", String::from_utf8_lossy(&bytes));

    let zeros = codec.with_decoded("AAAAAAAA", |b| b.iter().filter(|&&x| x == 0).count())?;
    println!("zero bytes in AAAAAAAA: {zeros}");

    // ─── 3. Malformed input ─────────────────────────────────────
    match codec.decode("Zm9v!A==") {
        Err(e @ CodecError::MalformedInput { .. }) => println!("rejected: {e}"),
        other => println!("unexpected: {other:?}"),
    }

    // ─── 4. Native backend ──────────────────────────────────────
    let config = CodecConfig::default().with_backend(BackendPreference::Native);
    let mut native = block_on(create_codec_with(config, HostCapabilities::detect()))?;
    assert_eq!(native.encode(b"Many hands make light work.")?, text);
    println!("native agrees");

    // ─── 5. Metrics ─────────────────────────────────────────────
    let big = vec![0xA5u8; 1 << 20];
    let encoded = codec.encode(&big)?;
    assert_eq!(codec.decode(&encoded)?, big);
    let m = codec.metrics();
    println!(
        "calls: {} encode / {} decode ({} failed), memory: {} pages after {} growth events",
        m.encode_calls, m.decode_calls, m.failed_calls, m.memory_pages, m.grow_epoch
    );
    Ok(())
}
