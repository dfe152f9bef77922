//! Codec laws that must hold on both backends: reference vectors,
//! round-trips, the output length law, and backend agreement.

use basalt::prelude::*;
use basalt_test_utils::{filled, random_payload, sized_payloads, RFC4648_VECTORS};
use futures::executor::block_on;
use proptest::prelude::*;

fn codec(caps: HostCapabilities) -> Codec {
    block_on(create_codec_with(CodecConfig::default(), caps)).unwrap()
}

fn both() -> [Codec; 2] {
    [
        codec(HostCapabilities::detect()),
        codec(HostCapabilities::native_only()),
    ]
}

#[test]
fn reference_vectors_on_both_backends() {
    for mut c in both() {
        for &(plain, encoded) in RFC4648_VECTORS {
            assert_eq!(c.encode(plain).unwrap(), encoded, "{:?}", c.backend_kind());
            assert_eq!(c.decode(encoded).unwrap(), plain, "{:?}", c.backend_kind());
        }
    }
}

#[test]
fn hundred_thousand_zero_bytes_grow_memory() {
    let mut c = codec(HostCapabilities::detect());
    let before = c.metrics().memory_pages;
    let text = c.encode(&filled(100_000, 0)).unwrap();
    assert_eq!(text.len(), 100_000usize.div_ceil(3) * 4);
    assert!(c.metrics().memory_pages > before);
    assert!(c.metrics().grow_epoch > 0);
}

#[test]
fn one_million_ff_bytes_round_trip() {
    for mut c in both() {
        let payload = filled(1_000_000, 0xFF);
        let text = c.encode(&payload).unwrap();
        assert_eq!(text.len(), 1_000_000usize.div_ceil(3) * 4);
        assert_eq!(c.decode(&text).unwrap(), payload);
    }
}

#[test]
fn page_boundary_payloads_agree() {
    let [mut compiled, mut native] = both();
    for payload in sized_payloads(7) {
        let text = compiled.encode(&payload).unwrap();
        assert_eq!(text, native.encode(&payload).unwrap(), "len {}", payload.len());
        assert_eq!(compiled.decode(&text).unwrap(), payload);
    }
}

#[test]
fn with_decoded_lends_the_bytes() {
    for mut c in both() {
        let sum = c
            .with_decoded("Zm9vYmFy", |bytes| bytes.iter().map(|&b| b as u32).sum::<u32>())
            .unwrap();
        assert_eq!(sum, b"foobar".iter().map(|&b| b as u32).sum::<u32>());
    }
}

#[test]
fn random_payload_round_trips_after_large_call() {
    let mut c = codec(HostCapabilities::detect());
    c.encode(&filled(300_000, 1)).unwrap();
    let payload = random_payload(5_000, 99);
    let text = c.encode(&payload).unwrap();
    assert_eq!(c.decode(&text).unwrap(), payload);
}

proptest! {
    #[test]
    fn round_trip_and_length_law(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
        for mut c in both() {
            let text = c.encode(&bytes).unwrap();
            prop_assert_eq!(text.len(), bytes.len().div_ceil(3) * 4);
            prop_assert_eq!(c.decode(&text).unwrap(), bytes.clone());
        }
    }

    #[test]
    fn encode_of_decode_is_identity(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let [mut compiled, mut native] = both();
        let text = native.encode(&bytes).unwrap();
        let decoded = compiled.decode(&text).unwrap();
        prop_assert_eq!(compiled.encode(&decoded).unwrap(), text);
    }
}
