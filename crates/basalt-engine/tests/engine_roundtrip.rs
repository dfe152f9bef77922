//! End-to-end engine tests: reference vectors, large payloads, and memory
//! growth across many calls on one instance.

use basalt_engine::{CompiledEngine, EngineModule};
use basalt_memory::{MemoryConfig, PAGE_SIZE};
use basalt_test_utils::{filled, random_payload, sized_payloads, RFC4648_VECTORS};
use futures::executor::block_on;
use proptest::prelude::*;

fn engine() -> CompiledEngine {
    block_on(CompiledEngine::instantiate(
        &EngineModule::standard(),
        &MemoryConfig::default(),
    ))
    .unwrap()
}

fn encoded_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

#[test]
fn rfc4648_vectors() {
    let mut e = engine();
    for &(plain, encoded) in RFC4648_VECTORS {
        assert_eq!(e.encode(plain).unwrap(), encoded, "encode {plain:?}");
        assert_eq!(e.decode(encoded).unwrap(), plain, "decode {encoded:?}");
    }
}

#[test]
fn hundred_thousand_zero_bytes() {
    let mut e = engine();
    let payload = filled(100_000, 0);
    let text = e.encode(&payload).unwrap();
    assert_eq!(text.len(), encoded_len(100_000));
    assert!(text.bytes().all(|b| b == b'A'));
    assert!(e.memory().page_count() > 2);
}

#[test]
fn one_million_ff_bytes_round_trip() {
    let mut e = engine();
    let payload = filled(1_000_000, 0xFF);
    let text = e.encode(&payload).unwrap();
    assert_eq!(text.len(), 1_000_000usize.div_ceil(3) * 4);
    assert_eq!(e.decode(&text).unwrap(), payload);
}

#[test]
fn payloads_around_page_boundaries() {
    let mut e = engine();
    for payload in sized_payloads(42) {
        let text = e.encode(&payload).unwrap();
        assert_eq!(text.len(), encoded_len(payload.len()));
        assert_eq!(e.decode(&text).unwrap(), payload, "len {}", payload.len());
    }
}

#[test]
fn memory_never_shrinks_between_calls() {
    let mut e = engine();
    e.encode(&random_payload(4 * PAGE_SIZE, 1)).unwrap();
    let grown = e.memory().page_count();

    assert_eq!(e.encode(b"small").unwrap(), "c21hbGw=");
    assert_eq!(e.memory().page_count(), grown);
}

#[test]
fn instances_do_not_share_memory() {
    let mut a = engine();
    let mut b = engine();
    a.encode(&random_payload(3 * PAGE_SIZE, 9)).unwrap();
    assert!(a.memory().page_count() > b.memory().page_count());
    assert_eq!(b.encode(b"foo").unwrap(), "Zm9v");
}

proptest! {
    #[test]
    fn round_trip_any_bytes(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let mut e = engine();
        let text = e.encode(&payload).unwrap();
        prop_assert_eq!(text.len(), encoded_len(payload.len()));
        prop_assert_eq!(e.decode(&text).unwrap(), payload);
    }
}
