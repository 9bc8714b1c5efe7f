//! Property-based test generators.

use proptest::prelude::*;

/// Strategy producing non-empty message payloads up to `max_len` bytes.
pub fn message_payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 1..=max_len.max(1))
}

/// Strategy producing a short sequence of (payload, to_quick_log) writes.
pub fn write_sequence(max_writes: usize) -> impl Strategy<Value = Vec<(Vec<u8>, bool)>> {
    proptest::collection::vec((message_payload(64), any::<bool>()), 0..=max_writes)
}
