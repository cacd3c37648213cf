//! Property-based tests for the wire codec using proptest
//!
//! These validate the encoding invariants across a wide range of randomly
//! generated inputs: round-trips, size bounds and strict range checks.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bytes::Bytes;
use chat_protocol::core::codec::{StreamReader, StreamWriter};
use chat_protocol::error::ProtocolError;
use futures::executor::block_on;
use proptest::prelude::*;

proptest! {
    // Property: varuint round-trips for any 32-bit value, in at most
    // ceil(32/7) = 5 bytes.
    #[test]
    fn prop_varuint_roundtrip_32(value in any::<u32>()) {
        let (encoded_len, decoded) = block_on(async {
            let mut buf = Vec::new();
            buf.write_varuint(u64::from(value), 32).await.unwrap();
            let len = buf.len();
            let mut reader = Bytes::from(buf);
            (len, reader.read_varuint(32).await.unwrap())
        });
        prop_assert!(encoded_len <= 5);
        prop_assert_eq!(decoded, u64::from(value));
    }
}

proptest! {
    // Property: varint round-trips for the full signed 64-bit range.
    #[test]
    fn prop_varint_roundtrip_64(value in any::<i64>()) {
        let decoded = block_on(async {
            let mut buf = Vec::new();
            buf.write_varint(value, 64).await.unwrap();
            let mut reader = Bytes::from(buf);
            reader.read_varint(64).await.unwrap()
        });
        prop_assert_eq!(decoded, value);
    }
}

proptest! {
    // Property: varint round-trips within a 16-bit budget.
    #[test]
    fn prop_varint_roundtrip_16(value in -(1i64 << 15)..(1i64 << 15)) {
        let decoded = block_on(async {
            let mut buf = Vec::new();
            buf.write_varint(value, 16).await.unwrap();
            let mut reader = Bytes::from(buf);
            reader.read_varint(16).await.unwrap()
        });
        prop_assert_eq!(decoded, value);
    }
}

proptest! {
    // Property: values outside the declared budget are rejected, never
    // silently truncated.
    #[test]
    fn prop_varint_out_of_budget_rejected(value in (1i64 << 15)..i64::MAX) {
        let result = block_on(async {
            let mut buf = Vec::new();
            buf.write_varint(value, 16).await
        });
        prop_assert!(matches!(result, Err(ProtocolError::Range(_))));
    }
}

proptest! {
    // Property: any string round-trips; the prefix counts bytes.
    #[test]
    fn prop_utf_roundtrip(value in ".{0,200}") {
        let (first_bytes, decoded) = block_on(async {
            let mut buf = Vec::new();
            buf.write_utf(&value).await.unwrap();
            let prefix = buf.clone();
            let mut reader = Bytes::from(buf);
            (prefix, reader.read_utf().await.unwrap())
        });
        prop_assert_eq!(&decoded, &value);
        // Single-byte prefix for anything under 128 bytes.
        if value.len() < 128 {
            prop_assert_eq!(first_bytes[0] as usize, value.len());
        }
    }
}

proptest! {
    // Property: byte arrays round-trip and the payload follows the
    // prefix verbatim.
    #[test]
    fn prop_bytearray_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        let (encoded, decoded) = block_on(async {
            let mut buf = Vec::new();
            buf.write_bytearray(&data).await.unwrap();
            let encoded = buf.clone();
            let mut reader = Bytes::from(buf);
            (encoded, reader.read_bytearray().await.unwrap())
        });
        prop_assert_eq!(&decoded, &data);
        prop_assert!(encoded.ends_with(&data));
    }
}

proptest! {
    // Property: decoding stops exactly at the first byte with a clear
    // continuation bit, leaving trailing bytes untouched.
    #[test]
    fn prop_varuint_consumes_exactly_its_bytes(value in any::<u16>(), trailer in any::<u8>()) {
        let remaining = block_on(async {
            let mut buf = Vec::new();
            buf.write_varuint(u64::from(value), 16).await.unwrap();
            buf.push(trailer);
            let mut reader = Bytes::from(buf);
            reader.read_varuint(16).await.unwrap();
            reader.read_bytes(1).await.unwrap()
        });
        prop_assert_eq!(remaining, vec![trailer]);
    }
}

proptest! {
    // Property: binary16 round-trips through the wire exactly for values
    // that are themselves exact halves.
    #[test]
    fn prop_f16_wire_roundtrip(bits in 0u16..0x7C00) {
        let value = chat_protocol::core::codec::f16_bits_to_f32(bits);
        let decoded = block_on(async {
            let mut buf = Vec::new();
            buf.write_f16(value).await.unwrap();
            let mut reader = Bytes::from(buf);
            reader.read_f16().await.unwrap()
        });
        prop_assert_eq!(decoded.to_bits(), value.to_bits());
    }
}
