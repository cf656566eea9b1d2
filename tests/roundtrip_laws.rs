//
// Copyright (c) 2015 Plausible Labs Cooperative, Inc.
// All rights reserved.
//

//! Property checks for the round-trip and idempotence laws of §8: these
//! quantify over arbitrary values/bit inputs rather than the handful of
//! literal examples in `tests/lib.rs`.

use proptest::prelude::*;

use bitcodec::combinators::{cons, done, length_prefixed, list, list_of, non_empty_list, optional, sequence, take_while};
use bitcodec::primitives::{bool_, byte, int, uint};
use bitcodec::Bits;

proptest! {
    #[test]
    fn uint8_encode_decode_round_trips(value in 0u64..256) {
        let codec = uint(8);
        let encoded = codec.encode(value).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert!(remainder.is_empty());
    }

    #[test]
    fn uint16_encode_decode_round_trips(value in 0u64..65536) {
        let codec = uint(16);
        let encoded = codec.encode(value).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert!(remainder.is_empty());
    }

    #[test]
    fn int8_encode_decode_round_trips(value in -128i64..128) {
        let codec = int(8);
        let encoded = codec.encode(value).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert!(remainder.is_empty());
    }

    #[test]
    fn bool_encode_decode_round_trips(value: bool) {
        let codec = bool_();
        let encoded = codec.encode(value).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert!(remainder.is_empty());
    }

    /// decode-encode round trip: for arbitrary bit inputs, decoding then
    /// re-encoding reproduces the consumed prefix exactly.
    #[test]
    fn decode_then_encode_reproduces_the_consumed_prefix(bytes in prop::collection::vec(any::<u8>(), 1..16)) {
        let codec = uint(8);
        let input = Bits::from_bytes(&bytes, bytes.len() * 8);
        if let Ok((value, remainder)) = codec.decode(input.clone()) {
            let reencoded = codec.encode(value).unwrap();
            let (prefix, _) = input.split_at(reencoded.len()).unwrap();
            prop_assert_eq!(reencoded, prefix);
            prop_assert_eq!(remainder.len(), input.len() - 8);
        }
    }

    #[test]
    fn list_of_n_bytes_round_trips(values in prop::collection::vec(any::<u8>(), 0..64)) {
        let n = values.len();
        let codec = list_of(n, byte());
        let values_u8: Vec<u8> = values;
        let encoded = codec.encode(values_u8.clone()).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, values_u8);
        prop_assert!(remainder.is_empty());
    }

    #[test]
    fn list_greedily_consumes_every_byte(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let codec = done(list(byte()));
        let input = Bits::from_bytes(&bytes, bytes.len() * 8);
        let (decoded, remainder) = codec.decode(input).unwrap();
        prop_assert_eq!(decoded, bytes);
        prop_assert!(remainder.is_empty());
    }

    #[test]
    fn length_prefixed_round_trips_arbitrary_payloads(values in prop::collection::vec(any::<u8>(), 0..200)) {
        let codec = length_prefixed(uint(16), byte());
        let encoded = codec.encode(values.clone()).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, values);
        prop_assert!(remainder.is_empty());
    }

    #[test]
    fn take_while_round_trips_arbitrary_lists(values in prop::collection::vec(any::<u8>(), 0..64)) {
        let codec = take_while(bool_(), byte());
        let encoded = codec.encode(values.clone()).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, values);
        prop_assert!(remainder.is_empty());
    }

    #[test]
    fn sequence_and_list_of_agree_on_arbitrary_equal_length_input(values in prop::collection::vec(any::<u8>(), 1..32)) {
        let n = values.len();
        let a = sequence(vec![byte(); n]);
        let b = list_of(n, byte());
        prop_assert_eq!(
            a.encode(values.clone()).unwrap().to_byte_vec(),
            b.encode(values).unwrap().to_byte_vec()
        );
    }

    #[test]
    fn cons_and_non_empty_list_round_trip_arbitrary_non_empty_lists(head in any::<u8>(), tail in prop::collection::vec(any::<u8>(), 0..32)) {
        let codec = non_empty_list(byte());
        let mut values = vec![head];
        values.extend(tail);
        let encoded = codec.encode(values.clone()).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, values);
        prop_assert!(remainder.is_empty());
    }

    #[test]
    fn optional_round_trips_present_values(value in 0u64..256) {
        let codec = optional(uint(8));
        let encoded = codec.encode(Some(value)).unwrap();
        let (decoded, remainder) = codec.decode(encoded).unwrap();
        prop_assert_eq!(decoded, Some(value));
        prop_assert!(remainder.is_empty());
    }

    /// Idempotence: once a value has survived one encode-decode cycle,
    /// repeating the cycle on the result is a fixed point.
    #[test]
    fn encode_decode_is_idempotent_after_one_round_trip(value in 0u64..65536) {
        let codec = uint(16);
        let once = codec.encode(value).unwrap();
        let (decoded_once, _) = codec.decode(once.clone()).unwrap();
        let twice = codec.encode(decoded_once).unwrap();
        prop_assert_eq!(once.to_byte_vec(), twice.to_byte_vec());
    }
}

#[test]
fn cons_matches_the_manual_prepend_law() {
    let _ = env_logger::try_init();
    let codec = cons(byte(), list_of(2, byte()));
    let (decoded, _) = codec.decode(Bits::from_bytes(&[9, 1, 2], 24)).unwrap();
    assert_eq!(decoded, vec![9, 1, 2]);
}
