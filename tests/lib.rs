//
// Copyright (c) 2015 Plausible Labs Cooperative, Inc.
// All rights reserved.
//

use bitcodec::combinators::{combine, done, length_prefixed, non_empty_list, pad};
use bitcodec::primitives::{bytes, constant, uint};
use bitcodec::{Bits, Codec};

fn assert_round_trip<T: Eq + std::fmt::Debug + Clone + 'static>(codec: &Codec<T>, value: T, raw_bytes: Option<&[u8]>) {
    let encoded = codec.encode(value.clone()).unwrap_or_else(|(e, _)| panic!("failed to encode: {}", e.message()));
    if let Some(expected) = raw_bytes {
        assert_eq!(encoded.to_byte_vec().as_deref(), Some(expected), "encoded bytes did not match");
    }
    let (decoded, remainder) = codec
        .decode(encoded)
        .unwrap_or_else(|(e, _)| panic!("failed to decode: {}", e.message()));
    assert_eq!(decoded, value);
    assert!(remainder.is_empty());
}

#[test]
fn a_u8_value_round_trips() {
    assert_round_trip(&uint(8), 7, Some(&[7]));
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileHeader {
    compat_version: u64,
    feature_version: u64,
    meta_offset: u64,
    meta_length: u64,
}

fn file_header_codec() -> Codec<FileHeader> {
    let fields = combine(uint(8), combine(uint(8), combine(uint(8), uint(8))));
    bitcodec::combinators::convert(
        fields,
        |(compat_version, (feature_version, (meta_offset, meta_length)))| {
            Ok(FileHeader { compat_version, feature_version, meta_offset, meta_length })
        },
        |header: FileHeader| Ok((header.compat_version, (header.feature_version, (header.meta_offset, header.meta_length)))),
    )
}

#[test]
fn a_struct_shaped_codec_round_trips() {
    let codec = file_header_codec();
    let header = FileHeader { compat_version: 1, feature_version: 2, meta_offset: 8, meta_length: 2 };
    assert_round_trip(&codec, header, Some(&[1, 2, 8, 2]));
}

#[test]
fn a_file_with_a_magic_prefix_and_length_prefixed_payload_round_trips() {
    let magic = Bits::from_bytes(&[0xCA, 0xFE], 16);
    let codec = bitcodec::combinators::then(
        constant(0xCAFEu64, magic),
        |_| length_prefixed(uint(8), bytes(1)),
        |_payload: &Vec<Bits>| 0xCAFEu64,
    );
    let payload = vec![Bits::from_bytes(&[1], 8), Bits::from_bytes(&[7], 8)];
    let encoded = codec.encode(payload.clone()).unwrap();
    assert_eq!(encoded.to_byte_vec().unwrap(), vec![0xCA, 0xFE, 2, 1, 7]);
    let (decoded, remainder) = codec.decode(encoded).unwrap();
    assert_eq!(decoded, payload);
    assert!(remainder.is_empty());
}

#[test]
fn non_empty_list_of_uint8_round_trips_and_rejects_empty_input() {
    let codec = done(non_empty_list(uint(8)));
    assert_round_trip(&codec, vec![1, 2, 3, 4], Some(&[1, 2, 3, 4]));
    assert!(codec.encode(vec![]).is_err());
}

#[test]
fn padded_nibble_round_trips_to_a_whole_byte() {
    let codec = pad(uint(4), 4);
    assert_round_trip(&codec, 9, Some(&[0x90]));
}
