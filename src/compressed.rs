//
// Copyright (c) 2015 Plausible Labs Cooperative, Inc.
// All rights reserved.
//
// This API is based on the design of Michael Pilquist and Paul Chiusano's
// Scala scodec library: https://github.com/scodec/scodec/
//

//! DEFLATE compression as an adapter over an existing codec: `compressed(c)`
//! runs `c` as normal, then deflates the resulting bits on encode and
//! inflates them back before handing the bits to `c` on decode. Since
//! compressed output is rarely byte-aligned-free of trailing garbage the
//! way raw bits are, this adapter only operates on byte-aligned payloads;
//! non-byte-aligned input is zero-padded on the trailing end before
//! deflating and the padding is dropped again after inflating.

use std::io::{Read, Write};
use std::rc::Rc;

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::bits::Bits;
use crate::codec::Codec;
use crate::error::{Error, ErrorKind};

fn deflate(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes).map_err(|e| Error::from_message(format!("compression failed: {}", e)))?;
    encoder.finish().map_err(|e| Error::from_message(format!("compression failed: {}", e)))
}

fn inflate(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut decoder = DeflateDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|e| Error::from_message(format!("decompression failed: {}", e)))?;
    Ok(out)
}

/// `compressed(c)`: wraps `c` with DEFLATE compression of its wire bytes.
pub fn compressed<A: Clone + 'static>(c: Codec<A>) -> Codec<A> {
    let dec_c = c.clone();
    crate::combinators::convert(
        byte_aligned_bits(),
        move |compressed_bits: Bits| {
            let raw_bytes = compressed_bits.to_byte_vec().expect("byte_aligned_bits guarantees byte alignment");
            let inflated = inflate(&raw_bytes)?;
            let inflated_len = inflated.len() * 8;
            let inflated_bits = Bits::from_bytes(&inflated, inflated_len);
            let (value, _rest) = dec_c.decode(inflated_bits).map_err(|(e, _)| e)?;
            Ok(value)
        },
        move |value: A| {
            let encoded = c.encode(value).map_err(|(e, _v)| e)?;
            let padded = pad_to_byte_boundary(&encoded);
            let raw_bytes = padded.to_byte_vec().expect("pad_to_byte_boundary guarantees byte alignment");
            let deflated = deflate(&raw_bytes)?;
            let deflated_len = deflated.len() * 8;
            Ok(Bits::from_bytes(&deflated, deflated_len))
        },
    )
}

fn pad_to_byte_boundary(bits: &Bits) -> Bits {
    let remainder = bits.len() % 8;
    if remainder == 0 {
        return bits.clone();
    }
    let padding = Bits::from_uint(0, 8 - remainder).expect("padding width is always in 1..8");
    bits.concat(&padding)
}

/// A pass-through codec that requires its input/output to already be
/// byte-aligned, used internally as `compressed`'s outer shape so `convert`
/// can drive the actual (de)compression in its `to`/`from` functions.
fn byte_aligned_bits() -> Codec<Bits> {
    Codec::from_raw(
        Rc::new(|value: Bits| {
            if value.len() % 8 != 0 {
                return Err((Error::new(ErrorKind::PredicateRejected("compressed payload must be byte-aligned".to_string())), value));
            }
            Ok(value)
        }),
        Rc::new(|input: Bits| {
            if input.len() % 8 != 0 {
                return Err((Error::new(ErrorKind::PredicateRejected("compressed payload must be byte-aligned".to_string())), input));
            }
            Ok((input.clone(), Bits::empty()))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::uint;

    #[test]
    fn compressed_round_trips_a_simple_value() {
        let codec = compressed(uint(32));
        let encoded = codec.encode(0xdeadbeefu64 & 0xffffffff).unwrap();
        let (value, _) = codec.decode(encoded).unwrap();
        assert_eq!(value, 0xdeadbeefu64 & 0xffffffff);
    }

    #[test]
    fn compressed_shrinks_repetitive_data() {
        let codec = compressed(crate::combinators::list_of(64, uint(8)));
        let encoded = codec.encode(vec![0u64; 64]).unwrap();
        assert!(encoded.len() < 64 * 8);
        let (value, _) = codec.decode(encoded).unwrap();
        assert_eq!(value, vec![0u64; 64]);
    }
}
