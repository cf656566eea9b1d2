//
// Copyright (c) 2015 Plausible Labs Cooperative, Inc.
// All rights reserved.
//
// This API is based on the design of Michael Pilquist and Paul Chiusano's
// Scala scodec library: https://github.com/scodec/scodec/
//

//! Terminal codecs that talk to the [`Bits`] substrate directly.
//!
//! Width-parametric `uint`/`int`, plus the rest of the primitive table:
//! `bits`, `bytes`, `byte`, `bool_`, `constant`, `value`, `empty`/`nothing`,
//! `fail`, `bits_remaining`. None of these panic, so they are built
//! directly via [`Codec::from_raw`] rather than through
//! [`crate::codec::create`]'s fault-catching wrapper, which is reserved
//! for user-supplied closures.

use std::rc::Rc;

use crate::bits::Bits;
use crate::codec::{Codec, DecodeResult, EncodeResult};
use crate::error::{Error, ErrorKind};

fn primitive<V: 'static>(
    encode: impl Fn(V) -> EncodeResult<V> + 'static,
    decode: impl Fn(Bits) -> DecodeResult<V> + 'static,
) -> Codec<V> {
    Codec::from_raw(Rc::new(encode), Rc::new(decode))
}

/// `bits(k)`: a pass-through codec over raw `Bits` spans of exactly `k` bits.
pub fn bits(k: usize) -> Codec<Bits> {
    primitive(
        move |value: Bits| {
            if value.len() != k {
                return Err((Error::new(ErrorKind::ValueOutOfRange { value: format!("{:?}", value), width: k }), value));
            }
            Ok(value)
        },
        move |input: Bits| input.split_at(k).map_err(|e| (e, input.clone())),
    )
}

/// `bit()`: `bits(1)`.
pub fn bit() -> Codec<Bits> {
    bits(1)
}

/// `bytes(k)`: a pass-through codec over raw `Bits` spans of exactly `8k` bits.
pub fn bytes(k: usize) -> Codec<Bits> {
    bits(8 * k)
}

/// `byte()`: a single unsigned byte, numeric rather than `Bits`-valued.
///
/// Distinguished from `bytes(1)` (which stays `Bits`-valued) the way
/// scodec itself distinguishes `bytes(n): Codec[ByteVector]` from
/// `byte: Codec[Byte]`; see DESIGN.md for the reasoning.
pub fn byte() -> Codec<u8> {
    primitive(
        |value: u8| Bits::from_uint(value as u64, 8).map_err(|e| (e, value)),
        |input: Bits| {
            let (head, rest) = input.split_at(8).map_err(|e| (e, input.clone()))?;
            head.to_uint(8).map(|v| (v as u8, rest)).map_err(|e| (e, input.clone()))
        },
    )
}

/// `uint(k)`: unsigned integer occupying the leading `k` bits, big-endian. `k` must be `0..=64`.
pub fn uint(k: usize) -> Codec<u64> {
    primitive(
        move |value: u64| Bits::from_uint(value, k).map_err(|e| (e, value)),
        move |input: Bits| {
            let (head, rest) = input.split_at(k).map_err(|e| (e, input.clone()))?;
            head.to_uint(k).map(|v| (v, rest)).map_err(|e| (e, input.clone()))
        },
    )
}

/// `int(k)`: two's-complement signed integer occupying the leading `k` bits, big-endian.
pub fn int(k: usize) -> Codec<i64> {
    primitive(
        move |value: i64| Bits::from_int(value, k).map_err(|e| (e, value)),
        move |input: Bits| {
            let (head, rest) = input.split_at(k).map_err(|e| (e, input.clone()))?;
            head.to_int(k).map(|v| (v, rest)).map_err(|e| (e, input.clone()))
        },
    )
}

/// `bool()`: one bit, `true` encodes as `<1>`, `false` as `<0>`.
pub fn bool_() -> Codec<bool> {
    primitive(
        |value: bool| Bits::from_uint(value as u64, 1).map_err(|e| (e, value)),
        |input: Bits| {
            let (head, rest) = input.split_at(1).map_err(|e| (e, input.clone()))?;
            head.to_uint(1).map(|v| (v != 0, rest)).map_err(|e| (e, input.clone()))
        },
    )
}

/// `constant(v, b)`: accepts only `v` on encode (emitting `b`); on decode,
/// matches a prefix exactly equal to `b` and yields `v`. The decode
/// failure remainder is always the original input bits (a value is not a
/// `Bits`, so "offending value" and "remaining input" can't be unified
/// here the way they are for other decode failures).
pub fn constant<V: Clone + PartialEq + 'static>(value: V, encoded: Bits) -> Codec<V> {
    let enc_match = value.clone();
    let enc_bits = encoded.clone();
    let dec_value = value;
    let dec_bits = encoded;
    primitive(
        move |v: V| if v == enc_match { Ok(enc_bits.clone()) } else { Err((Error::new(ErrorKind::PredicateRejected("value does not match constant".to_string())), v)) },
        move |input: Bits| {
            let len = dec_bits.len();
            let (head, rest) = match input.split_at(len) {
                Ok(parts) => parts,
                Err(e) => return Err((e, input.clone())),
            };
            if head == dec_bits {
                Ok((dec_value.clone(), rest))
            } else {
                Err((Error::new(ErrorKind::PredicateRejected("input does not match constant".to_string())), input.clone()))
            }
        },
    )
}

/// `value(v)`: accepts only `v`, emits no bits; decode always yields `v`, consuming nothing, and never fails.
pub fn value<V: Clone + 'static>(v: V) -> Codec<V> {
    let dec_value = v;
    primitive(move |_: V| Ok(Bits::empty()), move |input: Bits| Ok((dec_value.clone(), input)))
}

/// `empty()`/`nothing()`: `value(())`, the unit/null sentinel codec.
pub fn empty() -> Codec<()> {
    value(())
}

pub fn nothing() -> Codec<()> {
    value(())
}

/// `fail(msg)`: always fails, in both directions, with the same message.
pub fn fail<V: 'static>(message: impl Into<String>) -> Codec<V> {
    let message = message.into();
    fail_with(message.clone(), message)
}

/// `fail(enc_msg, dec_msg)`: always fails, with distinct encode/decode messages.
pub fn fail_with<V: 'static>(encode_message: impl Into<String>, decode_message: impl Into<String>) -> Codec<V> {
    let encode_message = encode_message.into();
    let decode_message = decode_message.into();
    primitive(
        move |v: V| Err((Error::new(ErrorKind::Custom(encode_message.clone())), v)),
        move |input: Bits| Err((Error::new(ErrorKind::Custom(decode_message.clone())), input)),
    )
}

/// `bits_remaining()`: encodes to no bits; decodes to `true` iff the input is non-empty, consuming nothing.
pub fn bits_remaining() -> Codec<bool> {
    primitive(|_value: bool| Ok(Bits::empty()), |input: Bits| {
        let has_more = !input.is_empty();
        Ok((has_more, input))
    })
}
