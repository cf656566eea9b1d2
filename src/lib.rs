//
// Copyright (c) 2015 Plausible Labs Cooperative, Inc.
// All rights reserved.
//
// This API is based on the design of Michael Pilquist and Paul Chiusano's
// Scala scodec library: https://github.com/scodec/scodec/
//

//! Combinators for purely functional, declarative, bit-level encoding and
//! decoding of binary data.
//!
//! A codec pairs an encoder and a decoder as a single value so the two can
//! never drift apart. Primitive codecs ([`primitives`]) describe terminal
//! wire shapes (fixed-width integers, raw bit/byte spans, constants);
//! structural combinators ([`combinators`]) build larger codecs out of
//! smaller ones without ever looking at the payload. [`bits::Bits`] is the
//! immutable, bit-addressable buffer both layers operate on.

pub mod bits;
pub mod codec;
pub mod combinators;
pub mod compressed;
pub mod error;
pub mod primitives;

pub use bits::Bits;
pub use codec::{create, decode, encode, Codec};
pub use error::{DecodeResult, EncodeResult, Error, ErrorKind};
