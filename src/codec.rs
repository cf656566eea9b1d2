//
// Copyright (c) 2015 Plausible Labs Cooperative, Inc.
// All rights reserved.
//
// This API is based on the design of Michael Pilquist and Paul Chiusano's
// Scala scodec library: https://github.com/scodec/scodec/
//

//! The codec contract: a pair of total functions wrapped so that runtime
//! faults are reflected as `Err` results rather than unwound panics.

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::bits::Bits;
use crate::error::{Error, ErrorKind};

pub use crate::error::{DecodeResult, EncodeResult};

/// Implements encoding and decoding of values of type `V`.
///
/// A closure pair, boxed behind `Rc` (rather than `Box`) so that codecs
/// are cheaply `Clone` and can be constructed once and shared freely:
/// two separate decodes of the same bits with the same codec produce
/// identical results.
///
/// `V: Clone` is required throughout this crate's combinators, not just
/// here: `fallback` must retry encoding the same value against a second
/// codec after the first attempt consumed it, and every combinator that
/// echoes an "offending value" back in an `Err` needs a copy of it to
/// survive a caught panic in user code. The panic-catching net is
/// reserved for user-supplied closures and is where the bound below is
/// actually exercised; library-provided combinators return `Err` directly
/// and don't need it.
pub struct Codec<V> {
    encoder: Rc<dyn Fn(V) -> EncodeResult<V>>,
    decoder: Rc<dyn Fn(Bits) -> DecodeResult<V>>,
}

impl<V> Clone for Codec<V> {
    fn clone(&self) -> Self {
        Codec { encoder: self.encoder.clone(), decoder: self.decoder.clone() }
    }
}

impl<V: 'static> Codec<V> {
    pub fn encode(&self, value: V) -> EncodeResult<V> {
        (self.encoder)(value)
    }

    pub fn decode(&self, bits: Bits) -> DecodeResult<V> {
        (self.decoder)(bits)
    }

    /// Build a `Codec` directly from a closure pair, without the `create`
    /// fault-catching wrapper or its `V: Clone` bound. Reserved for
    /// library-provided primitives and combinators, which are written to
    /// return `Err` explicitly and never panic; user-facing constructors
    /// should go through [`create`] instead.
    pub(crate) fn from_raw(
        encoder: Rc<dyn Fn(V) -> EncodeResult<V>>,
        decoder: Rc<dyn Fn(Bits) -> DecodeResult<V>>,
    ) -> Codec<V> {
        Codec { encoder, decoder }
    }
}

/// Wraps `encode`/`decode` functions so that a panic inside either one is
/// caught and surfaced as `Err` instead of unwinding into the caller.
///
/// Only user-supplied closures (those passed through `convert`, `then`,
/// `ensure`, `refute`, `mapping`, or directly to `create`) are expected to
/// panic; library-provided combinators are written to return `Err`
/// directly and never panic, so wrapping them again here would just be
/// paying the `catch_unwind` cost for no benefit. `create` is nonetheless
/// the single point where *any* codec, including directly hand-written
/// ones, gets the net for free.
pub fn create<V: Clone + 'static>(
    encode: impl Fn(V) -> EncodeResult<V> + 'static,
    decode: impl Fn(Bits) -> DecodeResult<V> + 'static,
) -> Codec<V> {
    Codec {
        encoder: Rc::new(move |value: V| {
            let guard = value.clone();
            match panic::catch_unwind(AssertUnwindSafe(|| encode(value))) {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(&payload);
                    log::trace!("codec encode panicked: {}", message);
                    Err((Error::new(ErrorKind::UserFault(format!("Failed to encode: {}", message))), guard))
                }
            }
        }),
        decoder: Rc::new(move |bits: Bits| {
            let guard = bits.clone();
            match panic::catch_unwind(AssertUnwindSafe(|| decode(bits))) {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(&payload);
                    log::trace!("codec decode panicked: {}", message);
                    Err((Error::new(ErrorKind::UserFault(format!("Failed to decode: {}", message))), guard))
                }
            }
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Top-level driver: `encode(value, codec)`. Equivalent to the method
/// form `codec.encode(value)`, which is what the rest of this crate uses
/// internally.
pub fn encode<V: 'static>(value: V, codec: &Codec<V>) -> EncodeResult<V> {
    codec.encode(value)
}

/// Top-level driver: `decode(bits, codec)`.
pub fn decode<V: 'static>(bits: Bits, codec: &Codec<V>) -> DecodeResult<V> {
    codec.decode(bits)
}
