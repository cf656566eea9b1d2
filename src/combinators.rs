//
// Copyright (c) 2015 Plausible Labs Cooperative, Inc.
// All rights reserved.
//
// This API is based on the design of Michael Pilquist and Paul Chiusano's
// Scala scodec library: https://github.com/scodec/scodec/
//

//! Structural combinators: functions from codecs to codecs that never
//! inspect payload semantics. Generalizes `hlist_prepend_codec` (pair
//! composition for a fixed heterogeneous shape) into `combine` (pair
//! composition for any two codecs) and the rest of the structural
//! combinator set: `fallback`/`choice`, `convert`/`then`, list shaping,
//! and error-context injection.
//!
//! Every multi-element combinator (`sequence`, `take_while`/`take_until`/
//! `list`, `list_of`) drives its loop with a plain `while`/`for`, never
//! recursion, so that decoding a long list does not grow the call stack —
//! `list(byte())` must decode a million-byte input without exhausting the
//! stack on a default-configured runtime.

use std::rc::Rc;

use crate::bits::Bits;
use crate::codec::{Codec, DecodeResult, EncodeResult};
use crate::error::{Error, ErrorKind};
use crate::primitives;

fn raw<V: 'static>(
    encode: impl Fn(V) -> EncodeResult<V> + 'static,
    decode: impl Fn(Bits) -> DecodeResult<V> + 'static,
) -> Codec<V> {
    Codec::from_raw(Rc::new(encode), Rc::new(decode))
}

/// `combine(c1, c2)`: pairs two codecs. Encodes `(a, b)` by encoding each
/// half and concatenating; decodes `c1` then `c2` over the remainder.
/// First-error-wins: if `a` fails to encode, `b` is never attempted.
pub fn combine<A: Clone + 'static, B: Clone + 'static>(c1: Codec<A>, c2: Codec<B>) -> Codec<(A, B)> {
    let (dec_c1, dec_c2) = (c1.clone(), c2.clone());
    raw(
        move |(a, b): (A, B)| {
            let a_backup = a.clone();
            match c1.encode(a) {
                Ok(bits_a) => match c2.encode(b) {
                    Ok(bits_b) => Ok(bits_a.concat(&bits_b)),
                    Err((e, b)) => Err((e, (a_backup, b))),
                },
                Err((e, a)) => Err((e, (a, b))),
            }
        },
        move |bits: Bits| {
            let (a, rest) = dec_c1.decode(bits)?;
            let (b, rest) = dec_c2.decode(rest)?;
            Ok(((a, b), rest))
        },
    )
}

/// `fallback(c1, c2)`: tries `c1`; on `Err`, tries `c2`. Independently for
/// encode and decode. The remainder on success is the winner's; on total
/// failure, `c2`'s error is returned.
pub fn fallback<A: Clone + 'static>(c1: Codec<A>, c2: Codec<A>) -> Codec<A> {
    let (dec_c1, dec_c2) = (c1.clone(), c2.clone());
    raw(
        move |value: A| match c1.encode(value.clone()) {
            Ok(bits) => Ok(bits),
            Err(_) => c2.encode(value),
        },
        move |bits: Bits| match dec_c1.decode(bits.clone()) {
            Ok(result) => Ok(result),
            Err(_) => dec_c2.decode(bits),
        },
    )
}

/// `choice([c1, ..., cn])`: folds [`fallback`] right-to-left, terminated by
/// `fail("None of the choices worked")`.
pub fn choice<A: Clone + 'static>(codecs: Vec<Codec<A>>) -> Codec<A> {
    let mut iter = codecs.into_iter().rev();
    let mut acc = match iter.next() {
        Some(last) => last,
        None => return primitives::fail("None of the choices worked"),
    };
    for c in iter {
        acc = fallback(c, acc);
    }
    acc
}

/// `optional(c)`: `fallback(c, nothing())`, specialized to `Option<A>` since
/// `c: Codec<A>` and `nothing(): Codec<()>` have different value types.
pub fn optional<A: Clone + 'static>(c: Codec<A>) -> Codec<Option<A>> {
    let enc_c = c.clone();
    raw(
        move |value: Option<A>| match value {
            Some(a) => enc_c.encode(a).map_err(|(e, a)| (e, Some(a))),
            None => Ok(Bits::empty()),
        },
        move |bits: Bits| match c.decode(bits.clone()) {
            Ok((a, rest)) => Ok((Some(a), rest)),
            Err(_) => Ok((None, bits)),
        },
    )
}

/// `peek(c)`: encodes as empty bits for any value; decodes by running
/// `c.decode` but returning the *original* input as the remainder, so no
/// bits are consumed either way.
pub fn peek<A: Clone + 'static>(c: Codec<A>) -> Codec<A> {
    raw(
        move |_value: A| Ok(Bits::empty()),
        move |bits: Bits| match c.decode(bits.clone()) {
            Ok((a, _consumed_rest)) => Ok((a, bits)),
            Err((e, _)) => Err((e, bits)),
        },
    )
}

/// `convert(c, to, from)`: a functorial mapping. Decode runs `c` then
/// applies `to`; encode applies `from` then runs `c`. Caller must ensure
/// `to` and `from` are mutual inverses on the inhabited domain.
pub fn convert<A: Clone + 'static, B: Clone + 'static>(
    c: Codec<A>,
    to: impl Fn(A) -> Result<B, Error> + 'static,
    from: impl Fn(B) -> Result<A, Error> + 'static,
) -> Codec<B> {
    let dec_c = c.clone();
    raw(
        move |b: B| match from(b.clone()) {
            Ok(a) => c.encode(a).map_err(|(e, _a)| (e, b)),
            Err(e) => Err((e, b)),
        },
        move |bits: Bits| {
            let (a, rest) = dec_c.decode(bits)?;
            match to(a) {
                Ok(b) => Ok((b, rest)),
                Err(e) => Err((e, rest)),
            }
        },
    )
}

/// `then(c, next, back)`: monadic bind. Decode produces `a` via `c`, then
/// decodes the remainder with `next(a)`. Encode of `v` computes the prefix
/// value `back(v)`, encodes it with `c`, then encodes `v` with `next(back(v))`
/// and concatenates.
pub fn then<A: Clone + 'static, B: Clone + 'static>(
    c: Codec<A>,
    next: impl Fn(A) -> Codec<B> + 'static,
    back: impl Fn(&B) -> A + 'static,
) -> Codec<B> {
    let dec_c = c.clone();
    let next: Rc<dyn Fn(A) -> Codec<B>> = Rc::new(next);
    let dec_next = next.clone();
    raw(
        move |b: B| {
            let a = back(&b);
            let bits_a = c.encode(a.clone()).map_err(|(e, _)| (e, b.clone()))?;
            let next_codec = next(a);
            let bits_b = next_codec.encode(b.clone()).map_err(|(e, _)| (e, b))?;
            Ok(bits_a.concat(&bits_b))
        },
        move |bits: Bits| {
            let (a, rest) = dec_c.decode(bits)?;
            let next_codec = dec_next(a);
            next_codec.decode(rest)
        },
    )
}

/// `ensure(c, pred, msg)`: post-condition, both directions.
pub fn ensure<A: Clone + 'static>(c: Codec<A>, pred: impl Fn(&A) -> bool + 'static, msg: impl Into<String>) -> Codec<A> {
    let msg = msg.into();
    let enc_msg = msg.clone();
    let dec_c = c.clone();
    let pred: Rc<dyn Fn(&A) -> bool> = Rc::new(pred);
    let dec_pred = pred.clone();
    raw(
        move |value: A| {
            if pred(&value) {
                c.encode(value)
            } else {
                Err((Error::new(ErrorKind::PredicateRejected(enc_msg.clone())), value))
            }
        },
        move |bits: Bits| {
            let original = bits.clone();
            let (value, rest) = dec_c.decode(bits)?;
            if dec_pred(&value) {
                Ok((value, rest))
            } else {
                Err((Error::new(ErrorKind::PredicateRejected(msg.clone())), original))
            }
        },
    )
}

/// `refute(c, pred, msg)`: `ensure(c, |a| !pred(a), msg)`.
pub fn refute<A: Clone + 'static>(c: Codec<A>, pred: impl Fn(&A) -> bool + 'static, msg: impl Into<String>) -> Codec<A> {
    ensure(c, move |a| !pred(a), msg)
}

/// `done(c)`: succeeds only if no bits remain after `c`.
pub fn done<A: 'static>(c: Codec<A>) -> Codec<A> {
    let dec_c = c.clone();
    raw(
        move |value: A| c.encode(value),
        move |bits: Bits| {
            let (value, rest) = dec_c.decode(bits)?;
            if rest.is_empty() {
                Ok((value, rest))
            } else {
                Err((Error::new(ErrorKind::TrailingData), rest))
            }
        },
    )
}

/// `with_context(ctx, c)`: injects additional context into a codec's error
/// messages, equivalent to `rcodec`'s `"ctx" | codec` operator override,
/// expressed here as a plain combinator rather than an operator overload.
pub fn with_context<A: 'static>(ctx: impl Into<String>, c: Codec<A>) -> Codec<A> {
    let ctx: Rc<str> = Rc::from(ctx.into());
    let enc_ctx = ctx.clone();
    let dec_c = c.clone();
    raw(
        move |value: A| c.encode(value).map_err(|(e, v)| (e.push_context(enc_ctx.to_string()), v)),
        move |bits: Bits| dec_c.decode(bits).map_err(|(e, r)| (e.push_context(ctx.to_string()), r)),
    )
}

/// `cons(head_c, tail_c)`: prepend `head_c`'s value onto `tail_c`'s list.
/// Encoding an empty list fails (there is no head to split off).
pub fn cons<A: Clone + 'static>(head_c: Codec<A>, tail_c: Codec<Vec<A>>) -> Codec<Vec<A>> {
    let (dec_head_c, dec_tail_c) = (head_c.clone(), tail_c.clone());
    raw(
        move |list: Vec<A>| {
            if list.is_empty() {
                return Err((
                    Error::new(ErrorKind::PredicateRejected("cannot encode an empty list as a non-empty list".to_string())),
                    list,
                ));
            }
            let original = list.clone();
            let mut iter = list.into_iter();
            let head = iter.next().unwrap();
            let tail: Vec<A> = iter.collect();
            let head_bits = head_c.encode(head).map_err(|(e, _)| (e, original.clone()))?;
            let tail_bits = tail_c.encode(tail).map_err(|(e, _)| (e, original))?;
            Ok(head_bits.concat(&tail_bits))
        },
        move |bits: Bits| {
            let (head, rest) = dec_head_c.decode(bits)?;
            let (mut tail, rest) = dec_tail_c.decode(rest)?;
            tail.insert(0, head);
            Ok((tail, rest))
        },
    )
}

/// `append(list_c, elem_c)`: the dual of `cons` on the right end.
pub fn append<A: Clone + 'static>(list_c: Codec<Vec<A>>, elem_c: Codec<A>) -> Codec<Vec<A>> {
    let (dec_list_c, dec_elem_c) = (list_c.clone(), elem_c.clone());
    raw(
        move |list: Vec<A>| {
            if list.is_empty() {
                return Err((
                    Error::new(ErrorKind::PredicateRejected("cannot encode an empty list as a non-empty list".to_string())),
                    list,
                ));
            }
            let original = list.clone();
            let mut list = list;
            let last = list.pop().unwrap();
            let init = list;
            let init_bits = list_c.encode(init).map_err(|(e, _)| (e, original.clone()))?;
            let last_bits = elem_c.encode(last).map_err(|(e, _)| (e, original))?;
            Ok(init_bits.concat(&last_bits))
        },
        move |bits: Bits| {
            let (mut list, rest) = dec_list_c.decode(bits)?;
            let (elem, rest) = dec_elem_c.decode(rest)?;
            list.push(elem);
            Ok((list, rest))
        },
    )
}

/// `sequence([c1, ..., cn])`: encodes/decodes a fixed-length, single-typed
/// list, one element per codec, in order. Iterative, not the conceptual
/// right-fold-of-`cons`, so that long sequences don't recurse.
pub fn sequence<A: Clone + 'static>(codecs: Vec<Codec<A>>) -> Codec<Vec<A>> {
    let decode_codecs = codecs.clone();
    raw(
        move |values: Vec<A>| {
            if values.len() != codecs.len() {
                return Err((
                    Error::new(ErrorKind::PredicateRejected(format!(
                        "expected {} values, got {}",
                        codecs.len(),
                        values.len()
                    ))),
                    values,
                ));
            }
            let original = values.clone();
            let mut acc = Bits::empty();
            for (codec, value) in codecs.iter().zip(values.into_iter()) {
                match codec.encode(value) {
                    Ok(bits) => acc = acc.concat(&bits),
                    Err((e, _)) => return Err((e, original)),
                }
            }
            Ok(acc)
        },
        move |mut bits: Bits| {
            let mut values = Vec::with_capacity(decode_codecs.len());
            for codec in decode_codecs.iter() {
                let (value, rest) = codec.decode(bits)?;
                values.push(value);
                bits = rest;
            }
            Ok((values, bits))
        },
    )
}

/// `list_of(n, c)`: `sequence(replicate(n, c))`. `n == 0` is the empty codec.
pub fn list_of<A: Clone + 'static>(n: usize, c: Codec<A>) -> Codec<Vec<A>> {
    sequence(vec![c; n])
}

/// `take_while(bool_c, elem_c)`: repeatedly decode `bool_c`; `true` decodes
/// one more `elem_c` and continues, `false` stops. Encode emits, per
/// element, `bool_c(true)` then `elem_c(elem)`, finally `bool_c(false)`.
pub fn take_while<A: Clone + 'static>(bool_c: Codec<bool>, elem_c: Codec<A>) -> Codec<Vec<A>> {
    let (dec_bool_c, dec_elem_c) = (bool_c.clone(), elem_c.clone());
    raw(
        move |values: Vec<A>| {
            let original = values.clone();
            let mut acc = Bits::empty();
            for value in values.into_iter() {
                match bool_c.encode(true) {
                    Ok(flag_bits) => acc = acc.concat(&flag_bits),
                    Err((e, _)) => return Err((e, original)),
                }
                match elem_c.encode(value) {
                    Ok(elem_bits) => acc = acc.concat(&elem_bits),
                    Err((e, _)) => return Err((e, original)),
                }
            }
            match bool_c.encode(false) {
                Ok(flag_bits) => acc = acc.concat(&flag_bits),
                Err((e, _)) => return Err((e, original)),
            }
            Ok(acc)
        },
        move |mut bits: Bits| {
            let mut values = Vec::new();
            loop {
                let (more, rest) = dec_bool_c.decode(bits)?;
                bits = rest;
                if !more {
                    break;
                }
                let (value, rest) = dec_elem_c.decode(bits)?;
                values.push(value);
                bits = rest;
            }
            Ok((values, bits))
        },
    )
}

fn negate_bool(c: Codec<bool>) -> Codec<bool> {
    convert(c, |b| Ok(!b), |b| Ok(!b))
}

/// `take_until(bool_c, elem_c)`: `take_while(not(bool_c), elem_c)`.
pub fn take_until<A: Clone + 'static>(bool_c: Codec<bool>, elem_c: Codec<A>) -> Codec<Vec<A>> {
    take_while(negate_bool(bool_c), elem_c)
}

/// `list(c)`: `take_while(bits_remaining(), c)` — greedily decodes until
/// input is exhausted.
pub fn list<A: Clone + 'static>(c: Codec<A>) -> Codec<Vec<A>> {
    take_while(primitives::bits_remaining(), c)
}

/// `non_empty_list(c)`: `cons(c, list(c))`.
pub fn non_empty_list<A: Clone + 'static>(c: Codec<A>) -> Codec<Vec<A>> {
    cons(c.clone(), list(c))
}

/// `length_prefixed(len_c, elem_c)`: `then(len_c, n => list_of(n, elem_c), list => length(list))`.
pub fn length_prefixed<A: Clone + 'static>(len_c: Codec<u64>, elem_c: Codec<A>) -> Codec<Vec<A>> {
    then(
        len_c,
        move |n: u64| list_of(n as usize, elem_c.clone()),
        |list: &Vec<A>| list.len() as u64,
    )
}

/// `map_list(c, f, g)`: `convert(c, elementwise f, elementwise g)`.
pub fn map_list<A: Clone + 'static, B: Clone + 'static>(
    c: Codec<Vec<A>>,
    f: impl Fn(A) -> B + 'static,
    g: impl Fn(B) -> A + 'static,
) -> Codec<Vec<B>> {
    convert(
        c,
        move |list: Vec<A>| Ok(list.into_iter().map(&f).collect()),
        move |list: Vec<B>| Ok(list.into_iter().map(&g).collect()),
    )
}

/// `reverse(c)`: `convert(c, reverse, reverse)`.
pub fn reverse<A: Clone + 'static>(c: Codec<Vec<A>>) -> Codec<Vec<A>> {
    convert(
        c,
        |list: Vec<A>| {
            let mut list = list;
            list.reverse();
            Ok(list)
        },
        |list: Vec<A>| {
            let mut list = list;
            list.reverse();
            Ok(list)
        },
    )
}

/// `mapping(c, m)`: dictionary-based `convert`. `m` must be injective; the
/// inverse is precomputed once. Injectivity is a construction-time
/// contract, like `bits(k)`'s implicit `k >= 0` requirement — violating it
/// panics when `mapping` is called, not when the resulting codec is used.
pub fn mapping<A, B>(c: Codec<A>, m: Vec<(A, B)>) -> Codec<B>
where
    A: Clone + PartialEq + 'static,
    B: Clone + PartialEq + 'static,
{
    for i in 0..m.len() {
        for j in (i + 1)..m.len() {
            assert!(m[i].1 != m[j].1, "mapping is not injective: two keys map to the same value");
        }
    }
    let forward = m.clone();
    let backward = m;
    let dec_c = c.clone();
    raw(
        move |b: B| match forward.iter().find(|(_, candidate)| *candidate == b) {
            Some((a, _)) => c.encode(a.clone()).map_err(|(e, _)| (e, b)),
            None => Err((Error::new(ErrorKind::PredicateRejected("value is not in the mapping's codomain".to_string())), b)),
        },
        move |bits: Bits| {
            let original = bits.clone();
            let (a, rest) = dec_c.decode(bits)?;
            match backward.iter().find(|(candidate, _)| *candidate == a) {
                Some((_, b)) => Ok((b.clone(), rest)),
                None => Err((Error::new(ErrorKind::PredicateRejected("decoded value is not a mapping key".to_string())), original)),
            }
        },
    )
}

/// `join(list_codec, group_size)`: reshapes a `Codec<Vec<Bits>>` into a
/// `Codec<Bits>` by concatenating on encode and splitting into
/// `group_size`-bit groups on decode. Fails if the length isn't a
/// multiple of `group_size`.
pub fn join(list_codec: Codec<Vec<Bits>>, group_size: usize) -> Codec<Bits> {
    convert(
        list_codec,
        move |list: Vec<Bits>| Ok(list.into_iter().fold(Bits::empty(), |acc, b| acc.concat(&b))),
        move |joined: Bits| {
            if group_size == 0 {
                return if joined.is_empty() {
                    Ok(Vec::new())
                } else {
                    Err(Error::from_message("join group_size must be positive"))
                };
            }
            if joined.len() % group_size != 0 {
                return Err(Error::new(ErrorKind::PredicateRejected(format!(
                    "bit length {} is not a multiple of group size {}",
                    joined.len(),
                    group_size
                ))));
            }
            let mut groups = Vec::with_capacity(joined.len() / group_size);
            let mut remaining = joined;
            while !remaining.is_empty() {
                let (group, rest) = remaining.split_at(group_size)?;
                groups.push(group);
                remaining = rest;
            }
            Ok(groups)
        },
    )
}

/// `pad(c, k)`: appends `k` zero bits after `c` on encode; on decode,
/// consumes `c`'s bits then requires the next `k` bits to be exactly
/// zero, the strict-check behavior expected by Base16/32/64-style
/// clients.
pub fn pad<A: 'static>(c: Codec<A>, k: usize) -> Codec<A> {
    let dec_c = c.clone();
    raw(
        move |value: A| {
            let bits = c.encode(value)?;
            let padding = Bits::from_uint(0, k).expect("zero always fits in k bits");
            Ok(bits.concat(&padding))
        },
        move |bits: Bits| {
            let (value, rest) = dec_c.decode(bits)?;
            let (padding, rest) = rest.split_at(k).map_err(|e| (e, rest.clone()))?;
            if padding.is_zero() {
                Ok((value, rest))
            } else {
                Err((Error::new(ErrorKind::PredicateRejected("padding bits were not all zero".to_string())), rest))
            }
        },
    )
}
