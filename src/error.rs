//
// Copyright (c) 2015 Plausible Labs Cooperative, Inc.
// All rights reserved.
//
// This API is based on the design of Michael Pilquist and Paul Chiusano's
// Scala scodec library: https://github.com/scodec/scodec/
//

//! Error types shared by every codec operation.

use std::fmt;

use crate::bits::Bits;

/// The underlying nature of a codec failure.
///
/// Every combinator failure maps to exactly one of these kinds, with
/// `Custom` as the escape hatch for user-supplied predicates and
/// converters that want their own message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// A decoder needed more bits than the input contained.
    #[error("insufficient bits: requested {requested}, have {available}")]
    InsufficientBits { requested: usize, available: usize },
    /// An encoder was given a value that cannot be represented in the declared width.
    #[error("value {value} is out of range for a {width}-bit field")]
    ValueOutOfRange { value: String, width: usize },
    /// A predicate (`constant`, `ensure`, `refute`, `mapping`, ...) rejected a value.
    #[error("predicate rejected value: {0}")]
    PredicateRejected(String),
    /// `done` found bits left over after its inner codec ran.
    #[error("there was more to parse")]
    TrailingData,
    /// A user-supplied closure passed to `create`/`convert`/`then`/a predicate panicked.
    #[error("{0}")]
    UserFault(String),
    /// Any other failure, including combinator exhaustion (`choice`/`fail`).
    #[error("{0}")]
    Custom(String),
}

/// Error type returned by every encode/decode operation.
///
/// Carries an optional dotted context path, built up by [`crate::combinators::with_context`],
/// so that a failure deep inside a composed codec can be traced back to the
/// field that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    context: Vec<String>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error { kind, context: Vec::new() }
    }

    /// Construct an `Error` from a plain message, for call sites that don't
    /// yet distinguish a specific [`ErrorKind`].
    pub fn from_message<S: Into<String>>(message: S) -> Self {
        Error::new(ErrorKind::Custom(message.into()))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Push a context segment (innermost first); rendered outermost-first in `Display`.
    pub fn push_context<S: Into<String>>(mut self, ctx: S) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// The fully-qualified, human-readable message, including any pushed context.
    pub fn message(&self) -> String {
        format!("{}", self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            let path = self.context.iter().rev().cloned().collect::<Vec<_>>().join("/");
            write!(f, "{}: {}", path, self.kind)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Result of an `encode` operation: the encoded bits, or the error and the
/// offending value that could not be encoded.
pub type EncodeResult<V> = Result<Bits, (Error, V)>;

/// Result of a `decode` operation: the decoded value and the unconsumed
/// remainder, or the error and the remaining input at the point of failure.
pub type DecodeResult<V> = Result<(V, Bits), (Error, Bits)>;
