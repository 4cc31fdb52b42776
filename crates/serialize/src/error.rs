//! Error types shared by every encode and decode path.
//!
//! Any error aborts the whole encode/decode call. The position of the
//! underlying stream is unspecified afterwards, so callers discard the stream
//! rather than resume it.

use std::{fmt, io, string::FromUtf8Error};

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The type being encoded or decoded does not satisfy what the requested
/// operation needs from its declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A top-level (strict) call reached a type that is not marked
    /// serializable.
    #[error("type `{type_name}` is not marked serializable")]
    NotSerializable {
        /// Name of the offending type.
        type_name: &'static str,
    },
}

/// Which length prefix a [`Error::MalformedLength`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthField {
    /// The byte length in front of a UTF-8 string.
    String,

    /// The element count in front of a sequence.
    Sequence,
}

impl fmt::Display for LengthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string byte length"),
            Self::Sequence => f.write_str("sequence element count"),
        }
    }
}

/// Errors produced by the codec.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// See [`SchemaError`].
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The source ran out of bytes before a fixed-width value, a declared
    /// string length or a declared element count was satisfied.
    #[error("stream truncated: needed {needed} bytes but only {read} remained")]
    TruncatedStream {
        /// Bytes the current read step required.
        needed: usize,

        /// Bytes that were actually available for that step.
        read: usize,
    },

    /// A length prefix exceeds the accepted bound. Raised before any
    /// allocation sized by the prefix.
    #[error("malformed {field}: {length} exceeds the limit of {limit}")]
    MalformedLength {
        /// The prefix that was rejected.
        field: LengthField,

        /// The offending length, widened so encode-side values fit.
        length: u64,

        /// The bound that was in effect.
        limit: u64,
    },

    /// A fixed-size array was decoded from a sequence of a different length.
    #[error("expected an array of {expected} elements, found {found}")]
    ArrayLength {
        /// Length of the target array type.
        expected: usize,

        /// Element count read from the stream.
        found: usize,
    },

    /// A registered override reported a failure of its own.
    #[error("override for `{type_name}` failed")]
    OverrideInvocation {
        /// The type the override is registered for.
        type_name: &'static str,

        /// What the override reported.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A string payload was not valid UTF-8.
    #[error("invalid UTF-8 in string payload")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// A decimal was decoded from a floating point value it cannot represent.
    #[error("floating point value {0} is outside the decimal range")]
    DecimalOutOfRange(f64),

    /// An absent marker was read where the target type cannot be absent.
    #[error("absent value read for non-optional `{type_name}`")]
    UnexpectedAbsent {
        /// The type that was being decoded.
        type_name: &'static str,
    },

    /// The underlying sink or source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Wraps a failure raised inside an [`Override`](crate::Override) for
    /// type `T`.
    pub fn override_failed<T: ?Sized>(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::OverrideInvocation {
            type_name: std::any::type_name::<T>(),
            source: source.into(),
        }
    }
}
