//! The closed value model every serializable type maps onto.
//!
//! Each type implementing [`Serialize`] declares a [`Kind`] at compile time.
//! The dispatcher matches on that kind (and on the override registry) instead
//! of probing values at runtime.

use crate::{
    decode::Decoder,
    dispatch,
    encode::Encoder,
    error::Result,
    session::Session,
};

/// The fixed set of primitive kinds the codec understands natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    /// [`Decimal`](crate::Decimal), carried as a double.
    Decimal,
}

impl PrimitiveKind {
    /// Number of bytes a value of this kind occupies on the wire.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 | Self::Decimal => 8,
        }
    }
}

/// Declaration-level facts about a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Whether the type carries the serializable marker. Unmarked types are
    /// skipped by permissive dispatch and rejected by strict calls.
    pub marked: bool,

    /// Whether a presence byte precedes the members. Reference-like
    /// composites are nullable, value-type composites are not.
    pub nullable: bool,
}

impl Shape {
    /// A marked composite with a presence byte.
    pub const REFERENCE: Self = Self { marked: true, nullable: true };

    /// A marked composite without a presence byte.
    pub const VALUE: Self = Self { marked: true, nullable: false };
}

/// What a serializable type is, as far as default dispatch is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Fixed-width primitive.
    Primitive(PrimitiveKind),

    /// Length-prefixed UTF-8 string.
    String,

    /// Length-prefixed homogeneous sequence, dynamic or fixed-size.
    Sequence,

    /// A value that may be absent (`Option<T>`).
    Nullable,

    /// Member-by-member composite.
    Composite(Shape),

    /// A type that owns its entire byte layout.
    SelfDescribing,
}

/// A type the codec can encode and decode.
///
/// Implementations exist for the primitive set, `String`, `Vec<T>`,
/// `[T; N]`, `Box<[T]>` and `Option<T>`. Composite types get theirs from
/// `#[derive(Serializable)]`.
///
/// `encode` and `decode` are the type's default representation. Callers
/// normally go through [`encode_value`](crate::encode_value) and
/// [`decode_value`](crate::decode_value), which consult self-describing
/// behavior and registered overrides first.
pub trait Serialize: Sized + 'static {
    /// The kind default dispatch treats this type as.
    const KIND: Kind;

    /// Writes the default representation of `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails or a nested value cannot be
    /// encoded.
    fn encode<E: Encoder + ?Sized>(
        &self,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()>;

    /// Reads the default representation of `Self`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is truncated or malformed.
    fn decode<D: Decoder + ?Sized>(
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<Self>;

    /// Writes a possibly absent value.
    ///
    /// The default writes a presence byte followed by the value when present.
    /// Sequences and nullable composites override this with their own absent
    /// representation.
    ///
    /// # Errors
    ///
    /// Same as [`Serialize::encode`].
    fn encode_nullable<E: Encoder + ?Sized>(
        value: Option<&Self>,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()> {
        dispatch::encode_with_presence(value, encoder, session)
    }

    /// Reads what [`Serialize::encode_nullable`] writes.
    ///
    /// # Errors
    ///
    /// Same as [`Serialize::decode`].
    fn decode_nullable<D: Decoder + ?Sized>(
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<Option<Self>> {
        dispatch::decode_with_presence(decoder, session)
    }
}

/// A type that encodes and decodes itself.
///
/// Self-describing behavior takes priority over registered overrides and
/// over composite encoding. Hook it up with
/// `#[derive(Serializable)] #[serialize(self_describing)]`.
///
/// The implementation must read exactly the bytes it writes.
pub trait SelfDescribing: Sized + 'static {
    /// Writes `self`.
    ///
    /// # Errors
    ///
    /// Whatever the implementation or the sink reports.
    fn encode_self<E: Encoder + ?Sized>(&self, encoder: &mut E) -> Result<()>;

    /// Reads a new instance.
    ///
    /// # Errors
    ///
    /// Whatever the implementation or the source reports.
    fn decode_self<D: Decoder + ?Sized>(decoder: &mut D) -> Result<Self>;
}
