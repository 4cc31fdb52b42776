//! The value dispatcher.
//!
//! Every nested value goes through [`encode_value`] / [`decode_value`]. They
//! first [`resolve`] who owns the representation of the declared type:
//!
//! 1. the type itself, if it is [`Kind::SelfDescribing`];
//! 2. otherwise an [`Override`] registered for the exact type;
//! 3. otherwise the type's default codec, selected by its [`Kind`].
//!
//! The stream carries no type tags: decoding is driven entirely by the
//! declared type, so both sides must resolve identically.

use std::any::type_name;

use crate::{
    composite::Mode,
    decode::Decoder,
    encode::Encoder,
    error::Result,
    overrides::{Override, OverrideRegistry},
    session::Session,
    value::{Kind, Serialize},
};

/// Who owns the representation of a type.
pub enum Resolution<'r, T> {
    /// The type's [`SelfDescribing`](crate::SelfDescribing) implementation.
    SelfDescribing,

    /// A registered override.
    Override(&'r dyn Override<T>),

    /// The default codec for the given kind.
    Default(Kind),
}

impl<T> std::fmt::Debug for Resolution<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfDescribing => f.write_str("SelfDescribing"),
            Self::Override(_) => f.write_str("Override"),
            Self::Default(kind) => f.debug_tuple("Default").field(kind).finish(),
        }
    }
}

/// Decides how `T` is encoded: self-describing beats override beats default.
#[must_use]
pub fn resolve<T: Serialize>(
    overrides: &OverrideRegistry,
) -> Resolution<'_, T> {
    if T::KIND == Kind::SelfDescribing {
        return Resolution::SelfDescribing;
    }

    match overrides.resolve::<T>() {
        Some(handler) => Resolution::Override(handler),
        None => Resolution::Default(T::KIND),
    }
}

/// Encodes `value` at its declared type.
///
/// # Errors
///
/// Propagates sink failures, errors from overrides and self-describing
/// types, and length violations.
pub fn encode_value<T: Serialize, E: Encoder + ?Sized>(
    value: &T,
    encoder: &mut E,
    session: &Session<'_>,
) -> Result<()> {
    match resolve::<T>(session.overrides()) {
        Resolution::SelfDescribing | Resolution::Default(_) => {
            value.encode(encoder, session)
        }

        Resolution::Override(handler) => {
            tracing::trace!(ty = type_name::<T>(), "encoding through override");

            let mut sink = encoder;
            handler.encode(value, &mut sink)
        }
    }
}

/// Decodes a value of declared type `T`.
///
/// # Errors
///
/// Propagates source failures (including truncation), malformed lengths and
/// errors from overrides and self-describing types.
pub fn decode_value<T: Serialize, D: Decoder + ?Sized>(
    decoder: &mut D,
    session: &Session<'_>,
) -> Result<T> {
    match resolve::<T>(session.overrides()) {
        Resolution::SelfDescribing | Resolution::Default(_) => {
            T::decode(decoder, session)
        }

        Resolution::Override(handler) => {
            tracing::trace!(ty = type_name::<T>(), "decoding through override");

            let mut source = decoder;
            handler.decode(&mut source)
        }
    }
}

/// Encodes a top-level value.
///
/// Identical to [`encode_value`] except that an unmarked composite is a
/// [`SchemaError`](crate::SchemaError) instead of being skipped.
///
/// # Errors
///
/// See [`encode_value`].
pub fn encode_root<T: Serialize, E: Encoder + ?Sized>(
    value: &T,
    encoder: &mut E,
    session: &Session<'_>,
) -> Result<()> {
    if let Resolution::Default(Kind::Composite(shape)) =
        resolve::<T>(session.overrides())
    {
        Mode::Strict.admit(shape, type_name::<T>())?;
    }

    encode_value(value, encoder, session)
}

/// Decodes a top-level value. The strict counterpart of [`decode_value`].
///
/// # Errors
///
/// See [`decode_value`].
pub fn decode_root<T: Serialize, D: Decoder + ?Sized>(
    decoder: &mut D,
    session: &Session<'_>,
) -> Result<T> {
    if let Resolution::Default(Kind::Composite(shape)) =
        resolve::<T>(session.overrides())
    {
        Mode::Strict.admit(shape, type_name::<T>())?;
    }

    decode_value(decoder, session)
}

/// Writes a presence byte, then `value` when present.
///
/// # Errors
///
/// See [`encode_value`].
pub fn encode_with_presence<T: Serialize, E: Encoder + ?Sized>(
    value: Option<&T>,
    encoder: &mut E,
    session: &Session<'_>,
) -> Result<()> {
    match value {
        Some(value) => {
            encoder.emit_presence(true)?;
            encode_value(value, encoder, session)
        }
        None => encoder.emit_presence(false),
    }
}

/// Reads what [`encode_with_presence`] writes.
///
/// # Errors
///
/// See [`decode_value`].
pub fn decode_with_presence<T: Serialize, D: Decoder + ?Sized>(
    decoder: &mut D,
    session: &Session<'_>,
) -> Result<Option<T>> {
    if decoder.read_presence()? {
        decode_value(decoder, session).map(Some)
    } else {
        Ok(None)
    }
}

/// An absent value is written the way the inner type's default codec asks
/// for, unless something other than the default codec owns the inner type.
/// In that case a presence byte guards it.
impl<T: Serialize> Serialize for Option<T> {
    const KIND: Kind = Kind::Nullable;

    fn encode<E: Encoder + ?Sized>(
        &self,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()> {
        match resolve::<T>(session.overrides()) {
            Resolution::Default(_) => {
                T::encode_nullable(self.as_ref(), encoder, session)
            }
            Resolution::SelfDescribing | Resolution::Override(_) => {
                encode_with_presence(self.as_ref(), encoder, session)
            }
        }
    }

    fn decode<D: Decoder + ?Sized>(
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<Self> {
        match resolve::<T>(session.overrides()) {
            Resolution::Default(_) => T::decode_nullable(decoder, session),
            Resolution::SelfDescribing | Resolution::Override(_) => {
                decode_with_presence(decoder, session)
            }
        }
    }
}
