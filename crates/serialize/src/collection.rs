//! Length-prefixed homogeneous sequences.
//!
//! `Vec<T>`, `[T; N]` and `Box<[T]>` share one wire format:
//!
//! ```text
//! [u32 element count][element 0][element 1]...[element n-1]
//! ```
//!
//! Each element goes back through the dispatcher at `T`, so overrides and
//! self-describing element types apply per element. Streams written from one
//! container decode into any other of the same element type.
//!
//! An absent `Vec<T>` or `Box<[T]>` is written as an empty one and always
//! decodes as `Some` of an empty sequence.

use crate::{
    decode::Decoder,
    dispatch::{decode_value, encode_value},
    encode::Encoder,
    error::{Error, LengthField, Result},
    session::Session,
    value::{Kind, Serialize},
};

/// Preallocation cap for decoded sequences; growth past it follows the data.
const PREALLOCATE_LIMIT: usize = 4 * 1024;

/// Writes the element count, then every element.
///
/// # Errors
///
/// Returns [`Error::MalformedLength`] for slices longer than the wire format
/// allows, or whatever encoding an element reports.
pub fn encode_sequence<T: Serialize, E: Encoder + ?Sized>(
    elements: &[T],
    encoder: &mut E,
    session: &Session<'_>,
) -> Result<()> {
    encoder.emit_length(LengthField::Sequence, elements.len())?;
    for element in elements {
        encode_value(element, encoder, session)?;
    }
    Ok(())
}

/// Reads a sequence written by [`encode_sequence`].
///
/// # Errors
///
/// Returns [`Error::MalformedLength`] when the count exceeds the configured
/// bound, or whatever decoding an element reports.
pub fn decode_sequence<T: Serialize, D: Decoder + ?Sized>(
    decoder: &mut D,
    session: &Session<'_>,
) -> Result<Vec<T>> {
    let len = decoder.read_length(LengthField::Sequence)?;

    let mut elements = Vec::with_capacity(len.min(PREALLOCATE_LIMIT));
    for _ in 0..len {
        elements.push(decode_value(decoder, session)?);
    }
    Ok(elements)
}

/// Reads a sequence into a fixed-size array.
///
/// # Errors
///
/// Returns [`Error::ArrayLength`] when the stream holds a different number of
/// elements than `N`.
pub fn decode_array<T: Serialize, D: Decoder + ?Sized, const N: usize>(
    decoder: &mut D,
    session: &Session<'_>,
) -> Result<[T; N]> {
    let elements = decode_sequence::<T, D>(decoder, session)?;

    elements.try_into().map_err(|elements: Vec<T>| Error::ArrayLength {
        expected: N,
        found: elements.len(),
    })
}

impl<T: Serialize> Serialize for Vec<T> {
    const KIND: Kind = Kind::Sequence;

    fn encode<E: Encoder + ?Sized>(
        &self,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()> {
        encode_sequence(self, encoder, session)
    }

    fn decode<D: Decoder + ?Sized>(
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<Self> {
        decode_sequence(decoder, session)
    }

    fn encode_nullable<E: Encoder + ?Sized>(
        value: Option<&Self>,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()> {
        encode_sequence(value.map_or(&[][..], Vec::as_slice), encoder, session)
    }

    fn decode_nullable<D: Decoder + ?Sized>(
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<Option<Self>> {
        decode_sequence(decoder, session).map(Some)
    }
}

impl<T: Serialize> Serialize for Box<[T]> {
    const KIND: Kind = Kind::Sequence;

    fn encode<E: Encoder + ?Sized>(
        &self,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()> {
        encode_sequence(self, encoder, session)
    }

    fn decode<D: Decoder + ?Sized>(
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<Self> {
        decode_sequence(decoder, session).map(Vec::into_boxed_slice)
    }

    fn encode_nullable<E: Encoder + ?Sized>(
        value: Option<&Self>,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()> {
        encode_sequence(value.map_or(&[][..], |v| &v[..]), encoder, session)
    }

    fn decode_nullable<D: Decoder + ?Sized>(
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<Option<Self>> {
        Self::decode(decoder, session).map(Some)
    }
}

/// Arrays cannot be empty unless `N` is zero, so an absent array keeps the
/// presence byte form instead of the zero count used by `Vec<T>`.
impl<T: Serialize, const N: usize> Serialize for [T; N] {
    const KIND: Kind = Kind::Sequence;

    fn encode<E: Encoder + ?Sized>(
        &self,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()> {
        encode_sequence(self, encoder, session)
    }

    fn decode<D: Decoder + ?Sized>(
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<Self> {
        decode_array(decoder, session)
    }
}
