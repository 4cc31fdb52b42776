//! Member-by-member encoding of struct-like types.
//!
//! A composite is a type whose layout is described by a [`Descriptor`]:
//! whether it carries the serializable marker, whether a presence byte
//! precedes it and which members are written, in wire order. The descriptor
//! and the member accessors are generated by `#[derive(Serializable)]`.
//!
//! # Wire Format
//!
//! ```text
//! nullable:      [presence u8] ([member 0][member 1]...)?
//! value type:    [member 0][member 1]...
//! ```
//!
//! Members are sorted by their declared order (stable on ties) and each one
//! is encoded through the dispatcher at its declared type. Unmarked members
//! never reach the stream.
//!
//! # Example
//!
//! ```ignore
//! use binform_serialize::Serializable;
//!
//! #[derive(Debug, Default, PartialEq, Serializable)]
//! struct Reading {
//!     #[serialize(order = 1)]
//!     sensor: String,
//!
//!     #[serialize(order = 0)]
//!     value: f64,
//!
//!     cached: Option<u64>, // not serialized
//! }
//! ```

use crate::{
    decode::Decoder,
    dispatch,
    encode::Encoder,
    error::{Error, Result, SchemaError},
    session::Session,
    value::{Serialize, Shape},
};

/// How a member is reached on an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// A struct field, read and assigned directly.
    Field,

    /// A getter/setter pair declared on the container.
    Property,
}

/// A single serialized member of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Member {
    /// The field name, or the getter name for properties.
    pub name: &'static str,

    /// The declared order key.
    pub order: i32,

    /// How the member is read and assigned.
    pub access: Access,
}

/// The compile-time description of a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    /// Name of the described type, used in errors and logs.
    pub type_name: &'static str,

    /// Marker and nullability.
    pub shape: Shape,

    /// Serialized members in wire order.
    pub members: &'static [Member],
}

impl Descriptor {
    /// Looks up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&'static Member> {
        self.members.iter().find(|member| member.name == name)
    }
}

/// A type encoded member by member.
///
/// Decoding default-constructs the value and assigns members onto it, so
/// members absent from the stream keep their `Default` value.
pub trait Composite: Serialize + Default {
    /// Layout of the type.
    const DESCRIPTOR: Descriptor;

    /// Writes every member in [`Descriptor::members`] order.
    ///
    /// # Errors
    ///
    /// Whatever encoding a member reports.
    fn encode_members<E: Encoder + ?Sized>(
        &self,
        encoder: &mut E,
        session: &Session<'_>,
    ) -> Result<()>;

    /// Reads every member in [`Descriptor::members`] order and assigns it
    /// onto `self`.
    ///
    /// # Errors
    ///
    /// Whatever decoding a member reports.
    fn decode_members<D: Decoder + ?Sized>(
        &mut self,
        decoder: &mut D,
        session: &Session<'_>,
    ) -> Result<()>;
}

/// What to do with a composite that lacks the serializable marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Fail with [`SchemaError::NotSerializable`]. Used for top-level calls.
    Strict,

    /// Write nothing and decode the default value. Used for nested values.
    #[default]
    Permissive,
}

impl Mode {
    /// Returns whether a type of the given shape takes part in the stream.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotSerializable`] for an unmarked type in
    /// [`Mode::Strict`].
    pub fn admit(self, shape: Shape, type_name: &'static str) -> Result<bool> {
        if shape.marked {
            return Ok(true);
        }

        match self {
            Self::Strict => {
                Err(SchemaError::NotSerializable { type_name }.into())
            }
            Self::Permissive => {
                tracing::trace!(ty = type_name, "skipping unmarked composite");
                Ok(false)
            }
        }
    }
}

/// Encodes a possibly absent composite.
///
/// # Errors
///
/// Returns [`Error::UnexpectedAbsent`] when `value` is `None` for a value
/// type, [`SchemaError::NotSerializable`] for an unmarked type in strict
/// mode, or whatever encoding a member reports.
pub fn encode_composite<T: Composite, E: Encoder + ?Sized>(
    value: Option<&T>,
    encoder: &mut E,
    session: &Session<'_>,
    mode: Mode,
) -> Result<()> {
    let descriptor = &T::DESCRIPTOR;
    if !mode.admit(descriptor.shape, descriptor.type_name)? {
        return Ok(());
    }

    let Some(value) = value else {
        if !descriptor.shape.nullable {
            return Err(Error::UnexpectedAbsent {
                type_name: descriptor.type_name,
            });
        }

        tracing::trace!(ty = descriptor.type_name, "writing absent composite");
        return encoder.emit_presence(false);
    };

    if descriptor.shape.nullable {
        encoder.emit_presence(true)?;
    }

    value.encode_members(encoder, session)
}

/// Decodes a possibly absent composite.
///
/// An unmarked type in permissive mode consumes nothing and yields its
/// default value.
///
/// # Errors
///
/// Returns [`SchemaError::NotSerializable`] for an unmarked type in strict
/// mode, or whatever decoding a member reports.
pub fn decode_composite<T: Composite, D: Decoder + ?Sized>(
    decoder: &mut D,
    session: &Session<'_>,
    mode: Mode,
) -> Result<Option<T>> {
    let descriptor = &T::DESCRIPTOR;
    if !mode.admit(descriptor.shape, descriptor.type_name)? {
        return Ok(Some(T::default()));
    }

    if descriptor.shape.nullable && !decoder.read_presence()? {
        tracing::trace!(ty = descriptor.type_name, "read absent composite");
        return Ok(None);
    }

    let mut value = T::default();
    value.decode_members(decoder, session)?;

    Ok(Some(value))
}

/// Decodes a composite that must be present.
///
/// # Errors
///
/// Returns [`Error::UnexpectedAbsent`] when the stream holds an absent
/// marker, otherwise see [`decode_composite`].
pub fn decode_required<T: Composite, D: Decoder + ?Sized>(
    decoder: &mut D,
    session: &Session<'_>,
    mode: Mode,
) -> Result<T> {
    decode_composite(decoder, session, mode)?.ok_or(Error::UnexpectedAbsent {
        type_name: T::DESCRIPTOR.type_name,
    })
}

/// `Serialize::encode_nullable` for composites.
///
/// A marked nullable composite reuses its own presence byte as the option
/// tag. Every other shape gets a separate presence byte.
///
/// # Errors
///
/// See [`encode_composite`].
pub fn encode_nullable<T: Composite, E: Encoder + ?Sized>(
    value: Option<&T>,
    encoder: &mut E,
    session: &Session<'_>,
) -> Result<()> {
    if T::DESCRIPTOR.shape == Shape::REFERENCE {
        encode_composite(value, encoder, session, Mode::Permissive)
    } else {
        dispatch::encode_with_presence(value, encoder, session)
    }
}

/// `Serialize::decode_nullable` for composites.
///
/// # Errors
///
/// See [`decode_composite`].
pub fn decode_nullable<T: Composite, D: Decoder + ?Sized>(
    decoder: &mut D,
    session: &Session<'_>,
) -> Result<Option<T>> {
    if T::DESCRIPTOR.shape == Shape::REFERENCE {
        decode_composite(decoder, session, Mode::Permissive)
    } else {
        dispatch::decode_with_presence(decoder, session)
    }
}
