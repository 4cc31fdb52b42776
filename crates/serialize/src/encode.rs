//! The write end of a codec stream.
//!
//! [`Encoder`] is the sink abstraction the whole engine writes through. Only
//! [`Encoder::byte_order`] and [`Encoder::emit_raw_bytes`] are required; every
//! fixed-width primitive, length prefix and presence byte is derived from
//! them so that all encoders agree on the wire format.
//!
//! The trait is object safe: registered overrides receive a
//! `&mut dyn Encoder`.

use crate::{
    config::{ByteOrder, MAX_WIRE_LENGTH},
    decimal::Decimal,
    error::{Error, LengthField, Result},
};

/// Byte written in front of a present nullable value.
pub const PRESENT: u8 = 1;

/// Byte written in place of an absent nullable value.
pub const ABSENT: u8 = 0;

/// Writes `$value` in the encoder's byte order.
macro_rules! emit_ordered {
    ($self:ident, $value:expr) => {
        match $self.byte_order() {
            ByteOrder::Little => $self.emit_raw_bytes(&$value.to_le_bytes()),
            ByteOrder::Big => $self.emit_raw_bytes(&$value.to_be_bytes()),
        }
    };
}

/// A sequential byte sink.
///
/// # Example
///
/// ```ignore
/// use binform_serialize::{ByteOrder, Encoder, Result};
///
/// struct VecSink(Vec<u8>);
///
/// impl Encoder for VecSink {
///     fn byte_order(&self) -> ByteOrder { ByteOrder::Little }
///
///     fn emit_raw_bytes(&mut self, bytes: &[u8]) -> Result<()> {
///         self.0.extend_from_slice(bytes);
///         Ok(())
///     }
/// }
/// ```
pub trait Encoder {
    /// The byte order used for every multi-byte field.
    fn byte_order(&self) -> ByteOrder;

    /// Appends `bytes` verbatim.
    fn emit_raw_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Flushes buffered output to the underlying sink.
    fn flush(&mut self) -> Result<()> { Ok(()) }

    /// Emits a single unsigned byte.
    fn emit_u8(&mut self, v: u8) -> Result<()> { self.emit_raw_bytes(&[v]) }

    /// Emits a single signed byte.
    fn emit_i8(&mut self, v: i8) -> Result<()> {
        self.emit_raw_bytes(&v.to_le_bytes())
    }

    /// Emits a boolean as `1` or `0`.
    fn emit_bool(&mut self, v: bool) -> Result<()> { self.emit_u8(u8::from(v)) }

    /// Emits a 16-bit unsigned integer.
    fn emit_u16(&mut self, v: u16) -> Result<()> { emit_ordered!(self, v) }

    /// Emits a 16-bit signed integer.
    fn emit_i16(&mut self, v: i16) -> Result<()> { emit_ordered!(self, v) }

    /// Emits a 32-bit unsigned integer.
    fn emit_u32(&mut self, v: u32) -> Result<()> { emit_ordered!(self, v) }

    /// Emits a 32-bit signed integer.
    fn emit_i32(&mut self, v: i32) -> Result<()> { emit_ordered!(self, v) }

    /// Emits a 64-bit unsigned integer.
    fn emit_u64(&mut self, v: u64) -> Result<()> { emit_ordered!(self, v) }

    /// Emits a 64-bit signed integer.
    fn emit_i64(&mut self, v: i64) -> Result<()> { emit_ordered!(self, v) }

    /// Emits an IEEE 754 single precision value, bit-exact.
    fn emit_f32(&mut self, v: f32) -> Result<()> { self.emit_u32(v.to_bits()) }

    /// Emits an IEEE 754 double precision value, bit-exact.
    fn emit_f64(&mut self, v: f64) -> Result<()> { self.emit_u64(v.to_bits()) }

    /// Emits a decimal as a double. Precision beyond what `f64` carries is
    /// lost.
    fn emit_decimal(&mut self, v: Decimal) -> Result<()> {
        self.emit_f64(v.to_f64())
    }

    /// Emits a `u32` length prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLength`] when `len` exceeds
    /// [`MAX_WIRE_LENGTH`]; such a stream could never be decoded.
    fn emit_length(&mut self, field: LengthField, len: usize) -> Result<()> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_WIRE_LENGTH => self.emit_u32(len),
            _ => Err(Error::MalformedLength {
                field,
                length: len as u64,
                limit: u64::from(MAX_WIRE_LENGTH),
            }),
        }
    }

    /// Emits a string as its UTF-8 byte length followed by the bytes.
    fn emit_str(&mut self, v: &str) -> Result<()> {
        self.emit_length(LengthField::String, v.len())?;
        self.emit_raw_bytes(v.as_bytes())
    }

    /// Emits a presence indicator.
    fn emit_presence(&mut self, present: bool) -> Result<()> {
        self.emit_u8(if present { PRESENT } else { ABSENT })
    }
}

impl<E: Encoder + ?Sized> Encoder for &mut E {
    fn byte_order(&self) -> ByteOrder { (**self).byte_order() }

    fn emit_raw_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).emit_raw_bytes(bytes)
    }

    fn flush(&mut self) -> Result<()> { (**self).flush() }

    fn emit_u8(&mut self, v: u8) -> Result<()> { (**self).emit_u8(v) }

    fn emit_i8(&mut self, v: i8) -> Result<()> { (**self).emit_i8(v) }

    fn emit_bool(&mut self, v: bool) -> Result<()> { (**self).emit_bool(v) }

    fn emit_u16(&mut self, v: u16) -> Result<()> { (**self).emit_u16(v) }

    fn emit_i16(&mut self, v: i16) -> Result<()> { (**self).emit_i16(v) }

    fn emit_u32(&mut self, v: u32) -> Result<()> { (**self).emit_u32(v) }

    fn emit_i32(&mut self, v: i32) -> Result<()> { (**self).emit_i32(v) }

    fn emit_u64(&mut self, v: u64) -> Result<()> { (**self).emit_u64(v) }

    fn emit_i64(&mut self, v: i64) -> Result<()> { (**self).emit_i64(v) }

    fn emit_f32(&mut self, v: f32) -> Result<()> { (**self).emit_f32(v) }

    fn emit_f64(&mut self, v: f64) -> Result<()> { (**self).emit_f64(v) }

    fn emit_decimal(&mut self, v: Decimal) -> Result<()> {
        (**self).emit_decimal(v)
    }

    fn emit_length(&mut self, field: LengthField, len: usize) -> Result<()> {
        (**self).emit_length(field, len)
    }

    fn emit_str(&mut self, v: &str) -> Result<()> { (**self).emit_str(v) }

    fn emit_presence(&mut self, present: bool) -> Result<()> {
        (**self).emit_presence(present)
    }
}
