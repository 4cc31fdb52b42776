//! The read end of a codec stream.
//!
//! [`Decoder`] mirrors [`Encoder`](crate::Encoder): every provided `read_*`
//! method consumes exactly the bytes the matching `emit_*` method produces.
//! Length prefixes are validated against the session [`Config`] before
//! anything sized by them is allocated.

use crate::{
    config::{ByteOrder, Config},
    decimal::Decimal,
    encode::ABSENT,
    error::{Error, LengthField, Result},
};

/// Largest chunk [`Decoder::read_raw_bytes`] reserves ahead of the data
/// actually arriving.
const READ_CHUNK: usize = 8 * 1024;

/// Reads `$ty` in the decoder's byte order.
macro_rules! read_ordered {
    ($self:ident, $ty:ty) => {{
        let mut buf = [0u8; size_of::<$ty>()];
        $self.read_exact(&mut buf)?;
        Ok(match $self.byte_order() {
            ByteOrder::Little => <$ty>::from_le_bytes(buf),
            ByteOrder::Big => <$ty>::from_be_bytes(buf),
        })
    }};
}

/// A sequential byte source.
pub trait Decoder {
    /// The byte order used for every multi-byte field.
    fn byte_order(&self) -> ByteOrder;

    /// The session configuration, consulted for length bounds.
    fn config(&self) -> &Config;

    /// Fills `buf` completely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedStream`] when the source ends first.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Reads exactly `len` bytes.
    ///
    /// The buffer grows as data arrives, so a corrupt `len` on a short stream
    /// fails with [`Error::TruncatedStream`] instead of allocating `len` bytes
    /// up front.
    fn read_raw_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(len.min(READ_CHUNK));
        while bytes.len() < len {
            let start = bytes.len();
            let step = (len - start).min(READ_CHUNK);
            bytes.resize(start + step, 0);

            match self.read_exact(&mut bytes[start..]) {
                Ok(()) => {}
                Err(Error::TruncatedStream { read, .. }) => {
                    return Err(Error::TruncatedStream {
                        needed: len,
                        read: start + read,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(bytes)
    }

    /// Reads a single unsigned byte.
    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads a single signed byte.
    fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes([self.read_u8()?]))
    }

    /// Reads a boolean. Only `1` is `true`.
    fn read_bool(&mut self) -> Result<bool> { Ok(self.read_u8()? == 1) }

    /// Reads a 16-bit unsigned integer.
    fn read_u16(&mut self) -> Result<u16> { read_ordered!(self, u16) }

    /// Reads a 16-bit signed integer.
    fn read_i16(&mut self) -> Result<i16> { read_ordered!(self, i16) }

    /// Reads a 32-bit unsigned integer.
    fn read_u32(&mut self) -> Result<u32> { read_ordered!(self, u32) }

    /// Reads a 32-bit signed integer.
    fn read_i32(&mut self) -> Result<i32> { read_ordered!(self, i32) }

    /// Reads a 64-bit unsigned integer.
    fn read_u64(&mut self) -> Result<u64> { read_ordered!(self, u64) }

    /// Reads a 64-bit signed integer.
    fn read_i64(&mut self) -> Result<i64> { read_ordered!(self, i64) }

    /// Reads an IEEE 754 single precision value, bit-exact.
    fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads an IEEE 754 double precision value, bit-exact.
    fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a decimal stored as a double.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecimalOutOfRange`] for non-finite values and
    /// magnitudes a [`Decimal`] cannot hold.
    fn read_decimal(&mut self) -> Result<Decimal> {
        let value = self.read_f64()?;
        Decimal::from_f64(value).ok_or(Error::DecimalOutOfRange(value))
    }

    /// Reads and validates a `u32` length prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLength`] when the prefix exceeds the
    /// configured bound for `field`.
    fn read_length(&mut self, field: LengthField) -> Result<usize> {
        let limit = match field {
            LengthField::String => self.config().string_limit(),
            LengthField::Sequence => self.config().sequence_limit(),
        };

        let length = self.read_u32()?;
        if length > limit {
            return Err(Error::MalformedLength {
                field,
                length: u64::from(length),
                limit: u64::from(limit),
            });
        }

        usize::try_from(length).map_err(|_| Error::MalformedLength {
            field,
            length: u64::from(length),
            limit: usize::MAX as u64,
        })
    }

    /// Reads a length-prefixed UTF-8 string.
    fn read_str(&mut self) -> Result<String> {
        let len = self.read_length(LengthField::String)?;
        let bytes = self.read_raw_bytes(len)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Reads a presence indicator. Anything but `0` means present.
    fn read_presence(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != ABSENT)
    }
}

impl<D: Decoder + ?Sized> Decoder for &mut D {
    fn byte_order(&self) -> ByteOrder { (**self).byte_order() }

    fn config(&self) -> &Config { (**self).config() }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }

    fn read_raw_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        (**self).read_raw_bytes(len)
    }

    fn read_u8(&mut self) -> Result<u8> { (**self).read_u8() }

    fn read_i8(&mut self) -> Result<i8> { (**self).read_i8() }

    fn read_bool(&mut self) -> Result<bool> { (**self).read_bool() }

    fn read_u16(&mut self) -> Result<u16> { (**self).read_u16() }

    fn read_i16(&mut self) -> Result<i16> { (**self).read_i16() }

    fn read_u32(&mut self) -> Result<u32> { (**self).read_u32() }

    fn read_i32(&mut self) -> Result<i32> { (**self).read_i32() }

    fn read_u64(&mut self) -> Result<u64> { (**self).read_u64() }

    fn read_i64(&mut self) -> Result<i64> { (**self).read_i64() }

    fn read_f32(&mut self) -> Result<f32> { (**self).read_f32() }

    fn read_f64(&mut self) -> Result<f64> { (**self).read_f64() }

    fn read_decimal(&mut self) -> Result<Decimal> { (**self).read_decimal() }

    fn read_length(&mut self, field: LengthField) -> Result<usize> {
        (**self).read_length(field)
    }

    fn read_str(&mut self) -> Result<String> { (**self).read_str() }

    fn read_presence(&mut self) -> Result<bool> { (**self).read_presence() }
}
