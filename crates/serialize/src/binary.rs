//! Fixed-width binary adapters over [`std::io`] streams.
//!
//! [`BinaryEncoder`] and [`BinaryDecoder`] implement [`Encoder`] and
//! [`Decoder`] on top of any [`Write`] / [`Read`] implementation.
//!
//! # Format Overview
//!
//! - **Integers and floats**: fixed width, in the configured [`ByteOrder`].
//! - **Booleans and presence bytes**: a single byte.
//! - **Strings**: `u32` byte length followed by UTF-8 bytes.
//! - **Sequences**: `u32` element count followed by the elements.
//!
//! There is no header, no type tag and no padding.
//!
//! # Example
//!
//! ```ignore
//! use binform_serialize::{BinaryDecoder, BinaryEncoder, Config, Decoder, Encoder};
//!
//! let config = Config::default();
//!
//! let mut encoder = BinaryEncoder::new(Vec::new(), config);
//! encoder.emit_u32(42).unwrap();
//! let bytes = encoder.into_inner();
//!
//! let mut decoder = BinaryDecoder::new(&bytes[..], config);
//! assert_eq!(decoder.read_u32().unwrap(), 42);
//! ```

use std::io::{self, Read, Write};

use crate::{
    config::{ByteOrder, Config},
    decode::Decoder,
    encode::Encoder,
    error::{Error, Result},
};

// =============================================================================
// BinaryEncoder
// =============================================================================

/// An encoder writing to any [`Write`] implementation.
///
/// # Type Parameters
///
/// * `W` - The writer type: a file, a socket, a `Vec<u8>`, ...
#[derive(Debug)]
pub struct BinaryEncoder<W> {
    writer: W,
    config: Config,
}

impl<W> BinaryEncoder<W> {
    /// Creates a new encoder wrapping the given writer.
    #[must_use]
    pub const fn new(writer: W, config: Config) -> Self {
        Self { writer, config }
    }

    /// Returns a reference to the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W { &self.writer }

    /// Returns a mutable reference to the underlying writer.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn get_mut(&mut self) -> &mut W { &mut self.writer }

    /// Consumes the encoder and returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W { self.writer }
}

impl<W: Write> Encoder for BinaryEncoder<W> {
    fn byte_order(&self) -> ByteOrder { self.config.byte_order }

    fn emit_raw_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.writer.write_all(bytes)?)
    }

    fn flush(&mut self) -> Result<()> { Ok(self.writer.flush()?) }
}

// =============================================================================
// BinaryDecoder
// =============================================================================

/// A decoder reading from any [`Read`] implementation.
///
/// # Type Parameters
///
/// * `R` - The reader type: a file, a socket, a `&[u8]`, ...
#[derive(Debug)]
pub struct BinaryDecoder<R> {
    reader: R,
    config: Config,
}

impl<R> BinaryDecoder<R> {
    /// Creates a new decoder wrapping the given reader.
    #[must_use]
    pub const fn new(reader: R, config: Config) -> Self {
        Self { reader, config }
    }

    /// Returns a reference to the underlying reader.
    #[must_use]
    pub const fn get_ref(&self) -> &R { &self.reader }

    /// Returns a mutable reference to the underlying reader.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn get_mut(&mut self) -> &mut R { &mut self.reader }

    /// Consumes the decoder and returns the underlying reader.
    #[must_use]
    pub fn into_inner(self) -> R { self.reader }
}

impl<R: Read> Decoder for BinaryDecoder<R> {
    fn byte_order(&self) -> ByteOrder { self.config.byte_order }

    fn config(&self) -> &Config { &self.config }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(Error::TruncatedStream {
                        needed: buf.len(),
                        read: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test;
