//! Convenience entry points tying a configuration and an override registry
//! to the binary adapters.
//!
//! Every call starts a fresh [`Session`] and encodes or decodes exactly one
//! top-level value in strict mode: an unmarked composite at the top level is
//! a [`SchemaError`](crate::SchemaError).
//!
//! # Example
//!
//! ```ignore
//! use binform_serialize::Codec;
//!
//! let codec = Codec::new();
//! let bytes = codec.serialize(&vec![1u32, 2, 3])?;
//! let back: Vec<u32> = codec.deserialize(&bytes)?;
//! ```

use std::{
    any::type_name,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
    sync::Arc,
};

use crate::{
    binary::{BinaryDecoder, BinaryEncoder},
    config::Config,
    decode::Decoder,
    dispatch::{decode_root, encode_root},
    encode::Encoder,
    error::Result,
    overrides::{Override, OverrideRegistry},
    session::Session,
    value::Serialize,
};

/// A configured codec owning its override registry.
///
/// Codecs are independent of each other: overrides registered on one are
/// never consulted by another, so separate codecs may be used concurrently
/// from different threads.
#[derive(Debug, Default)]
pub struct Codec {
    config: Config,
    overrides: OverrideRegistry,
}

impl Codec {
    /// Creates a codec with the default configuration and no overrides.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates a codec with the given configuration and no overrides.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self { config, overrides: OverrideRegistry::new() }
    }

    /// The configuration applied to every call.
    #[must_use]
    pub const fn config(&self) -> &Config { &self.config }

    /// The registered overrides.
    #[must_use]
    pub const fn overrides(&self) -> &OverrideRegistry { &self.overrides }

    /// Mutable access to the registered overrides.
    #[allow(clippy::missing_const_for_fn)]
    pub fn overrides_mut(&mut self) -> &mut OverrideRegistry {
        &mut self.overrides
    }

    /// Replaces the override for `T`, or removes it when `handler` is `None`.
    ///
    /// See [`OverrideRegistry::register`].
    pub fn register_override<T: 'static>(
        &mut self,
        handler: Option<Arc<dyn Override<T>>>,
    ) -> Option<Arc<dyn Override<T>>> {
        self.overrides.register(handler)
    }

    fn session(&self) -> Session<'_> { Session::new(&self.overrides) }

    /// Encodes `value` into a new buffer.
    ///
    /// # Errors
    ///
    /// See [`encode_root`].
    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let mut encoder = BinaryEncoder::new(Vec::new(), self.config);
        encode_root(value, &mut encoder, &self.session())?;

        let bytes = encoder.into_inner();
        tracing::debug!(
            ty = type_name::<T>(),
            bytes = bytes.len(),
            byte_order = ?self.config.byte_order,
            "serialized value"
        );

        Ok(bytes)
    }

    /// Decodes a `T` from the start of `bytes`. Trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// See [`decode_root`].
    pub fn deserialize<T: Serialize>(&self, bytes: &[u8]) -> Result<T> {
        let mut decoder = BinaryDecoder::new(bytes, self.config);
        let value = decode_root(&mut decoder, &self.session())?;

        tracing::debug!(
            ty = type_name::<T>(),
            bytes = bytes.len() - decoder.get_ref().len(),
            byte_order = ?self.config.byte_order,
            "deserialized value"
        );

        Ok(value)
    }

    /// Encodes `value` into `sink` and flushes it.
    ///
    /// # Errors
    ///
    /// See [`encode_root`]. Write failures surface as
    /// [`Error::Io`](crate::Error::Io).
    pub fn serialize_to_sink<T: Serialize, W: Write>(
        &self,
        value: &T,
        sink: W,
    ) -> Result<()> {
        let mut encoder = BinaryEncoder::new(sink, self.config);
        encode_root(value, &mut encoder, &self.session())?;
        encoder.flush()?;

        tracing::debug!(
            ty = type_name::<T>(),
            byte_order = ?self.config.byte_order,
            "serialized value to sink"
        );

        Ok(())
    }

    /// Decodes a `T` from `source`, consuming only the bytes it occupies.
    ///
    /// # Errors
    ///
    /// See [`decode_root`].
    pub fn deserialize_from_source<T: Serialize, R: Read>(
        &self,
        source: R,
    ) -> Result<T> {
        let mut decoder = BinaryDecoder::new(source, self.config);
        let value = decode_root(&mut decoder, &self.session())?;

        tracing::debug!(
            ty = type_name::<T>(),
            byte_order = ?decoder.byte_order(),
            "deserialized value from source"
        );

        Ok(value)
    }

    /// Encodes `value` into the file at `path`, creating or truncating it.
    ///
    /// The file is closed on every exit path.
    ///
    /// # Errors
    ///
    /// See [`Codec::serialize_to_sink`]; failing to create the file surfaces
    /// as [`Error::Io`](crate::Error::Io).
    #[tracing::instrument(skip(self, value), fields(ty = type_name::<T>()))]
    pub fn serialize_to_file<T: Serialize>(
        &self,
        value: &T,
        path: impl AsRef<Path> + std::fmt::Debug,
    ) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.serialize_to_sink(value, BufWriter::new(file))
    }

    /// Decodes a `T` from the file at `path`.
    ///
    /// # Errors
    ///
    /// See [`Codec::deserialize_from_source`]; failing to open the file
    /// surfaces as [`Error::Io`](crate::Error::Io).
    #[tracing::instrument(skip(self), fields(ty = type_name::<T>()))]
    pub fn deserialize_from_file<T: Serialize>(
        &self,
        path: impl AsRef<Path> + std::fmt::Debug,
    ) -> Result<T> {
        let file = File::open(path.as_ref())?;
        self.deserialize_from_source(BufReader::new(file))
    }
}

/// Encodes `value` with the default configuration and no overrides.
///
/// # Errors
///
/// See [`Codec::serialize`].
pub fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Codec::new().serialize(value)
}

/// Decodes a `T` with the default configuration and no overrides.
///
/// # Errors
///
/// See [`Codec::deserialize`].
pub fn deserialize<T: Serialize>(bytes: &[u8]) -> Result<T> {
    Codec::new().deserialize(bytes)
}

#[cfg(test)]
mod test;
