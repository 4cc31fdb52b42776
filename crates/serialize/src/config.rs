//! Session-wide configuration: byte order and decode-side length bounds.
//!
//! A [`Config`] is fixed for the lifetime of a single encode or decode call.
//! Both endpoints must agree on it out of band; nothing in the stream records
//! which byte order was used.
//!
//! # Example
//!
//! ```ignore
//! use binform_serialize::{ByteOrder, Config};
//!
//! let config = Config::builder()
//!     .byte_order(ByteOrder::Big)
//!     .max_string_length(1024)
//!     .build();
//! ```

use bon::Builder;

/// The largest length prefix ever accepted or produced. Lengths are `u32` on
/// the wire but anything that would be negative as an `i32` is rejected.
pub const MAX_WIRE_LENGTH: u32 = i32::MAX as u32;

/// Byte order applied uniformly to every multi-byte primitive and length
/// prefix in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    Little,

    /// Most significant byte first.
    Big,
}

/// Configuration of a codec session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Builder)]
pub struct Config {
    /// Byte order for all multi-byte fields.
    #[builder(default)]
    pub byte_order: ByteOrder,

    /// Upper bound for a decoded string byte length.
    ///
    /// Clamped to [`MAX_WIRE_LENGTH`].
    #[builder(default = 16 * 1024 * 1024)]
    pub max_string_length: u32,

    /// Upper bound for a decoded sequence element count.
    ///
    /// Clamped to [`MAX_WIRE_LENGTH`].
    #[builder(default = 1 << 24)]
    pub max_sequence_length: u32,
}

impl Default for Config {
    fn default() -> Self { Self::builder().build() }
}

impl Config {
    /// The effective string bound after clamping.
    #[must_use]
    pub fn string_limit(&self) -> u32 {
        self.max_string_length.min(MAX_WIRE_LENGTH)
    }

    /// The effective sequence bound after clamping.
    #[must_use]
    pub fn sequence_limit(&self) -> u32 {
        self.max_sequence_length.min(MAX_WIRE_LENGTH)
    }
}
