//! Binform Serialization Library
//!
//! A compact, schema-less binary codec for object graphs. The stream carries
//! no type tags, no field names and no version header: both endpoints agree
//! on the shape of the types out of band and decoding is driven entirely by
//! the declared type.
//!
//! # Overview
//!
//! - [`Serialize`]: implemented by every encodable type. Each type declares a
//!   [`Kind`] that selects its default codec.
//! - [`Composite`]: struct-like types encoded member by member, generated by
//!   `#[derive(Serializable)]`.
//! - [`SelfDescribing`]: types that own their entire byte layout.
//! - [`Override`]: caller-supplied encode/decode pairs registered per type in
//!   an [`OverrideRegistry`].
//! - [`Encoder`] / [`Decoder`]: the byte sink and source, with
//!   [`BinaryEncoder`] / [`BinaryDecoder`] adapting [`std::io`] streams.
//! - [`Codec`]: convenience entry points for buffers, streams and files.
//!
//! Resolution for every value, highest priority first: self-describing,
//! then a registered override, then the default codec for its kind. See
//! [`resolve`].
//!
//! # Derive Macro
//!
//! Only marked members take part in the stream, ordered by their `order`
//! key:
//!
//! ```ignore
//! #[derive(Debug, Default, PartialEq, Serializable)]
//! #[serialize(property(order = 2, ty = String, get = label, set = set_label))]
//! struct Node {
//!     #[serialize(order = 0)]
//!     id: u32,
//!
//!     #[serialize(order = 1)]
//!     children: Vec<Node>,
//!
//!     label: String, // reached through the property above
//!     scratch: Vec<u8>, // never serialized
//! }
//! ```
//!
//! Fields and properties form a single list sorted by `order`, fields first
//! on ties. A property with a lower `order` than a field is written before
//! it, so the layout is not "all fields, then all properties".
//!
//! Container options:
//!
//! - `#[serialize(value_type)]`: no presence byte in front of the members.
//! - `#[serialize(opaque)]`: the type is not marked; nested occurrences are
//!   skipped and top-level calls fail with [`SchemaError::NotSerializable`].
//! - `#[serialize(self_describing)]`: forward to the type's
//!   [`SelfDescribing`] implementation.
//!
//! # Example
//!
//! ```ignore
//! let codec = Codec::new();
//! let bytes = codec.serialize(&node)?;
//! let back: Node = codec.deserialize(&bytes)?;
//! assert_eq!(node, back);
//! ```

// Allow derive macros to reference this crate as `binform_serialize`
// internally
extern crate self as binform_serialize;

pub mod binary;
pub mod codec;
pub mod collection;
pub mod composite;
pub mod config;
pub mod decimal;
pub mod decode;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod overrides;
pub mod primitive;
pub mod session;
pub mod value;

// Re-export main traits and types at the crate root for convenience
pub use binary::{BinaryDecoder, BinaryEncoder};
// Re-export derive macro
pub use binform_serialize_derive::Serializable;
pub use codec::{Codec, deserialize, serialize};
pub use composite::{Access, Composite, Descriptor, Member, Mode};
pub use config::{ByteOrder, Config};
pub use decimal::Decimal;
pub use decode::Decoder;
pub use dispatch::{
    Resolution, decode_root, decode_value, encode_root, encode_value, resolve,
};
pub use encode::Encoder;
pub use error::{Error, LengthField, Result, SchemaError};
pub use overrides::{Override, OverrideRegistry};
pub use session::Session;
pub use value::{Kind, PrimitiveKind, SelfDescribing, Serialize, Shape};
