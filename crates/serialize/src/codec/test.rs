use std::io::Cursor;

use tracing_test::traced_test;

use super::*;
use crate::{ByteOrder, Decoder, Encoder, Error, Serializable};

#[derive(Debug, Default, PartialEq, Serializable)]
struct Sample {
    #[serialize(order = 0)]
    id: u32,

    #[serialize(order = 1)]
    tags: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Serializable)]
#[serialize(opaque)]
struct Hidden;

struct Reversed;

impl Override<u32> for Reversed {
    fn encode(&self, value: &u32, encoder: &mut dyn Encoder) -> Result<()> {
        encoder.emit_u32(value.reverse_bits())
    }

    fn decode(&self, decoder: &mut dyn Decoder) -> Result<u32> {
        Ok(decoder.read_u32()?.reverse_bits())
    }
}

fn sample() -> Sample { Sample { id: 5, tags: vec!["a".to_owned()] } }

#[test]
fn buffer_roundtrip() {
    let codec = Codec::new();

    let bytes = codec.serialize(&sample()).unwrap();
    assert_eq!(bytes, [1, 5, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, b'a']);
    assert_eq!(codec.deserialize::<Sample>(&bytes).unwrap(), sample());
}

#[test]
fn free_functions_use_defaults() {
    let bytes = serialize(&sample()).unwrap();
    assert_eq!(bytes, Codec::new().serialize(&sample()).unwrap());
    assert_eq!(deserialize::<Sample>(&bytes).unwrap(), sample());
}

#[test]
fn sink_and_source_roundtrip() {
    let codec = Codec::new();

    let mut sink = Vec::new();
    codec.serialize_to_sink(&sample(), &mut sink).unwrap();
    codec.serialize_to_sink(&7u8, &mut sink).unwrap();

    let mut source = Cursor::new(sink);
    let first: Sample = codec.deserialize_from_source(&mut source).unwrap();
    let second: u8 = codec.deserialize_from_source(&mut source).unwrap();

    assert_eq!(first, sample());
    assert_eq!(second, 7);
}

#[test]
fn big_endian_config() {
    let codec =
        Codec::with_config(Config::builder().byte_order(ByteOrder::Big).build());

    let bytes = codec.serialize(&0x0102_0304u32).unwrap();
    assert_eq!(bytes, [1, 2, 3, 4]);
    assert_eq!(codec.deserialize::<u32>(&bytes).unwrap(), 0x0102_0304);
}

#[test]
fn opaque_root_is_a_schema_error() {
    let codec = Codec::new();

    assert!(matches!(
        codec.serialize(&Hidden),
        Err(Error::Schema(crate::SchemaError::NotSerializable { .. }))
    ));
    assert!(matches!(
        codec.deserialize::<Hidden>(&[]),
        Err(Error::Schema(_))
    ));
}

#[test]
fn register_and_remove_override() {
    let mut codec = Codec::new();
    let plain = codec.serialize(&1u32).unwrap();

    assert!(codec.register_override::<u32>(Some(Arc::new(Reversed))).is_none());
    let overridden = codec.serialize(&1u32).unwrap();
    assert_eq!(overridden, [0, 0, 0, 0x80]);
    assert_eq!(codec.deserialize::<u32>(&overridden).unwrap(), 1);

    assert!(codec.register_override::<u32>(None).is_some());
    assert_eq!(codec.serialize(&1u32).unwrap(), plain);
}

#[test]
fn codecs_have_independent_overrides() {
    let mut first = Codec::new();
    first.overrides_mut().insert::<u32, _>(Reversed);
    let second = Codec::new();

    assert!(first.overrides().contains::<u32>());
    assert!(second.overrides().is_empty());
    assert_ne!(
        first.serialize(&1u32).unwrap(),
        second.serialize(&1u32).unwrap()
    );
}

#[test]
fn truncated_buffer() {
    let codec = Codec::new();
    let bytes = codec.serialize(&sample()).unwrap();

    assert!(matches!(
        codec.deserialize::<Sample>(&bytes[..bytes.len() - 1]),
        Err(Error::TruncatedStream { .. })
    ));
}

#[test]
#[traced_test]
fn entry_points_log() {
    let codec = Codec::new();
    let bytes = codec.serialize(&sample()).unwrap();
    codec.deserialize::<Sample>(&bytes).unwrap();

    assert!(logs_contain("serialized value"));
    assert!(logs_contain("deserialized value"));
}
