//! File entry points.

use binform_integration_test::{Record, sample_record};
use binform_serialize::{Codec, Error};
use tempfile::tempdir;
use tracing_test::traced_test;

#[test]
fn file_roundtrip() {
    let tempdir = tempdir().unwrap();
    let path = tempdir.path().join("record.bin");
    let codec = Codec::new();

    codec.serialize_to_file(&sample_record(), &path).unwrap();
    let decoded: Record = codec.deserialize_from_file(&path).unwrap();

    assert_eq!(decoded, Record { cache: Vec::new(), ..sample_record() });
    assert_eq!(
        std::fs::read(&path).unwrap(),
        codec.serialize(&sample_record()).unwrap()
    );
}

#[test]
fn serialize_truncates_existing_file() {
    let tempdir = tempdir().unwrap();
    let path = tempdir.path().join("value.bin");
    std::fs::write(&path, [0xaa; 64]).unwrap();

    let codec = Codec::new();
    codec.serialize_to_file(&5u16, &path).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), [5, 0]);
}

#[test]
fn missing_file_is_an_io_error() {
    let tempdir = tempdir().unwrap();
    let path = tempdir.path().join("missing.bin");

    let result = Codec::new().deserialize_from_file::<Record>(&path);
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn truncated_file() {
    let tempdir = tempdir().unwrap();
    let path = tempdir.path().join("short.bin");
    let codec = Codec::new();

    let bytes = codec.serialize(&sample_record()).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let result = codec.deserialize_from_file::<Record>(&path);
    assert!(matches!(result, Err(Error::TruncatedStream { .. })));
}

#[test]
#[traced_test]
fn file_calls_are_instrumented() {
    let tempdir = tempdir().unwrap();
    let path = tempdir.path().join("traced.bin");
    let codec = Codec::new();

    codec.serialize_to_file(&1u8, &path).unwrap();

    assert!(logs_contain("serialize_to_file"));
    assert!(logs_contain("serialized value to sink"));
}
