//! Object graph round trips through the buffer entry points.

use binform_integration_test::{Child, Record, sample_record};
use binform_serialize::{Codec, deserialize, serialize};

#[test]
fn demo_graph_roundtrip() {
    let record = sample_record();

    let bytes = serialize(&record).unwrap();
    let decoded: Record = deserialize(&bytes).unwrap();

    assert_eq!(decoded, Record { cache: Vec::new(), ..record });
}

#[test]
fn demo_graph_layout() {
    let record = Record {
        flag: true,
        number: 7,
        text: "ab".to_owned(),
        ratio: 1.0,
        numbers: vec![9],
        child: None,
        children: Some(vec![Child::new(false, "")]),
        cache: vec![1],
    };

    let bytes = serialize(&record).unwrap();

    #[rustfmt::skip]
    let expected: Vec<u8> = [
        &[1][..],                       // record present
        &[1],                           // flag
        &[7, 0, 0, 0],                  // number
        &[2, 0, 0, 0, b'a', b'b'],      // text
        &1.0f32.to_le_bytes(),          // ratio
        &[1, 0, 0, 0, 9, 0, 0, 0],      // numbers
        &[0],                           // child absent
        &[1, 0, 0, 0],                  // children count
        &[1, 0, 0, 0, 0, 0],            // children[0]: present, flag, text
    ]
    .concat();

    assert_eq!(bytes, expected);
}

#[test]
fn absent_child_and_empty_lists() {
    let record = Record {
        child: None,
        numbers: Vec::new(),
        children: Some(Vec::new()),
        ..sample_record()
    };

    let decoded: Record = deserialize(&serialize(&record).unwrap()).unwrap();

    assert_eq!(decoded.child, None);
    assert!(decoded.numbers.is_empty());
    assert_eq!(decoded.children, Some(Vec::new()));
}

#[test]
fn absent_list_decodes_as_empty() {
    let absent = Record { children: None, ..sample_record() };
    let empty = Record { children: Some(Vec::new()), ..sample_record() };

    let absent_bytes = serialize(&absent).unwrap();
    let empty_bytes = serialize(&empty).unwrap();
    assert_eq!(absent_bytes, empty_bytes);

    let decoded: Record = deserialize(&absent_bytes).unwrap();
    assert_eq!(decoded.children, Some(Vec::new()));
}

#[test]
fn unmarked_members_are_ignored_on_both_sides() {
    let with_cache = Record { cache: vec![1, 2, 3], ..sample_record() };
    let without_cache = Record { cache: Vec::new(), ..sample_record() };

    assert_eq!(
        serialize(&with_cache).unwrap(),
        serialize(&without_cache).unwrap()
    );

    let decoded: Record = deserialize(&serialize(&with_cache).unwrap()).unwrap();
    assert!(decoded.cache.is_empty());
}

#[test]
fn absent_root() {
    let codec = Codec::new();

    let bytes = codec.serialize(&None::<Record>).unwrap();
    assert_eq!(bytes, [0]);
    assert_eq!(codec.deserialize::<Option<Record>>(&bytes).unwrap(), None);
}

#[test]
fn top_level_collections_and_primitives() {
    let children = vec![Child::new(true, "x"), Child::new(false, "y")];
    let bytes = serialize(&children).unwrap();
    assert_eq!(deserialize::<Vec<Child>>(&bytes).unwrap(), children);

    let bytes = serialize(&"plain".to_owned()).unwrap();
    assert_eq!(deserialize::<String>(&bytes).unwrap(), "plain");

    let bytes = serialize(&-1i64).unwrap();
    assert_eq!(bytes, [0xff; 8]);
}
