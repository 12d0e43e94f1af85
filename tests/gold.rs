//! Reads Google's canonical `gold_flexbuffer_example.bin` fixture,
//! transcribed from `tests/gold.cpp`, to pin this crate's navigation
//! against a wire-compatible document nobody here wrote.
//!
//! The document: `{'bar': [1,2,3], 'bar3': [1,2,3], 'bool': True,
//! 'bools': [True,False,True,False], 'foo': 100.0, 'mymap': {'foo':
//! 'Fred'}, 'vec': [-100, 'Fred', 4.0, b'M', False, 4.0]}`.

use flexic::{Cursor, Error, Span, Type};

#[rustfmt::skip]
const GOLD: [u8; 166] = [
    0x76, 0x65, 0x63, 0x00, 0x04, 0x46, 0x72, 0x65, 0x64, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x80, 0x40, 0x01, 0x4D, 0x06, 0x9C, 0x0F, 0x09, 0x05, 0x00,
    0x0C, 0x04, 0x14, 0x22, 0x64, 0x68, 0x22, 0x62, 0x61, 0x72, 0x00, 0x00,
    0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
    0x03, 0x00, 0x00, 0x00, 0x62, 0x61, 0x72, 0x33, 0x00, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00,
    0x62, 0x6F, 0x6F, 0x6C, 0x73, 0x00, 0x04, 0x01, 0x00, 0x01, 0x00, 0x62,
    0x6F, 0x6F, 0x6C, 0x00, 0x66, 0x6F, 0x6F, 0x00, 0x6D, 0x79, 0x6D, 0x61,
    0x70, 0x00, 0x01, 0x0B, 0x01, 0x01, 0x01, 0x62, 0x14, 0x07, 0x4B, 0x37,
    0x19, 0x25, 0x16, 0x13, 0x70, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x58, 0x00, 0x00, 0x00,
    0x48, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x3D, 0x00, 0x00, 0x00,
    0x00, 0x00, 0xC8, 0x42, 0x2D, 0x00, 0x00, 0x00, 0x85, 0x00, 0x00, 0x00,
    0x2E, 0x4E, 0x6A, 0x90, 0x0E, 0x24, 0x28, 0x23, 0x26, 0x01,
];

fn root() -> Cursor<'static> {
    Cursor::open(Span::new(&GOLD)).expect("gold fixture is a valid document")
}

const KEYS: [&str; 7] = ["bar", "bar3", "bool", "bools", "foo", "mymap", "vec"];

#[test]
fn map_length() {
    assert_eq!(root().length().unwrap(), 7);
}

#[test]
fn map_key_at_index_in_sorted_order() {
    let cursor = root();
    for (i, key) in KEYS.iter().enumerate() {
        assert_eq!(cursor.map_key_at_index(i).unwrap(), *key);
    }
}

#[test]
fn seek_map_key_types() {
    let cursor = root();
    let types = [
        Type::VectorSint,
        Type::VectorSint3,
        Type::Bool,
        Type::VectorBool,
        Type::Float,
        Type::Map,
        Type::Vector,
    ];
    for (key, expected) in KEYS.iter().zip(types) {
        let found = cursor.seek_key(key).unwrap();
        assert_eq!(found.type_tag(), expected, "key {key}");
    }
}

#[test]
fn seek_map_key_missing() {
    assert_eq!(root().seek_key("plugh"), Err(Error::NotFound));
}

#[test]
fn bar_and_bar3_agree() {
    let cursor = root();
    let bar = cursor.seek_key("bar").unwrap();
    let bar3 = cursor.seek_key("bar3").unwrap();
    assert_eq!(bar.length().unwrap(), 3);
    assert_eq!(bar3.length().unwrap(), 3);
    for i in 0..3 {
        assert_eq!(bar.seek_index(i).unwrap().as_sint().unwrap(), (i + 1) as i64);
        assert_eq!(bar3.seek_index(i).unwrap().as_sint().unwrap(), (i + 1) as i64);
    }
}

#[test]
fn bools_vector() {
    let cursor = root().seek_key("bools").unwrap();
    let expected = [true, false, true, false];
    for (i, want) in expected.iter().enumerate() {
        assert_eq!(cursor.seek_index(i).unwrap().as_bool().unwrap(), *want);
    }
}

#[test]
fn foo_scalar_and_nested_map() {
    let cursor = root();
    assert_eq!(cursor.seek_key("foo").unwrap().as_f64().unwrap(), 100.0);

    let mymap = cursor.seek_key("mymap").unwrap();
    assert_eq!(mymap.length().unwrap(), 1);
    assert_eq!(mymap.map_key_at_index(0).unwrap(), "foo");
    assert_eq!(mymap.seek_key("foo").unwrap().as_string().unwrap(), "Fred");
}

#[test]
fn heterogeneous_vec() {
    let vec = root().seek_key("vec").unwrap();
    assert_eq!(vec.length().unwrap(), 6);
    assert_eq!(vec.seek_index(0).unwrap().as_sint().unwrap(), -100);
    assert_eq!(vec.seek_index(1).unwrap().as_string().unwrap(), "Fred");
    assert_eq!(vec.seek_index(2).unwrap().as_f64().unwrap(), 4.0);
    assert_eq!(vec.seek_index(3).unwrap().as_blob().unwrap(), b"M");
    assert_eq!(vec.seek_index(4).unwrap().as_bool().unwrap(), false);
    assert_eq!(vec.seek_index(5).unwrap().as_f64().unwrap(), 4.0);
}

#[test]
fn full_document_parses_without_error() {
    use flexic::parse;

    #[derive(Default)]
    struct Noop;
    impl flexic::ParserSink for Noop {}

    let mut sink = Noop;
    parse(&root(), &mut sink).unwrap();
}
