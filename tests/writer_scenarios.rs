//! End-to-end write-then-read scenarios with byte-exact expectations,
//! transcribed from `tests/write_vector.cpp`/`write_map.cpp` fixtures.

use flexic::{Cursor, Error, Span, Type, VecStack, VecStream, Width, Writer};

fn build(f: impl FnOnce(&mut Writer<'_, VecStack, VecStream>)) -> Vec<u8> {
    let mut stack = VecStack::new();
    let mut stream = VecStream::new();
    let mut writer = Writer::new(&mut stack, &mut stream);
    f(&mut writer);
    writer.finalize().unwrap();
    stream.into_bytes()
}

#[test]
fn single_bool() {
    let bytes = build(|w| w.bool(true).unwrap());
    assert_eq!(bytes, vec![0x01, 0x68, 0x01]);

    let cursor = Cursor::open(Span::new(&bytes)).unwrap();
    assert_eq!(cursor.type_tag(), Type::Bool);
    assert_eq!(cursor.width(), 1);
    assert_eq!(cursor.as_bool().unwrap(), true);
    assert_eq!(cursor.as_sint().unwrap(), 1);
    assert_eq!(cursor.as_f32().unwrap(), 1.0);
}

#[test]
fn heterogeneous_vector_of_five() {
    let bytes = build(|w| {
        w.bool(true).unwrap();
        w.sint(i16::MAX as i64).unwrap();
        w.indirect_sint(i32::MAX as i64).unwrap();
        w.uint(u16::MAX as u64).unwrap();
        w.indirect_uint(u32::MAX as u64).unwrap();
        w.vector(5, Width::W1).unwrap();
    });

    #[rustfmt::skip]
    let expected: Vec<u8> = vec![
        0xff, 0xff, 0xff, 0x7f, 0xff, 0xff, 0xff, 0xff,
        0x05, 0x00,
        0x01, 0x00, 0xff, 0x7f, 0x0e, 0x00, 0xff, 0xff, 0x0e, 0x00,
        0x68, 0x05, 0x1a, 0x09, 0x1e,
        0x0f, 0x29, 0x01,
    ];
    assert_eq!(bytes, expected);

    let cursor = Cursor::open(Span::new(&bytes)).unwrap();
    assert_eq!(cursor.type_tag(), Type::Vector);
    assert_eq!(cursor.length().unwrap(), 5);
    assert_eq!(cursor.seek_index(0).unwrap().as_bool().unwrap(), true);
    assert_eq!(cursor.seek_index(1).unwrap().as_sint().unwrap(), i16::MAX as i64);
    assert_eq!(cursor.seek_index(2).unwrap().as_sint().unwrap(), i32::MAX as i64);
    assert_eq!(cursor.seek_index(3).unwrap().as_uint().unwrap(), u16::MAX as u64);
    assert_eq!(cursor.seek_index(4).unwrap().as_uint().unwrap(), u32::MAX as u64);
}

#[test]
fn keyed_map_of_five_round_trips_every_key() {
    let mut stack = VecStack::new();
    let mut stream = VecStream::new();
    let mut writer = Writer::new(&mut stack, &mut stream);

    for key in ["bool", "sint", "indirect_sint", "uint", "indirect_uint"] {
        writer.key(key).unwrap();
    }
    let keys = writer.map_keys(5, Width::W1).unwrap();

    writer.bool(true).unwrap();
    writer.sint(-7).unwrap();
    writer.indirect_sint(i32::MIN as i64).unwrap();
    writer.uint(7).unwrap();
    writer.indirect_uint(u32::MAX as u64).unwrap();
    writer.map(keys, 5, Width::W1).unwrap();
    writer.finalize().unwrap();

    let bytes = stream.into_bytes();
    let cursor = Cursor::open(Span::new(&bytes)).unwrap();
    assert_eq!(cursor.type_tag(), Type::Map);
    assert_eq!(cursor.length().unwrap(), 5);

    let sorted_keys: Vec<&str> = (0..5).map(|i| cursor.map_key_at_index(i).unwrap()).collect();
    assert_eq!(
        sorted_keys,
        vec!["bool", "indirect_sint", "indirect_uint", "sint", "uint"]
    );

    assert_eq!(cursor.seek_key("bool").unwrap().as_bool().unwrap(), true);
    assert_eq!(cursor.seek_key("sint").unwrap().as_sint().unwrap(), -7);
    assert_eq!(cursor.seek_key("indirect_sint").unwrap().as_sint().unwrap(), i32::MIN as i64);
    assert_eq!(cursor.seek_key("uint").unwrap().as_uint().unwrap(), 7);
    assert_eq!(cursor.seek_key("indirect_uint").unwrap().as_uint().unwrap(), u32::MAX as u64);
}

#[test]
fn typed_float_vector_of_three() {
    let bytes = build(|w| {
        w.f64(1.0).unwrap();
        w.f64(2.0).unwrap();
        w.f64(std::f64::consts::PI).unwrap();
        w.typed_vector_flt(3, Some(3), Width::W1).unwrap();
    });

    assert_eq!(bytes.len(), 27);
    assert_eq!(&bytes[24..27], &[0x18, 0x57, 0x01]);

    let cursor = Cursor::open(Span::new(&bytes)).unwrap();
    assert_eq!(cursor.type_tag(), Type::VectorFloat3);
    assert_eq!(cursor.width(), 8);
    assert_eq!(cursor.length().unwrap(), 3);
    assert_eq!(cursor.seek_index(0).unwrap().as_f64().unwrap(), 1.0);
    assert_eq!(cursor.seek_index(1).unwrap().as_f64().unwrap(), 2.0);
    assert_eq!(cursor.seek_index(2).unwrap().as_f64().unwrap(), std::f64::consts::PI);
}

#[test]
fn writer_latches_on_first_error() {
    let mut stack = VecStack::new();
    let mut stream = VecStream::new();
    let mut writer = Writer::new(&mut stack, &mut stream);
    writer.bool(true).unwrap();
    // Nothing was pushed to pair with a bogus map_keys pop count.
    assert!(writer.map_keys(3, Width::W1).is_err());
    assert!(writer.is_failed());
    assert_eq!(writer.bool(false).unwrap_err(), Error::FailSafe);
    assert_eq!(writer.bool(true).unwrap_err(), Error::FailSafe);
}

#[test]
fn width_hint_floors_the_vector_stride() {
    // Every value here fits a W1 stride naturally; a W2 hint must still
    // widen the length prefix, element area, and type-byte placement to
    // match, per spec.md §4.6's "start with stride = max(width_hint, 1)".
    let bytes = build(|w| {
        w.sint(1).unwrap();
        w.sint(2).unwrap();
        w.vector(2, Width::W2).unwrap();
    });

    let cursor = Cursor::open(Span::new(&bytes)).unwrap();
    assert_eq!(cursor.type_tag(), Type::Vector);
    assert_eq!(cursor.width(), 2);
    assert_eq!(cursor.length().unwrap(), 2);
    assert_eq!(cursor.seek_index(0).unwrap().as_sint().unwrap(), 1);
    assert_eq!(cursor.seek_index(1).unwrap().as_sint().unwrap(), 2);
}
