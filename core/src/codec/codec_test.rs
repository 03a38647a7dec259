use arc4_types::TypeManager;
use pretty_assertions::assert_eq;

use crate::codec::{Codec, Source};
use crate::errors::{DecodeError, EncodeError, RangeError};
use crate::options::CodecOptions;
use crate::test_utils::init_test_logging;
use crate::values::{UFixed, Value};

fn uint(bits: u16, n: u64) -> Value {
    Value::uint(bits, n).unwrap()
}

fn strict() -> Codec {
    Codec::new(CodecOptions {
        strict_offsets: true,
        ..CodecOptions::default()
    })
}

#[test]
fn test_offset_table_layout() {
    init_test_logging();
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let ty = type_mgr.parse("(uint64[],string,uint8)").unwrap();
    let value = Value::Tuple(vec![
        Value::Array(vec![uint(64, 1), uint(64, 2), uint(64, 3)]),
        Value::from("hi"),
        uint(8, 7),
    ]);

    let bytes = Codec::default().encode(&value, ty).unwrap();

    #[rustfmt::skip]
    let expected = vec![
        // head: two offsets, then the inline uint8
        0, 5, 0, 31, 7,
        // tail: the array, count-prefixed
        0, 3,
        0, 0, 0, 0, 0, 0, 0, 1,
        0, 0, 0, 0, 0, 0, 0, 2,
        0, 0, 0, 0, 0, 0, 0, 3,
        // then the string, length-prefixed
        0, 2, b'h', b'i',
    ];
    assert_eq!(bytes, expected);
    assert_eq!(Codec::default().decode(&bytes, ty).unwrap(), value);
    assert_eq!(strict().decode(&bytes, ty).unwrap(), value);
}

#[test]
fn test_bool_packing() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();

    let ty = type_mgr.static_array(type_mgr.bool(), 10).unwrap();
    let value = Value::Array((0..10).map(|i| Value::Bool(i % 2 == 0)).collect());
    let bytes = codec.encode(&value, ty).unwrap();
    assert_eq!(bytes, vec![0b1010_1010, 0b1000_0000]);
    assert_eq!(codec.decode(&bytes, ty).unwrap(), value);

    // Bools in a tuple pack until a non-bool member breaks the run.
    let ty = type_mgr.parse("(bool,bool,uint16,bool)").unwrap();
    let value = Value::Tuple(vec![
        Value::Bool(true),
        Value::Bool(false),
        uint(16, 258),
        Value::Bool(true),
    ]);
    let bytes = codec.encode(&value, ty).unwrap();
    assert_eq!(bytes, vec![0x80, 0x01, 0x02, 0x80]);
    assert_eq!(codec.decode(&bytes, ty).unwrap(), value);

    // A lone bool takes a whole byte.
    assert_eq!(codec.encode(&Value::Bool(true), type_mgr.bool()).unwrap(), vec![0x80]);
    assert_eq!(
        codec.decode(&[0x00], type_mgr.bool()).unwrap(),
        Value::Bool(false)
    );

    // Dynamic bool arrays pack after the count.
    let ty = type_mgr.dynamic_array(type_mgr.bool());
    let value = Value::Array(vec![Value::Bool(true); 9]);
    assert_eq!(codec.encode(&value, ty).unwrap(), vec![0, 9, 0xFF, 0x80]);
}

#[test]
fn test_static_and_dynamic_arrays_nest() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();

    // Static count: no prefix.
    let pair = type_mgr.parse("uint16[2]").unwrap();
    let value = Value::Array(vec![uint(16, 1), uint(16, 2)]);
    assert_eq!(codec.encode(&value, pair).unwrap(), vec![0, 1, 0, 2]);

    // Runtime count of static pairs.
    let ty = type_mgr.parse("uint16[2][]").unwrap();
    let value = Value::Array(vec![
        Value::Array(vec![uint(16, 1), uint(16, 2)]),
        Value::Array(vec![uint(16, 3), uint(16, 4)]),
    ]);
    let bytes = codec.encode(&value, ty).unwrap();
    assert_eq!(bytes, vec![0, 2, 0, 1, 0, 2, 0, 3, 0, 4]);
    assert_eq!(codec.decode(&bytes, ty).unwrap(), value);

    // Static count of dynamic elements: an offset table, no prefix.
    let ty = type_mgr.parse("string[2]").unwrap();
    let value = Value::Array(vec![Value::from("a"), Value::from("bc")]);
    let bytes = codec.encode(&value, ty).unwrap();
    assert_eq!(bytes, vec![0, 4, 0, 7, 0, 1, b'a', 0, 2, b'b', b'c']);
    assert_eq!(codec.decode(&bytes, ty).unwrap(), value);

    // Runtime count of dynamic elements: offsets count from after the prefix.
    let ty = type_mgr.parse("string[]").unwrap();
    let value = Value::Array(vec![Value::from("x")]);
    let bytes = codec.encode(&value, ty).unwrap();
    assert_eq!(bytes, vec![0, 1, 0, 2, 0, 1, b'x']);
    assert_eq!(codec.decode(&bytes, ty).unwrap(), value);

    let empty = Value::Array(vec![]);
    assert_eq!(codec.encode(&empty, ty).unwrap(), vec![0, 0]);
    assert_eq!(codec.decode(&[0, 0], ty).unwrap(), empty);
}

#[test]
fn test_nested_dynamic_tuple() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();
    let ty = type_mgr.parse("(string,(uint8,string))").unwrap();
    let value = Value::Tuple(vec![
        Value::from("a"),
        Value::Tuple(vec![uint(8, 5), Value::from("b")]),
    ]);

    let bytes = codec.encode(&value, ty).unwrap();
    assert_eq!(
        bytes,
        vec![0, 4, 0, 7, 0, 1, b'a', 5, 0, 3, 0, 1, b'b']
    );
    assert_eq!(codec.decode(&bytes, ty).unwrap(), value);
    assert_eq!(codec.measure(&bytes, ty).unwrap(), bytes.len());
}

#[test]
fn test_static_tuple_has_no_tail() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let ty = type_mgr.parse("(uint8,address,byte)").unwrap();
    let value = Value::Tuple(vec![
        uint(8, 1),
        Value::Address(crate::values::Address([0xAA; 32])),
        Value::Byte(2),
    ]);
    let bytes = Codec::default().encode(&value, ty).unwrap();
    assert_eq!(bytes.len(), 34);
    assert_eq!(ty.static_size(), Some(34));
    assert_eq!(bytes[0], 1);
    assert_eq!(bytes[33], 2);
}

#[test]
fn test_ufixed_shares_uint_layout() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();
    let ty = type_mgr.parse("ufixed32x2").unwrap();

    let value = Value::ufixed(32, 2, "1.25").unwrap();
    let bytes = codec.encode(&value, ty).unwrap();
    assert_eq!(bytes, vec![0, 0, 0, 125]);
    assert_eq!(codec.decode(&bytes, ty).unwrap(), value);

    // The precision lives in the type only.
    let other = Value::UFixed(UFixed::parse(32, 3, "1.250").unwrap());
    assert!(matches!(
        codec.encode(&other, ty),
        Err(EncodeError::TypeMismatch { .. })
    ));
}

#[test]
fn test_encode_errors() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();

    assert_eq!(
        codec.encode(&Value::Bool(true), type_mgr.uint64()).unwrap_err(),
        EncodeError::TypeMismatch {
            expected: "uint64".into(),
            found: "bool".into()
        }
    );
    assert_eq!(
        codec
            .encode(
                &Value::Array(vec![uint(8, 1), uint(8, 2)]),
                type_mgr.static_array(type_mgr.uint8(), 3).unwrap()
            )
            .unwrap_err(),
        EncodeError::LengthMismatch {
            ty: "uint8[3]".into(),
            expected: 3,
            found: 2
        }
    );
    assert_eq!(
        codec.encode(&uint(16, 300), type_mgr.uint8()).unwrap_err(),
        EncodeError::Range(RangeError::Overflow {
            bits: 8,
            value: "300".into()
        })
    );
    let long = Value::String("x".repeat(u16::MAX as usize + 1));
    assert!(matches!(
        codec.encode(&long, type_mgr.string()),
        Err(EncodeError::TooLong { .. })
    ));
    // A bool slot inside a composite still checks the value.
    let ty = type_mgr.tuple([type_mgr.bool(), type_mgr.bool()]).unwrap();
    assert!(matches!(
        codec.encode(&Value::Tuple(vec![Value::Bool(true), uint(8, 1)]), ty),
        Err(EncodeError::TypeMismatch { .. })
    ));
}

#[test]
fn test_truncation() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();

    assert_eq!(
        codec.decode(&[0; 7], type_mgr.uint64()).unwrap_err(),
        DecodeError::Truncated {
            ty: "uint64".into(),
            needed: 8,
            available: 7
        }
    );
    assert!(matches!(
        codec.decode(&[0, 9, b'a', b'b'], type_mgr.string()),
        Err(DecodeError::Truncated { needed: 11, .. })
    ));
    // Count claims two uint64s, only one is present.
    let ty = type_mgr.dynamic_array(type_mgr.uint64());
    assert!(matches!(
        codec.decode(&[0, 2, 0, 0, 0, 0, 0, 0, 0, 1], ty),
        Err(DecodeError::Truncated { .. })
    ));
    assert!(matches!(
        codec.decode(&[], type_mgr.bytes()),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn test_malformed_offsets() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();
    let ty = type_mgr.parse("(string,string)").unwrap();

    // Inverted tail regions.
    let bytes = [0, 6, 0, 4, 0, 0, 0, 0];
    assert!(matches!(
        codec.decode(&bytes, ty),
        Err(DecodeError::MalformedOffset { slot: 1, .. })
    ));

    // Offset beyond the buffer.
    let bytes = [0, 4, 0, 99, 0, 0];
    assert!(matches!(
        codec.decode(&bytes, ty),
        Err(DecodeError::MalformedOffset {
            slot: 1,
            offset: 99,
            ..
        })
    ));

    // A member cannot read past the next member's offset.
    let bytes = [0, 4, 0, 6, 0, 3, 0, 1, b'b'];
    assert!(matches!(
        codec.decode(&bytes, ty),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn test_strict_offsets_reject_gaps() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let ty = type_mgr.parse("(string,string)").unwrap();
    // One junk byte between the two tail members.
    let bytes = [0, 4, 0, 8, 0, 1, b'a', 0xEE, 0, 1, b'b'];
    let expected = Value::Tuple(vec![Value::from("a"), Value::from("b")]);

    assert_eq!(Codec::default().decode(&bytes, ty).unwrap(), expected);
    assert!(matches!(
        strict().decode(&bytes, ty),
        Err(DecodeError::MalformedOffset { slot: 0, .. })
    ));
}

#[test]
fn test_trailing_bytes() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);

    assert_eq!(
        Codec::default().decode(&[1, 2], type_mgr.uint8()).unwrap_err(),
        DecodeError::TrailingBytes {
            ty: "uint8".into(),
            count: 1
        }
    );
    let lenient = Codec::new(CodecOptions {
        allow_trailing_bytes: true,
        ..CodecOptions::default()
    });
    assert_eq!(
        lenient.decode(&[1, 2], type_mgr.uint8()).unwrap(),
        uint(8, 1)
    );
}

#[test]
fn test_log_source_strips_prefix() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();
    let log = [0xAA, 0xBB, 0xCC, 0xDD, 0, 0, 0, 5];

    assert_eq!(
        codec.decode_from(&log, type_mgr.uint32(), Source::Log).unwrap(),
        uint(32, 5)
    );
    assert!(codec.decode(&log, type_mgr.uint32()).is_err());
    assert!(matches!(
        codec.decode_from(&[1, 2], type_mgr.uint32(), Source::Log),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn test_tuple_over_type_list() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();
    let types = [type_mgr.uint8(), type_mgr.string(), type_mgr.bool()];
    let values = vec![uint(8, 1), Value::from("z"), Value::Bool(true)];

    let bytes = codec.encode_tuple(&types, &values).unwrap();
    let ty = type_mgr.tuple(types).unwrap();
    assert_eq!(bytes, codec.encode(&Value::Tuple(values.clone()), ty).unwrap());
    assert_eq!(codec.decode_tuple(&bytes, &types).unwrap(), values);
    assert!(matches!(
        codec.encode_tuple(&types, &values[..2]),
        Err(EncodeError::LengthMismatch { .. })
    ));
}

#[test]
fn test_decoded_clone_is_independent_of_source() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();
    let ty = type_mgr.parse("(uint64[],string)").unwrap();
    let source = codec
        .encode(
            &Value::Tuple(vec![
                Value::Array(vec![uint(64, 1), uint(64, 2)]),
                Value::from("s"),
            ]),
            ty,
        )
        .unwrap();
    let snapshot = source.clone();

    let decoded = codec.decode(&source, ty).unwrap();
    let mut copy = decoded.clone();
    *copy.at_mut(0).unwrap().at_mut(0).unwrap() = uint(64, 42);
    if let Value::Array(items) = copy.at_mut(0).unwrap() {
        items.push(uint(64, 3));
    }

    assert_eq!(decoded.at(0).unwrap().len(), Ok(2));
    assert_eq!(decoded.at(0).unwrap().at(0).unwrap(), &uint(64, 1));
    assert_eq!(source, snapshot);
    assert_eq!(codec.decode(&codec.encode(&decoded, ty).unwrap(), ty).unwrap(), decoded);
}

#[test]
fn test_byte_array_has_one_value_shape() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();

    let bytes = Value::Bytes(vec![1, 2]);
    let encoded = codec.encode(&bytes, type_mgr.bytes()).unwrap();
    assert_eq!(codec.decode(&encoded, type_mgr.bytes()).unwrap(), bytes);

    // `byte[]` takes only the shape it decodes to.
    let items = Value::Array(vec![Value::Byte(1), Value::Byte(2)]);
    assert_eq!(
        codec.encode(&items, type_mgr.bytes()).unwrap_err(),
        EncodeError::TypeMismatch {
            expected: "byte[]".into(),
            found: "array".into()
        }
    );

    // A static byte array stays a list of bytes both ways.
    let ty = type_mgr.static_array(type_mgr.byte(), 2).unwrap();
    let encoded = codec.encode(&items, ty).unwrap();
    assert_eq!(encoded, [1, 2]);
    assert_eq!(codec.decode(&encoded, ty).unwrap(), items);
}

#[test]
fn test_large_count_fails_on_short_input() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();

    let ty = type_mgr.parse("string[100000000]").unwrap();
    assert_eq!(
        codec.decode(&[0, 0], ty).unwrap_err(),
        DecodeError::Truncated {
            ty: "head".into(),
            needed: 200_000_000,
            available: 2
        }
    );
    assert!(matches!(
        codec.measure(&[0, 0], ty),
        Err(DecodeError::Truncated { .. })
    ));

    // The wire count claims 65535 strings over two bytes.
    let ty = type_mgr.dynamic_array(type_mgr.string());
    assert!(matches!(
        codec.decode(&[0xFF, 0xFF, 0, 2], ty),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn test_standalone_bool_reads_high_bit() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);

    for codec in [Codec::default(), strict()] {
        assert_eq!(codec.decode(&[0x80], type_mgr.bool()).unwrap(), Value::Bool(true));
        assert_eq!(codec.decode(&[0xFF], type_mgr.bool()).unwrap(), Value::Bool(true));
        assert_eq!(codec.decode(&[0x7F], type_mgr.bool()).unwrap(), Value::Bool(false));
    }
    // Encoding is canonical.
    assert_eq!(
        Codec::default().encode(&Value::Bool(true), type_mgr.bool()).unwrap(),
        [0x80]
    );
}
