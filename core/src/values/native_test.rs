use arc4_types::TypeManager;
use pretty_assertions::assert_eq;

use crate::codec::Codec;
use crate::errors::DecodeError;
use crate::values::{Address, Native, Value};

#[test]
fn test_type_descriptors() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);

    assert!(core::ptr::eq(bool::type_descr(type_mgr).unwrap(), type_mgr.bool()));
    assert!(core::ptr::eq(u8::type_descr(type_mgr).unwrap(), type_mgr.byte()));
    assert!(core::ptr::eq(u64::type_descr(type_mgr).unwrap(), type_mgr.uint64()));
    assert!(core::ptr::eq(Vec::<u8>::type_descr(type_mgr).unwrap(), type_mgr.bytes()));
    assert_eq!(<[u32; 3]>::type_descr(type_mgr).unwrap().to_string(), "uint32[3]");
    assert_eq!(
        <(Address, Vec<String>, bool, u128)>::type_descr(type_mgr).unwrap().to_string(),
        "(address,string[],bool,uint128)"
    );
}

#[test]
fn test_native_round_trip_through_bytes() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();

    let value = (7u64, String::from("hi"), vec![true, false, true], [1u16, 2]);
    let bytes = codec.encode_native(type_mgr, value.clone()).unwrap();
    let back: (u64, String, Vec<bool>, [u16; 2]) = codec.decode_native(type_mgr, &bytes).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_vec_u8_is_byte_string() {
    let arena = bumpalo::Bump::new();
    let type_mgr = TypeManager::new(&arena);
    let codec = Codec::default();

    let bytes = codec.encode_native(type_mgr, vec![0xABu8, 0xCD]).unwrap();
    assert_eq!(bytes, vec![0, 2, 0xAB, 0xCD]);
    assert_eq!(
        codec.decode(&bytes, type_mgr.bytes()).unwrap(),
        Value::Bytes(vec![0xAB, 0xCD])
    );
    let back: Vec<u8> = codec.decode_native(type_mgr, &bytes).unwrap();
    assert_eq!(back, vec![0xAB, 0xCD]);

    // The value matches what decoding produces, so it round-trips as a Value.
    let value = vec![0xABu8, 0xCD].into_value();
    assert_eq!(value, Value::Bytes(vec![0xAB, 0xCD]));
    assert_eq!(
        codec.decode(&codec.encode(&value, type_mgr.bytes()).unwrap(), type_mgr.bytes()).unwrap(),
        value
    );
    // Fixed-size byte arrays keep one value per element.
    assert_eq!(
        [1u8, 2].into_value(),
        Value::Array(vec![Value::Byte(1), Value::Byte(2)])
    );
}

#[test]
fn test_from_value_rejects_wrong_shape() {
    assert!(matches!(
        u64::from_value(Value::Bool(true)),
        Err(DecodeError::WrongType { .. })
    ));
    // A wider value that does not fit the Rust type.
    let big = Value::uint(128, u128::MAX).unwrap();
    assert!(u64::from_value(big).is_err());
    assert!(<[bool; 2]>::from_value(Value::Array(vec![Value::Bool(true)])).is_err());
    assert!(<(bool, bool)>::from_value(Value::Tuple(vec![Value::Bool(true)])).is_err());
}
