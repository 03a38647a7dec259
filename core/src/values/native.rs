//! Mapping between Rust types and ARC-4 types.
//!
//! ```
//! use arc4_core::{Codec, Native};
//! use arc4_types::TypeManager;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let mgr = TypeManager::new(&arena);
//!
//! let ty = <(u64, String, Vec<bool>)>::type_descr(mgr).unwrap();
//! assert_eq!(ty.to_string(), "(uint64,string,bool[])");
//!
//! let codec = Codec::default();
//! let bytes = codec.encode_native(mgr, (7u64, String::from("hi"))).unwrap();
//! let back: (u64, String) = codec.decode_native(mgr, &bytes).unwrap();
//! assert_eq!(back, (7, String::from("hi")));
//! ```

use arc4_types::{Type, TypeError, TypeManager};
use num_traits::ToPrimitive;

use crate::errors::DecodeError;
use crate::values::uint::Uint;
use crate::values::value::{Address, Value};
use crate::{String, ToString, Vec, format, vec};

/// A Rust type with a fixed ARC-4 counterpart.
pub trait Native: Sized {
    /// Fails only if the type's encoded size does not fit in `usize`.
    fn type_descr<'a>(type_mgr: &'a TypeManager<'a>) -> Result<&'a Type<'a>, TypeError>;

    fn into_value(self) -> Value;

    /// Value of a `T[]` holding `items`.
    fn array_value(items: Vec<Self>) -> Value {
        Value::Array(items.into_iter().map(Self::into_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, DecodeError>;
}

fn wrong_type(expected: &str, found: &Value) -> DecodeError {
    DecodeError::WrongType {
        expected: expected.to_string(),
        found: found.kind_name().to_string(),
    }
}

impl Native for bool {
    fn type_descr<'a>(type_mgr: &'a TypeManager<'a>) -> Result<&'a Type<'a>, TypeError> {
        Ok(type_mgr.bool())
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(wrong_type("bool", &other)),
        }
    }
}

/// `u8` is `byte`; use `Uint` directly for `uint8`.
impl Native for u8 {
    fn type_descr<'a>(type_mgr: &'a TypeManager<'a>) -> Result<&'a Type<'a>, TypeError> {
        Ok(type_mgr.byte())
    }

    fn into_value(self) -> Value {
        Value::Byte(self)
    }

    /// `byte[]` decodes to [`Value::Bytes`], so it encodes from it too.
    fn array_value(items: Vec<Self>) -> Value {
        Value::Bytes(items)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Byte(b) => Ok(b),
            other => Err(wrong_type("byte", &other)),
        }
    }
}

macro_rules! impl_native_uint {
    ($($ty:ty => $bits:literal, $ctor:ident, $to:ident;)*) => {
        $(
            impl Native for $ty {
                fn type_descr<'a>(
                    type_mgr: &'a TypeManager<'a>,
                ) -> Result<&'a Type<'a>, TypeError> {
                    Ok(type_mgr.$ctor())
                }

                fn into_value(self) -> Value {
                    // Every value of the Rust type fits its own width.
                    Value::Uint(Uint::from_be_bytes(&self.to_be_bytes()))
                }

                fn from_value(value: Value) -> Result<Self, DecodeError> {
                    match &value {
                        Value::Uint(u) => u.value().$to().ok_or_else(|| DecodeError::WrongType {
                            expected: concat!("uint", $bits).to_string(),
                            found: u.to_string(),
                        }),
                        other => Err(wrong_type(concat!("uint", $bits), other)),
                    }
                }
            }
        )*
    };
}

impl_native_uint! {
    u16 => 16, uint16, to_u16;
    u32 => 32, uint32, to_u32;
    u64 => 64, uint64, to_u64;
    u128 => 128, uint128, to_u128;
}

impl Native for String {
    fn type_descr<'a>(type_mgr: &'a TypeManager<'a>) -> Result<&'a Type<'a>, TypeError> {
        Ok(type_mgr.string())
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(wrong_type("string", &other)),
        }
    }
}

impl Native for Address {
    fn type_descr<'a>(type_mgr: &'a TypeManager<'a>) -> Result<&'a Type<'a>, TypeError> {
        Ok(type_mgr.address())
    }

    fn into_value(self) -> Value {
        Value::Address(self)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Address(a) => Ok(a),
            other => Err(wrong_type("address", &other)),
        }
    }
}

/// Elements of a decoded array, with `byte[]` expanded to `byte` values.
fn array_items(value: Value) -> Result<Vec<Value>, DecodeError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Bytes(bytes) => Ok(bytes.into_iter().map(Value::Byte).collect()),
        other => Err(wrong_type("array", &other)),
    }
}

impl<T: Native> Native for Vec<T> {
    fn type_descr<'a>(type_mgr: &'a TypeManager<'a>) -> Result<&'a Type<'a>, TypeError> {
        Ok(type_mgr.dynamic_array(T::type_descr(type_mgr)?))
    }

    fn into_value(self) -> Value {
        T::array_value(self)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        array_items(value)?.into_iter().map(T::from_value).collect()
    }
}

impl<T: Native, const N: usize> Native for [T; N] {
    fn type_descr<'a>(type_mgr: &'a TypeManager<'a>) -> Result<&'a Type<'a>, TypeError> {
        type_mgr.static_array(T::type_descr(type_mgr)?, N)
    }

    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(T::into_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let items: Vec<T> = array_items(value)?
            .into_iter()
            .map(T::from_value)
            .collect::<Result<_, _>>()?;
        let found = items.len();
        items.try_into().map_err(|_| DecodeError::WrongType {
            expected: format!("{} elements", N),
            found: format!("{} elements", found),
        })
    }
}

macro_rules! impl_native_tuple {
    ($len:literal: $($name:ident),+) => {
        impl<$($name: Native),+> Native for ($($name,)+) {
            fn type_descr<'a>(
                type_mgr: &'a TypeManager<'a>,
            ) -> Result<&'a Type<'a>, TypeError> {
                type_mgr.tuple([$($name::type_descr(type_mgr)?),+])
            }

            #[allow(non_snake_case)]
            fn into_value(self) -> Value {
                let ($($name,)+) = self;
                Value::Tuple(vec![$($name.into_value()),+])
            }

            fn from_value(value: Value) -> Result<Self, DecodeError> {
                let items = match value {
                    Value::Tuple(items) if items.len() == $len => items,
                    other => {
                        return Err(DecodeError::WrongType {
                            expected: format!("tuple of {}", $len),
                            found: other.to_string(),
                        });
                    }
                };
                let mut items = items.into_iter();
                Ok(($(
                    $name::from_value(items.next().ok_or_else(|| DecodeError::WrongType {
                        expected: format!("tuple of {}", $len),
                        found: "fewer members".to_string(),
                    })?)?,
                )+))
            }
        }
    };
}

impl_native_tuple!(1: A);
impl_native_tuple!(2: A, B);
impl_native_tuple!(3: A, B, C);
impl_native_tuple!(4: A, B, C, D);
impl_native_tuple!(5: A, B, C, D, E);
impl_native_tuple!(6: A, B, C, D, E, F);
