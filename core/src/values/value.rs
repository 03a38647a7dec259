use core::fmt;

use arc4_types::Type;

use crate::errors::{IndexError, RangeError};
use crate::values::uint::{UFixed, Uint};
use crate::{String, ToString, Vec};

/// A 32-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub const ZERO: Address = Address([0; 32]);

    /// Returns `None` unless `bytes` is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; 32] = bytes.try_into().ok()?;
        Some(Address(array))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// An owned ARC-4 value.
///
/// Values are plain trees: `clone()` is a deep copy that shares nothing with
/// the original or with any buffer the value was decoded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Uint(Uint),
    UFixed(UFixed),
    Bool(bool),
    Byte(u8),
    Address(Address),
    /// `byte[]`.
    Bytes(Vec<u8>),
    String(String),
    /// Static or dynamic array; the type decides which.
    Array(Vec<Value>),
    /// Tuple or struct members in declaration order.
    Tuple(Vec<Value>),
}

/// Resolve a possibly negative index against `len`.
///
/// Valid indices are `[-len, len)`; `-1` is the last element.
pub(crate) fn normalize_index(index: i64, len: usize) -> Result<usize, IndexError> {
    let resolved = if index < 0 {
        (len as i64).checked_add(index)
    } else {
        Some(index)
    };
    match resolved {
        Some(i) if i >= 0 && (i as u64) < len as u64 => Ok(i as usize),
        _ => Err(IndexError::OutOfBounds { index, len }),
    }
}

impl Value {
    /// `uint<bits>` holding `value`.
    pub fn uint(bits: u16, value: impl Into<num_bigint::BigUint>) -> Result<Self, RangeError> {
        Ok(Value::Uint(Uint::new(bits, value)?))
    }

    /// `ufixed<bits>x<precision>` parsed from a decimal string.
    pub fn ufixed(bits: u16, precision: u8, text: &str) -> Result<Self, RangeError> {
        Ok(Value::UFixed(UFixed::parse(bits, precision, text)?))
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::UFixed(_) => "ufixed",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Address(_) => "address",
            Value::Bytes(_) => "byte[]",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
        }
    }

    fn members(&self) -> Result<&[Value], IndexError> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Ok(items),
            other => Err(IndexError::NotIndexable {
                ty: other.kind_name().to_string(),
            }),
        }
    }

    fn members_mut(&mut self) -> Result<&mut [Value], IndexError> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Ok(items),
            other => Err(IndexError::NotIndexable {
                ty: other.kind_name().to_string(),
            }),
        }
    }

    /// Number of elements of an array or members of a tuple.
    pub fn len(&self) -> Result<usize, IndexError> {
        self.members().map(<[Value]>::len)
    }

    pub fn is_empty(&self) -> Result<bool, IndexError> {
        self.len().map(|len| len == 0)
    }

    /// Element `index` of an array or tuple. Negative indices count from the end.
    pub fn at(&self, index: i64) -> Result<&Value, IndexError> {
        let items = self.members()?;
        Ok(&items[normalize_index(index, items.len())?])
    }

    pub fn at_mut(&mut self, index: i64) -> Result<&mut Value, IndexError> {
        let items = self.members_mut()?;
        let i = normalize_index(index, items.len())?;
        Ok(&mut items[i])
    }

    /// Named member of a struct value, resolved through its type.
    pub fn field(&self, ty: &Type<'_>, name: &str) -> Result<&Value, IndexError> {
        let i = Self::field_position(ty, name)?;
        self.at(i as i64)
    }

    pub fn field_mut(&mut self, ty: &Type<'_>, name: &str) -> Result<&mut Value, IndexError> {
        let i = Self::field_position(ty, name)?;
        self.at_mut(i as i64)
    }

    fn field_position(ty: &Type<'_>, name: &str) -> Result<usize, IndexError> {
        ty.field_index(name).ok_or_else(|| IndexError::NoSuchField {
            name: name.to_string(),
        })
    }

    pub fn as_uint(&self) -> Option<&Uint> {
        match self {
            Value::Uint(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_ufixed(&self) -> Option<&UFixed> {
        match self {
            Value::UFixed(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        self.members().ok()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Uint> for Value {
    fn from(u: Uint) -> Self {
        Value::Uint(u)
    }
}

impl From<UFixed> for Value {
    fn from(u: UFixed) -> Self {
        Value::UFixed(u)
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Value::Address(a)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value], open: &str, close: &str) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint(u) => write!(f, "{}", u),
            Value::UFixed(u) => write!(f, "{}", u),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(b) => write!(f, "{}", b),
            Value::Address(a) => write!(f, "{}", a),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => write_list(f, items, "[", "]"),
            Value::Tuple(items) => write_list(f, items, "(", ")"),
        }
    }
}
