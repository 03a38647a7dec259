//! Zero-copy access to encoded values.
//!
//! A [`View`] pairs a type with a slice of the buffer it was interpreted from.
//! Indexing a view locates the member through the offset table and returns a
//! narrower view; nothing is decoded until a leaf accessor or
//! [`View::to_value`] is called. Views are read-only. To change a value,
//! materialize it with [`View::to_value`], modify the owned copy, and encode
//! it again.

use arc4_types::{Type, TypeKind};

use crate::codec::decode_value;
use crate::codec::layout::{self, Located, Members};
use crate::codec::primitive::{self, bit_mask, ensure, read_u16};
use crate::errors::{DecodeError, Error, IndexError};
use crate::options::CodecOptions;
use crate::values::{Address, UFixed, Uint, Value, normalize_index};
use crate::ToString;

#[derive(Debug, Clone, Copy)]
pub struct View<'b, 't> {
    ty: &'t Type<'t>,
    bytes: &'b [u8],
    /// Bit position for bools packed into a shared byte.
    bit: u8,
    options: CodecOptions,
}

impl<'b, 't> View<'b, 't> {
    pub(crate) fn new(ty: &'t Type<'t>, bytes: &'b [u8], options: CodecOptions) -> Self {
        View {
            ty,
            bytes,
            bit: 0,
            options,
        }
    }

    pub fn ty(&self) -> &'t Type<'t> {
        self.ty
    }

    /// The encoding of this value, without anything that follows it.
    pub fn raw(&self) -> Result<&'b [u8], DecodeError> {
        let used = layout::measure(self.bytes, self.ty)?;
        Ok(&self.bytes[..used])
    }

    fn wrong_type(&self, expected: &str) -> Error {
        DecodeError::WrongType {
            expected: expected.to_string(),
            found: self.ty.to_string(),
        }
        .into()
    }

    fn members(&self) -> Result<(Members<'t>, &'b [u8]), Error> {
        match *self.ty.kind() {
            TypeKind::DynamicArray(elem) => {
                let count = read_u16(self.bytes, 0, self.ty)?;
                Ok((Members::Repeat { elem, len: count }, &self.bytes[2..]))
            }
            _ => match Members::of(self.ty) {
                Some(members) => Ok((members, self.bytes)),
                None => Err(IndexError::NotIndexable {
                    ty: self.ty.to_string(),
                }
                .into()),
            },
        }
    }

    /// Element count of an array, member count of a tuple, or byte length of
    /// `byte[]` and `string`.
    pub fn len(&self) -> Result<usize, Error> {
        match self.ty.kind() {
            TypeKind::Bytes | TypeKind::String => Ok(read_u16(self.bytes, 0, self.ty)?),
            _ => Ok(self.members()?.0.len()),
        }
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        self.len().map(|len| len == 0)
    }

    /// Element `index`, where negative indices count from the end.
    pub fn at(&self, index: i64) -> Result<View<'b, 't>, Error> {
        let (members, region) = self.members()?;
        let i = normalize_index(index, members.len())?;
        self.child(members, region, i)
    }

    /// Named member of a struct.
    pub fn field(&self, name: &str) -> Result<View<'b, 't>, Error> {
        let i = self
            .ty
            .field_index(name)
            .ok_or_else(|| IndexError::NoSuchField {
                name: name.to_string(),
            })?;
        let (members, region) = self.members()?;
        self.child(members, region, i)
    }

    fn child(
        &self,
        members: Members<'t>,
        region: &'b [u8],
        index: usize,
    ) -> Result<View<'b, 't>, Error> {
        let out_of_bounds = || IndexError::OutOfBounds {
            index: index as i64,
            len: members.len(),
        };
        let ty = members.ty(index).ok_or_else(out_of_bounds)?;
        let view = match layout::locate(region, members, index)?.ok_or_else(out_of_bounds)? {
            Located::Range(range) => View::new(ty, &region[range], self.options),
            Located::Bit { offset, bit } => View {
                bit,
                ..View::new(ty, &region[offset..offset + 1], self.options)
            },
        };
        Ok(view)
    }

    /// Views of all elements, in order.
    pub fn elements(&self) -> Result<impl Iterator<Item = Result<View<'b, 't>, Error>> + use<'b, 't>, Error> {
        let (members, region) = self.members()?;
        let this = *self;
        Ok((0..members.len()).map(move |i| this.child(members, region, i)))
    }

    fn fixed(&self) -> Result<&'b [u8], Error> {
        let size = self.ty.static_size().unwrap_or(0);
        ensure(self.bytes, size, self.ty)?;
        Ok(&self.bytes[..size])
    }

    pub fn as_uint(&self) -> Result<Uint, Error> {
        match self.ty.kind() {
            TypeKind::Uint { .. } => Ok(Uint::from_be_bytes(self.fixed()?)),
            _ => Err(self.wrong_type("uint")),
        }
    }

    pub fn as_ufixed(&self) -> Result<UFixed, Error> {
        match *self.ty.kind() {
            TypeKind::UFixed { precision, .. } => Ok(UFixed::from_be_bytes(self.fixed()?, precision)),
            _ => Err(self.wrong_type("ufixed")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, Error> {
        match self.ty.kind() {
            TypeKind::Bool => Ok(self.fixed()?[0] & bit_mask(self.bit) != 0),
            _ => Err(self.wrong_type("bool")),
        }
    }

    pub fn as_byte(&self) -> Result<u8, Error> {
        match self.ty.kind() {
            TypeKind::Byte => Ok(self.fixed()?[0]),
            _ => Err(self.wrong_type("byte")),
        }
    }

    pub fn as_address(&self) -> Result<Address, Error> {
        match self.ty.kind() {
            TypeKind::Address => Address::from_slice(self.fixed()?)
                .ok_or_else(|| DecodeError::truncated(self.ty, 32, self.bytes.len()).into()),
            _ => Err(self.wrong_type("address")),
        }
    }

    /// Content of a `byte[]`, borrowed from the buffer.
    pub fn as_bytes(&self) -> Result<&'b [u8], Error> {
        match self.ty.kind() {
            TypeKind::Bytes => Ok(primitive::decode_bytes(self.bytes, self.ty)?.0),
            _ => Err(self.wrong_type("byte[]")),
        }
    }

    /// Content of a `string`, borrowed from the buffer.
    pub fn as_str(&self) -> Result<&'b str, Error> {
        match self.ty.kind() {
            TypeKind::String => Ok(primitive::decode_str(self.bytes, self.ty)?.0),
            _ => Err(self.wrong_type("string")),
        }
    }

    /// Decode this view into an owned value.
    pub fn to_value(&self) -> Result<Value, Error> {
        if let TypeKind::Bool = self.ty.kind() {
            return Ok(Value::Bool(self.as_bool()?));
        }
        Ok(decode_value(&self.options, self.bytes, self.ty)?)
    }
}
