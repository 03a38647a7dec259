use arc4_types::{Type, TypeKind};

use crate::codec::layout::{self, Located, Members};
use crate::codec::primitive::{self, bit_mask, ensure, read_u16};
use crate::errors::DecodeError;
use crate::options::CodecOptions;
use crate::values::{Address, UFixed, Uint, Value};
use crate::{ToString, Vec};

/// Eager decoder: walks the whole encoding and builds owned values.
pub(crate) struct Decoder<'o> {
    options: &'o CodecOptions,
}

impl<'o> Decoder<'o> {
    pub(crate) fn new(options: &'o CodecOptions) -> Self {
        Decoder { options }
    }

    /// Decode a `ty` value from the front of `region`.
    ///
    /// Returns the value and the number of bytes its encoding spans.
    pub(crate) fn decode(&self, region: &[u8], ty: &Type<'_>) -> Result<(Value, usize), DecodeError> {
        if let Some(size) = ty.static_size() {
            ensure(region, size, ty)?;
        }
        let decoded = match *ty.kind() {
            TypeKind::Uint { bits } => {
                let size = bits as usize / 8;
                (Value::Uint(Uint::from_be_bytes(&region[..size])), size)
            }
            TypeKind::UFixed { bits, precision } => {
                let size = bits as usize / 8;
                let value = UFixed::from_be_bytes(&region[..size], precision);
                (Value::UFixed(value), size)
            }
            // Low bits are ignored, see `CodecOptions`.
            TypeKind::Bool => (Value::Bool(region[0] & bit_mask(0) != 0), 1),
            TypeKind::Byte => (Value::Byte(region[0]), 1),
            TypeKind::Address => {
                let address = Address::from_slice(&region[..32])
                    .ok_or_else(|| DecodeError::truncated(ty, 32, region.len()))?;
                (Value::Address(address), 32)
            }
            TypeKind::Bytes => {
                let (bytes, used) = primitive::decode_bytes(region, ty)?;
                (Value::Bytes(bytes.to_vec()), used)
            }
            TypeKind::String => {
                let (text, used) = primitive::decode_str(region, ty)?;
                (Value::String(text.to_string()), used)
            }
            TypeKind::StaticArray { elem, len } => {
                let (items, used) = self.decode_members(region, Members::Repeat { elem, len })?;
                (Value::Array(items), used)
            }
            TypeKind::DynamicArray(elem) => {
                let count = read_u16(region, 0, ty)?;
                let members = Members::Repeat { elem, len: count };
                let (items, used) = self.decode_members(&region[2..], members)?;
                (Value::Array(items), 2 + used)
            }
            TypeKind::Tuple(fields) => {
                let (items, used) = self.decode_members(region, Members::Fields(fields))?;
                (Value::Tuple(items), used)
            }
        };
        Ok(decoded)
    }

    /// Decode every member of a composite whose head starts at `region[0]`.
    pub(crate) fn decode_members(
        &self,
        region: &[u8],
        members: Members<'_>,
    ) -> Result<(Vec<Value>, usize), DecodeError> {
        let (located, head_len) = layout::resolve(region, members, self.options)?;
        let last_dynamic = members.last_dynamic();

        let mut values = Vec::with_capacity(located.len());
        let mut used = head_len;
        for (i, (loc, ty)) in located.iter().zip(members.types()).enumerate() {
            let value = match loc {
                Located::Bit { offset, bit } => Value::Bool(region[*offset] & bit_mask(*bit) != 0),
                Located::Range(range) => {
                    let (value, span) = self.decode(&region[range.clone()], ty)?;
                    if ty.is_dynamic() {
                        let end = range.start + span;
                        if self.options.strict_offsets
                            && Some(i) != last_dynamic
                            && end != range.end
                        {
                            return Err(DecodeError::MalformedOffset {
                                slot: i,
                                offset: range.end,
                                reason: "gap between tail members",
                            });
                        }
                        used = used.max(end);
                    }
                    value
                }
            };
            values.push(value);
        }
        Ok((values, used))
    }
}
