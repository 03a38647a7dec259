use arc4_types::{Type, TypeKind};
use smallvec::SmallVec;

use crate::codec::layout::{Members, Slot};
use crate::codec::primitive::{self, BOOL_TRUE, bit_mask};
use crate::errors::EncodeError;
use crate::values::Value;
use crate::{ToString, Vec, vec};

fn mismatch(ty: &Type<'_>, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        expected: ty.to_string(),
        found: value.kind_name().to_string(),
    }
}

fn check_len(ty: &Type<'_>, expected: usize, found: usize) -> Result<(), EncodeError> {
    if expected != found {
        return Err(EncodeError::LengthMismatch {
            ty: ty.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

/// Append the encoding of `value` as `ty`.
pub(crate) fn encode_into(out: &mut Vec<u8>, ty: &Type<'_>, value: &Value) -> Result<(), EncodeError> {
    match (*ty.kind(), value) {
        (TypeKind::Uint { bits }, Value::Uint(u)) => primitive::encode_uint(out, bits, u.value()),
        (TypeKind::UFixed { bits, precision }, Value::UFixed(f)) if f.precision() == precision => {
            primitive::encode_uint(out, bits, f.raw())
        }
        (TypeKind::Bool, Value::Bool(b)) => {
            out.push(if *b { BOOL_TRUE } else { 0 });
            Ok(())
        }
        (TypeKind::Byte, Value::Byte(b)) => {
            out.push(*b);
            Ok(())
        }
        (TypeKind::Address, Value::Address(a)) => {
            out.extend_from_slice(a.as_bytes());
            Ok(())
        }
        (TypeKind::Bytes, Value::Bytes(bytes)) => primitive::encode_bytes(out, bytes),
        (TypeKind::String, Value::String(s)) => primitive::encode_bytes(out, s.as_bytes()),
        (TypeKind::StaticArray { elem, len }, Value::Array(items)) => {
            check_len(ty, len, items.len())?;
            encode_members(out, Members::Repeat { elem, len }, items)
        }
        (TypeKind::DynamicArray(elem), Value::Array(items)) => {
            primitive::write_u16(out, items.len(), "element count")?;
            let members = Members::Repeat {
                elem,
                len: items.len(),
            };
            encode_members(out, members, items)
        }
        (TypeKind::Tuple(fields), Value::Tuple(items)) => {
            check_len(ty, fields.len(), items.len())?;
            encode_members(out, Members::Fields(fields), items)
        }
        _ => Err(mismatch(ty, value)),
    }
}

/// Append the head and tail of a composite. `values` must have one entry per
/// member.
pub(crate) fn encode_members(
    out: &mut Vec<u8>,
    members: Members<'_>,
    values: &[Value],
) -> Result<(), EncodeError> {
    let (slots, head_len) = members.slots();
    let mut head = vec![0u8; head_len];
    let mut tail = Vec::new();
    // (head position of the offset, start of the member in the tail)
    let mut pending: SmallVec<[(usize, usize); 4]> = SmallVec::new();
    let mut scratch = Vec::new();

    for ((slot, ty), value) in slots.iter().zip(members.types()).zip(values) {
        match *slot {
            Slot::Static { offset, size } => {
                scratch.clear();
                encode_into(&mut scratch, ty, value)?;
                head[offset..offset + size].copy_from_slice(&scratch);
            }
            Slot::Bit { offset, bit } => match value {
                Value::Bool(true) => head[offset] |= bit_mask(bit),
                Value::Bool(false) => {}
                other => return Err(mismatch(ty, other)),
            },
            Slot::Dynamic { offset } => {
                pending.push((offset, tail.len()));
                encode_into(&mut tail, ty, value)?;
            }
        }
    }

    for (pos, tail_start) in pending {
        let offset = head_len + tail_start;
        let offset16 = u16::try_from(offset).map_err(|_| EncodeError::TooLong {
            what: "tail offset",
            len: offset,
        })?;
        head[pos..pos + 2].copy_from_slice(&offset16.to_be_bytes());
    }

    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    Ok(())
}
