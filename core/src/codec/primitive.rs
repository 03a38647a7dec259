//! Leaf encodings: fixed-width integers, bools, and length-prefixed bytes.

use core::fmt::Display;

use num_bigint::BigUint;

use crate::errors::{DecodeError, EncodeError, RangeError};
use crate::values::uint::to_be_padded;
use crate::{ToString, Vec};

/// A standalone `true`: the flag lives in the most significant bit.
pub(crate) const BOOL_TRUE: u8 = 0x80;

/// Mask for bit `bit` of a packed bool byte, counted from the MSB.
pub(crate) fn bit_mask(bit: u8) -> u8 {
    0x80 >> bit
}

pub(crate) fn ensure(bytes: &[u8], needed: usize, ty: impl Display) -> Result<(), DecodeError> {
    if bytes.len() < needed {
        return Err(DecodeError::truncated(ty, needed, bytes.len()));
    }
    Ok(())
}

/// Read a 2-byte big-endian length, count or offset at `at`.
pub(crate) fn read_u16(bytes: &[u8], at: usize, what: impl Display) -> Result<usize, DecodeError> {
    match bytes.get(at..at + 2) {
        Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo]) as usize),
        _ => Err(DecodeError::truncated(what, at + 2, bytes.len())),
    }
}

pub(crate) fn write_u16(out: &mut Vec<u8>, len: usize, what: &'static str) -> Result<(), EncodeError> {
    let len16 = u16::try_from(len).map_err(|_| EncodeError::TooLong { what, len })?;
    out.extend_from_slice(&len16.to_be_bytes());
    Ok(())
}

/// Append `value` as `bits / 8` big-endian bytes.
pub(crate) fn encode_uint(out: &mut Vec<u8>, bits: u16, value: &BigUint) -> Result<(), EncodeError> {
    if value.bits() > bits as u64 {
        return Err(RangeError::Overflow {
            bits,
            value: value.to_string(),
        }
        .into());
    }
    out.extend_from_slice(&to_be_padded(value, bits));
    Ok(())
}

/// Append a 2-byte length prefix followed by `bytes`.
pub(crate) fn encode_bytes(out: &mut Vec<u8>, bytes: &[u8]) -> Result<(), EncodeError> {
    write_u16(out, bytes.len(), "byte length")?;
    out.extend_from_slice(bytes);
    Ok(())
}

/// Split a length-prefixed byte string off the front of `region`.
///
/// Returns the content and the number of bytes spanned, prefix included.
pub(crate) fn decode_bytes<'b>(
    region: &'b [u8],
    ty: impl Display + Copy,
) -> Result<(&'b [u8], usize), DecodeError> {
    let len = read_u16(region, 0, ty)?;
    ensure(region, 2 + len, ty)?;
    Ok((&region[2..2 + len], 2 + len))
}

pub(crate) fn decode_str<'b>(
    region: &'b [u8],
    ty: impl Display + Copy,
) -> Result<(&'b str, usize), DecodeError> {
    let (bytes, used) = decode_bytes(region, ty)?;
    let text = core::str::from_utf8(bytes).map_err(|source| DecodeError::InvalidUtf8 { source })?;
    Ok((text, used))
}
