//! Arbitrary-width unsigned integers and fixed-point decimals.
//!
//! Both carry their declared width, but equality, ordering and hashing look
//! only at the numeric value: `uint64(5) == uint512(5)`.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use arc4_types::{MAX_PRECISION, is_valid_bit_width};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::errors::RangeError;
use crate::{String, ToString, Vec, vec};

fn check_width(bits: u16) -> Result<(), RangeError> {
    if is_valid_bit_width(bits as u32) {
        Ok(())
    } else {
        Err(RangeError::InvalidWidth { bits })
    }
}

fn check_fits(bits: u16, value: &BigUint) -> Result<(), RangeError> {
    if value.bits() > bits as u64 {
        return Err(RangeError::Overflow {
            bits,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn pow10(exp: u8) -> BigUint {
    BigUint::from(10u32).pow(exp as u32)
}

/// Big-endian bytes of `value`, left-padded to `bits / 8`.
///
/// `value` must already fit in `bits`.
pub(crate) fn to_be_padded(value: &BigUint, bits: u16) -> Vec<u8> {
    let width = bits as usize / 8;
    let mut out = vec![0u8; width];
    if !value.is_zero() {
        let raw = value.to_bytes_be();
        out[width - raw.len()..].copy_from_slice(&raw);
    }
    out
}

/// `uint<N>`: an unsigned integer checked against its width at construction.
#[derive(Debug, Clone)]
pub struct Uint {
    bits: u16,
    value: BigUint,
}

impl Uint {
    pub fn new(bits: u16, value: impl Into<BigUint>) -> Result<Self, RangeError> {
        check_width(bits)?;
        let value = value.into();
        check_fits(bits, &value)?;
        Ok(Uint { bits, value })
    }

    /// Interpret big-endian bytes. The width is `bytes.len() * 8`.
    pub(crate) fn from_be_bytes(bytes: &[u8]) -> Self {
        Uint {
            bits: (bytes.len() * 8) as u16,
            value: BigUint::from_bytes_be(bytes),
        }
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }

    pub fn to_u128(&self) -> Option<u128> {
        self.value.to_u128()
    }

    /// The same number at another width.
    pub fn resize(&self, bits: u16) -> Result<Self, RangeError> {
        Uint::new(bits, self.value.clone())
    }

    /// Encoding at the declared width.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        to_be_padded(&self.value, self.bits)
    }
}

impl PartialEq for Uint {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Uint {}

impl PartialOrd for Uint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Uint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialEq<u64> for Uint {
    fn eq(&self, other: &u64) -> bool {
        self.value == BigUint::from(*other)
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// `ufixed<N>x<M>`: the value is `raw / 10^M`, with `raw` held in `N` bits.
#[derive(Debug, Clone)]
pub struct UFixed {
    bits: u16,
    precision: u8,
    raw: BigUint,
}

impl UFixed {
    pub fn new(bits: u16, precision: u8, raw: impl Into<BigUint>) -> Result<Self, RangeError> {
        check_width(bits)?;
        if precision == 0 || precision > MAX_PRECISION {
            return Err(RangeError::InvalidPrecision { precision });
        }
        let raw = raw.into();
        check_fits(bits, &raw)?;
        Ok(UFixed {
            bits,
            precision,
            raw,
        })
    }

    /// Parse a plain decimal such as `"1.25"` or `"7"`.
    ///
    /// At most `precision` fractional digits are accepted; fewer are padded.
    pub fn parse(bits: u16, precision: u8, text: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidDecimal {
            text: text.to_string(),
            precision,
        };
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty()
            || !all_digits(int_part)
            || !all_digits(frac_part)
            || frac_part.len() > precision as usize
            || (text.contains('.') && frac_part.is_empty())
        {
            return Err(invalid());
        }

        let mut digits = String::with_capacity(int_part.len() + precision as usize);
        digits.push_str(int_part);
        digits.push_str(frac_part);
        for _ in frac_part.len()..precision as usize {
            digits.push('0');
        }
        let raw = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        UFixed::new(bits, precision, raw)
    }

    pub(crate) fn from_be_bytes(bytes: &[u8], precision: u8) -> Self {
        UFixed {
            bits: (bytes.len() * 8) as u16,
            precision,
            raw: BigUint::from_bytes_be(bytes),
        }
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// The unscaled integer.
    pub fn raw(&self) -> &BigUint {
        &self.raw
    }

    pub fn to_be_bytes(&self) -> Vec<u8> {
        to_be_padded(&self.raw, self.bits)
    }

    /// `(raw, precision)` with trailing decimal zeros removed. Equal values
    /// have equal normal forms.
    fn normalized(&self) -> (BigUint, u8) {
        let ten = BigUint::from(10u32);
        let mut raw = self.raw.clone();
        let mut precision = self.precision;
        while precision > 0 && !raw.is_zero() && (&raw % &ten).is_zero() {
            raw /= &ten;
            precision -= 1;
        }
        if raw.is_zero() {
            precision = 0;
        }
        (raw, precision)
    }
}

/// Compare `a / 10^pa` with `b / 10^pb` exactly.
fn cmp_scaled(a: &BigUint, pa: u8, b: &BigUint, pb: u8) -> Ordering {
    match pa.cmp(&pb) {
        Ordering::Equal => a.cmp(b),
        Ordering::Less => (a * pow10(pb - pa)).cmp(b),
        Ordering::Greater => a.cmp(&(b * pow10(pa - pb))),
    }
}

impl PartialEq for UFixed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for UFixed {}

impl PartialOrd for UFixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UFixed {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_scaled(&self.raw, self.precision, &other.raw, other.precision)
    }
}

impl Hash for UFixed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialEq<Uint> for UFixed {
    fn eq(&self, other: &Uint) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd<Uint> for UFixed {
    fn partial_cmp(&self, other: &Uint) -> Option<Ordering> {
        Some(cmp_scaled(&self.raw, self.precision, &other.value, 0))
    }
}

impl PartialEq<UFixed> for Uint {
    fn eq(&self, other: &UFixed) -> bool {
        other == self
    }
}

impl PartialOrd<UFixed> for Uint {
    fn partial_cmp(&self, other: &UFixed) -> Option<Ordering> {
        other.partial_cmp(self).map(Ordering::reverse)
    }
}

impl fmt::Display for UFixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.raw.to_string();
        let precision = self.precision as usize;
        if digits.len() > precision {
            let (int_part, frac_part) = digits.split_at(digits.len() - precision);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            write!(f, "0.{:0>width$}", digits, width = precision)
        }
    }
}
