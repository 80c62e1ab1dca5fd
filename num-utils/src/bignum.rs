use crate::{NumericError, Result};

/// Is the little-endian two's complement number in `bin` negative?
#[inline]
pub fn is_negative(bin: &[u8]) -> bool {
    bin.last().is_some_and(|b| b & 0x80 != 0)
}

/// Two's complement negation in place.
pub fn negate(bin: &mut [u8]) {
    let mut carry = 1u16;
    for byte in bin {
        let x = u16::from(!*byte) + carry;
        *byte = low_byte(x);
        carry = x >> 8;
    }
}

/// Converts the unsigned decimal number in `s` to an `N`-byte little-endian integer.
///
/// Every digit multiplies the running value by ten and propagates the carry
/// through all `N` bytes, so any width works without a native integer type.
pub fn decimal_to_binary<const N: usize>(s: &str) -> Result<[u8; N]> {
    if s.is_empty() {
        return Err(NumericError::InvalidNumber(s.to_string()));
    }

    let mut result = [0u8; N];
    for c in s.bytes() {
        if !c.is_ascii_digit() {
            return Err(NumericError::InvalidNumber(s.to_string()));
        }
        let mut carry = u16::from(c - b'0');
        for byte in &mut result {
            let x = u16::from(*byte) * 10 + carry;
            *byte = low_byte(x);
            carry = x >> 8;
        }
        if carry != 0 {
            return Err(NumericError::OutOfRange);
        }
    }
    Ok(result)
}

/// Converts a signed decimal number in `s` to an `N`-byte two's complement integer.
pub fn signed_decimal_to_binary<const N: usize>(s: &str) -> Result<[u8; N]> {
    let (negative, digits) = s.strip_prefix('-').map_or((false, s), |d| (true, d));
    let mut result = decimal_to_binary::<N>(digits)?;

    if negative {
        // "-0" is zero, not an overflow
        if result.iter().all(|b| *b == 0) {
            return Ok(result);
        }
        negate(&mut result);
        if !is_negative(&result) {
            return Err(NumericError::OutOfRange);
        }
    } else if is_negative(&result) {
        return Err(NumericError::OutOfRange);
    }
    Ok(result)
}

/// Converts a little-endian unsigned integer to decimal, left-padded with
/// zeros to at least `min_digits` digits.
pub fn binary_to_decimal(bin: &[u8], min_digits: usize) -> String {
    let mut result = vec![b'0'; min_digits.max(1)];
    for &byte in bin.iter().rev() {
        let mut carry = u32::from(byte);
        for digit in &mut result {
            let x = (u32::from(*digit - b'0') << 8) + carry;
            *digit = b'0' + low_byte(x % 10);
            carry = x / 10;
        }
        while carry != 0 {
            result.push(b'0' + low_byte(carry % 10));
            carry /= 10;
        }
    }
    result.iter().rev().copied().map(char::from).collect()
}

/// Signed counterpart of [`binary_to_decimal`].
pub fn signed_binary_to_decimal(bin: &[u8], min_digits: usize) -> String {
    if is_negative(bin) {
        let mut x = bin.to_vec();
        negate(&mut x);
        return format!("-{}", binary_to_decimal(&x, min_digits));
    }
    binary_to_decimal(bin, min_digits)
}

#[inline]
fn low_byte(x: impl Into<u32>) -> u8 {
    x.into().to_le_bytes()[0]
}
