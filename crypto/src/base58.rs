//! Base58 (Bitcoin alphabet) with the checksum framing used by key strings.

use crate::{KeyError, Result, ripemd160};

pub const CHECKSUM_SIZE: usize = 4;

#[inline]
pub fn encode(data: impl AsRef<[u8]>) -> String {
    bs58::encode(data).into_string()
}

#[inline]
pub fn decode(s: &str) -> Result<Vec<u8>> {
    bs58::decode(s).into_vec().map_err(Into::into)
}

/// Decodes `s` into exactly `size` bytes.
///
/// The value is treated as a big-endian number: shorter results are
/// left-padded with zeros, values that need more than `size` bytes fail.
pub fn decode_sized(s: &str, size: usize) -> Result<Vec<u8>> {
    let decoded = decode(s)?;
    let first = decoded
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(decoded.len());
    let significant = &decoded[first..];
    if significant.len() > size {
        return Err(KeyError::Base58Overflow);
    }

    let mut out = vec![0u8; size];
    out[size - significant.len()..].copy_from_slice(significant);
    Ok(out)
}

/// `RIPEMD160(data ‖ suffix)[..4]`
pub fn checksum(data: &[u8], suffix: &str) -> [u8; CHECKSUM_SIZE] {
    let digest = ripemd160([data, suffix.as_bytes()].concat().as_slice());
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&digest[..CHECKSUM_SIZE]);
    out
}

/// `base58(data ‖ checksum(data, suffix))`
pub fn encode_check(data: &[u8], suffix: &str) -> String {
    encode([data, &checksum(data, suffix)].concat())
}

/// Inverse of [`encode_check`]. With `size` set the payload must decode to
/// exactly that many bytes, otherwise the whole string is taken.
pub fn decode_check(s: &str, size: Option<usize>, suffix: &str) -> Result<Vec<u8>> {
    let mut whole = match size {
        Some(size) => decode_sized(s, size + CHECKSUM_SIZE)?,
        None => decode(s)?,
    };
    if whole.len() < CHECKSUM_SIZE {
        return Err(KeyError::TooShort);
    }

    let expected = whole.split_off(whole.len() - CHECKSUM_SIZE);
    if checksum(&whole, suffix) != expected.as_slice() {
        return Err(KeyError::ChecksumMismatch);
    }
    Ok(whole)
}
