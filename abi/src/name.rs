use std::{fmt, str::FromStr};

use derive_more::derive::{From, Into};

use crate::{AbiError, Result};

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

pub const MAX_NAME_LEN: usize = 13;

/// Account, action and permission names: up to 13 base32 characters packed
/// into a `u64`, 5 bits each from the most significant end, with 4 bits
/// left for the 13th character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)]
pub struct Name(u64);

impl Name {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn invalid(name: &str, reason: &'static str) -> AbiError {
        AbiError::InvalidName {
            name: name.to_string(),
            reason,
        }
    }
}

const fn char_value(c: u8) -> Option<u8> {
    match c {
        b'.' => Some(0),
        b'1'..=b'5' => Some(c - b'1' + 1),
        b'a'..=b'z' => Some(c - b'a' + 6),
        _ => None,
    }
}

impl FromStr for Name {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_NAME_LEN {
            return Err(Self::invalid(s, "longer than 13 characters"));
        }
        let mut value = 0u64;
        for (i, c) in s.bytes().enumerate() {
            let symbol = char_value(c).ok_or_else(|| Self::invalid(s, "invalid character"))?;
            let symbol = u64::from(symbol);
            if i < MAX_NAME_LEN - 1 {
                value |= symbol << (64 - 5 * (i + 1));
            } else if symbol > 0x0f {
                return Err(Self::invalid(s, "13th character must be one of .12345abcdefghij"));
            } else {
                value |= symbol;
            }
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = [b'.'; MAX_NAME_LEN];
        let mut tmp = self.0;
        for i in 0..MAX_NAME_LEN {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            chars[MAX_NAME_LEN - 1 - i] = CHARMAP[usize::from(tmp.to_le_bytes()[0] & mask)];
            tmp >>= shift;
        }
        let len = chars.iter().rposition(|&c| c != b'.').map_or(0, |i| i + 1);
        chars[..len].iter().try_for_each(|&c| fmt::Write::write_char(f, char::from(c)))
    }
}

/// Longest name accepted by the decimal string helpers below.
pub const MAX_LEGACY_NAME_LEN: usize = 12;

/// Encodes `name` as the decimal string of its `u64` value, byte-swapped when
/// `little_endian` is set (the form older tooling keys tables by).
pub fn encode_name(name: &str, little_endian: bool) -> Result<String> {
    if name.len() > MAX_LEGACY_NAME_LEN {
        return Err(Name::invalid(name, "longer than 12 characters"));
    }
    let value = name.parse::<Name>()?.as_u64();
    Ok(if little_endian { value.swap_bytes() } else { value }.to_string())
}

/// Inverse of [`encode_name`].
pub fn decode_name(value: &str, little_endian: bool) -> Result<String> {
    let value: u64 = value
        .parse()
        .map_err(|_| AbiError::Expected {
            expected: "uint64 decimal string",
            got: value.to_string(),
        })?;
    let value = if little_endian { value.swap_bytes() } else { value };
    Ok(Name(value).to_string())
}

/// Lowercase hex of the little-endian [`encode_name`] value, no padding.
pub fn encode_name_hex(name: &str) -> Result<String> {
    let value: u64 = encode_name(name, true)?
        .parse()
        .map_err(|_| Name::invalid(name, "not encodable"))?;
    Ok(format!("{value:x}"))
}

pub fn decode_name_hex(hex: &str, little_endian: bool) -> Result<String> {
    let value = u64::from_str_radix(hex, 16).map_err(|_| AbiError::Expected {
        expected: "uint64 hex string",
        got: hex.to_string(),
    })?;
    decode_name(&value.to_string(), little_endian)
}
