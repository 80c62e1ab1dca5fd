use strum::{Display, EnumIter, EnumString, FromRepr};

use crate::{KeyError, Result, base58};

/// Curve of a key or signature. The discriminant is the type byte used on
/// the wire, the string form doubles as the checksum suffix.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, FromRepr,
)]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum KeyType {
    /// secp256k1
    K1 = 0,
    /// secp256r1 (P-256)
    R1 = 1,
    /// P-256 key or signature wrapped in a WebAuthn envelope
    WA = 2,
}

impl KeyType {
    #[inline]
    #[allow(clippy::as_conversions)]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_byte(b: u8) -> Result<Self> {
        Self::from_repr(b).ok_or(KeyError::UnknownKeyType(b))
    }
}

/// Tagged key material: a public key, a private key or a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub key_type: KeyType,
    pub data: Vec<u8>,
}

impl Key {
    #[inline]
    pub const fn new(key_type: KeyType, data: Vec<u8>) -> Self {
        Self { key_type, data }
    }

    /// `<prefix><TYPE>_<base58check(data)>`, e.g. `PUB_K1_...`
    pub(crate) fn to_prefixed_string(&self, prefix: &str) -> String {
        let suffix = self.key_type.to_string();
        format!(
            "{prefix}{suffix}_{}",
            base58::encode_check(&self.data, &suffix)
        )
    }

    /// Parses `<prefix><TYPE>_<base58check(data)>`. `size` maps a key type to
    /// its fixed data size, `None` for variable-size data.
    pub(crate) fn from_prefixed_str(
        s: &str,
        prefix: &str,
        kind: &'static str,
        size: impl Fn(KeyType) -> Option<usize>,
    ) -> Result<Self> {
        let unknown = || KeyError::UnknownFormat {
            kind,
            value: s.to_string(),
        };

        let (suffix, encoded) = s
            .strip_prefix(prefix)
            .and_then(|rest| rest.split_once('_'))
            .ok_or_else(unknown)?;
        let key_type: KeyType = suffix.parse().map_err(|_| unknown())?;

        let data = base58::decode_check(encoded, size(key_type), suffix)?;
        Ok(Self::new(key_type, data))
    }

    pub(crate) fn check_len(&self, expected: usize) -> Result<()> {
        if self.data.len() != expected {
            return Err(KeyError::InvalidLength {
                key_type: self.key_type,
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn type_byte_roundtrip() {
        for key_type in KeyType::iter() {
            assert_eq!(KeyType::from_byte(key_type.as_byte()), Ok(key_type));
            assert_eq!(key_type.to_string().parse::<KeyType>(), Ok(key_type));
        }
        assert_eq!(KeyType::from_byte(3), Err(KeyError::UnknownKeyType(3)));
    }

    #[test]
    fn suffixes() {
        assert_eq!(KeyType::K1.to_string(), "K1");
        assert_eq!(KeyType::R1.to_string(), "R1");
        assert_eq!(KeyType::WA.to_string(), "WA");
    }
}
