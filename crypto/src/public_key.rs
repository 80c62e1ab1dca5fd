use core::{fmt, str::FromStr};

use impl_tools::autoimpl;

use crate::{Key, KeyError, KeyType, Result, base58};

pub const PUBLIC_KEY_SIZE: usize = 33;

const LEGACY_PREFIX: &str = "EOS";

/// Compressed public key. `WA` keys carry the WebAuthn metadata
/// (user presence and relying party id) after the 33-byte point.
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
#[autoimpl(Deref using self.0)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(Key);

impl PublicKey {
    pub fn new(key_type: KeyType, data: Vec<u8>) -> Result<Self> {
        let key = Key::new(key_type, data);
        match key_type {
            KeyType::K1 | KeyType::R1 => key.check_len(PUBLIC_KEY_SIZE)?,
            KeyType::WA if key.data.len() < PUBLIC_KEY_SIZE => {
                return Err(KeyError::TooShort);
            }
            KeyType::WA => {}
        }
        Ok(Self(key))
    }

    #[inline]
    pub fn into_key(self) -> Key {
        self.0
    }

    /// Compressed curve point, without any WebAuthn metadata.
    #[inline]
    pub fn point(&self) -> &[u8] {
        &self.data[..PUBLIC_KEY_SIZE]
    }

    /// `EOS<base58(data ‖ RIPEMD160(data)[..4])>`, only defined for `K1` keys.
    pub fn to_legacy_string(&self) -> Result<String> {
        if self.key_type != KeyType::K1 {
            return Err(KeyError::NotLegacy(self.key_type));
        }
        Ok(format!(
            "{LEGACY_PREFIX}{}",
            base58::encode_check(&self.data, "")
        ))
    }

    fn from_legacy_str(encoded: &str) -> Result<Self> {
        let data = base58::decode_check(encoded, Some(PUBLIC_KEY_SIZE), "")?;
        Self::new(KeyType::K1, data)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_prefixed_string("PUB_"))
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(encoded) = s.strip_prefix(LEGACY_PREFIX) {
            return Self::from_legacy_str(encoded);
        }
        let key = Key::from_prefixed_str(s, "PUB_", "public key", |key_type| {
            (key_type != KeyType::WA).then_some(PUBLIC_KEY_SIZE)
        })?;
        Self::new(key.key_type, key.data)
    }
}

impl TryFrom<Key> for PublicKey {
    type Error = KeyError;

    #[inline]
    fn try_from(key: Key) -> Result<Self> {
        Self::new(key.key_type, key.data)
    }
}

/// Rewrites a legacy `EOS...` key into the `PUB_K1_...` form, leaving any
/// other string untouched.
pub fn convert_legacy_public_key(s: &str) -> Result<String> {
    if s.starts_with(LEGACY_PREFIX) {
        return Ok(s.parse::<PublicKey>()?.to_string());
    }
    Ok(s.to_string())
}

pub fn convert_legacy_public_keys<S: AsRef<str>>(keys: &[S]) -> Result<Vec<String>> {
    keys.iter()
        .map(|s| convert_legacy_public_key(s.as_ref()))
        .collect()
}
