use core::{fmt, str::FromStr};

use impl_tools::autoimpl;
use sha2::{Digest, Sha256};

use crate::{Key, KeyError, KeyType, Result, base58};

pub const PRIVATE_KEY_SIZE: usize = 32;

const WIF_VERSION: u8 = 0x80;
const WIF_SIZE: usize = 1 + PRIVATE_KEY_SIZE + base58::CHECKSUM_SIZE;

#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
#[autoimpl(Deref using self.0)]
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(Key);

impl PrivateKey {
    pub fn new(key_type: KeyType, data: Vec<u8>) -> Result<Self> {
        let key = Key::new(key_type, data);
        match key_type {
            KeyType::K1 | KeyType::R1 => key.check_len(PRIVATE_KEY_SIZE)?,
            KeyType::WA => return Err(KeyError::UnknownKeyType(key_type.as_byte())),
        }
        Ok(Self(key))
    }

    #[inline]
    pub fn into_key(self) -> Key {
        self.0
    }

    /// Wallet import format, only defined for `K1` keys.
    pub fn to_legacy_string(&self) -> Result<String> {
        if self.key_type != KeyType::K1 {
            return Err(KeyError::NotLegacy(self.key_type));
        }
        let mut whole = Vec::with_capacity(WIF_SIZE);
        whole.push(WIF_VERSION);
        whole.extend_from_slice(&self.data);
        let checksum = wif_checksum(&whole);
        whole.extend_from_slice(&checksum);
        Ok(base58::encode(whole))
    }

    fn from_wif(s: &str) -> Result<Self> {
        let whole = base58::decode_sized(s, WIF_SIZE)?;
        let (body, checksum) = whole.split_at(1 + PRIVATE_KEY_SIZE);
        if body[0] != WIF_VERSION {
            return Err(KeyError::WifVersion(body[0]));
        }
        if wif_checksum(body) != checksum {
            return Err(KeyError::ChecksumMismatch);
        }
        Self::new(KeyType::K1, body[1..].to_vec())
    }
}

fn wif_checksum(body: &[u8]) -> [u8; base58::CHECKSUM_SIZE] {
    let digest = Sha256::digest(Sha256::digest(body));
    let mut out = [0u8; base58::CHECKSUM_SIZE];
    out.copy_from_slice(&digest[..base58::CHECKSUM_SIZE]);
    out
}

// Never leak key material through debug output.
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey")
            .field(&self.key_type)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_prefixed_string("PVT_"))
    }
}

impl FromStr for PrivateKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        if !s.starts_with("PVT_") {
            return Self::from_wif(s);
        }
        let key = Key::from_prefixed_str(s, "PVT_", "private key", |_| Some(PRIVATE_KEY_SIZE))?;
        Self::new(key.key_type, key.data)
    }
}
