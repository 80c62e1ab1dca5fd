use core::{fmt, str::FromStr};

use impl_tools::autoimpl;

use crate::{Key, KeyError, KeyType, Result};

/// Recovery byte followed by `r` and `s`.
pub const SIGNATURE_SIZE: usize = 65;

/// Offset added to the recovery param in the first signature byte
/// (27 plus 4 for compressed keys).
pub const RECOVERY_OFFSET: u8 = 27 + 4;

/// `K1`/`R1` signatures are 65 bytes. `WA` signatures append the
/// authenticator data and client data JSON.
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
#[autoimpl(Deref using self.0)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Key);

impl Signature {
    pub fn new(key_type: KeyType, data: Vec<u8>) -> Result<Self> {
        let key = Key::new(key_type, data);
        match key_type {
            KeyType::K1 | KeyType::R1 => key.check_len(SIGNATURE_SIZE)?,
            KeyType::WA if key.data.len() < SIGNATURE_SIZE => {
                return Err(KeyError::TooShort);
            }
            KeyType::WA => {}
        }
        Ok(Self(key))
    }

    /// Builds a compact signature from `r ‖ s` and a recovery param.
    pub fn from_rs(key_type: KeyType, rs: &[u8; 64], recovery_param: u8) -> Result<Self> {
        if recovery_param > 3 {
            return Err(KeyError::RecoveryParam(recovery_param));
        }
        let mut data = Vec::with_capacity(SIGNATURE_SIZE);
        data.push(recovery_param + RECOVERY_OFFSET);
        data.extend_from_slice(rs);
        Self::new(key_type, data)
    }

    #[inline]
    pub fn into_key(self) -> Key {
        self.0
    }

    #[inline]
    pub fn recovery_byte(&self) -> u8 {
        self.data[0]
    }

    /// Recovery param in `0..4`, undoing either the compressed (31) or
    /// uncompressed (27) offset.
    #[inline]
    pub fn recovery_param(&self) -> u8 {
        let b = self.recovery_byte();
        if b >= RECOVERY_OFFSET {
            b - RECOVERY_OFFSET
        } else {
            b.saturating_sub(27)
        }
    }

    #[inline]
    pub fn r(&self) -> &[u8] {
        &self.data[1..33]
    }

    #[inline]
    pub fn s(&self) -> &[u8] {
        &self.data[33..SIGNATURE_SIZE]
    }

    #[inline]
    pub fn rs(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&self.data[1..SIGNATURE_SIZE]);
        out
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_prefixed_string("SIG_"))
    }
}

impl FromStr for Signature {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        let key = Key::from_prefixed_str(s, "SIG_", "signature", |key_type| {
            (key_type != KeyType::WA).then_some(SIGNATURE_SIZE)
        })?;
        Self::new(key.key_type, key.data)
    }
}

impl TryFrom<Key> for Signature {
    type Error = KeyError;

    #[inline]
    fn try_from(key: Key) -> Result<Self> {
        Self::new(key.key_type, key.data)
    }
}
