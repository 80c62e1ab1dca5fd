use thiserror::Error as ThisError;

use crate::KeyType;

pub type Result<T, E = KeyError> = ::core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KeyError {
    #[error("base58: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("base58 value is out of range")]
    Base58Overflow,

    #[error("checksum doesn't match")]
    ChecksumMismatch,

    #[error("unrecognized {kind} format: '{value}'")]
    UnknownFormat { kind: &'static str, value: String },

    #[error("unknown key type: {0}")]
    UnknownKeyType(u8),

    #[error("invalid {key_type} key length: expected {expected}, got {got}")]
    InvalidLength {
        key_type: KeyType,
        expected: usize,
        got: usize,
    },

    #[error("key data is too short")]
    TooShort,

    #[error("{0} keys can't be represented in legacy format")]
    NotLegacy(KeyType),

    #[error("recovery param should be in 0..4, got {0}")]
    RecoveryParam(u8),

    #[error("unsupported WIF version byte: {0:#04x}")]
    WifVersion(u8),
}
