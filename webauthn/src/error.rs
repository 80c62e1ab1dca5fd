use antelope_abi::AbiError;
use antelope_crypto::{KeyError, KeyType};
use thiserror::Error as ThisError;

pub type Result<T, E = WebAuthnError> = ::core::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum WebAuthnError {
    #[error("signature missing DER prefix")]
    MissingDerPrefix,

    #[error("signature has bad length")]
    BadLength,

    #[error("signature has bad {0} marker")]
    BadMarker(char),

    #[error("signature has an {0} that is too big")]
    ScalarTooBig(char),

    #[error("no recovery param matches the public key")]
    Unrecoverable,

    #[error("expected a WA signature, got {0}")]
    NotWebAuthn(KeyType),

    #[error("trailing data after WebAuthn signature")]
    TrailingData,

    #[error("envelope: {0}")]
    Envelope(#[from] AbiError),

    #[error("key: {0}")]
    Key(#[from] KeyError),
}
