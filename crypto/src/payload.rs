//! Digests that get signed.
//!
//! A [`Payload`] is anything with a canonical 32-byte digest. A
//! [`SignedPayload`] additionally carries a signature and yields the
//! signer's public key once that signature checks out.

use sha2::{Digest, Sha256};

pub type CryptoHash = [u8; 32];

pub trait Payload {
    fn hash(&self) -> CryptoHash;
}

pub trait SignedPayload: Payload {
    type PublicKey;

    fn verify(&self) -> Option<Self::PublicKey>;
}

#[inline]
pub fn sha256(data: impl AsRef<[u8]>) -> CryptoHash {
    Sha256::digest(data).into()
}

/// What a transaction signature commits to: the chain id, the serialized
/// transaction and the (optional) serialized context-free data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload<'a> {
    pub chain_id: CryptoHash,
    pub serialized_transaction: &'a [u8],
    pub context_free_data: Option<&'a [u8]>,
}

impl Payload for SigningPayload<'_> {
    /// `SHA256(chain_id ‖ serialized_transaction ‖ SHA256(context_free_data))`,
    /// with 32 zero bytes standing in for absent context-free data.
    fn hash(&self) -> CryptoHash {
        let cfd_hash = self.context_free_data.map_or([0; 32], sha256);
        Sha256::new()
            .chain_update(self.chain_id)
            .chain_update(self.serialized_transaction)
            .chain_update(cfd_hash)
            .finalize()
            .into()
    }
}
