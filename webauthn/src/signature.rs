use antelope_abi::SerialBuffer;
use antelope_crypto::{
    CryptoHash, Curve, KeyType, Payload, PublicKey, Secp256r1, Signature, SignedPayload, sha256,
};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use tracing::trace;

use crate::{Result, WebAuthnError, parse_der_signature};

/// What an authenticator returns for `navigator.credentials.get()`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    #[serde_as(as = "Hex")]
    pub authenticator_data: Vec<u8>,
    #[serde_as(as = "Hex")]
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Vec<u8>,
    /// DER encoded.
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
}

/// `SHA256(authenticator_data ‖ SHA256(client_data_json))`, the digest the
/// authenticator actually signs.
pub fn signed_data_digest(authenticator_data: &[u8], client_data_json: &[u8]) -> CryptoHash {
    sha256([authenticator_data, &sha256(client_data_json)].concat())
}

/// Contents of a `WA` signature: a compact `r1` signature followed by the
/// data it was computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAuthnSignature {
    pub recovery_param: u8,
    pub rs: [u8; 64],
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

impl WebAuthnSignature {
    /// Normalizes the DER signature of `assertion` and finds the recovery
    /// param that yields `public_key`.
    pub fn from_assertion(assertion: &Assertion, public_key: &PublicKey) -> Result<Self> {
        let rs = parse_der_signature(&assertion.signature)?;
        let digest = signed_data_digest(&assertion.authenticator_data, &assertion.client_data_json);
        let recovery_param = Secp256r1::recovery_param(&rs, &digest, public_key)
            .ok_or(WebAuthnError::Unrecoverable)?;
        trace!(recovery_param, "converted WebAuthn assertion");
        Ok(Self {
            recovery_param,
            rs,
            authenticator_data: assertion.authenticator_data.clone(),
            client_data_json: assertion.client_data_json.clone(),
        })
    }

    /// The `SIG_WA_` envelope: recovery byte, `r`, `s`, then the
    /// authenticator data and client data JSON as `bytes`.
    pub fn to_signature(&self) -> Result<Signature> {
        let compact = Signature::from_rs(KeyType::WA, &self.rs, self.recovery_param)?;
        let mut buffer = SerialBuffer::from_bytes(compact.into_key().data);
        buffer.push_bytes(&self.authenticator_data)?;
        buffer.push_bytes(&self.client_data_json)?;
        Ok(Signature::new(KeyType::WA, buffer.into_vec())?)
    }

    pub fn from_signature(signature: &Signature) -> Result<Self> {
        if signature.key_type != KeyType::WA {
            return Err(WebAuthnError::NotWebAuthn(signature.key_type));
        }
        let recovery_param = signature.recovery_param();
        let rs = signature.rs();
        let mut buffer = SerialBuffer::from_bytes(signature.data.as_slice());
        buffer.skip(1 + rs.len())?;
        let authenticator_data = buffer.get_bytes_prefixed()?.to_vec();
        let client_data_json = buffer.get_bytes_prefixed()?.to_vec();
        if buffer.have_read_data() {
            return Err(WebAuthnError::TrailingData);
        }
        Ok(Self {
            recovery_param,
            rs,
            authenticator_data,
            client_data_json,
        })
    }

    /// Compact form, as checked against the digest.
    pub fn compact(&self) -> Result<Signature> {
        Ok(Signature::from_rs(KeyType::R1, &self.rs, self.recovery_param)?)
    }

    /// Recovers the signer's curve point as an `R1` key.
    pub fn recover(&self) -> Option<PublicKey> {
        Secp256r1::recover(&self.compact().ok()?, &self.hash())
    }
}

impl Payload for WebAuthnSignature {
    #[inline]
    fn hash(&self) -> CryptoHash {
        signed_data_digest(&self.authenticator_data, &self.client_data_json)
    }
}

impl TryFrom<&Signature> for WebAuthnSignature {
    type Error = WebAuthnError;

    fn try_from(signature: &Signature) -> Result<Self> {
        Self::from_signature(signature)
    }
}

/// A `WA` signature with the key expected to have produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedWebAuthnPayload {
    pub signature: WebAuthnSignature,
    pub public_key: PublicKey,
}

impl Payload for SignedWebAuthnPayload {
    #[inline]
    fn hash(&self) -> CryptoHash {
        self.signature.hash()
    }
}

impl SignedPayload for SignedWebAuthnPayload {
    type PublicKey = PublicKey;

    fn verify(&self) -> Option<Self::PublicKey> {
        let compact = self.signature.compact().ok()?;
        Secp256r1::verify(&compact, &self.hash(), &self.public_key)
            .then(|| self.public_key.clone())
    }
}
