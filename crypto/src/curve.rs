use crate::{CryptoHash, KeyType, PrivateKey, PublicKey, Signature};

/// Elliptic-curve operations over prehashed digests.
///
/// Keys and signatures are the tagged string-format values; implementations
/// only look at the curve point and at `r ‖ s`, so `WA` values backed by the
/// same curve are accepted as well.
pub trait Curve {
    const KEY_TYPE: KeyType;

    fn public_key(private_key: &PrivateKey) -> Option<PublicKey>;

    fn sign(private_key: &PrivateKey, digest: &CryptoHash) -> Option<Signature>;

    fn verify(signature: &Signature, digest: &CryptoHash, public_key: &PublicKey) -> bool;

    fn recover(signature: &Signature, digest: &CryptoHash) -> Option<PublicKey>;

    /// Finds the recovery param that makes `rs` recover to `public_key`.
    fn recovery_param(rs: &[u8; 64], digest: &CryptoHash, public_key: &PublicKey) -> Option<u8>;
}

#[cfg(feature = "r1")]
pub use self::r1::Secp256r1;

#[cfg(feature = "r1")]
mod r1 {
    use ecdsa::RecoveryId;
    use p256::ecdsa::{
        Signature as EcdsaSignature, SigningKey, VerifyingKey,
        signature::hazmat::PrehashVerifier,
    };

    use super::Curve;
    use crate::{CryptoHash, KeyType, PrivateKey, PublicKey, Signature};

    pub struct Secp256r1;

    impl Secp256r1 {
        fn verifying_key(public_key: &PublicKey) -> Option<VerifyingKey> {
            VerifyingKey::from_sec1_bytes(public_key.point()).ok()
        }

        fn to_public_key(key: &VerifyingKey) -> Option<PublicKey> {
            let point = key.to_encoded_point(true);
            PublicKey::new(Self::KEY_TYPE, point.as_bytes().to_vec()).ok()
        }
    }

    impl Curve for Secp256r1 {
        const KEY_TYPE: KeyType = KeyType::R1;

        fn public_key(private_key: &PrivateKey) -> Option<PublicKey> {
            let signing_key = SigningKey::from_slice(&private_key.data).ok()?;
            Self::to_public_key(signing_key.verifying_key())
        }

        fn sign(private_key: &PrivateKey, digest: &CryptoHash) -> Option<Signature> {
            let signing_key = SigningKey::from_slice(&private_key.data).ok()?;
            let (signature, recovery_id) = signing_key.sign_prehash_recoverable(digest).ok()?;
            let mut rs = [0u8; 64];
            rs.copy_from_slice(&signature.to_bytes());
            Signature::from_rs(Self::KEY_TYPE, &rs, recovery_id.to_byte()).ok()
        }

        fn verify(signature: &Signature, digest: &CryptoHash, public_key: &PublicKey) -> bool {
            let Some(key) = Self::verifying_key(public_key) else {
                return false;
            };
            EcdsaSignature::from_slice(&signature.rs())
                .is_ok_and(|sig| key.verify_prehash(digest, &sig).is_ok())
        }

        fn recover(signature: &Signature, digest: &CryptoHash) -> Option<PublicKey> {
            let sig = EcdsaSignature::from_slice(&signature.rs()).ok()?;
            let recovery_id = RecoveryId::from_byte(signature.recovery_param())?;
            let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id).ok()?;
            Self::to_public_key(&key)
        }

        fn recovery_param(
            rs: &[u8; 64],
            digest: &CryptoHash,
            public_key: &PublicKey,
        ) -> Option<u8> {
            let key = Self::verifying_key(public_key)?;
            let sig = EcdsaSignature::from_slice(rs).ok()?;
            RecoveryId::trial_recovery_from_prehash(&key, digest, &sig)
                .ok()
                .map(RecoveryId::to_byte)
        }
    }

    #[cfg(test)]
    mod tests {
        use antelope_test_utils::random::{Rng, RngCore, Seed, make_seedable_rng, random_seed};
        use hex_literal::hex;
        use rstest::rstest;

        use super::*;

        fn private_key(rng: &mut impl Rng) -> PrivateKey {
            let mut data = [0u8; 32];
            rng.fill_bytes(&mut data);
            // keep the scalar well below the curve order
            data[0] &= 0x7f;
            data[31] |= 1;
            PrivateKey::new(KeyType::R1, data.to_vec()).unwrap()
        }

        #[rstest]
        #[trace]
        fn sign_verify_recover(random_seed: Seed) {
            let mut rng = make_seedable_rng(random_seed);
            let private_key = private_key(&mut rng);
            let public_key = Secp256r1::public_key(&private_key).unwrap();
            assert_eq!(public_key.key_type, KeyType::R1);

            let mut digest = CryptoHash::default();
            rng.fill_bytes(&mut digest);
            let signature = Secp256r1::sign(&private_key, &digest).unwrap();

            assert!(Secp256r1::verify(&signature, &digest, &public_key));
            assert_eq!(Secp256r1::recover(&signature, &digest), Some(public_key.clone()));
            assert_eq!(
                Secp256r1::recovery_param(&signature.rs(), &digest, &public_key),
                Some(signature.recovery_param())
            );

            digest[0] ^= 1;
            assert!(!Secp256r1::verify(&signature, &digest, &public_key));
            assert_ne!(Secp256r1::recover(&signature, &digest), Some(public_key));
        }

        #[test]
        fn known_public_key() {
            // generator point: private key 1
            let mut data = [0u8; 32];
            data[31] = 1;
            let private_key = PrivateKey::new(KeyType::R1, data.to_vec()).unwrap();
            assert_eq!(
                Secp256r1::public_key(&private_key).unwrap().data,
                hex!("036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296")
            );
        }
    }
}
