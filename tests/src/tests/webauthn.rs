use antelope_abi::{SerialBuffer, SerializerOptions};
use antelope_crypto::{CryptoHash, Curve, KeyType, PrivateKey, PublicKey, Secp256r1, Signature, SignedPayload};
use antelope_test_utils::random::{Rng, RngCore, Seed, gen_random_bytes, make_seedable_rng, random_seed};
use antelope_webauthn::{
    Assertion, SignedWebAuthnPayload, WebAuthnSignature, parse_der_signature, signed_data_digest,
};
use rstest::rstest;
use serde_json::json;

use crate::utils::{RECORDS_ABI, contract, name, r1_private_key};

fn webauthn_key(private_key: &PrivateKey, rp_id: &str) -> PublicKey {
    let point = Secp256r1::public_key(private_key).unwrap();
    let mut buffer = SerialBuffer::from_bytes(point.point());
    buffer.push_u8(0x01);
    buffer.push_string(rp_id).unwrap();
    PublicKey::new(KeyType::WA, buffer.into_vec()).unwrap()
}

fn der_integer(x: &[u8]) -> Vec<u8> {
    let start = x.iter().position(|&b| b != 0).unwrap_or(x.len() - 1);
    let mut x = x[start..].to_vec();
    if x[0] & 0x80 != 0 {
        x.insert(0, 0);
    }
    [[0x02, u8::try_from(x.len()).unwrap()].as_slice(), &x].concat()
}

/// What a platform authenticator would hand back for `challenge`.
fn authenticate(rng: &mut impl Rng, private_key: &PrivateKey, challenge: &CryptoHash) -> Assertion {
    let mut authenticator_data = gen_random_bytes(rng, 37..=37);
    // user present
    authenticator_data[32] = 0x01;
    let client_data_json = json!({
        "type": "webauthn.get",
        "challenge": hex::encode(challenge),
        "origin": "https://example.com",
    })
    .to_string()
    .into_bytes();

    let digest = signed_data_digest(&authenticator_data, &client_data_json);
    let rs = Secp256r1::sign(private_key, &digest).unwrap().rs();
    let body = [der_integer(&rs[..32]), der_integer(&rs[32..])].concat();
    Assertion {
        authenticator_data,
        client_data_json,
        signature: [[0x30, u8::try_from(body.len()).unwrap()].as_slice(), &body].concat(),
    }
}

#[rstest]
#[trace]
fn webauthn_signature_in_action_data(random_seed: Seed) {
    antelope_test_utils::tracing::init();
    let mut rng = make_seedable_rng(random_seed);
    let private_key = r1_private_key(&mut rng);
    let public_key = webauthn_key(&private_key, "example.com");
    let mut challenge = CryptoHash::default();
    rng.fill_bytes(&mut challenge);

    let assertion = authenticate(&mut rng, &private_key, &challenge);
    let signature = WebAuthnSignature::from_assertion(&assertion, &public_key)
        .unwrap()
        .to_signature()
        .unwrap();
    assert!(signature.to_string().starts_with("SIG_WA_"));
    assert!(public_key.to_string().starts_with("PUB_WA_"));

    let data = json!({
        "key": public_key.to_string(),
        "signature": signature.to_string(),
        "digest": hex::encode_upper(challenge),
    });
    let records = contract(RECORDS_ABI);
    let hex = records
        .serialize_action_data(name("records"), name("attest"), &data)
        .unwrap();
    let decoded = records
        .deserialize_action_data_hex(name("records"), name("attest"), &hex, SerializerOptions::default())
        .unwrap();
    assert_eq!(decoded, data);

    let signature: Signature = decoded["signature"].as_str().unwrap().parse().unwrap();
    let key: PublicKey = decoded["key"].as_str().unwrap().parse().unwrap();
    let payload = SignedWebAuthnPayload {
        signature: WebAuthnSignature::from_signature(&signature).unwrap(),
        public_key: key.clone(),
    };
    assert_eq!(payload.verify(), Some(key));
    assert_eq!(
        payload.signature.client_data_json,
        assertion.client_data_json
    );
    assert_eq!(
        payload.signature.rs,
        parse_der_signature(&assertion.signature).unwrap()
    );
}

#[rstest]
#[trace]
fn other_relying_party_key_still_matches_point(random_seed: Seed) {
    let mut rng = make_seedable_rng(random_seed);
    let private_key = r1_private_key(&mut rng);
    let assertion = authenticate(&mut rng, &private_key, &[7; 32]);

    let wa = WebAuthnSignature::from_assertion(&assertion, &webauthn_key(&private_key, "a.test"))
        .unwrap();
    let other = webauthn_key(&private_key, "b.test");
    assert_ne!(other, webauthn_key(&private_key, "a.test"));
    assert_eq!(
        SignedWebAuthnPayload {
            signature: wa,
            public_key: other.clone(),
        }
        .verify(),
        Some(other)
    );
}
