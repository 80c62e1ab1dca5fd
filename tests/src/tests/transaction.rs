use antelope_abi::{Action, PermissionLevel, SerializerOptions, Transaction};
use antelope_crypto::{CryptoHash, Curve, PublicKey, Secp256r1, Signature};
use antelope_test_utils::random::{Rng, RngCore, Seed, make_seedable_rng, random_seed};
use hex_literal::hex;
use rstest::rstest;
use serde_json::json;

use crate::utils::{RECORDS_ABI, TOKEN_ABI, contract, name, r1_private_key};

const CHAIN_ID: CryptoHash =
    hex!("aca376f206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906");

fn transfer(rng: &mut impl Rng) -> Transaction {
    let action = Action {
        account: name("eosio.token"),
        name: name("transfer"),
        authorization: vec![PermissionLevel {
            actor: name("alice"),
            permission: name("active"),
        }],
        data: json!({
            "from": "alice",
            "to": "bob",
            "quantity": format!("{}.0000 SYS", rng.random_range(1..1000)),
            "memo": "",
        }),
    };
    Transaction {
        expiration: "2030-01-01T00:00:00.000".to_string(),
        ref_block_num: rng.random(),
        ref_block_prefix: rng.random(),
        actions: vec![contract(TOKEN_ABI).serialize_action(&action).unwrap()],
        ..Default::default()
    }
}

#[rstest]
#[trace]
fn sign_and_recover(random_seed: Seed) {
    antelope_test_utils::tracing::init();
    let mut rng = make_seedable_rng(random_seed);
    let private_key = r1_private_key(&mut rng);
    let public_key = Secp256r1::public_key(&private_key).unwrap();

    let tx = transfer(&mut rng);
    let bin = tx.to_bin().unwrap();
    assert_eq!(Transaction::from_bin(&bin).unwrap(), tx);

    let digest = tx.signing_digest(CHAIN_ID, None).unwrap();
    let signature = Secp256r1::sign(&private_key, &digest).unwrap();

    // signatures travel as strings
    let signature: Signature = signature.to_string().parse().unwrap();
    let public_key: PublicKey = public_key.to_string().parse().unwrap();
    assert!(Secp256r1::verify(&signature, &digest, &public_key));
    assert_eq!(Secp256r1::recover(&signature, &digest), Some(public_key.clone()));

    // the signature is bound to the chain and the context-free data
    let other_chain = tx.signing_digest([0; 32], None).unwrap();
    let with_cfd = tx.signing_digest(CHAIN_ID, Some(b"cfd".as_slice())).unwrap();
    for digest in [other_chain, with_cfd] {
        assert!(!Secp256r1::verify(&signature, &digest, &public_key));
    }

    let decoded_action = contract(TOKEN_ABI)
        .deserialize_action(&tx.actions[0], SerializerOptions::default())
        .unwrap();
    assert_eq!(decoded_action.data["to"], "bob");
}

#[rstest]
#[trace]
fn keys_and_signatures_in_action_data(random_seed: Seed) {
    let mut rng = make_seedable_rng(random_seed);
    let private_key = r1_private_key(&mut rng);
    let public_key = Secp256r1::public_key(&private_key).unwrap();
    let mut digest = CryptoHash::default();
    rng.fill_bytes(&mut digest);
    let signature = Secp256r1::sign(&private_key, &digest).unwrap();

    let data = json!({
        "key": public_key.to_string(),
        "signature": signature.to_string(),
        "digest": hex::encode_upper(digest),
    });
    let records = contract(RECORDS_ABI);
    let hex = records
        .serialize_action_data(name("records"), name("attest"), &data)
        .unwrap();
    // type byte and point, type byte and compact signature, digest
    assert_eq!(hex.len(), 2 * (34 + 66 + 32));

    let decoded = records
        .deserialize_action_data_hex(name("records"), name("attest"), &hex, SerializerOptions::default())
        .unwrap();
    assert_eq!(decoded, data);

    let signature: Signature = decoded["signature"].as_str().unwrap().parse().unwrap();
    let key: PublicKey = decoded["key"].as_str().unwrap().parse().unwrap();
    assert!(Secp256r1::verify(&signature, &digest, &key));
}
