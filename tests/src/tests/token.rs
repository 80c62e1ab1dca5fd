use antelope_abi::{Abi, Action, Asset, PermissionLevel, SerializerOptions, Symbol};
use antelope_test_utils::{
    arbitrary::{arbitrary_name, arbitrary_symbol_code},
    asserts::ResultAssertsExt,
    random::{Rng, Seed, gen_random_bytes, gen_random_string, make_seedable_rng, random_seed},
};
use arbitrary::Unstructured;
use rstest::rstest;
use serde_json::{Value, json};

use crate::utils::{TOKEN_ABI, abi, contract, name};

#[rstest]
#[trace]
#[case::transfer(
    "transfer",
    json!({"from": "alice", "to": "bob", "quantity": "1.0000 SYS", "memo": "hi"}),
    "0000000000855C340000000000000E3D10270000000000000453595300000000026869"
)]
#[case::create(
    "create",
    json!({"issuer": "eosio", "maximum_supply": "1000000000.0000 SYS"}),
    "0000000000EA305500A0724E180900000453595300000000"
)]
#[case::close(
    "close",
    json!({"owner": "alice", "symbol": "4,SYS"}),
    "0000000000855C340453595300000000"
)]
fn known_actions(#[case] action: &str, #[case] data: Value, #[case] hex: &str) {
    antelope_test_utils::tracing::init();
    let token = contract(TOKEN_ABI);
    let account = name("eosio.token");

    assert_eq!(
        token
            .serialize_action_data(account, name(action), &data)
            .unwrap(),
        hex
    );
    assert_eq!(
        token
            .deserialize_action_data_hex(account, name(action), hex, SerializerOptions::default())
            .unwrap(),
        data
    );
}

#[rstest]
#[trace]
fn random_transfers(random_seed: Seed) {
    let mut rng = make_seedable_rng(random_seed);
    let token = contract(TOKEN_ABI);
    let account = name("eosio.token");

    for _ in 0..50 {
        let bytes = gen_random_bytes(&mut rng, 32..128);
        let mut u = Unstructured::new(&bytes);
        let symbol = Symbol::new(
            rng.random_range(0..=8),
            arbitrary_symbol_code(&mut u).unwrap().parse().unwrap(),
        );
        let quantity = Asset::new(rng.random(), symbol);
        let data = json!({
            "from": arbitrary_name(&mut u).unwrap(),
            "to": arbitrary_name(&mut u).unwrap(),
            "quantity": quantity.to_string(),
            "memo": gen_random_string(&mut rng, 0..64),
        });

        let action = Action {
            account,
            name: name("transfer"),
            authorization: vec![PermissionLevel {
                actor: data["from"].as_str().unwrap().parse().unwrap(),
                permission: name("active"),
            }],
            data,
        };
        let serialized = token.serialize_action(&action).unwrap();
        assert_eq!(
            token
                .deserialize_action(&serialized, SerializerOptions::default())
                .unwrap(),
            action
        );
    }
}

#[test]
fn binary_abi_behaves_like_json_abi() {
    let json_abi = abi(TOKEN_ABI);
    let bin = json_abi.to_bin().unwrap();
    let decoded = Abi::from_bin(&bin).unwrap();
    assert_eq!(decoded, json_abi);

    let data = json!({"to": "alice", "quantity": "5.000 EOS", "memo": ""});
    let from_json = contract(TOKEN_ABI)
        .serialize_action_data(name("eosio.token"), name("issue"), &data)
        .unwrap();
    let from_bin = antelope_abi::Contract::from_abi(&decoded)
        .unwrap()
        .serialize_action_data(name("eosio.token"), name("issue"), &data)
        .unwrap();
    assert_eq!(from_json, from_bin);
}

#[test]
fn schema_errors_name_the_field() {
    let token = contract(TOKEN_ABI);
    let account = name("eosio.token");

    token
        .serialize_action_data(
            account,
            name("transfer"),
            &json!({"from": "alice", "to": "bob", "quantity": "1.0000 SYS"}),
        )
        .assert_err_contains("missing transfer.memo (type=string)");
    token
        .serialize_action_data(
            account,
            name("transfer"),
            &json!({"from": "Alice", "to": "bob", "quantity": "1.0000 SYS", "memo": ""}),
        )
        .assert_err_contains("invalid name 'Alice'");
    token
        .serialize_action_data(account, name("burn"), &json!({}))
        .assert_err_contains("unknown action burn in contract eosio.token");
    token
        .deserialize_action_data(
            account,
            name("transfer"),
            &hex_literal::hex!("0000000000855C34"),
            SerializerOptions::default(),
        )
        .assert_err_contains("read past end of buffer");
}

#[test]
fn asset_precision_against_symbol() {
    let symbol: Symbol = "4,SYS".parse().unwrap();
    assert_eq!(
        Asset::parse_with_symbol("1.0000 SYS", &symbol).unwrap().amount,
        10000
    );
    Asset::parse_with_symbol("1.00000 SYS", &symbol).assert_err_contains("doesn't match symbol 4,SYS");
}
