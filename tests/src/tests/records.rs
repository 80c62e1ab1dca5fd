use antelope_abi::{AbiTypes, SerializerOptions};
use antelope_test_utils::asserts::ResultAssertsExt;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::utils::{RECORDS_ABI, abi, contract, name};

const RECORD_HEX: &str = concat!(
    "0000000000855C34",                   // owner
    "0100000000000000",                   // id
    "00",                                 // tag
    "02",                                 // values
    "0005000000",                         // ["int32", 5]
    "02016BFFFFFFFF",                     // ["pair", {"key": "k", "value": -1}]
    "0110270000000000000453595300000000", // balances
    "E04D3912B36E0500",                   // created
    "026869",                             // memo
);

fn base_record() -> Value {
    json!({
        "owner": "alice",
        "id": "1",
        "tag": null,
        "values": [["int32", 5], ["pair", {"key": "k", "value": -1}]],
        "balances": ["1.0000 SYS"],
        "created": "2018-06-15T19:17:47.500",
        "memo": "hi",
    })
}

#[fixture]
fn record() -> Value {
    base_record()
}

fn with(mut record: Value, key: &str, value: Option<Value>) -> Value {
    let object = record.as_object_mut().unwrap();
    match value {
        Some(value) => object.insert(key.to_string(), value),
        None => object.remove(key),
    };
    record
}

#[rstest]
fn known_record(record: Value) {
    antelope_test_utils::tracing::init();
    let records = contract(RECORDS_ABI);
    let hex = records
        .serialize_action_data(name("records"), name("store"), &record)
        .unwrap();
    assert_eq!(hex, RECORD_HEX);
    assert_eq!(
        records
            .deserialize_action_data_hex(name("records"), name("store"), &hex, SerializerOptions::default())
            .unwrap(),
        record
    );
}

#[rstest]
fn trailing_extensions(record: Value) {
    let records = contract(RECORDS_ABI);
    let store = |data: &Value| records.serialize_action_data(name("records"), name("store"), data);

    // both extensions left out
    let without_memo = with(record.clone(), "memo", None);
    let hex = store(&without_memo).unwrap();
    assert_eq!(hex, RECORD_HEX.strip_suffix("026869").unwrap());
    assert_eq!(
        records
            .deserialize_action_data_hex(name("records"), name("store"), &hex, SerializerOptions::default())
            .unwrap(),
        without_memo
    );

    // both present
    let full = with(record, "extra", Some(json!({"a": 1})));
    let hex = store(&full).unwrap();
    assert_eq!(hex, format!("{RECORD_HEX}0101610301000000"));
    let options = SerializerOptions {
        anyvar_short_form: true,
        ..Default::default()
    };
    assert_eq!(
        records
            .deserialize_action_data_hex(name("records"), name("store"), &hex, options)
            .unwrap(),
        full
    );

    // a later extension can't follow a skipped one
    store(&with(without_memo, "extra", Some(json!({})))).assert_err_contains("unexpected record.extra");
}

#[rstest]
#[case::missing_base_field(with(base_record(), "owner", None), "missing owned.owner (type=account)")]
#[case::missing_field(with(base_record(), "balances", None), "missing record.balances (type=amounts)")]
#[case::unknown_arm(
    with(base_record(), "values", Some(json!([["float64", 1.5]]))),
    "type \"float64\" is not valid for variant value"
)]
#[case::bad_variant(with(base_record(), "values", Some(json!([5]))), "expected variant")]
#[case::bad_asset(with(base_record(), "balances", Some(json!(["1.0000"]))), "invalid asset")]
#[case::bad_time(with(base_record(), "created", Some(json!("yesterday"))), "invalid time format")]
fn schema_mismatch(#[case] data: Value, #[case] err: &str) {
    contract(RECORDS_ABI)
        .serialize_action_data(name("records"), name("store"), &data)
        .assert_err_contains(err);
}

#[test]
fn variant_index_out_of_range() {
    let types = AbiTypes::from_abi(&abi(RECORDS_ABI)).unwrap();
    types
        .deserialize_value("value", &[0x03, 0x00], SerializerOptions::default())
        .assert_err_contains("type index 3 is not valid for variant value");
}

#[test]
fn action_results_and_versions() {
    let abi = abi(RECORDS_ABI);
    assert_eq!(abi.action_results.len(), 1);
    assert_eq!(abi.action_results[0].name, name("store"));
    assert!(antelope_abi::supported_abi_version(&abi.version));

    let decoded = antelope_abi::Abi::from_bin(&abi.to_bin().unwrap()).unwrap();
    assert_eq!(decoded, abi);
}

#[test]
fn standalone_types() {
    let mut types = AbiTypes::from_abi(&abi(RECORDS_ABI)).unwrap();
    let pairs = json!([{"key": "", "value": 7}]);
    let bin = types.serialize_value("pair[]?", &pairs).unwrap();
    assert_eq!(bin, [0x01, 0x01, 0x00, 0x07, 0x00, 0x00, 0x00]);
    assert_eq!(
        types
            .deserialize_value("pair[]?", &bin, SerializerOptions::default())
            .unwrap(),
        pairs
    );
    assert!(types.get("pair[]?").is_none());

    // resolving once keeps the same encoding
    types.resolve("pair[]?").unwrap();
    assert_eq!(types.serialize_value("pair[]?", &pairs).unwrap(), bin);
    assert_eq!(
        types
            .deserialize_value(
                "bytes",
                &[0x02, 0xab, 0xcd],
                SerializerOptions {
                    bytes_as_array: true,
                    ..Default::default()
                }
            )
            .unwrap(),
        json!([0xab, 0xcd])
    );
}
