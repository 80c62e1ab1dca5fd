//! Whole transactions, through a built-in ABI.
//!
//! Action data is carried already serialized (see
//! [`Contract::serialize_action`](crate::Contract::serialize_action)), so the
//! transaction layout never depends on a contract's ABI.

use std::sync::LazyLock;

use antelope_crypto::{CryptoHash, Payload, SigningPayload};
use serde::{Deserialize, Serialize};

use crate::{Abi, AbiTypes, Result, SerializedAction, SerializerOptions, StructDef, abi::struct_def};

/// The ABI of `transaction` and the types it is built from.
pub fn transaction_abi() -> Abi {
    Abi {
        version: "eosio::abi/1.0".to_string(),
        structs: vec![
            struct_def("permission_level", &[("actor", "name"), ("permission", "name")]),
            struct_def(
                "action",
                &[
                    ("account", "name"),
                    ("name", "name"),
                    ("authorization", "permission_level[]"),
                    ("data", "bytes"),
                ],
            ),
            struct_def("extension", &[("type", "uint16"), ("data", "bytes")]),
            struct_def(
                "transaction_header",
                &[
                    ("expiration", "time_point_sec"),
                    ("ref_block_num", "uint16"),
                    ("ref_block_prefix", "uint32"),
                    ("max_net_usage_words", "varuint32"),
                    ("max_cpu_usage_ms", "uint8"),
                    ("delay_sec", "varuint32"),
                ],
            ),
            StructDef {
                base: "transaction_header".to_string(),
                ..struct_def(
                    "transaction",
                    &[
                        ("context_free_actions", "action[]"),
                        ("actions", "action[]"),
                        ("transaction_extensions", "extension[]"),
                    ],
                )
            },
        ],
        ..Default::default()
    }
}

static TRANSACTION_TYPES: LazyLock<AbiTypes> = LazyLock::new(|| {
    AbiTypes::from_abi(&transaction_abi()).unwrap_or_else(|e| unreachable!("transaction ABI: {e}"))
});

/// Built-in types with the transaction structs added.
pub fn transaction_types() -> &'static AbiTypes {
    &TRANSACTION_TYPES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionExtension {
    #[serde(rename = "type")]
    pub extension_type: u16,
    /// Hex.
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// `time_point_sec` string, e.g. `2018-06-15T19:17:47.000`.
    pub expiration: String,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    #[serde(default)]
    pub max_net_usage_words: u32,
    #[serde(default)]
    pub max_cpu_usage_ms: u8,
    #[serde(default)]
    pub delay_sec: u32,
    #[serde(default)]
    pub context_free_actions: Vec<SerializedAction>,
    #[serde(default)]
    pub actions: Vec<SerializedAction>,
    #[serde(default)]
    pub transaction_extensions: Vec<TransactionExtension>,
}

impl Transaction {
    pub fn to_bin(&self) -> Result<Vec<u8>> {
        TRANSACTION_TYPES.serialize_value("transaction", &serde_json::to_value(self)?)
    }

    pub fn from_bin(data: &[u8]) -> Result<Self> {
        let value = TRANSACTION_TYPES.deserialize_value("transaction", data, SerializerOptions::default())?;
        Ok(serde_json::from_value(value)?)
    }

    /// The digest a transaction signature commits to on the chain `chain_id`.
    pub fn signing_digest(
        &self,
        chain_id: CryptoHash,
        context_free_data: Option<&[u8]>,
    ) -> Result<CryptoHash> {
        let serialized = self.to_bin()?;
        Ok(SigningPayload {
            chain_id,
            serialized_transaction: &serialized,
            context_free_data,
        }
        .hash())
    }
}
