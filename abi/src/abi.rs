use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::{AbiError, AbiTypes, Name, Result, SerialBuffer, SerializerOptions};

/// Whether `version` is one of the `eosio::abi/1.x` revisions.
pub fn supported_abi_version(version: &str) -> bool {
    version.starts_with("eosio::abi/1.")
}

/// `typedef`: `new_type_name` is another name for `type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    #[serde(default)]
    pub base: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: Name,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClausePair {
    pub id: String,
    pub body: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Decoded ABIs carry it as a decimal string, hand-written ones as a
    /// number.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub error_code: u64,
    pub error_msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResultDef {
    pub name: Name,
    pub result_type: String,
}

/// Tagged blob for future ABI revisions; `value` is hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiExtension {
    pub tag: u16,
    pub value: String,
}

/// A contract's ABI, as published on chain or written by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Abi {
    pub version: String,
    pub types: Vec<TypeDef>,
    pub structs: Vec<StructDef>,
    pub actions: Vec<ActionDef>,
    pub tables: Vec<TableDef>,
    pub ricardian_clauses: Vec<ClausePair>,
    pub error_messages: Vec<ErrorMessage>,
    pub abi_extensions: Vec<AbiExtension>,
    pub variants: Vec<VariantDef>,
    pub action_results: Vec<ActionResultDef>,
}

pub(crate) fn struct_def(name: &str, fields: &[(&str, &str)]) -> StructDef {
    StructDef {
        name: name.to_string(),
        base: String::new(),
        fields: fields
            .iter()
            .map(|(name, type_name)| FieldDef {
                name: (*name).to_string(),
                type_name: (*type_name).to_string(),
            })
            .collect(),
    }
}

/// The ABI describing binary ABIs themselves.
pub fn abi_def_abi() -> Abi {
    Abi {
        version: "eosio::abi/1.2".to_string(),
        structs: vec![
            struct_def("extensions_entry", &[("tag", "uint16"), ("value", "bytes")]),
            struct_def("type_def", &[("new_type_name", "string"), ("type", "string")]),
            struct_def("field_def", &[("name", "string"), ("type", "string")]),
            struct_def(
                "struct_def",
                &[("name", "string"), ("base", "string"), ("fields", "field_def[]")],
            ),
            struct_def(
                "action_def",
                &[("name", "name"), ("type", "string"), ("ricardian_contract", "string")],
            ),
            struct_def(
                "table_def",
                &[
                    ("name", "name"),
                    ("index_type", "string"),
                    ("key_names", "string[]"),
                    ("key_types", "string[]"),
                    ("type", "string"),
                ],
            ),
            struct_def("clause_pair", &[("id", "string"), ("body", "string")]),
            struct_def("error_message", &[("error_code", "uint64"), ("error_msg", "string")]),
            struct_def("variant_def", &[("name", "string"), ("types", "string[]")]),
            struct_def("action_result_def", &[("name", "name"), ("result_type", "string")]),
            struct_def(
                "abi_def",
                &[
                    ("version", "string"),
                    ("types", "type_def[]"),
                    ("structs", "struct_def[]"),
                    ("actions", "action_def[]"),
                    ("tables", "table_def[]"),
                    ("ricardian_clauses", "clause_pair[]"),
                    ("error_messages", "error_message[]"),
                    ("abi_extensions", "extensions_entry[]"),
                    ("variants", "variant_def[]$"),
                    ("action_results", "action_result_def[]$"),
                ],
            ),
        ],
        ..Default::default()
    }
}

static ABI_DEF_TYPES: LazyLock<AbiTypes> = LazyLock::new(|| {
    AbiTypes::from_abi(&abi_def_abi()).unwrap_or_else(|e| unreachable!("abi_def ABI: {e}"))
});

impl Abi {
    /// Decodes a binary ABI, e.g. as returned by `get_raw_abi`.
    pub fn from_bin(data: &[u8]) -> Result<Self> {
        let mut buffer = SerialBuffer::from_bytes(data);
        let version = buffer.get_string()?;
        if !supported_abi_version(&version) {
            return Err(AbiError::UnsupportedAbiVersion(version));
        }
        let value = ABI_DEF_TYPES.deserialize_value("abi_def", data, SerializerOptions::default())?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_bin(&self) -> Result<Vec<u8>> {
        ABI_DEF_TYPES.serialize_value("abi_def", &serde_json::to_value(self)?)
    }
}
