use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{Abi, AbiError, AbiTypes, Name, Result, SerialBuffer, SerializerOptions, SerializerState, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub actor: Name,
    pub permission: Name,
}

/// Action with its data as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub account: Name,
    pub name: Name,
    pub authorization: Vec<PermissionLevel>,
    pub data: Value,
}

/// Action with its data already serialized, as hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedAction {
    pub account: Name,
    pub name: Name,
    pub authorization: Vec<PermissionLevel>,
    pub data: String,
}

/// The types of a contract's ABI with its actions bound to them.
#[derive(Debug, Clone)]
pub struct Contract {
    types: AbiTypes,
    actions: HashMap<Name, TypeId>,
}

impl Contract {
    pub fn from_abi(abi: &Abi) -> Result<Self> {
        let mut types = AbiTypes::from_abi(abi)?;
        let actions = abi
            .actions
            .iter()
            .map(|action| Ok((action.name, types.resolve(&action.type_name)?)))
            .collect::<Result<HashMap<_, _>>>()?;
        debug!(actions = actions.len(), types = types.len(), "created contract");
        Ok(Self { types, actions })
    }

    pub const fn types(&self) -> &AbiTypes {
        &self.types
    }

    pub fn action_type(&self, name: Name) -> Option<TypeId> {
        self.actions.get(&name).copied()
    }

    fn action(&self, account: Name, name: Name) -> Result<TypeId> {
        self.action_type(name).ok_or_else(|| AbiError::UnknownAction {
            account: account.to_string(),
            action: name.to_string(),
        })
    }

    /// Serializes `data` as the arguments of action `name`, as uppercase hex.
    ///
    /// `account` only names the contract in errors.
    pub fn serialize_action_data(&self, account: Name, name: Name, data: &Value) -> Result<String> {
        let id = self.action(account, name)?;
        let mut buffer = SerialBuffer::new();
        self.types
            .serialize(id, &mut buffer, data, &mut SerializerState::default(), true)?;
        trace!(%account, %name, len = buffer.len(), "serialized action data");
        Ok(hex::encode_upper(buffer.as_slice()))
    }

    pub fn deserialize_action_data(
        &self,
        account: Name,
        name: Name,
        data: &[u8],
        options: SerializerOptions,
    ) -> Result<Value> {
        let id = self.action(account, name)?;
        let mut buffer = SerialBuffer::from_bytes(data);
        let value = self
            .types
            .deserialize(id, &mut buffer, &mut SerializerState::new(options), true)?;
        trace!(%account, %name, len = data.len(), "deserialized action data");
        Ok(value)
    }

    /// Like [`Self::deserialize_action_data`], with the data as hex.
    pub fn deserialize_action_data_hex(
        &self,
        account: Name,
        name: Name,
        data: &str,
        options: SerializerOptions,
    ) -> Result<Value> {
        self.deserialize_action_data(account, name, &hex::decode(data)?, options)
    }

    pub fn serialize_action(&self, action: &Action) -> Result<SerializedAction> {
        Ok(SerializedAction {
            account: action.account,
            name: action.name,
            authorization: action.authorization.clone(),
            data: self.serialize_action_data(action.account, action.name, &action.data)?,
        })
    }

    pub fn deserialize_action(
        &self,
        action: &SerializedAction,
        options: SerializerOptions,
    ) -> Result<Action> {
        Ok(Action {
            account: action.account,
            name: action.name,
            authorization: action.authorization.clone(),
            data: self.deserialize_action_data_hex(action.account, action.name, &action.data, options)?,
        })
    }
}
