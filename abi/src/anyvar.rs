//! Self-describing values.
//!
//! An anyvar is a `varuint32` index into [`ANYVAR_TYPES`] followed by a
//! value of that type. Objects and arrays nest further anyvars, so arbitrary
//! JSON-like trees fit without a schema.

use serde_json::{Map, Value, json};

use crate::{AbiError, Primitive, Result, SerialBuffer, SerializerState};

/// Wire order of the types an anyvar can hold.
pub const ANYVAR_TYPES: [Primitive; 19] = [
    Primitive::NullT,
    Primitive::Int64,
    Primitive::Uint64,
    Primitive::Int32,
    Primitive::Uint32,
    Primitive::Int16,
    Primitive::Uint16,
    Primitive::Int8,
    Primitive::Uint8,
    Primitive::TimePoint,
    Primitive::Checksum256,
    Primitive::Float64,
    Primitive::String,
    Primitive::AnyObject,
    Primitive::AnyArray,
    Primitive::Bytes,
    Primitive::Symbol,
    Primitive::SymbolCode,
    Primitive::Asset,
];

/// Whether values of `kind` may be written without the `{type, value}`
/// wrapper.
pub const fn has_short_form(kind: Primitive) -> bool {
    matches!(
        kind,
        Primitive::NullT
            | Primitive::Int32
            | Primitive::String
            | Primitive::AnyObject
            | Primitive::AnyArray
            | Primitive::Bytes
    )
}

fn index_of(kind: Primitive) -> Option<u32> {
    ANYVAR_TYPES
        .iter()
        .position(|k| *k == kind)
        .and_then(|i| u32::try_from(i).ok())
}

fn kind_of(index: u32) -> Result<Primitive> {
    usize::try_from(index)
        .ok()
        .and_then(|i| ANYVAR_TYPES.get(i))
        .copied()
        .ok_or(AbiError::AnyvarIndexOutOfRange(index))
}

static NULL: Value = Value::Null;

/// An anyvar as picked from the shape of a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Anyvar<'a> {
    Null,
    String(&'a str),
    Int32(i32),
    Array(&'a [Value]),
    Object(&'a Map<String, Value>),
    /// Explicit `{"type": ..., "value": ...}`.
    Typed { kind: Primitive, value: &'a Value },
}

impl<'a> Anyvar<'a> {
    /// Numbers must fit `int32` and booleans have no anyvar kind, both need
    /// the explicit form. Any object with a string `type` is taken as that
    /// form: other keys are ignored and a missing `value` reads as `null`.
    pub fn from_json(value: &'a Value) -> Result<Self> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::String(s),
            Value::Number(n) => Self::Int32(
                n.as_i64()
                    .and_then(|n| i32::try_from(n).ok())
                    .ok_or_else(|| {
                        AbiError::expected("int32, other numbers need {type, value}", value)
                    })?,
            ),
            Value::Bool(_) => return Err(AbiError::expected("anyvar value", value)),
            Value::Array(items) => Self::Array(items),
            Value::Object(map) => match map.get("type") {
                Some(Value::String(type_name)) => Self::Typed {
                    kind: type_name
                        .parse()
                        .ok()
                        .filter(|kind| index_of(*kind).is_some())
                        .ok_or_else(|| AbiError::UnknownAnyvarType(type_name.clone()))?,
                    value: map.get("value").unwrap_or(&NULL),
                },
                _ => Self::Object(map),
            },
        })
    }

    pub const fn kind(&self) -> Primitive {
        match self {
            Self::Null => Primitive::NullT,
            Self::String(_) => Primitive::String,
            Self::Int32(_) => Primitive::Int32,
            Self::Array(_) => Primitive::AnyArray,
            Self::Object(_) => Primitive::AnyObject,
            Self::Typed { kind, .. } => *kind,
        }
    }

    pub fn serialize(&self, buffer: &mut SerialBuffer, state: &mut SerializerState) -> Result<()> {
        let index = index_of(self.kind())
            .ok_or_else(|| AbiError::UnknownAnyvarType(self.kind().to_string()))?;
        buffer.push_varuint32(index);
        match self {
            Self::Null => {}
            Self::String(s) => buffer.push_string(s)?,
            Self::Int32(n) => buffer.push_i32(*n),
            Self::Array(items) => push_array(buffer, items, state)?,
            Self::Object(map) => push_object(buffer, map, state)?,
            Self::Typed { kind, value } => kind.serialize(buffer, value, state)?,
        }
        Ok(())
    }
}

fn push_array(buffer: &mut SerialBuffer, items: &[Value], state: &mut SerializerState) -> Result<()> {
    buffer.push_len(items.len())?;
    items
        .iter()
        .try_for_each(|item| serialize(buffer, item, state))
}

fn push_object(
    buffer: &mut SerialBuffer,
    map: &Map<String, Value>,
    state: &mut SerializerState,
) -> Result<()> {
    buffer.push_len(map.len())?;
    map.iter().try_for_each(|(key, value)| {
        buffer.push_string(key)?;
        serialize(buffer, value, state)
    })
}

/// Writes `value` as an `anyvar`.
pub fn serialize(buffer: &mut SerialBuffer, value: &Value, state: &mut SerializerState) -> Result<()> {
    state.nested(|state| Anyvar::from_json(value)?.serialize(buffer, state))
}

/// Writes the body of an `any_object`: `varuint32` count, then key and
/// anyvar pairs.
pub fn serialize_object(
    buffer: &mut SerialBuffer,
    value: &Value,
    state: &mut SerializerState,
) -> Result<()> {
    let map = value
        .as_object()
        .ok_or_else(|| AbiError::expected("object", value))?;
    state.nested(|state| push_object(buffer, map, state))
}

pub fn serialize_array(
    buffer: &mut SerialBuffer,
    value: &Value,
    state: &mut SerializerState,
) -> Result<()> {
    let items = value
        .as_array()
        .ok_or_else(|| AbiError::expected("array", value))?;
    state.nested(|state| push_array(buffer, items, state))
}

/// Reads an `anyvar`, bare or wrapped according to
/// [`crate::SerializerOptions::anyvar_short_form`].
pub fn deserialize(buffer: &mut SerialBuffer, state: &mut SerializerState) -> Result<Value> {
    let kind = kind_of(buffer.get_varuint32()?)?;
    let value = state.nested(|state| kind.deserialize(buffer, state))?;
    if state.options.anyvar_short_form && has_short_form(kind) {
        return Ok(value);
    }
    Ok(json!({"type": kind.name(), "value": value}))
}

/// Repeated keys get `_1`, `_2`, ... appended so none is lost.
pub fn deserialize_object(buffer: &mut SerialBuffer, state: &mut SerializerState) -> Result<Value> {
    let len = buffer.get_len()?;
    let mut map = Map::new();
    for _ in 0..len {
        let key = buffer.get_string()?;
        let value = deserialize(buffer, state)?;
        let mut unique = key.clone();
        let mut suffix = 0;
        while map.contains_key(&unique) {
            suffix += 1;
            unique = format!("{key}_{suffix}");
        }
        map.insert(unique, value);
    }
    Ok(Value::Object(map))
}

pub fn deserialize_array(buffer: &mut SerialBuffer, state: &mut SerializerState) -> Result<Value> {
    let len = buffer.get_len()?;
    let mut items = Vec::new();
    for _ in 0..len {
        items.push(deserialize(buffer, state)?);
    }
    Ok(Value::Array(items))
}
