use antelope_crypto::{PrivateKey, PublicKey, Signature};
use antelope_num_utils::{
    binary_to_decimal, decimal_to_binary, signed_binary_to_decimal, signed_decimal_to_binary,
};
use serde_json::{Number, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    AbiError, Result, SerialBuffer, SerializerState, Symbol, SymbolCode, anyvar,
    time::{
        block_timestamp_to_date, date_to_block_timestamp, date_to_time_point,
        date_to_time_point_sec, time_point_sec_to_date, time_point_to_date,
    },
};

/// Built-in types every ABI can refer to by name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Primitive {
    Bool,
    #[strum(serialize = "int8")]
    Int8,
    #[strum(serialize = "uint8")]
    Uint8,
    #[strum(serialize = "int16")]
    Int16,
    #[strum(serialize = "uint16")]
    Uint16,
    #[strum(serialize = "int32")]
    Int32,
    #[strum(serialize = "uint32")]
    Uint32,
    #[strum(serialize = "int64")]
    Int64,
    #[strum(serialize = "uint64")]
    Uint64,
    #[strum(serialize = "int128")]
    Int128,
    #[strum(serialize = "uint128")]
    Uint128,
    #[strum(serialize = "varint32")]
    Varint32,
    #[strum(serialize = "varuint32")]
    Varuint32,
    #[strum(serialize = "float32")]
    Float32,
    #[strum(serialize = "float64")]
    Float64,
    #[strum(serialize = "float128")]
    Float128,
    TimePoint,
    TimePointSec,
    BlockTimestampType,
    Name,
    Bytes,
    String,
    #[strum(serialize = "checksum160")]
    Checksum160,
    #[strum(serialize = "checksum256")]
    Checksum256,
    #[strum(serialize = "checksum512")]
    Checksum512,
    PublicKey,
    PrivateKey,
    Signature,
    Symbol,
    SymbolCode,
    Asset,
    Anyvar,
    NullT,
    AnyObject,
    AnyArray,
}

impl Primitive {
    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn serialize(
        self,
        buffer: &mut SerialBuffer,
        value: &Value,
        state: &mut SerializerState,
    ) -> Result<()> {
        match self {
            Self::Bool => buffer.push_u8(u8::from(bool_value(value)?)),
            Self::Int8 => buffer.push(&small_int::<i8>(value, self.name())?.to_le_bytes()),
            Self::Uint8 => buffer.push_u8(small_int(value, self.name())?),
            Self::Int16 => buffer.push_i16(small_int(value, self.name())?),
            Self::Uint16 => buffer.push_u16(small_int(value, self.name())?),
            Self::Int32 => buffer.push_i32(small_int(value, self.name())?),
            Self::Uint32 => buffer.push_u32(small_int(value, self.name())?),
            Self::Int64 => buffer.push(&signed_decimal_to_binary::<8>(&integer_string(value)?)?),
            Self::Uint64 => buffer.push(&decimal_to_binary::<8>(&integer_string(value)?)?),
            Self::Int128 => buffer.push(&signed_decimal_to_binary::<16>(&integer_string(value)?)?),
            Self::Uint128 => buffer.push(&decimal_to_binary::<16>(&integer_string(value)?)?),
            Self::Varint32 => buffer.push_varint32(small_int(value, self.name())?),
            Self::Varuint32 => buffer.push_varuint32(small_int(value, self.name())?),
            Self::Float32 => buffer.push_f32(narrow(float_value(value)?)),
            Self::Float64 => buffer.push_f64(float_value(value)?),
            Self::Float128 => buffer.push(&sized_hex(value, 16)?),
            Self::TimePoint => buffer.push_i64(date_to_time_point(str_value(value)?)?),
            Self::TimePointSec => buffer.push_u32(date_to_time_point_sec(str_value(value)?)?),
            Self::BlockTimestampType => {
                buffer.push_u32(date_to_block_timestamp(str_value(value)?)?);
            }
            Self::Name => buffer.push_name(str_value(value)?.parse()?),
            Self::Bytes => buffer.push_bytes(&bytes_value(value)?)?,
            Self::String => buffer.push_string(str_value(value)?)?,
            Self::Checksum160 => buffer.push(&sized_hex(value, 20)?),
            Self::Checksum256 => buffer.push(&sized_hex(value, 32)?),
            Self::Checksum512 => buffer.push(&sized_hex(value, 64)?),
            Self::PublicKey => {
                buffer.push_public_key(&str_value(value)?.parse::<PublicKey>()?);
            }
            Self::PrivateKey => {
                buffer.push_private_key(&str_value(value)?.parse::<PrivateKey>()?);
            }
            Self::Signature => buffer.push_signature(&str_value(value)?.parse::<Signature>()?),
            Self::Symbol => buffer.push_symbol(&str_value(value)?.parse::<Symbol>()?),
            Self::SymbolCode => {
                buffer.push_symbol_code(&str_value(value)?.parse::<SymbolCode>()?);
            }
            Self::Asset => buffer.push_asset_str(str_value(value)?)?,
            Self::Anyvar => anyvar::serialize(buffer, value, state)?,
            Self::NullT => {}
            Self::AnyObject => anyvar::serialize_object(buffer, value, state)?,
            Self::AnyArray => anyvar::serialize_array(buffer, value, state)?,
        }
        Ok(())
    }

    pub fn deserialize(self, buffer: &mut SerialBuffer, state: &mut SerializerState) -> Result<Value> {
        Ok(match self {
            Self::Bool => Value::Bool(buffer.get()? != 0),
            Self::Int8 => i8::from_le_bytes(buffer.get_array()?).into(),
            Self::Uint8 => buffer.get()?.into(),
            Self::Int16 => buffer.get_i16()?.into(),
            Self::Uint16 => buffer.get_u16()?.into(),
            Self::Int32 => buffer.get_i32()?.into(),
            Self::Uint32 => buffer.get_u32()?.into(),
            Self::Int64 => signed_binary_to_decimal(&buffer.get_array::<8>()?, 1).into(),
            Self::Uint64 => binary_to_decimal(&buffer.get_array::<8>()?, 1).into(),
            Self::Int128 => signed_binary_to_decimal(&buffer.get_array::<16>()?, 1).into(),
            Self::Uint128 => binary_to_decimal(&buffer.get_array::<16>()?, 1).into(),
            Self::Varint32 => buffer.get_varint32()?.into(),
            Self::Varuint32 => buffer.get_varuint32()?.into(),
            Self::Float32 => float_to_value(f64::from(buffer.get_f32()?)),
            Self::Float64 => float_to_value(buffer.get_f64()?),
            Self::Float128 => hex::encode_upper(buffer.get_bytes(16)?).into(),
            Self::TimePoint => time_point_to_date(buffer.get_i64()?)?.into(),
            Self::TimePointSec => time_point_sec_to_date(buffer.get_u32()?)?.into(),
            Self::BlockTimestampType => block_timestamp_to_date(buffer.get_u32()?)?.into(),
            Self::Name => buffer.get_name()?.to_string().into(),
            Self::Bytes => {
                let bytes = buffer.get_bytes_prefixed()?;
                if state.options.bytes_as_array {
                    bytes.iter().copied().map(Value::from).collect()
                } else {
                    hex::encode_upper(bytes).into()
                }
            }
            Self::String => buffer.get_string()?.into(),
            Self::Checksum160 => hex::encode_upper(buffer.get_bytes(20)?).into(),
            Self::Checksum256 => hex::encode_upper(buffer.get_bytes(32)?).into(),
            Self::Checksum512 => hex::encode_upper(buffer.get_bytes(64)?).into(),
            Self::PublicKey => buffer.get_public_key()?.to_string().into(),
            Self::PrivateKey => buffer.get_private_key()?.to_string().into(),
            Self::Signature => buffer.get_signature()?.to_string().into(),
            Self::Symbol => buffer.get_symbol()?.to_string().into(),
            Self::SymbolCode => buffer.get_symbol_code()?.to_string().into(),
            Self::Asset => buffer.get_asset()?.to_string().into(),
            Self::Anyvar => anyvar::deserialize(buffer, state)?,
            Self::NullT => Value::Null,
            Self::AnyObject => anyvar::deserialize_object(buffer, state)?,
            Self::AnyArray => anyvar::deserialize_array(buffer, state)?,
        })
    }
}

fn str_value(value: &Value) -> Result<&str> {
    value.as_str().ok_or_else(|| AbiError::expected("string", value))
}

fn bool_value(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
        _ => Err(AbiError::expected("true or false", value)),
    }
}

/// Integers of up to 32 bits come as numbers or numeric strings.
fn small_int<T: TryFrom<i64>>(value: &Value, type_name: &'static str) -> Result<T> {
    let n = match value {
        Value::Number(n) if n.is_f64() => return Err(AbiError::expected("integer", value)),
        Value::Number(n) => n.as_i64().ok_or(AbiError::OutOfRange(type_name))?,
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| AbiError::expected("integer", value))?,
        _ => return Err(AbiError::expected("integer", value)),
    };
    T::try_from(n).map_err(|_| AbiError::OutOfRange(type_name))
}

/// Wider integers go through their decimal digits, as JSON numbers cannot
/// carry them safely.
fn integer_string(value: &Value) -> Result<String> {
    match value {
        Value::Number(n) if !n.is_f64() => Ok(n.to_string()),
        Value::String(s) => Ok(s.trim().to_string()),
        _ => Err(AbiError::expected("integer or integer string", value)),
    }
}

fn float_value(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| AbiError::expected("number", value)),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| AbiError::expected("number", value)),
        _ => Err(AbiError::expected("number", value)),
    }
}

#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
fn narrow(v: f64) -> f32 {
    v as f32
}

/// JSON has no NaN or infinities, those become strings.
fn float_to_value(v: f64) -> Value {
    Number::from_f64(v).map_or_else(|| Value::String(v.to_string()), Value::Number)
}

fn bytes_value(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::String(s) => Ok(hex::decode(s)?),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| AbiError::expected("byte", item))
            })
            .collect(),
        _ => Err(AbiError::expected("hex string or byte array", value)),
    }
}

fn sized_hex(value: &Value, size: usize) -> Result<Vec<u8>> {
    let bytes = hex::decode(str_value(value)?)?;
    if bytes.len() != size {
        return Err(AbiError::InvalidSize {
            expected: size,
            got: bytes.len(),
        });
    }
    Ok(bytes)
}
