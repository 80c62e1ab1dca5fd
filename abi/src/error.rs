use antelope_crypto::KeyError;
use antelope_num_utils::NumericError;
use serde_json::Value;
use thiserror::Error as ThisError;

pub type Result<T, E = AbiError> = ::core::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum AbiError {
    #[error("read past end of buffer")]
    BufferUnderrun,

    #[error("varuint32 is longer than 5 bytes or exceeds 32 bits")]
    VarintOverflow,

    #[error("binary data has incorrect size: expected {expected}, got {got}")]
    InvalidSize { expected: usize, got: usize },

    #[error("expected {expected}, got {got}")]
    Expected { expected: &'static str, got: String },

    #[error("{0}: number is out of range")]
    OutOfRange(&'static str),

    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),

    #[error("invalid symbol code '{0}'")]
    InvalidSymbolCode(String),

    #[error("invalid asset '{asset}': {reason}")]
    InvalidAsset { asset: String, reason: &'static str },

    #[error("asset '{asset}' doesn't match symbol {expected}")]
    AssetSymbolMismatch { asset: String, expected: String },

    #[error("invalid time format: '{0}'")]
    InvalidTime(String),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("alias chain of '{0}' is too deep")]
    AliasTooDeep(String),

    #[error("value nesting is too deep (limit {0})")]
    TooDeep(usize),

    #[error("base '{base}' of struct '{name}' is not a struct")]
    InvalidBase { name: String, base: String },

    #[error("missing {struct_name}.{field} (type={type_name})")]
    MissingField {
        struct_name: String,
        field: String,
        type_name: String,
    },

    #[error("unexpected {struct_name}.{field}")]
    UnexpectedField { struct_name: String, field: String },

    #[error("type \"{arm}\" is not valid for variant {variant}")]
    UnknownVariantArm { variant: String, arm: String },

    #[error("type index {index} is not valid for variant {variant}")]
    VariantIndexOutOfRange { variant: String, index: u32 },

    #[error("unknown anyvar type: {0}")]
    UnknownAnyvarType(String),

    #[error("anyvar type index {0} is out of range")]
    AnyvarIndexOutOfRange(u32),

    #[error("unknown action {action} in contract {account}")]
    UnknownAction { account: String, action: String },

    #[error("unsupported abi version: '{0}'")]
    UnsupportedAbiVersion(String),

    #[error("hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("key: {0}")]
    Key(#[from] KeyError),

    #[error("numeric: {0}")]
    Numeric(#[from] NumericError),

    #[error("utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl AbiError {
    const MAX_VALUE_LEN: usize = 64;

    /// Type mismatch between a JSON value and what the codec needs.
    pub fn expected(expected: &'static str, got: &Value) -> Self {
        let mut got = got.to_string();
        if got.len() > Self::MAX_VALUE_LEN {
            let mut end = Self::MAX_VALUE_LEN;
            while !got.is_char_boundary(end) {
                end -= 1;
            }
            got.truncate(end);
            got.push_str("...");
        }
        Self::Expected { expected, got }
    }
}
