use thiserror::Error as ThisError;

use crate::MAX_PRECISION;

pub type Result<T, E = NumericError> = ::core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum NumericError {
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("number is out of range")]
    OutOfRange,

    #[error("decimal '{value}' exceeds precision {precision}")]
    PrecisionExceeded { value: String, precision: u8 },

    #[error("precision should be {MAX_PRECISION} or less, got {0}")]
    Precision(u8),
}
