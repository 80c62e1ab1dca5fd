//! Arbitrary-width integer helpers for the Antelope wire format.
//!
//! Integers wider than the host's native types (`uint128`, the 8-byte asset
//! amount, ...) travel through the codec as decimal strings. This crate converts
//! those strings to and from little-endian two's complement byte arrays without
//! going through a native integer, and provides the decimal normalization
//! helpers used when formatting fixed-point amounts.

mod bignum;
mod decimal;
mod error;

pub use self::{bignum::*, decimal::*, error::*};
