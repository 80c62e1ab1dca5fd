//! Key, private key and signature string formats.
//!
//! Every value is a [`Key`] tagged with its [`KeyType`]. String forms are
//! `PUB_`/`PVT_`/`SIG_` followed by the type and a base58 payload whose
//! 4-byte checksum is a [`ripemd160`] of the data and the type suffix.
//! Legacy `EOS...` public keys and WIF private keys are accepted too.
//!
//! Curve arithmetic is behind the [`Curve`] trait; the `r1` feature provides
//! [`Secp256r1`].

pub mod base58;
mod curve;
mod error;
mod key;
mod payload;
mod private_key;
mod public_key;
mod ripemd160;
mod signature;

pub use self::{
    curve::*, error::*, key::*, payload::*, private_key::*, public_key::*, ripemd160::*,
    signature::*,
};
