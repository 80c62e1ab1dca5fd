//! Schema-driven binary codec for Antelope transactions and contract data.
//!
//! An [`Abi`] is compiled into [`AbiTypes`], an arena of type descriptors
//! that converts JSON values to the wire format and back through a
//! [`SerialBuffer`]. [`Contract`] binds a contract's actions to their types
//! and [`Transaction`] serializes whole transactions.
//!
//! Key, private key and signature fields use the string formats of
//! [`antelope_crypto`].

mod abi;
pub mod anyvar;
mod asset;
mod buffer;
mod contract;
mod error;
mod name;
mod primitive;
pub mod time;
mod transaction;
mod types;

pub use self::{
    abi::*, asset::*, buffer::*, contract::*, error::*, name::*, primitive::*, transaction::*,
    types::*,
};
