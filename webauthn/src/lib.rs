//! WebAuthn (`WA`) signatures.
//!
//! Authenticators sign `SHA256(authenticator_data ‖ SHA256(client_data_json))`
//! with a P-256 key and return the signature DER encoded. Antelope carries it
//! as a compact recoverable signature followed by both signed blobs.

mod der;
mod error;
mod signature;

pub use self::{der::*, error::*, signature::*};
