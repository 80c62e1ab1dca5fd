mod records;
mod token;
mod transaction;
mod webauthn;
