use antelope_abi::{Abi, Contract, Name};
use antelope_crypto::{KeyType, PrivateKey};
use antelope_test_utils::random::Rng;

pub const TOKEN_ABI: &str = include_str!("../../data/eosio.token.abi.json");
pub const RECORDS_ABI: &str = include_str!("../../data/records.abi.json");

pub fn abi(json: &str) -> Abi {
    serde_json::from_str(json).unwrap()
}

pub fn contract(json: &str) -> Contract {
    Contract::from_abi(&abi(json)).unwrap()
}

pub fn name(s: &str) -> Name {
    s.parse().unwrap()
}

/// A valid P-256 scalar.
pub fn r1_private_key(rng: &mut impl Rng) -> PrivateKey {
    let mut data = [0u8; 32];
    rng.fill_bytes(&mut data);
    data[0] &= 0x7f;
    data[31] |= 1;
    PrivateKey::new(KeyType::R1, data.to_vec()).unwrap()
}
