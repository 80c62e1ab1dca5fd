use std::ops::{Bound, RangeBounds};

use rand::Rng;

pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Inserts or replaces one character of `s` with a random lowercase letter.
pub fn tamper_string(rng: &mut impl Rng, s: &str) -> String {
    tamper_string_with(rng, s, LOWERCASE)
}

/// Inserts or replaces one character of `s`, picking the new one from `alphabet`.
///
/// A replaced character always differs from the original one, so the result
/// never equals `s`. With [`BASE58_ALPHABET`] the result still decodes as
/// base58 and only a checksum can catch the change.
pub fn tamper_string_with(rng: &mut impl Rng, s: &str, alphabet: &[u8]) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    if chars.is_empty() || rng.random() {
        let idx = rng.random_range(0..=chars.len());
        chars.insert(idx, pick(rng, alphabet));
    } else {
        let idx = rng.random_range(0..chars.len());
        chars[idx] = pick_other(rng, alphabet, chars[idx]);
    }
    chars.into_iter().collect()
}

/// Replaces exactly one character of `s` within `positions` by a different
/// one from `alphabet`, keeping the length intact.
pub fn replace_char_with(
    rng: &mut impl Rng,
    s: &str,
    positions: impl RangeBounds<usize>,
    alphabet: &[u8],
) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    let start = match positions.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n + 1,
        Bound::Unbounded => 0,
    };
    let end = match positions.end_bound() {
        Bound::Included(&n) => n + 1,
        Bound::Excluded(&n) => n,
        Bound::Unbounded => chars.len(),
    };
    let idx = rng.random_range(start..end.min(chars.len()));
    chars[idx] = pick_other(rng, alphabet, chars[idx]);
    chars.into_iter().collect()
}

fn pick_other(rng: &mut impl Rng, alphabet: &[u8], current: char) -> char {
    loop {
        let c = pick(rng, alphabet);
        if c != current {
            break c;
        }
    }
}

fn pick(rng: &mut impl Rng, alphabet: &[u8]) -> char {
    char::from(alphabet[rng.random_range(0..alphabet.len())])
}

/// Flips one random bit of `data`, or, with `maybe_modify_size`, possibly
/// inserts one random byte instead.
pub fn tamper_bytes(rng: &mut impl Rng, data: &[u8], maybe_modify_size: bool) -> Vec<u8> {
    let mut tampered = data.to_vec();
    if maybe_modify_size && (data.is_empty() || rng.random()) {
        let idx = rng.random_range(0..=data.len());
        tampered.insert(idx, rng.random());
    } else {
        let bit = rng.random_range(0..data.len() * 8);
        tampered[bit / 8] ^= 1 << (bit % 8);
    }
    tampered
}
