use arbitrary::{Arbitrary, Unstructured};
use hex::ToHex;

const NAME_CHARS: &[u8] = b".12345abcdefghijklmnopqrstuvwxyz";

/// N is the number of bytes, NOT hex characters
pub fn arbitrary_hex_fixed_size<const N: usize>(
    u: &mut Unstructured<'_>,
) -> arbitrary::Result<String> {
    let data = <[u8; N]>::arbitrary(u)?;
    Ok(data.encode_hex_upper())
}

/// A valid account name without trailing dots, so it survives a round trip
/// unchanged.
pub fn arbitrary_name(u: &mut Unstructured<'_>) -> arbitrary::Result<String> {
    let len = u.int_in_range(0..=12)?;
    let mut name = (0..len)
        .map(|_| u.choose(NAME_CHARS).map(|c| char::from(*c)))
        .collect::<arbitrary::Result<String>>()?;
    // the 13th character only has 4 bits: '.', '1'..='5', 'a'..='j'
    if len == 12 && u.arbitrary()? {
        name.push(char::from(*u.choose(&NAME_CHARS[..16])?));
    }
    Ok(name.trim_end_matches('.').to_string())
}

/// An uppercase ticker of 1 to 7 letters.
pub fn arbitrary_symbol_code(u: &mut Unstructured<'_>) -> arbitrary::Result<String> {
    let len = u.int_in_range(1..=7)?;
    (0..len)
        .map(|_| u.int_in_range(b'A'..=b'Z').map(char::from))
        .collect()
}
