//! The DER `ECDSA-Sig-Value` authenticators return.

use crate::{Result, WebAuthnError};

const SEQUENCE: u8 = 0x30;
const INTEGER: u8 = 0x02;

struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn get(&mut self) -> Result<u8> {
        let (&b, rest) = self.data.split_first().ok_or(WebAuthnError::BadLength)?;
        self.data = rest;
        Ok(b)
    }

    fn get_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.data.len() {
            return Err(WebAuthnError::BadLength);
        }
        let (bytes, rest) = self.data.split_at(n);
        self.data = rest;
        Ok(bytes)
    }

    fn integer(&mut self, which: char) -> Result<[u8; 32]> {
        if self.get()? != INTEGER {
            return Err(WebAuthnError::BadMarker(which));
        }
        let len = self.get()?;
        fixup(self.get_bytes(usize::from(len))?, which)
    }
}

/// Left-pads `x` to 32 bytes or strips its leading zeros down to 32.
fn fixup(x: &[u8], which: char) -> Result<[u8; 32]> {
    let mut out = [0u8; 32];
    match x.len().checked_sub(32) {
        Some(extra) => {
            let (zeros, rest) = x.split_at(extra);
            if zeros.iter().any(|&b| b != 0) {
                return Err(WebAuthnError::ScalarTooBig(which));
            }
            out.copy_from_slice(rest);
        }
        None => out[32 - x.len()..].copy_from_slice(x),
    }
    Ok(out)
}

/// Parses `30 len 02 rlen r 02 slen s` into `r ‖ s`, each normalized to 32
/// bytes. Only the short length form is accepted.
pub fn parse_der_signature(der: &[u8]) -> Result<[u8; 64]> {
    let mut reader = Reader { data: der };
    if reader.get().ok() != Some(SEQUENCE) {
        return Err(WebAuthnError::MissingDerPrefix);
    }
    if Some(usize::from(reader.get()?)) != der.len().checked_sub(2) {
        return Err(WebAuthnError::BadLength);
    }
    let r = reader.integer('r')?;
    let s = reader.integer('s')?;
    if !reader.data.is_empty() {
        return Err(WebAuthnError::BadLength);
    }
    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(&r);
    rs[32..].copy_from_slice(&s);
    Ok(rs)
}
