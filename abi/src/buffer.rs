use antelope_crypto::{KeyType, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, PrivateKey, PublicKey, SIGNATURE_SIZE, Signature};

use crate::{AbiError, Asset, Name, Result, Symbol, SymbolCode};

/// Serialized bytes plus a read cursor.
///
/// Writes always append; reads advance the cursor and fail with
/// [`AbiError::BufferUnderrun`] instead of reading past the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialBuffer {
    data: Vec<u8>,
    read_pos: usize,
}

macro_rules! fixed_width {
    ($($push:ident, $get:ident => $t:ty;)+) => {$(
        #[doc = concat!("Appends a little-endian `", stringify!($t), "`.")]
        #[inline]
        pub fn $push(&mut self, v: $t) {
            self.push(&v.to_le_bytes());
        }

        #[inline]
        pub fn $get(&mut self) -> Result<$t> {
            self.get_array().map(<$t>::from_le_bytes)
        }
    )+};
}

impl SerialBuffer {
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            read_pos: 0,
        }
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            read_pos: 0,
        }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub const fn read_pos(&self) -> usize {
        self.read_pos
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Makes room for at least `n` more bytes, growing by at least half of
    /// the current capacity.
    pub fn reserve(&mut self, n: usize) {
        let (len, capacity) = (self.data.len(), self.data.capacity());
        if capacity - len < n {
            let target = (len + n).max(capacity + capacity / 2);
            self.data.reserve_exact(target - len);
        }
    }

    /// Whether unread bytes remain.
    #[inline]
    pub const fn have_read_data(&self) -> bool {
        self.read_pos < self.data.len()
    }

    #[inline]
    pub const fn restart_read(&mut self) {
        self.read_pos = 0;
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.data.extend_from_slice(bytes);
    }

    #[inline]
    pub fn push_u8(&mut self, v: u8) {
        self.push(&[v]);
    }

    pub fn get(&mut self) -> Result<u8> {
        let [b] = self.get_array()?;
        Ok(b)
    }

    /// Reads the next `n` bytes.
    pub fn get_bytes(&mut self, n: usize) -> Result<&[u8]> {
        let end = self
            .read_pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(AbiError::BufferUnderrun)?;
        let bytes = &self.data[self.read_pos..end];
        self.read_pos = end;
        Ok(bytes)
    }

    pub fn get_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0; N];
        array.copy_from_slice(self.get_bytes(N)?);
        Ok(array)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.get_bytes(n).map(|_| ())
    }

    fixed_width! {
        push_u16, get_u16 => u16;
        push_i16, get_i16 => i16;
        push_u32, get_u32 => u32;
        push_i32, get_i32 => i32;
        push_i64, get_i64 => i64;
        push_u128, get_u128 => u128;
        push_i128, get_i128 => i128;
        push_f32, get_f32 => f32;
        push_f64, get_f64 => f64;
    }

    /// Appends a `u64` as its low then high `u32` half, i.e. little-endian.
    pub fn push_u64(&mut self, v: u64) {
        let [lo, hi] = [v, v >> 32].map(|half| half.to_le_bytes());
        self.push(&lo[..4]);
        self.push(&hi[..4]);
    }

    pub fn get_u64(&mut self) -> Result<u64> {
        let lo = u64::from(self.get_u32()?);
        let hi = u64::from(self.get_u32()?);
        Ok(hi << 32 | lo)
    }

    /// 7 bits per byte, least significant group first, high bit set on all
    /// but the last byte.
    pub fn push_varuint32(&mut self, mut v: u32) {
        loop {
            let byte = v.to_le_bytes()[0] & 0x7f;
            v >>= 7;
            if v == 0 {
                self.push_u8(byte);
                break;
            }
            self.push_u8(byte | 0x80);
        }
    }

    /// Fails on a sixth byte or on bits beyond the 32nd.
    pub fn get_varuint32(&mut self) -> Result<u32> {
        let mut v = 0u32;
        for i in 0..5 {
            let byte = self.get()?;
            if i == 4 && byte > 0x0f {
                return Err(AbiError::VarintOverflow);
            }
            v |= u32::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(v);
            }
        }
        Err(AbiError::VarintOverflow)
    }

    /// Zig-zag encoded, so small negative numbers stay short.
    pub fn push_varint32(&mut self, v: i32) {
        let zigzag = (v << 1) ^ (v >> 31);
        self.push_varuint32(u32::from_ne_bytes(zigzag.to_ne_bytes()));
    }

    pub fn get_varint32(&mut self) -> Result<i32> {
        let v = self.get_varuint32()?;
        let magnitude = i32::from_ne_bytes((v >> 1).to_ne_bytes());
        Ok(if v & 1 == 0 { magnitude } else { !magnitude })
    }

    /// Length-prefixed bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.push_len(bytes.len())?;
        self.push(bytes);
        Ok(())
    }

    pub fn get_bytes_prefixed(&mut self) -> Result<&[u8]> {
        let len = self.get_len()?;
        self.get_bytes(len)
    }

    pub fn push_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| AbiError::OutOfRange("varuint32"))?;
        self.push_varuint32(len);
        Ok(())
    }

    pub fn get_len(&mut self) -> Result<usize> {
        let len = self.get_varuint32()?;
        usize::try_from(len).map_err(|_| AbiError::OutOfRange("varuint32"))
    }

    pub fn push_string(&mut self, s: &str) -> Result<()> {
        self.push_bytes(s.as_bytes())
    }

    pub fn get_string(&mut self) -> Result<String> {
        Ok(std::str::from_utf8(self.get_bytes_prefixed()?)?.to_string())
    }

    pub fn push_name(&mut self, name: Name) {
        self.push_u64(name.as_u64());
    }

    pub fn get_name(&mut self) -> Result<Name> {
        self.get_u64().map(Name::new)
    }

    pub fn push_symbol_code(&mut self, code: &SymbolCode) {
        self.push(&code.to_padded::<8>());
    }

    pub fn get_symbol_code(&mut self) -> Result<SymbolCode> {
        let bytes: [u8; 8] = self.get_array()?;
        Ok(SymbolCode::from_wire(until_nul(&bytes)?))
    }

    pub fn push_symbol(&mut self, symbol: &Symbol) {
        self.push_u8(symbol.precision);
        self.push(&symbol.code.to_padded::<7>());
    }

    pub fn get_symbol(&mut self) -> Result<Symbol> {
        let precision = self.get()?;
        let bytes: [u8; 7] = self.get_array()?;
        Ok(Symbol::new(precision, SymbolCode::from_wire(until_nul(&bytes)?)))
    }

    pub fn push_asset(&mut self, asset: &Asset) {
        self.push_i64(asset.amount);
        self.push_symbol(&asset.symbol);
    }

    /// Parses and appends `s`, taking the precision from its amount.
    pub fn push_asset_str(&mut self, s: &str) -> Result<()> {
        self.push_asset(&s.parse()?);
        Ok(())
    }

    /// Like [`Self::push_asset_str`] but rejects amounts whose precision or
    /// ticker differs from `symbol`.
    pub fn push_asset_with_symbol(&mut self, s: &str, symbol: &Symbol) -> Result<()> {
        self.push_asset(&Asset::parse_with_symbol(s, symbol)?);
        Ok(())
    }

    pub fn get_asset(&mut self) -> Result<Asset> {
        let amount = self.get_i64()?;
        let symbol = self.get_symbol()?;
        Ok(Asset::new(amount, symbol))
    }

    pub fn push_public_key(&mut self, key: &PublicKey) {
        self.push_u8(key.key_type.as_byte());
        self.push(&key.data);
    }

    /// `WA` keys carry a user-presence byte and a relying-party id after the
    /// point.
    pub fn get_public_key(&mut self) -> Result<PublicKey> {
        let key_type = KeyType::from_byte(self.get()?)?;
        let begin = self.read_pos;
        if key_type == KeyType::WA {
            self.skip(PUBLIC_KEY_SIZE + 1)?;
            let rpid_len = self.get_len()?;
            self.skip(rpid_len)?;
        } else {
            self.skip(PUBLIC_KEY_SIZE)?;
        }
        Ok(PublicKey::new(key_type, self.data[begin..self.read_pos].to_vec())?)
    }

    pub fn push_private_key(&mut self, key: &PrivateKey) {
        self.push_u8(key.key_type.as_byte());
        self.push(&key.data);
    }

    pub fn get_private_key(&mut self) -> Result<PrivateKey> {
        let key_type = KeyType::from_byte(self.get()?)?;
        let data = self.get_bytes(PRIVATE_KEY_SIZE)?.to_vec();
        Ok(PrivateKey::new(key_type, data)?)
    }

    pub fn push_signature(&mut self, signature: &Signature) {
        self.push_u8(signature.key_type.as_byte());
        self.push(&signature.data);
    }

    /// `WA` signatures carry authenticator data and client data JSON after
    /// the compact signature.
    pub fn get_signature(&mut self) -> Result<Signature> {
        let key_type = KeyType::from_byte(self.get()?)?;
        let begin = self.read_pos;
        self.skip(SIGNATURE_SIZE)?;
        if key_type == KeyType::WA {
            for _ in 0..2 {
                let len = self.get_len()?;
                self.skip(len)?;
            }
        }
        Ok(Signature::new(key_type, self.data[begin..self.read_pos].to_vec())?)
    }
}

fn until_nul(bytes: &[u8]) -> Result<String> {
    let len = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    Ok(std::str::from_utf8(&bytes[..len])?.to_string())
}

impl From<Vec<u8>> for SerialBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}

impl AsRef<[u8]> for SerialBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, &hex!("00"))]
    #[case(127, &hex!("7f"))]
    #[case(128, &hex!("8001"))]
    #[case(300, &hex!("ac02"))]
    #[case(u32::MAX, &hex!("ffffffff0f"))]
    fn varuint32(#[case] v: u32, #[case] encoded: &[u8]) {
        let mut buffer = SerialBuffer::new();
        buffer.push_varuint32(v);
        assert_eq!(buffer.as_slice(), encoded);
        assert_eq!(buffer.get_varuint32().unwrap(), v);
        assert!(!buffer.have_read_data());
    }

    #[rstest]
    #[case(&hex!("ffffffff1f"))]
    #[case(&hex!("ffffffffff01"))]
    #[case(&hex!("8080808080808000"))]
    fn varuint32_overflow(#[case] encoded: &[u8]) {
        let mut buffer = SerialBuffer::from_bytes(encoded);
        assert!(matches!(buffer.get_varuint32(), Err(AbiError::VarintOverflow)));
    }

    #[test]
    fn varuint32_truncated() {
        let mut buffer = SerialBuffer::from_bytes(hex!("8080"));
        assert!(matches!(buffer.get_varuint32(), Err(AbiError::BufferUnderrun)));
    }

    #[rstest]
    #[case(0, &hex!("00"))]
    #[case(-1, &hex!("01"))]
    #[case(1, &hex!("02"))]
    #[case(-64, &hex!("7f"))]
    #[case(64, &hex!("8001"))]
    #[case(i32::MAX, &hex!("feffffff0f"))]
    #[case(i32::MIN, &hex!("ffffffff0f"))]
    fn varint32(#[case] v: i32, #[case] encoded: &[u8]) {
        let mut buffer = SerialBuffer::new();
        buffer.push_varint32(v);
        assert_eq!(buffer.as_slice(), encoded);
        assert_eq!(buffer.get_varint32().unwrap(), v);
    }

    #[test]
    fn fixed_width_little_endian() {
        let mut buffer = SerialBuffer::new();
        buffer.push_u16(0x0102);
        buffer.push_i32(-2);
        buffer.push_u64(0x0102_0304_0506_0708);
        buffer.push_f64(1.5);
        assert_eq!(
            buffer.as_slice(),
            hex!("0201 feffffff 0807060504030201 000000000000f83f")
        );
        assert_eq!(buffer.get_u16().unwrap(), 0x0102);
        assert_eq!(buffer.get_i32().unwrap(), -2);
        assert_eq!(buffer.get_u64().unwrap(), 0x0102_0304_0506_0708);
        assert!((buffer.get_f64().unwrap() - 1.5).abs() < f64::EPSILON);
        assert!(matches!(buffer.get(), Err(AbiError::BufferUnderrun)));
    }

    #[test]
    fn underrun_keeps_position() {
        let mut buffer = SerialBuffer::from_bytes(hex!("010203"));
        assert_eq!(buffer.get().unwrap(), 1);
        assert!(matches!(buffer.get_bytes(3), Err(AbiError::BufferUnderrun)));
        assert_eq!(buffer.read_pos(), 1);
        assert_eq!(buffer.get_bytes(2).unwrap(), [2, 3]);
        buffer.restart_read();
        assert_eq!(buffer.get_array::<3>().unwrap(), [1, 2, 3]);
    }

    #[test]
    fn reserve_grows_geometrically() {
        let mut buffer = SerialBuffer::new();
        buffer.push(&[0; 100]);
        let capacity = buffer.data.capacity();
        buffer.reserve(capacity - buffer.len() + 1);
        assert!(buffer.data.capacity() >= capacity + capacity / 2);
    }

    #[test]
    fn strings() {
        let mut buffer = SerialBuffer::new();
        buffer.push_string("héllo").unwrap();
        assert_eq!(buffer.as_slice(), hex!("0668c3a96c6c6f"));
        assert_eq!(buffer.get_string().unwrap(), "héllo");

        let mut buffer = SerialBuffer::from_bytes(hex!("02ff fe"));
        assert!(matches!(buffer.get_string(), Err(AbiError::Utf8(_))));
    }

    #[test]
    fn name() {
        let mut buffer = SerialBuffer::new();
        buffer.push_name("eosio".parse().unwrap());
        assert_eq!(buffer.as_slice(), hex!("0000000000ea3055"));
        assert_eq!(buffer.get_name().unwrap().to_string(), "eosio");
    }

    #[rstest]
    #[case("1.0000 SYS", &hex!("10270000000000000453595300000000"))]
    #[case("-123.45 EOS", &hex!("c7cfffffffffffff02454f5300000000"))]
    #[case("0 ABCDEFG", &hex!("00000000000000000041424344454647"))]
    fn asset(#[case] s: &str, #[case] encoded: &[u8]) {
        let mut buffer = SerialBuffer::new();
        buffer.push_asset_str(s).unwrap();
        assert_eq!(buffer.as_slice(), encoded);
        assert_eq!(buffer.get_asset().unwrap().to_string(), s);
    }

    #[test]
    fn asset_with_symbol() {
        let symbol = "4,SYS".parse().unwrap();
        let mut buffer = SerialBuffer::new();
        buffer.push_asset_with_symbol("1.0000 SYS", &symbol).unwrap();
        assert!(buffer.push_asset_with_symbol("1.00000 SYS", &symbol).is_err());
        assert_eq!(buffer.len(), 16);
    }

    #[test]
    fn symbols() {
        let mut buffer = SerialBuffer::new();
        buffer.push_symbol(&"4,SYS".parse().unwrap());
        buffer.push_symbol_code(&"SYS".parse().unwrap());
        assert_eq!(buffer.as_slice(), hex!("0453595300000000 5359530000000000"));
        assert_eq!(buffer.get_symbol().unwrap().to_string(), "4,SYS");
        assert_eq!(buffer.get_symbol_code().unwrap().as_str(), "SYS");
    }

    #[test]
    fn keys() {
        let key: PublicKey = "PUB_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BoDq63"
            .parse()
            .unwrap();
        let mut buffer = SerialBuffer::new();
        buffer.push_public_key(&key);
        assert_eq!(buffer.len(), 1 + PUBLIC_KEY_SIZE);
        assert_eq!(buffer.as_slice()[0], 0);
        assert_eq!(buffer.get_public_key().unwrap(), key);
    }

    #[test]
    fn webauthn_public_key_extent() {
        // type, 33-byte point, presence byte, rpid "ab"
        let mut data = vec![2];
        data.extend([3; PUBLIC_KEY_SIZE]);
        data.extend([1, 2, b'a', b'b', 0xff]);
        let mut buffer = SerialBuffer::from_bytes(data);
        let key = buffer.get_public_key().unwrap();
        assert_eq!(key.key_type, KeyType::WA);
        assert_eq!(key.data.len(), PUBLIC_KEY_SIZE + 1 + 1 + 2);
        assert_eq!(buffer.get().unwrap(), 0xff);
    }

    #[test]
    fn webauthn_signature_extent() {
        let mut data = vec![2];
        data.extend([0x20; SIGNATURE_SIZE]);
        data.extend([1, 0xaa, 2, b'{', b'}']);
        let mut buffer = SerialBuffer::from_bytes(data);
        let signature = buffer.get_signature().unwrap();
        assert_eq!(signature.key_type, KeyType::WA);
        assert_eq!(signature.data.len(), SIGNATURE_SIZE + 5);
        assert!(!buffer.have_read_data());
    }

    #[test]
    fn unknown_key_type() {
        let mut buffer = SerialBuffer::from_bytes([9; 40]);
        assert!(matches!(buffer.get_public_key(), Err(AbiError::Key(_))));
    }
}
