use std::{fmt, str::FromStr};

use antelope_num_utils::{MAX_PRECISION, signed_binary_to_decimal, signed_decimal_to_binary};

use crate::{AbiError, Name, Result};

pub const MAX_SYMBOL_CODE_LEN: usize = 7;

/// Ticker of 1 to 7 uppercase letters, e.g. `SYS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)]
pub struct SymbolCode(String);

impl SymbolCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Code as read from the wire, which is not re-validated.
    pub(crate) const fn from_wire(code: String) -> Self {
        Self(code)
    }

    /// Ticker bytes zero-padded to `N`.
    pub(crate) fn to_padded<const N: usize>(&self) -> [u8; N] {
        let mut bytes = [0; N];
        let len = self.0.len().min(N);
        bytes[..len].copy_from_slice(&self.0.as_bytes()[..len]);
        bytes
    }
}

impl FromStr for SymbolCode {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty()
            || s.len() > MAX_SYMBOL_CODE_LEN
            || !s.bytes().all(|c| c.is_ascii_uppercase())
        {
            return Err(AbiError::InvalidSymbolCode(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Precision and ticker, written as `4,SYS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)]
pub struct Symbol {
    pub precision: u8,
    pub code: SymbolCode,
}

impl Symbol {
    pub const fn new(precision: u8, code: SymbolCode) -> Self {
        Self { precision, code }
    }
}

impl FromStr for Symbol {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AbiError::InvalidSymbol(s.to_string());
        let (precision, code) = s.split_once(',').ok_or_else(invalid)?;
        if precision.is_empty() || !precision.bytes().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        Ok(Self {
            precision: precision.parse().map_err(|_| invalid())?,
            code: code.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

/// Signed amount in the smallest unit of its symbol, written as
/// `"-123.45 EOS"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    pub const fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    /// Parses `s` and checks it against `symbol`.
    ///
    /// Unlike [`FromStr`], the precision is not taken from the amount alone:
    /// `"1.00000 SYS"` is rejected for `4,SYS`.
    pub fn parse_with_symbol(s: &str, symbol: &Symbol) -> Result<Self> {
        let asset: Self = s.parse()?;
        if asset.symbol != *symbol {
            return Err(AbiError::AssetSymbolMismatch {
                asset: s.to_string(),
                expected: symbol.to_string(),
            });
        }
        Ok(asset)
    }
}

impl FromStr for Asset {
    type Err = AbiError;

    /// The precision is the number of fractional digits of the amount.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason| AbiError::InvalidAsset {
            asset: s.to_string(),
            reason,
        };
        let trimmed = s.trim();
        let (negative, rest) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));

        let whole_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if whole_len == 0 {
            return Err(invalid("must begin with a number"));
        }
        let (whole, rest) = rest.split_at(whole_len);
        let (fraction, rest) = match rest.strip_prefix('.') {
            Some(rest) => {
                let len = rest.bytes().take_while(u8::is_ascii_digit).count();
                rest.split_at(len)
            }
            None => ("", rest),
        };
        let precision =
            u8::try_from(fraction.len()).map_err(|_| invalid("precision is too large"))?;
        if precision > MAX_PRECISION {
            return Err(invalid("precision is too large"));
        }

        let code = rest
            .trim()
            .parse()
            .map_err(|_| invalid("symbol must be 1 to 7 uppercase letters"))?;

        let digits = format!("{}{whole}{fraction}", if negative { "-" } else { "" });
        let amount = i64::from_le_bytes(signed_decimal_to_binary::<8>(&digits)?);
        Ok(Self {
            amount,
            symbol: Symbol::new(precision, code),
        })
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = usize::from(self.symbol.precision);
        let digits = signed_binary_to_decimal(&self.amount.to_le_bytes(), precision + 1);
        if precision == 0 {
            return write!(f, "{digits} {}", self.symbol.code);
        }
        let (whole, fraction) = digits.split_at(digits.len() - precision);
        write!(f, "{whole}.{fraction} {}", self.symbol.code)
    }
}

/// An asset together with the contract that issued it, written as
/// `"1.0000 SYS@eosio.token"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)]
pub struct ExtendedAsset {
    pub quantity: Asset,
    pub contract: Name,
}

impl FromStr for ExtendedAsset {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        let (quantity, contract) = s.rsplit_once('@').ok_or_else(|| AbiError::InvalidAsset {
            asset: s.to_string(),
            reason: "missing '@contract'",
        })?;
        Ok(Self {
            quantity: quantity.parse()?,
            contract: contract.parse()?,
        })
    }
}

impl fmt::Display for ExtendedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.quantity, self.contract)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1.0000 SYS", 10000, 4, "SYS")]
    #[case("-123.45 EOS", -12345, 2, "EOS")]
    #[case("0.05 A", 5, 2, "A")]
    #[case("-0.05 A", -5, 2, "A")]
    #[case("42 ABCDEFG", 42, 0, "ABCDEFG")]
    #[case("9223372036854775807 MAX", i64::MAX, 0, "MAX")]
    fn parse_and_print(
        #[case] s: &str,
        #[case] amount: i64,
        #[case] precision: u8,
        #[case] code: &str,
    ) {
        let asset: Asset = s.parse().unwrap();
        assert_eq!(asset.amount, amount);
        assert_eq!(asset.symbol.precision, precision);
        assert_eq!(asset.symbol.code.as_str(), code);
        assert_eq!(asset.to_string(), s);
    }

    #[test]
    fn lenient_whitespace() {
        let asset: Asset = "  1.5   SYS ".parse().unwrap();
        assert_eq!(asset.to_string(), "1.5 SYS");
        let asset: Asset = "7SYS".parse().unwrap();
        assert_eq!(asset.to_string(), "7 SYS");
    }

    #[rstest]
    #[case("SYS")]
    #[case(".5 SYS")]
    #[case("1.0 sys")]
    #[case("1.0 ABCDEFGH")]
    #[case("1.0")]
    #[case("1.0 S-S")]
    #[case("9223372036854775808 SYS")]
    #[case("1.0000000000000000000 SYS")]
    fn rejects(#[case] s: &str) {
        assert!(s.parse::<Asset>().is_err(), "{s}");
    }

    #[test]
    fn precision_must_match_symbol() {
        let symbol: Symbol = "4,SYS".parse().unwrap();
        assert!(Asset::parse_with_symbol("1.0000 SYS", &symbol).is_ok());
        assert!(matches!(
            Asset::parse_with_symbol("1.00000 SYS", &symbol),
            Err(AbiError::AssetSymbolMismatch { .. })
        ));
        assert!(Asset::parse_with_symbol("1.0000 EOS", &symbol).is_err());
    }

    #[rstest]
    #[case("4,SYS", true)]
    #[case("0,A", true)]
    #[case("18,ABCDEFG", true)]
    #[case(",SYS", false)]
    #[case("4,", false)]
    #[case("4,sys", false)]
    #[case("-1,SYS", false)]
    #[case("256,SYS", false)]
    #[case("4 SYS", false)]
    fn symbols(#[case] s: &str, #[case] valid: bool) {
        let parsed = s.parse::<Symbol>();
        assert_eq!(parsed.is_ok(), valid, "{s}");
        if let Ok(symbol) = parsed {
            assert_eq!(symbol.to_string(), s);
        }
    }

    #[test]
    fn padded_code() {
        let code: SymbolCode = "SYS".parse().unwrap();
        assert_eq!(code.to_padded::<7>(), *b"SYS\0\0\0\0");
        assert_eq!(code.to_padded::<8>(), *b"SYS\0\0\0\0\0");
    }

    #[test]
    fn extended() {
        let asset: ExtendedAsset = "1.0000 SYS@eosio.token".parse().unwrap();
        assert_eq!(asset.quantity.amount, 10000);
        assert_eq!(asset.contract, "eosio.token".parse().unwrap());
        assert_eq!(asset.to_string(), "1.0000 SYS@eosio.token");
        assert!("1.0000 SYS".parse::<ExtendedAsset>().is_err());
    }

    #[test]
    fn serde_as_string() {
        let asset: Asset = "1.0000 SYS".parse().unwrap();
        assert_eq!(serde_json::to_value(&asset).unwrap(), "1.0000 SYS");
    }
}
