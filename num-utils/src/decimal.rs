use crate::{NumericError, Result};

/// Maximum number of fractional digits accepted by the decimal helpers.
pub const MAX_PRECISION: u8 = 18;

/// Normalizes a decimal string: strips leading zeros of the whole part,
/// trailing zeros of the fraction and a dangling `.`.
///
/// Commas are tolerated between digits of the whole part and preserved.
pub fn decimal_string(value: &str) -> Result<String> {
    let invalid = || NumericError::InvalidNumber(value.to_string());

    let (negative, unsigned) = value
        .strip_prefix('-')
        .map_or((false, value), |v| (true, v));
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };
    let whole = if whole.is_empty() && fraction.is_some() {
        "0"
    } else {
        whole
    };

    if !is_whole_part(whole) {
        return Err(invalid());
    }
    let fraction = match fraction {
        Some(f) if f.bytes().all(|c| c.is_ascii_digit()) => f.trim_end_matches('0'),
        Some(_) => return Err(invalid()),
        None => "",
    };

    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };

    let mut out = String::with_capacity(value.len() + 1);
    if negative {
        out.push('-');
    }
    out.push_str(whole);
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    Ok(out)
}

/// Normalizes `value` and pads its fraction with zeros to exactly `precision` digits.
///
/// Fails when the number carries more fractional digits than `precision`.
/// `None` only normalizes.
pub fn decimal_pad(value: &str, precision: Option<u8>) -> Result<String> {
    let value = decimal_string(value)?;
    let Some(precision) = precision else {
        return Ok(value);
    };
    check_precision(precision)?;

    let (whole, fraction) = value.split_once('.').unwrap_or((value.as_str(), ""));
    let pad = usize::from(precision)
        .checked_sub(fraction.len())
        .ok_or_else(|| NumericError::PrecisionExceeded {
            value: value.clone(),
            precision,
        })?;

    if precision == 0 {
        return Ok(whole.to_string());
    }
    Ok(format!("{whole}.{fraction}{}", "0".repeat(pad)))
}

/// Pads to `precision` and removes the decimal point: `"1.5", 4` gives `"15000"`.
pub fn decimal_imply(value: &str, precision: u8) -> Result<String> {
    Ok(decimal_pad(value, Some(precision))?.replace('.', ""))
}

/// Inverse of [`decimal_imply`]: `"15000", 4` gives `"1.5000"`.
pub fn decimal_unimply(value: &str, precision: u8) -> Result<String> {
    let (negative, digits) = value
        .strip_prefix('-')
        .map_or((false, value), |v| (true, v));
    if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
        return Err(NumericError::InvalidNumber(value.to_string()));
    }
    check_precision(precision)?;

    let precision_len = usize::from(precision);
    let padded = format!("{digits:0>precision_len$}");
    let (whole, fraction) = padded.split_at(padded.len() - precision_len);
    let normalized = decimal_pad(&format!("{whole}.{fraction}"), Some(precision))?;

    Ok(if negative {
        format!("-{normalized}")
    } else {
        normalized
    })
}

const fn check_precision(precision: u8) -> Result<()> {
    if precision > MAX_PRECISION {
        return Err(NumericError::Precision(precision));
    }
    Ok(())
}

fn is_whole_part(s: &str) -> bool {
    let bytes = s.as_bytes();
    !bytes.is_empty()
        && bytes.first().is_some_and(u8::is_ascii_digit)
        && bytes.last().is_some_and(u8::is_ascii_digit)
        && bytes.iter().all(|c| c.is_ascii_digit() || *c == b',')
        && !s.contains(",,")
}
