use crate::error::{Error, Result};

fn ensure_digits(raw: &str, what: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(Error::decode(format!("empty {what}")));
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::decode(format!("{what} '{raw}' is not a digit string")));
    }
    Ok(())
}

fn strip_leading_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

/// Renders a fixed-point magnitude as an exact decimal string.
///
/// `raw` holds the integer digits of the magnitude and `scale` the number of
/// implicit fractional digits. All fractional digits are kept, so
/// `("1", 8)` renders as `"0.00000001"` and `("100000000", 8)` as
/// `"1.00000000"`.
pub fn format_fixed_point(raw: &str, scale: usize) -> Result<String> {
    ensure_digits(raw, "fixed-point magnitude")?;

    if scale == 0 {
        return Ok(strip_leading_zeros(raw).to_string());
    }

    // Left-pad so there is at least one integer digit
    let padded = if raw.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - raw.len()), raw)
    } else {
        raw.to_string()
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    Ok(format!("{}.{}", strip_leading_zeros(int_part), frac_part))
}

/// Parses a decimal literal (as the node prints fixed-point values) into its
/// sign and raw magnitude digits at the given scale.
///
/// Fractional digits beyond `scale` are rejected instead of truncated.
pub fn parse_fixed_point(decimal: &str, scale: usize) -> Result<(bool, String)> {
    let decimal = decimal.trim();
    let (negative, unsigned) = match decimal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, decimal),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    ensure_digits(int_part, "fixed-point integer part")?;
    if !frac_part.is_empty() {
        ensure_digits(frac_part, "fixed-point fractional part")?;
    }
    if frac_part.len() > scale {
        return Err(Error::decode(format!(
            "fixed-point literal '{decimal}' has more than {scale} fractional digits"
        )));
    }

    let mut raw = String::with_capacity(int_part.len() + scale);
    raw.push_str(int_part);
    raw.push_str(frac_part);
    raw.push_str(&"0".repeat(scale - frac_part.len()));

    let raw = strip_leading_zeros(&raw).to_string();
    // -0.0 is plain zero
    let negative = negative && raw != "0";
    Ok((negative, raw))
}

/// Parses an unsigned integer literal, keeping it as a digit string so
/// arbitrary-precision values (`UInt`, `UInt256`) survive unchanged.
pub fn parse_integer(literal: &str) -> Result<(bool, String)> {
    let literal = literal.trim();
    let (negative, digits) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal),
    };
    ensure_digits(digits, "integer literal")?;
    let digits = strip_leading_zeros(digits).to_string();
    let negative = negative && digits != "0";
    Ok((negative, digits))
}
