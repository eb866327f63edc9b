use crate::{
    constants::{ADDRESS_HEX_LENGTH, ADDRESS_LENGTH},
    error::{Error, Result},
    types::FlowAddress,
};

/// Cadence identifier grammar: a letter or underscore followed by letters,
/// digits or underscores.
pub fn is_valid_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Reduces a caller-supplied path to its identifier.
///
/// `"foo"`, `"storage/foo"` and `"/storage/foo"` all yield `"foo"`; the
/// namespace prefix is discarded without being interpreted.
pub fn normalize_path_identifier(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let identifier = raw.rsplit('/').next().unwrap_or_default();

    if identifier.is_empty() {
        return Err(Error::invalid_input(format!(
            "empty path identifier in '{raw}'"
        )));
    }
    if !is_valid_identifier(identifier) {
        return Err(Error::invalid_input(format!(
            "'{identifier}' is not a valid path identifier"
        )));
    }
    Ok(identifier.to_string())
}

/// Parses an account address into its canonical 8-byte form. Accepts an
/// optional `0x` prefix and short forms such as `0x1`.
pub fn normalize_address(raw: &str) -> Result<FlowAddress> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || digits.len() > ADDRESS_HEX_LENGTH {
        return Err(Error::invalid_input(format!(
            "address '{raw}' must have 1 to {ADDRESS_HEX_LENGTH} hex digits"
        )));
    }

    let padded = format!("{:0>width$}", digits.to_ascii_lowercase(), width = ADDRESS_HEX_LENGTH);
    let mut bytes = [0u8; ADDRESS_LENGTH];
    hex::decode_to_slice(&padded, &mut bytes)
        .map_err(|e| Error::invalid_input(format!("address '{raw}' is not hex: {e}")))?;
    Ok(FlowAddress::from_bytes(bytes))
}

/// Only the public domain can be enumerated from outside the account.
pub fn ensure_public_domain(raw: &str) -> Result<()> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "public" => Ok(()),
        other => Err(Error::invalid_input(format!(
            "invalid domain '{other}' (expected public)"
        ))),
    }
}
