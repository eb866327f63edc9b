use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::{constants::ADDRESS_LENGTH, error::Error, helpers::identifiers::normalize_address};

/// A Flow account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FlowAddress([u8; ADDRESS_LENGTH]);

impl FlowAddress {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds an address from a byte slice, left-padding short inputs the way
    /// the node does. Returns `None` when the slice is wider than an address.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > ADDRESS_LENGTH {
            return None;
        }
        let mut out = [0u8; ADDRESS_LENGTH];
        out[ADDRESS_LENGTH - bytes.len()..].copy_from_slice(bytes);
        Some(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Lowercase hex without prefix, the form used in internal records and
    /// script imports.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `0x`-prefixed form exposed across the API boundary.
    pub fn to_prefixed(&self) -> String {
        format!("0x{}", self.hex())
    }
}

impl fmt::Display for FlowAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.hex())
    }
}

impl FromStr for FlowAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_address(s)
    }
}

/// Explorer records carry addresses as bare lowercase hex, the same form as
/// [`crate::types::FtHolding::contract_address`]. Decoded Cadence values keep
/// the `0x` prefix.
impl Serialize for FlowAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}
