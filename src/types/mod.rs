pub mod address;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use address::FlowAddress;

use crate::{
    basic_elements::value::{RawValue, TypeDescriptor},
    constants::PublicAccessNodeUrl,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Anything other than `testnet` selects mainnet.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "testnet" => Network::Testnet,
            _ => Network::Mainnet,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    pub fn access_node_url(&self) -> &'static str {
        match self {
            Network::Mainnet => PublicAccessNodeUrl::Mainnet.url(),
            Network::Testnet => PublicAccessNodeUrl::Testnet.url(),
        }
    }
}

/// One fungible-token vault found in an account's storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FtHolding {
    pub name: String,
    pub symbol: String,
    // Exact decimal, e.g. "1643378795.34488819"
    pub balance: String,
    // Lowercase hex, no prefix
    pub contract_address: String,
    pub contract_name: String,
    pub storage_path: String,
    pub identifier: String,
    pub evm_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageOverview {
    pub used: u64,
    pub capacity: u64,
    pub available: u64,
    pub storage_paths: Vec<String>,
    pub public_paths: Vec<String>,
    pub types: BTreeMap<String, String>,
}

/// Content of a single storage path. Both `type` and `value` are absent when
/// nothing is stored there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageItem {
    pub path: String,
    #[serde(rename = "type")]
    pub type_: Option<TypeDescriptor>,
    pub value: Option<RawValue>,
}

impl StorageItem {
    pub fn is_empty(&self) -> bool {
        self.type_.is_none() && self.value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCode {
    // Serialized unprefixed, like every address in these records
    pub address: FlowAddress,
    pub name: String,
    pub byte_size: usize,
    pub code: String,
    pub fetched_at: DateTime<Utc>,
}
