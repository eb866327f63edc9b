//! Well-known contract addresses per network.

use tracing::warn;

use crate::{helpers::identifiers::normalize_address, types::FlowAddress, types::Network};

/// Contracts the built-in scripts import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContractRole {
    FungibleToken,
    FungibleTokenMetadataViews,
    MetadataViews,
    NonFungibleToken,
    FlowEvmBridgeConfig,
}

impl ContractRole {
    pub const ALL: [ContractRole; 5] = [
        ContractRole::FungibleToken,
        ContractRole::FungibleTokenMetadataViews,
        ContractRole::MetadataViews,
        ContractRole::NonFungibleToken,
        ContractRole::FlowEvmBridgeConfig,
    ];

    /// Configuration key holding an override for this role.
    pub fn env_key(&self) -> &'static str {
        match self {
            ContractRole::FungibleToken => "FLOW_FUNGIBLE_TOKEN_ADDRESS",
            ContractRole::FungibleTokenMetadataViews => {
                "FLOW_FUNGIBLE_TOKEN_METADATA_VIEWS_ADDRESS"
            }
            ContractRole::MetadataViews => "FLOW_METADATA_VIEWS_ADDRESS",
            ContractRole::NonFungibleToken => "FLOW_NON_FUNGIBLE_TOKEN_ADDRESS",
            ContractRole::FlowEvmBridgeConfig => "FLOW_EVM_BRIDGE_CONFIG_ADDRESS",
        }
    }

    /// Role whose resolved address is used when this one is not configured.
    /// The view contracts are deployed alongside their token standard.
    fn inherits_from(&self) -> Option<ContractRole> {
        match self {
            ContractRole::FungibleTokenMetadataViews => Some(ContractRole::FungibleToken),
            ContractRole::MetadataViews => Some(ContractRole::NonFungibleToken),
            _ => None,
        }
    }

    fn default_hex(&self, network: Network) -> Option<&'static str> {
        let hex = match (network, self) {
            (Network::Mainnet, ContractRole::FungibleToken) => "f233dcee88fe0abe",
            (Network::Mainnet, ContractRole::NonFungibleToken) => "1d7e57aa55817448",
            (Network::Mainnet, ContractRole::FlowEvmBridgeConfig) => "1e4aa0b87d10b141",
            (Network::Testnet, ContractRole::FungibleToken) => "9a0766d93b6608b7",
            (Network::Testnet, ContractRole::NonFungibleToken) => "631e88ae7f1d7c20",
            (Network::Testnet, ContractRole::FlowEvmBridgeConfig) => "dfc20aee650fcbdf",
            _ => return None,
        };
        Some(hex)
    }
}

/// Immutable role → address table for one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAddresses {
    network: Network,
    fungible_token: FlowAddress,
    fungible_token_metadata_views: FlowAddress,
    metadata_views: FlowAddress,
    non_fungible_token: FlowAddress,
    flow_evm_bridge_config: FlowAddress,
}

fn parse_override(role: ContractRole, raw: Option<String>) -> Option<FlowAddress> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match normalize_address(trimmed) {
        Ok(addr) => Some(addr),
        Err(e) => {
            warn!(key = role.env_key(), error = %e, "ignoring malformed address override");
            None
        }
    }
}

impl NetworkAddresses {
    /// Built-in addresses of `network`, no overrides applied.
    pub fn defaults(network: Network) -> Self {
        Self::from_lookup(network, |_| None)
    }

    /// Builds the table from a key → value configuration lookup.
    pub fn from_lookup<F>(network: Network, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolved = Self {
            network,
            fungible_token: FlowAddress::default(),
            fungible_token_metadata_views: FlowAddress::default(),
            metadata_views: FlowAddress::default(),
            non_fungible_token: FlowAddress::default(),
            flow_evm_bridge_config: FlowAddress::default(),
        };

        // Base roles first so inheriting roles can read them
        let ordered = [
            ContractRole::FungibleToken,
            ContractRole::NonFungibleToken,
            ContractRole::FlowEvmBridgeConfig,
            ContractRole::FungibleTokenMetadataViews,
            ContractRole::MetadataViews,
        ];
        for role in ordered {
            let address = parse_override(role, lookup(role.env_key()))
                .or_else(|| role.inherits_from().map(|base| resolved.resolve(base)))
                .or_else(|| {
                    role.default_hex(network)
                        .and_then(|hex| normalize_address(hex).ok())
                })
                .unwrap_or_default();
            *resolved.slot_mut(role) = address;
        }
        resolved
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn resolve(&self, role: ContractRole) -> FlowAddress {
        match role {
            ContractRole::FungibleToken => self.fungible_token,
            ContractRole::FungibleTokenMetadataViews => self.fungible_token_metadata_views,
            ContractRole::MetadataViews => self.metadata_views,
            ContractRole::NonFungibleToken => self.non_fungible_token,
            ContractRole::FlowEvmBridgeConfig => self.flow_evm_bridge_config,
        }
    }

    fn slot_mut(&mut self, role: ContractRole) -> &mut FlowAddress {
        match role {
            ContractRole::FungibleToken => &mut self.fungible_token,
            ContractRole::FungibleTokenMetadataViews => &mut self.fungible_token_metadata_views,
            ContractRole::MetadataViews => &mut self.metadata_views,
            ContractRole::NonFungibleToken => &mut self.non_fungible_token,
            ContractRole::FlowEvmBridgeConfig => &mut self.flow_evm_bridge_config,
        }
    }
}

impl Default for NetworkAddresses {
    fn default() -> Self {
        Self::defaults(Network::Mainnet)
    }
}
