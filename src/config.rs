use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::{
    constants::{
        ACCOUNT_FETCH_TIMEOUT, FT_HOLDINGS_TIMEOUT, MAX_SCRIPT_TIMEOUT, STORAGE_SCRIPT_TIMEOUT,
    },
    network::NetworkAddresses,
    types::Network,
};

pub const NETWORK_KEY: &str = "FLOW_NETWORK";
pub const ACCESS_NODE_KEY: &str = "FLOW_ACCESS_NODE";
pub const SCRIPT_TIMEOUT_KEY: &str = "FLOW_SCRIPT_TIMEOUT_SECS";

/// Per-operation deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub storage: Duration,
    pub ft_holdings: Duration,
    pub account: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            storage: STORAGE_SCRIPT_TIMEOUT,
            ft_holdings: FT_HOLDINGS_TIMEOUT,
            account: ACCOUNT_FETCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub network: Network,
    pub access_node_url: String,
    pub addresses: NetworkAddresses,
    pub timeouts: Timeouts,
}

impl Config {
    /// Reads `.env` when present, then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let network = non_empty(NETWORK_KEY)
            .map(|name| Network::from_name(&name))
            .unwrap_or_default();

        let access_node_url = non_empty(ACCESS_NODE_KEY)
            .map(|url| url.trim().to_string())
            .unwrap_or_else(|| network.access_node_url().to_string());

        let mut timeouts = Timeouts::default();
        if let Some(raw) = non_empty(SCRIPT_TIMEOUT_KEY) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{SCRIPT_TIMEOUT_KEY} must be whole seconds, got '{raw}'"))?;
            if secs == 0 || secs > MAX_SCRIPT_TIMEOUT.as_secs() {
                bail!(
                    "{SCRIPT_TIMEOUT_KEY} must be between 1 and {} seconds, got {secs}",
                    MAX_SCRIPT_TIMEOUT.as_secs()
                );
            }
            timeouts.storage = Duration::from_secs(secs);
        }

        Ok(Self {
            network,
            access_node_url,
            addresses: NetworkAddresses::from_lookup(network, &lookup),
            timeouts,
        })
    }
}
