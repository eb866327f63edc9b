pub mod grpc_client;
pub mod proto;
#[cfg(test)]
pub mod test_utils;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{error::Result, types::FlowAddress};

/// Account state as returned by the access node. Only deployed contracts are
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerAccount {
    pub address: FlowAddress,
    /// Contract name to UTF-8 source bytes.
    pub contracts: BTreeMap<String, Vec<u8>>,
}

/// Read access to the ledger at the latest sealed block.
///
/// Implementations map transport failures to [`crate::Error::ExecutionFailed`]
/// and a missing account to [`crate::Error::NotFound`].
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Runs a read-only script and returns its JSON-Cadence encoded result.
    async fn execute_script_at_latest_block(
        &self,
        script: &[u8],
        arguments: Vec<Vec<u8>>,
    ) -> Result<Vec<u8>>;

    async fn get_account_at_latest_block(&self, address: FlowAddress) -> Result<LedgerAccount>;
}
