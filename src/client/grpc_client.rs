use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tonic::{Code, Status, transport::Endpoint};
use tracing::info;

use super::{
    LedgerAccount, LedgerClient,
    proto::{AccessApiClient, ExecuteScriptAtLatestBlockRequest, GetAccountAtLatestBlockRequest},
};
use crate::{
    constants::{MAX_GRPC_MESSAGE_SIZE, PublicAccessNodeUrl},
    error::{self, Error},
    types::FlowAddress,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AccessGrpcClient {
    pub client: AccessApiClient,
    pub grpc_url: String,
}

impl AccessGrpcClient {
    pub async fn new(grpc_url: String) -> Result<Self> {
        let endpoint = Endpoint::from_shared(grpc_url.clone())
            .with_context(|| format!("Invalid access node url {grpc_url}"))?
            .connect_timeout(CONNECT_TIMEOUT);

        let client = AccessApiClient::connect(endpoint)
            .await
            .with_context(|| format!("Failed to connect to access node {grpc_url}"))?
            .max_decoding_message_size(MAX_GRPC_MESSAGE_SIZE);

        info!(url = %grpc_url, "connected to flow access node");

        Ok(Self { client, grpc_url })
    }

    pub async fn new_mainnet() -> Result<Self> {
        Self::new(PublicAccessNodeUrl::Mainnet.url().to_string()).await
    }

    pub async fn new_testnet() -> Result<Self> {
        Self::new(PublicAccessNodeUrl::Testnet.url().to_string()).await
    }

    /// Connects to the node named by `FLOW_ACCESS_NODE`, or the public node
    /// of `FLOW_NETWORK` when unset.
    pub async fn new_from_env() -> Result<Self> {
        let config = crate::config::Config::from_env()?;
        Self::new(config.access_node_url).await
    }
}

fn status_to_error(status: Status) -> Error {
    match status.code() {
        Code::NotFound => Error::NotFound(status.message().to_string()),
        Code::InvalidArgument => Error::InvalidInput(status.message().to_string()),
        code => Error::ExecutionFailed(format!("{code:?}: {}", status.message())),
    }
}

#[async_trait]
impl LedgerClient for AccessGrpcClient {
    async fn execute_script_at_latest_block(
        &self,
        script: &[u8],
        arguments: Vec<Vec<u8>>,
    ) -> error::Result<Vec<u8>> {
        let request = ExecuteScriptAtLatestBlockRequest {
            script: script.to_vec(),
            arguments,
        };

        // Channels are multiplexed; a clone per call is cheap.
        let mut client = self.client.clone();
        let response = client
            .execute_script_at_latest_block(request)
            .await
            .map_err(|status| match status_to_error(status) {
                // Cadence runtime errors arrive as InvalidArgument
                Error::InvalidInput(msg) | Error::NotFound(msg) => Error::ExecutionFailed(msg),
                other => other,
            })?
            .into_inner();

        Ok(response.value)
    }

    async fn get_account_at_latest_block(
        &self,
        address: FlowAddress,
    ) -> error::Result<LedgerAccount> {
        let request = GetAccountAtLatestBlockRequest {
            address: address.as_bytes().to_vec(),
        };

        let mut client = self.client.clone();
        let response = client
            .get_account_at_latest_block(request)
            .await
            .map_err(status_to_error)?
            .into_inner();

        let account = response
            .account
            .ok_or_else(|| Error::NotFound(format!("account {address}")))?;

        Ok(LedgerAccount {
            address: FlowAddress::from_slice(&account.address).unwrap_or(address),
            contracts: account.contracts.into_iter().collect(),
        })
    }
}
