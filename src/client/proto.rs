//! Subset of the `flow.access.AccessAPI` protocol used by this crate.
//!
//! Message layouts follow `flow/access/access.proto` and
//! `flow/entities/account.proto`; fields this crate never reads are left out
//! and skipped by prost on decode.

use std::collections::HashMap;

use tonic::{
    codec::ProstCodec,
    codegen::http::uri::PathAndQuery,
    transport::{Channel, Endpoint},
};

const SERVICE: &str = "flow.access.AccessAPI";

#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteScriptAtLatestBlockRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub script: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub arguments: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteScriptResponse {
    /// JSON-Cadence encoded result.
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAccountAtLatestBlockRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AccountResponse {
    #[prost(message, optional, tag = "1")]
    pub account: Option<Account>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Account {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub balance: u64,
    #[prost(map = "string, bytes", tag = "5")]
    pub contracts: HashMap<String, Vec<u8>>,
}

/// Unary client for the access API, shaped like tonic-generated clients.
#[derive(Debug, Clone)]
pub struct AccessApiClient {
    inner: tonic::client::Grpc<Channel>,
}

impl AccessApiClient {
    pub async fn connect(endpoint: Endpoint) -> Result<Self, tonic::transport::Error> {
        let channel = endpoint.connect().await?;
        Ok(Self::new(channel))
    }

    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
        self.inner = self.inner.max_decoding_message_size(limit);
        self
    }

    async fn unary<Req, Resp>(
        &mut self,
        method: &'static str,
        request: tonic::Request<Req>,
    ) -> Result<tonic::Response<Resp>, tonic::Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner.ready().await.map_err(|e| {
            tonic::Status::unavailable(format!("access node was not ready: {e}"))
        })?;
        let path = PathAndQuery::try_from(format!("/{SERVICE}/{method}"))
            .map_err(|e| tonic::Status::internal(format!("invalid method path: {e}")))?;
        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        self.inner.unary(request, path, codec).await
    }

    pub async fn execute_script_at_latest_block(
        &mut self,
        request: ExecuteScriptAtLatestBlockRequest,
    ) -> Result<tonic::Response<ExecuteScriptResponse>, tonic::Status> {
        self.unary("ExecuteScriptAtLatestBlock", tonic::Request::new(request))
            .await
    }

    pub async fn get_account_at_latest_block(
        &mut self,
        request: GetAccountAtLatestBlockRequest,
    ) -> Result<tonic::Response<AccountResponse>, tonic::Status> {
        self.unary("GetAccountAtLatestBlock", tonic::Request::new(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn test_request_wire_layout() {
        let request = ExecuteScriptAtLatestBlockRequest {
            script: b"main".to_vec(),
            arguments: vec![b"{}".to_vec()],
        };
        let bytes = request.encode_to_vec();
        // field 1, length-delimited
        assert_eq!(bytes[0], 0x0a);
        assert_eq!(bytes[1], 4);
        assert_eq!(&bytes[2..6], b"main");
        // field 2, length-delimited
        assert_eq!(bytes[6], 0x12);

        let decoded = ExecuteScriptAtLatestBlockRequest::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_account_contracts_map() {
        let mut contracts = HashMap::new();
        contracts.insert("FlowToken".to_string(), b"access(all) contract FlowToken {}".to_vec());
        let response = AccountResponse {
            account: Some(Account {
                address: vec![0x16, 0x54, 0x65, 0x33, 0x99, 0x04, 0x0a, 0x61],
                balance: 1,
                contracts,
            }),
        };
        let decoded = AccountResponse::decode(response.encode_to_vec().as_slice()).unwrap();
        let account = decoded.account.unwrap();
        assert_eq!(account.contracts.len(), 1);
        assert!(account.contracts.contains_key("FlowToken"));
    }
}
