use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;

use super::{LedgerAccount, LedgerClient};
use crate::{
    error::{Error, Result},
    types::FlowAddress,
};

/// Canned outcome for scripts whose source contains a marker.
enum Reply {
    Value(Vec<u8>),
    Failure(String),
}

/// In-memory ledger that replays JSON-Cadence results.
#[derive(Default)]
pub struct MockLedgerClient {
    replies: Vec<(String, Reply)>,
    accounts: HashMap<FlowAddress, LedgerAccount>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_arguments: Mutex<Vec<Vec<u8>>>,
}

impl MockLedgerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts containing `marker` return `result`.
    pub fn with_script_result(mut self, marker: &str, result: Value) -> Self {
        self.replies
            .push((marker.to_string(), Reply::Value(result.to_string().into_bytes())));
        self
    }

    pub fn with_script_failure(mut self, marker: &str, message: &str) -> Self {
        self.replies
            .push((marker.to_string(), Reply::Failure(message.to_string())));
        self
    }

    pub fn with_account(mut self, address: FlowAddress, contracts: &[(&str, &str)]) -> Self {
        let account = LedgerAccount {
            address,
            contracts: contracts
                .iter()
                .map(|(name, code)| (name.to_string(), code.as_bytes().to_vec()))
                .collect(),
        };
        self.accounts.insert(address, account);
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Arguments of the most recent script, parsed back to JSON.
    pub fn last_arguments(&self) -> Vec<Value> {
        self.last_arguments
            .lock()
            .unwrap()
            .iter()
            .map(|arg| serde_json::from_slice(arg).unwrap())
            .collect()
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn execute_script_at_latest_block(
        &self,
        script: &[u8],
        arguments: Vec<Vec<u8>>,
    ) -> Result<Vec<u8>> {
        *self.last_arguments.lock().unwrap() = arguments;
        self.enter().await;

        let source = String::from_utf8_lossy(script);
        let reply = self
            .replies
            .iter()
            .find(|(marker, _)| source.contains(marker.as_str()))
            .map(|(_, reply)| reply);

        match reply {
            Some(Reply::Value(bytes)) => Ok(bytes.clone()),
            Some(Reply::Failure(message)) => Err(Error::execution(message.clone())),
            None => Err(Error::execution("no canned result for script")),
        }
    }

    async fn get_account_at_latest_block(&self, address: FlowAddress) -> Result<LedgerAccount> {
        self.enter().await;
        self.accounts
            .get(&address)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("account {address}")))
    }
}
