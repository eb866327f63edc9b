//! Runs a [`QuerySpec`] against the ledger under a deadline and parses the
//! JSON-Cadence result.

use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::{
    basic_elements::value::RawValue,
    client::{LedgerAccount, LedgerClient},
    error::{Error, Result},
    scripts::QuerySpec,
    types::FlowAddress,
};

// Stand-in deadline when `now + timeout` does not fit in an Instant
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

#[derive(Debug, Clone)]
pub struct ScriptExecutor<C> {
    client: C,
}

impl<C: LedgerClient> ScriptExecutor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn execute(&self, spec: &QuerySpec, timeout: Duration) -> Result<RawValue> {
        self.execute_within(spec, timeout, None).await
    }

    /// Like [`Self::execute`], but a caller deadline earlier than `now +
    /// timeout` wins.
    pub async fn execute_within(
        &self,
        spec: &QuerySpec,
        timeout: Duration,
        caller_deadline: Option<Instant>,
    ) -> Result<RawValue> {
        let own = deadline_after(timeout);
        let deadline = caller_deadline.map_or(own, |caller| caller.min(own));
        self.execute_until(spec, deadline).await
    }

    /// The RPC future is dropped once `deadline` passes.
    pub async fn execute_until(&self, spec: &QuerySpec, deadline: Instant) -> Result<RawValue> {
        let arguments = spec.args.serialize()?;
        let started = Instant::now();

        debug!(
            script = spec.name,
            args = arguments.len(),
            timeout_ms = deadline.saturating_duration_since(started).as_millis() as u64,
            "executing script at latest block"
        );

        let call = self
            .client
            .execute_script_at_latest_block(spec.source.as_bytes(), arguments);

        let bytes = match timeout_at(deadline, call).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                warn!(script = spec.name, error = %e, "script execution failed");
                return Err(e);
            }
            Err(_) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                warn!(script = spec.name, elapsed_ms, "script execution timed out");
                return Err(Error::execution(format!(
                    "script {} timed out after {elapsed_ms}ms",
                    spec.name
                )));
            }
        };

        debug!(
            script = spec.name,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "script returned"
        );

        RawValue::from_json_cdc_bytes(&bytes)
    }

    pub async fn fetch_account(
        &self,
        address: FlowAddress,
        timeout: Duration,
    ) -> Result<LedgerAccount> {
        debug!(address = %address, "fetching account");

        let call = self.client.get_account_at_latest_block(address);
        match timeout_at(deadline_after(timeout), call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(address = %address, "account fetch timed out");
                Err(Error::execution(format!(
                    "account {address} fetch timed out after {}ms",
                    timeout.as_millis()
                )))
            }
        }
    }
}
