//! Read-only Cadence queries.
//!
//! Builders only assemble source text and arguments; they never touch the
//! network. Contract imports are taken from the [`NetworkAddresses`] the
//! builder was created with, so the same builder can be pointed at any
//! network (or at a synthetic table in tests).

mod ft_holdings;
mod storage;

use std::sync::Arc;

use crate::{basic_elements::args::Args, network::NetworkAddresses};

/// A script ready for execution: source text plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Short label used in logs.
    pub name: &'static str,
    pub source: String,
    pub args: Args,
}

impl QuerySpec {
    pub fn new(name: &'static str, source: String, args: Args) -> Self {
        Self { name, source, args }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    addresses: Arc<NetworkAddresses>,
}

impl ScriptBuilder {
    pub fn new(addresses: Arc<NetworkAddresses>) -> Self {
        Self { addresses }
    }

    pub fn addresses(&self) -> &NetworkAddresses {
        &self.addresses
    }
}
