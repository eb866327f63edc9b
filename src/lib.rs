//! Read-only Cadence script execution against Flow access nodes, with
//! JSON-Cadence result decoding into explorer records.

pub mod basic_elements;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod inspector;
pub mod network;
pub mod scripts;
pub mod types;

pub use basic_elements::value::{FixedPoint, RawValue, TypeDescriptor};
pub use client::{LedgerAccount, LedgerClient, grpc_client::AccessGrpcClient};
pub use config::{Config, Timeouts};
pub use error::{Error, Result};
pub use executor::ScriptExecutor;
pub use inspector::AccountInspector;
pub use network::{ContractRole, NetworkAddresses};
pub use scripts::{QuerySpec, ScriptBuilder};
pub use types::{ContractCode, FlowAddress, FtHolding, Network, StorageItem, StorageOverview};
