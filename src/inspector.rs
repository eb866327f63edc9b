//! Account-level queries exposed to the explorer API.
//!
//! Every operation validates its input before any network I/O, so an
//! `InvalidInput` error never costs a round trip.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    basic_elements::decode::{decode, decode_array, decode_path_list, decode_storage_item},
    client::{LedgerClient, grpc_client::AccessGrpcClient},
    config::{Config, Timeouts},
    error::{Error, Result},
    executor::ScriptExecutor,
    helpers::identifiers::{
        ensure_public_domain, is_valid_identifier, normalize_address, normalize_path_identifier,
    },
    network::NetworkAddresses,
    scripts::ScriptBuilder,
    types::{ContractCode, FtHolding, StorageItem, StorageOverview},
};

#[derive(Debug, Clone)]
pub struct AccountInspector<C> {
    executor: ScriptExecutor<C>,
    scripts: ScriptBuilder,
    timeouts: Timeouts,
}

impl AccountInspector<AccessGrpcClient> {
    /// Connects to the configured access node.
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let client = AccessGrpcClient::new(config.access_node_url).await?;
        info!(network = config.network.name(), "account inspector ready");
        Ok(Self::new(client, Arc::new(config.addresses), config.timeouts))
    }
}

impl<C: LedgerClient> AccountInspector<C> {
    pub fn new(client: C, addresses: Arc<NetworkAddresses>, timeouts: Timeouts) -> Self {
        Self {
            executor: ScriptExecutor::new(client),
            scripts: ScriptBuilder::new(addresses),
            timeouts,
        }
    }

    pub fn executor(&self) -> &ScriptExecutor<C> {
        &self.executor
    }

    /// Source of a contract deployed to `address`.
    pub async fn get_contract_code(&self, address: &str, name: &str) -> Result<ContractCode> {
        let address = normalize_address(address)?;
        let name = name.trim();
        if !is_valid_identifier(name) {
            return Err(Error::invalid_input(format!(
                "'{name}' is not a valid contract name"
            )));
        }

        let account = self
            .executor
            .fetch_account(address, self.timeouts.account)
            .await?;
        let Some(bytes) = account.contracts.get(name) else {
            return Err(Error::NotFound(format!(
                "contract {name} is not deployed to {address}"
            )));
        };

        let code = String::from_utf8_lossy(bytes).into_owned();
        info!(address = %address, contract = name, bytes = bytes.len(), "fetched contract code");

        Ok(ContractCode {
            address,
            name: name.to_string(),
            byte_size: bytes.len(),
            code,
            fetched_at: Utc::now(),
        })
    }

    pub async fn get_storage_overview(&self, address: &str) -> Result<StorageOverview> {
        let address = normalize_address(address)?;
        let value = self
            .executor
            .execute(&self.scripts.storage_overview(address), self.timeouts.storage)
            .await?;
        decode(&value)
    }

    /// Public paths of the account. `domain` must be `public`.
    pub async fn get_public_paths(&self, address: &str, domain: &str) -> Result<Vec<String>> {
        ensure_public_domain(domain)?;
        let address = normalize_address(address)?;
        let value = self
            .executor
            .execute(&self.scripts.public_paths(address), self.timeouts.storage)
            .await?;
        decode_path_list(&value)
    }

    /// Content stored at `raw_path`, which may be a bare identifier or carry
    /// a `storage/` prefix. An empty item means nothing is stored there.
    pub async fn get_storage_item(&self, address: &str, raw_path: &str) -> Result<StorageItem> {
        let address = normalize_address(address)?;
        let identifier = normalize_path_identifier(raw_path)?;
        let value = self
            .executor
            .execute(
                &self.scripts.storage_item(address, &identifier),
                self.timeouts.storage,
            )
            .await?;

        let item = decode_storage_item(format!("/storage/{identifier}"), &value)?;
        if item.is_empty() {
            debug!(address = %address, identifier = %identifier, "nothing stored at path");
        }
        Ok(item)
    }

    /// One NFT, by resource uuid, from the collection stored at `raw_path`.
    /// An empty item means the collection or the NFT does not exist.
    pub async fn get_storage_nft(
        &self,
        address: &str,
        raw_path: &str,
        uuid: u64,
    ) -> Result<StorageItem> {
        let address = normalize_address(address)?;
        let identifier = normalize_path_identifier(raw_path)?;
        let value = self
            .executor
            .execute(
                &self.scripts.storage_nft(address, &identifier, uuid),
                self.timeouts.storage,
            )
            .await?;
        decode_storage_item(format!("/storage/{identifier}"), &value)
    }

    pub async fn get_ft_holdings(&self, address: &str) -> Result<Vec<FtHolding>> {
        let address = normalize_address(address)?;
        let value = self
            .executor
            .execute(&self.scripts.ft_holdings(address), self.timeouts.ft_holdings)
            .await?;
        decode_array(&value)
    }

}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{Value, json};

    use super::*;
    use crate::{
        basic_elements::value::RawValue, client::test_utils::MockLedgerClient, types::Network,
    };

    const ACCOUNT: &str = "0x1654653399040a61";

    fn mock_inspector(client: MockLedgerClient) -> AccountInspector<MockLedgerClient> {
        AccountInspector::new(
            client,
            Arc::new(NetworkAddresses::defaults(Network::Mainnet)),
            Timeouts::default(),
        )
    }

    fn vault_info(identifier: &str, balance: &str, evm: Option<&str>) -> Value {
        let evm = match evm {
            Some(addr) => json!({"type": "Optional", "value": {"type": "String", "value": addr}}),
            None => json!({"type": "Optional", "value": null}),
        };
        let segments: Vec<&str> = identifier.split('.').collect();
        json!({"type": "Struct", "value": {"id": "s.0.FTVaultInfo", "fields": [
            {"name": "name", "value": {"type": "Optional", "value": {"type": "String", "value": segments[2]}}},
            {"name": "symbol", "value": {"type": "Optional", "value": null}},
            {"name": "balance", "value": {"type": "UFix64", "value": balance}},
            {"name": "contractAddress", "value": {"type": "Address", "value": format!("0x{}", segments[1])}},
            {"name": "contractName", "value": {"type": "String", "value": segments[2]}},
            {"name": "storagePath", "value": {"type": "String", "value": "/storage/vault"}},
            {"name": "identifier", "value": {"type": "String", "value": identifier}},
            {"name": "evmAddress", "value": evm}
        ]}})
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_the_node() {
        let inspector = mock_inspector(MockLedgerClient::new());

        assert!(matches!(
            inspector.get_storage_item(ACCOUNT, "9bad").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            inspector.get_public_paths(ACCOUNT, "private").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            inspector.get_ft_holdings("0xzz").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            inspector.get_contract_code(ACCOUNT, "Flow-Token").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            inspector.get_storage_nft(ACCOUNT, "storage/9bad", 42).await,
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(inspector.executor().client().calls(), 0);
    }

    #[tokio::test]
    async fn test_get_contract_code() {
        let address = normalize_address(ACCOUNT).unwrap();
        let source = "access(all) contract FlowToken {}";
        let inspector =
            mock_inspector(MockLedgerClient::new().with_account(address, &[("FlowToken", source)]));

        let contract = inspector.get_contract_code("1654653399040a61", "FlowToken").await.unwrap();
        assert_eq!(contract.address, address);
        assert_eq!(contract.code, source);
        assert_eq!(contract.byte_size, source.len());

        assert!(matches!(
            inspector.get_contract_code(ACCOUNT, "FiatToken").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            inspector.get_contract_code("0x02", "FlowToken").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_storage_item_absent() {
        let result = json!({"type": "Struct", "value": {"id": "s.0.StorageItem", "fields": [
            {"name": "type", "value": {"type": "Optional", "value": null}},
            {"name": "value", "value": {"type": "Optional", "value": null}}
        ]}});
        let client = MockLedgerClient::new().with_script_result("StorageItem", result);
        let inspector = mock_inspector(client);

        let item = inspector
            .get_storage_item(ACCOUNT, "storage/flowTokenVault")
            .await
            .unwrap();
        assert_eq!(item.path, "/storage/flowTokenVault");
        assert!(item.is_empty());
        assert_eq!(
            inspector.executor().client().last_arguments()[1],
            json!({"type": "String", "value": "flowTokenVault"})
        );
    }

    #[tokio::test]
    async fn test_get_storage_item_present() {
        let result = json!({"type": "Struct", "value": {"id": "s.0.StorageItem", "fields": [
            {"name": "type", "value": {"type": "Optional", "value": {"type": "Type", "value": {"staticType": "A.1654653399040a61.FlowToken.Vault"}}}},
            {"name": "value", "value": {"type": "Optional", "value": {"type": "UFix64", "value": "1.50000000"}}}
        ]}});
        let inspector = mock_inspector(MockLedgerClient::new().with_script_result("StorageItem", result));

        let item = inspector.get_storage_item(ACCOUNT, "flowTokenVault").await.unwrap();
        assert!(!item.is_empty());
        assert_eq!(
            item.type_.map(|t| t.id).as_deref(),
            Some("A.1654653399040a61.FlowToken.Vault")
        );
        assert_eq!(item.value.as_ref().map(|v| v.kind()), Some("UFix64"));
    }

    #[tokio::test]
    async fn test_get_public_paths() {
        let result = json!({"type": "Array", "value": [
            {"type": "Path", "value": {"domain": "public", "identifier": "flowTokenReceiver"}},
            {"type": "Path", "value": {"domain": "public", "identifier": "flowTokenBalance"}}
        ]});
        let inspector = mock_inspector(MockLedgerClient::new().with_script_result("publicPaths", result));

        let paths = inspector.get_public_paths(ACCOUNT, "public").await.unwrap();
        assert_eq!(
            paths,
            vec!["/public/flowTokenReceiver", "/public/flowTokenBalance"]
        );
    }

    #[tokio::test]
    async fn test_get_storage_overview() {
        let result = json!({"type": "Struct", "value": {"id": "s.0.StorageOverview", "fields": [
            {"name": "used", "value": {"type": "UInt64", "value": "1200"}},
            {"name": "capacity", "value": {"type": "UInt64", "value": "1000"}},
            {"name": "storagePaths", "value": {"type": "Array", "value": [
                {"type": "Path", "value": {"domain": "storage", "identifier": "flowTokenVault"}}
            ]}},
            {"name": "publicPaths", "value": {"type": "Array", "value": []}},
            {"name": "types", "value": {"type": "Dictionary", "value": [
                {"key": {"type": "String", "value": "/storage/flowTokenVault"},
                 "value": {"type": "Type", "value": {"staticType": "A.1654653399040a61.FlowToken.Vault"}}}
            ]}}
        ]}});
        let inspector =
            mock_inspector(MockLedgerClient::new().with_script_result("StorageOverview", result));

        let overview = inspector.get_storage_overview(ACCOUNT).await.unwrap();
        assert_eq!(overview.used, 1200);
        assert_eq!(overview.available, 0);
        assert_eq!(overview.storage_paths, vec!["/storage/flowTokenVault"]);
        assert_eq!(
            overview.types.get("/storage/flowTokenVault").map(String::as_str),
            Some("A.1654653399040a61.FlowToken.Vault")
        );
    }

    #[tokio::test]
    async fn test_get_ft_holdings_drops_malformed_element() {
        let result = json!({"type": "Array", "value": [
            vault_info("A.1654653399040a61.FlowToken.Vault", "1643378795.34488819", None),
            {"type": "Struct", "value": {"id": "s.0.FTVaultInfo", "fields": [
                {"name": "identifier", "value": {"type": "String", "value": "broken"}}
            ]}},
            vault_info("A.b19436aae4d94622.FiatToken.Vault", "0.00000001", Some("0xf1815bd50389c46847f0bda824ec8da914045d14"))
        ]});
        let inspector = mock_inspector(MockLedgerClient::new().with_script_result("FTVaultInfo", result));

        let holdings = inspector.get_ft_holdings(ACCOUNT).await.unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].balance, "1643378795.34488819");
        assert_eq!(holdings[0].contract_address, "1654653399040a61");
        assert_eq!(holdings[0].evm_address, None);
        assert_eq!(holdings[1].contract_name, "FiatToken");
        assert_eq!(
            holdings[1].evm_address.as_deref(),
            Some("0xf1815bd50389c46847f0bda824ec8da914045d14")
        );
    }

    #[tokio::test]
    async fn test_get_ft_holdings_survives_unparseable_element() {
        let mut bad_balance = vault_info("A.b19436aae4d94622.FiatToken.Vault", "1.0", None);
        bad_balance["value"]["fields"][2]["value"] = json!({"type": "UFix64", "value": "not-a-number"});
        let mut bad_address = vault_info("A.0ae53cb6e3f42a79.FlowToken.Vault", "1.0", None);
        bad_address["value"]["fields"][3]["value"] = json!({"type": "Address", "value": "0xnothex"});

        let result = json!({"type": "Array", "value": [
            vault_info("A.1654653399040a61.FlowToken.Vault", "1643378795.34488819", None),
            bad_balance,
            bad_address,
            vault_info("A.f1ab99c82dee3526.USDCFlow.Vault", "12.50000000", None)
        ]});
        let inspector = mock_inspector(MockLedgerClient::new().with_script_result("FTVaultInfo", result));

        let holdings = inspector.get_ft_holdings(ACCOUNT).await.unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].contract_name, "FlowToken");
        assert_eq!(holdings[1].contract_name, "USDCFlow");
        assert_eq!(holdings[1].balance, "12.50000000");
    }

    #[tokio::test]
    async fn test_get_ft_holdings_rejects_non_array() {
        let inspector = mock_inspector(
            MockLedgerClient::new().with_script_result("FTVaultInfo", json!({"type": "Void"})),
        );
        assert!(matches!(
            inspector.get_ft_holdings(ACCOUNT).await,
            Err(Error::DecodeFailed(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_ft_holdings_times_out() {
        let client = MockLedgerClient::new()
            .with_script_result("FTVaultInfo", json!({"type": "Array", "value": []}))
            .with_delay(Duration::from_secs(11));
        let inspector = mock_inspector(client);

        let err = inspector.get_ft_holdings(ACCOUNT).await.unwrap_err();
        assert!(matches!(err, Error::ExecutionFailed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_timeouts_apply() {
        let client = MockLedgerClient::new()
            .with_script_result("FTVaultInfo", json!({"type": "Array", "value": []}))
            .with_delay(Duration::from_secs(11));
        let timeouts = Timeouts {
            ft_holdings: Duration::from_secs(20),
            ..Timeouts::default()
        };
        let inspector = AccountInspector::new(
            client,
            Arc::new(NetworkAddresses::defaults(Network::Mainnet)),
            timeouts,
        );

        let holdings = inspector.get_ft_holdings(ACCOUNT).await.unwrap();
        assert!(holdings.is_empty());
    }

    #[tokio::test]
    async fn test_unbounded_storage_timeout_does_not_panic() {
        let result = json!({"type": "Array", "value": []});
        let timeouts = Timeouts {
            storage: Duration::MAX,
            ..Timeouts::default()
        };
        let inspector = AccountInspector::new(
            MockLedgerClient::new().with_script_result("publicPaths", result),
            Arc::new(NetworkAddresses::defaults(Network::Mainnet)),
            timeouts,
        );

        let paths = inspector.get_public_paths(ACCOUNT, "public").await.unwrap();
        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn test_get_storage_nft() {
        let result = json!({"type": "Struct", "value": {"id": "s.0.StorageItem", "fields": [
            {"name": "type", "value": {"type": "Optional", "value": {"type": "Type", "value": {"staticType": "A.0b2a3299cc857e29.TopShot.NFT"}}}},
            {"name": "value", "value": {"type": "Optional", "value": {"type": "Resource", "value": {"id": "A.0b2a3299cc857e29.TopShot.NFT", "fields": [
                {"name": "uuid", "value": {"type": "UInt64", "value": "42"}},
                {"name": "id", "value": {"type": "UInt64", "value": "7"}}
            ]}}}}
        ]}});
        let inspector = mock_inspector(MockLedgerClient::new().with_script_result("NonFungibleToken.Collection", result));

        let item = inspector
            .get_storage_nft(ACCOUNT, "/storage/MomentCollection", 42)
            .await
            .unwrap();
        assert_eq!(item.path, "/storage/MomentCollection");
        assert_eq!(
            item.type_.as_ref().map(|t| t.id.as_str()),
            Some("A.0b2a3299cc857e29.TopShot.NFT")
        );
        assert_eq!(
            item.value.as_ref().map(RawValue::to_json),
            Some(json!({"uuid": "42", "id": "7"}))
        );
        assert_eq!(
            inspector.executor().client().last_arguments(),
            vec![
                json!({"type": "Address", "value": ACCOUNT}),
                json!({"type": "String", "value": "MomentCollection"}),
                json!({"type": "UInt64", "value": "42"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_storage_nft_missing() {
        let result = json!({"type": "Struct", "value": {"id": "s.0.StorageItem", "fields": [
            {"name": "type", "value": {"type": "Optional", "value": null}},
            {"name": "value", "value": {"type": "Optional", "value": null}}
        ]}});
        let inspector = mock_inspector(MockLedgerClient::new().with_script_result("NonFungibleToken.Collection", result));

        let item = inspector.get_storage_nft(ACCOUNT, "MomentCollection", 1).await.unwrap();
        assert!(item.is_empty());
    }
}
