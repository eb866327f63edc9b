use super::{QuerySpec, ScriptBuilder};
use crate::{basic_elements::args::Args, network::ContractRole, types::FlowAddress};

// Placeholders are replaced with resolved contract addresses
const FT_HOLDINGS_TEMPLATE: &str = r#"
import FungibleToken from 0x{fungible_token}
import FungibleTokenMetadataViews from 0x{fungible_token_metadata_views}
import MetadataViews from 0x{metadata_views}
import FlowEVMBridgeConfig from 0x{flow_evm_bridge_config}

access(all) struct FTVaultInfo {
    access(all) let name: String?
    access(all) let symbol: String?
    access(all) let balance: UFix64
    access(all) let contractAddress: Address
    access(all) let contractName: String
    access(all) let storagePath: String
    access(all) let identifier: String
    access(all) let evmAddress: String?

    init(
        name: String?,
        symbol: String?,
        balance: UFix64,
        contractAddress: Address,
        contractName: String,
        storagePath: String,
        identifier: String,
        evmAddress: String?
    ) {
        self.name = name
        self.symbol = symbol
        self.balance = balance
        self.contractAddress = contractAddress
        self.contractName = contractName
        self.storagePath = storagePath
        self.identifier = identifier
        self.evmAddress = evmAddress
    }
}

access(all) fun linkedEVMAddress(_ type: Type): String? {
    if let evmAddress = FlowEVMBridgeConfig.getEVMAddressAssociated(with: type) {
        return "0x".concat(evmAddress.toString())
    }
    return nil
}

access(all) fun main(address: Address): [FTVaultInfo] {
    let account = getAuthAccount<auth(BorrowValue) &Account>(address)
    let vaultType = Type<@{FungibleToken.Vault}>()
    let displayType = Type<FungibleTokenMetadataViews.FTDisplay>()
    var holdings: [FTVaultInfo] = []

    account.storage.forEachStored(fun (path: StoragePath, type: Type): Bool {
        if type.isRecovered || !type.isSubtype(of: vaultType) {
            return true
        }
        let vault = account.storage.borrow<&{FungibleToken.Vault}>(from: path)
        if vault == nil {
            return true
        }

        let segments = type.identifier.split(separator: ".")
        if segments.length < 3 {
            return true
        }
        let contractAddress = Address.fromString("0x".concat(segments[1]))
        if contractAddress == nil {
            return true
        }
        let contractName = segments[2]

        let display = vault!.resolveView(displayType) as! FungibleTokenMetadataViews.FTDisplay?

        holdings.append(FTVaultInfo(
            name: display?.name ?? contractName,
            symbol: display?.symbol ?? contractName,
            balance: vault!.balance,
            contractAddress: contractAddress!,
            contractName: contractName,
            storagePath: path.toString(),
            identifier: type.identifier,
            evmAddress: linkedEVMAddress(type)
        ))
        return true
    })

    return holdings
}
"#;

impl ScriptBuilder {
    /// Every fungible-token vault stored in the account, with balance,
    /// display metadata and the bridged EVM address when one exists.
    pub fn ft_holdings(&self, address: FlowAddress) -> QuerySpec {
        let addresses = self.addresses();
        let source = FT_HOLDINGS_TEMPLATE
            .replace(
                "{fungible_token_metadata_views}",
                &addresses
                    .resolve(ContractRole::FungibleTokenMetadataViews)
                    .hex(),
            )
            .replace(
                "{fungible_token}",
                &addresses.resolve(ContractRole::FungibleToken).hex(),
            )
            .replace(
                "{metadata_views}",
                &addresses.resolve(ContractRole::MetadataViews).hex(),
            )
            .replace(
                "{flow_evm_bridge_config}",
                &addresses.resolve(ContractRole::FlowEvmBridgeConfig).hex(),
            );

        let mut args = Args::new();
        args.add_address(address);
        QuerySpec::new("ft_holdings", source, args)
    }
}
