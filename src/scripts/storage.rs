use super::{QuerySpec, ScriptBuilder};
use crate::{basic_elements::args::Args, network::ContractRole, types::FlowAddress};

const STORAGE_OVERVIEW_SCRIPT: &str = r#"
access(all) struct StorageOverview {
    access(all) let used: UInt64
    access(all) let capacity: UInt64
    access(all) let storagePaths: [StoragePath]
    access(all) let publicPaths: [PublicPath]
    access(all) let types: {String: Type}

    init(
        used: UInt64,
        capacity: UInt64,
        storagePaths: [StoragePath],
        publicPaths: [PublicPath],
        types: {String: Type}
    ) {
        self.used = used
        self.capacity = capacity
        self.storagePaths = storagePaths
        self.publicPaths = publicPaths
        self.types = types
    }
}

access(all) fun main(address: Address): StorageOverview {
    let account = getAuthAccount<auth(Storage) &Account>(address)
    let storagePaths = account.storage.storagePaths

    let types: {String: Type} = {}
    for path in storagePaths {
        if let type = account.storage.type(at: path) {
            types[path.toString()] = type
        }
    }

    return StorageOverview(
        used: account.storage.used,
        capacity: account.storage.capacity,
        storagePaths: storagePaths,
        publicPaths: account.storage.publicPaths,
        types: types
    )
}
"#;

const PUBLIC_PATHS_SCRIPT: &str = r#"
access(all) fun main(address: Address): [PublicPath] {
    return getAccount(address).storage.publicPaths
}
"#;

const STORAGE_ITEM_SCRIPT: &str = r#"
access(all) struct StorageItem {
    access(all) let type: Type?
    access(all) let value: AnyStruct?

    init(type: Type?, value: AnyStruct?) {
        self.type = type
        self.value = value
    }
}

access(all) fun main(address: Address, identifier: String): StorageItem {
    let account = getAuthAccount<auth(Storage) &Account>(address)
    let path = StoragePath(identifier: identifier) ?? panic("invalid storage path identifier")

    let type = account.storage.type(at: path)
    if type == nil {
        return StorageItem(type: nil, value: nil)
    }
    if type!.isSubtype(of: Type<@AnyResource>()) {
        return StorageItem(type: type, value: account.storage.borrow<&AnyResource>(from: path))
    }
    return StorageItem(type: type, value: account.storage.copy<AnyStruct>(from: path))
}
"#;

// `{non_fungible_token}` is replaced with the resolved standard address
const STORAGE_NFT_TEMPLATE: &str = r#"
import NonFungibleToken from 0x{non_fungible_token}

access(all) struct StorageItem {
    access(all) let type: Type?
    access(all) let value: AnyStruct?

    init(type: Type?, value: AnyStruct?) {
        self.type = type
        self.value = value
    }
}

access(all) fun main(address: Address, identifier: String, uuid: UInt64): StorageItem {
    let account = getAuthAccount<auth(BorrowValue) &Account>(address)
    let path = StoragePath(identifier: identifier) ?? panic("invalid storage path identifier")

    let collection = account.storage.borrow<&{NonFungibleToken.Collection}>(from: path)
    if collection == nil {
        return StorageItem(type: nil, value: nil)
    }

    if let nft = collection!.borrowNFT(uuid) {
        if nft.uuid == uuid {
            return StorageItem(type: nft.getType(), value: nft)
        }
    }
    for id in collection!.getIDs() {
        if let nft = collection!.borrowNFT(id) {
            if nft.uuid == uuid {
                return StorageItem(type: nft.getType(), value: nft)
            }
        }
    }
    return StorageItem(type: nil, value: nil)
}
"#;

impl ScriptBuilder {
    /// Used/capacity counters, all storage and public paths, and the type
    /// stored at each storage path.
    pub fn storage_overview(&self, address: FlowAddress) -> QuerySpec {
        let mut args = Args::new();
        args.add_address(address);
        QuerySpec::new("storage_overview", STORAGE_OVERVIEW_SCRIPT.to_string(), args)
    }

    pub fn public_paths(&self, address: FlowAddress) -> QuerySpec {
        let mut args = Args::new();
        args.add_address(address);
        QuerySpec::new("public_paths", PUBLIC_PATHS_SCRIPT.to_string(), args)
    }

    /// Type and value stored under `/storage/<identifier>`. The identifier
    /// must already be validated.
    pub fn storage_item(&self, address: FlowAddress, identifier: &str) -> QuerySpec {
        let mut args = Args::new();
        args.add_address(address).add_string(identifier);
        QuerySpec::new("storage_item", STORAGE_ITEM_SCRIPT.to_string(), args)
    }

    /// A single NFT, found by its resource uuid, inside the collection stored
    /// under `/storage/<identifier>`.
    pub fn storage_nft(&self, address: FlowAddress, identifier: &str, uuid: u64) -> QuerySpec {
        let source = STORAGE_NFT_TEMPLATE.replace(
            "{non_fungible_token}",
            &self.addresses().resolve(ContractRole::NonFungibleToken).hex(),
        );

        let mut args = Args::new();
        args.add_address(address).add_string(identifier).add_u64(uuid);
        QuerySpec::new("storage_nft", source, args)
    }
}
