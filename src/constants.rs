use std::time::Duration;

// Storage-path and storage-item views
pub const STORAGE_SCRIPT_TIMEOUT: Duration = Duration::from_secs(15);
// FT vault enumeration
pub const FT_HOLDINGS_TIMEOUT: Duration = Duration::from_secs(10);
// Account lookup for contract source
pub const ACCOUNT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
// Upper bound accepted for a configured script timeout
pub const MAX_SCRIPT_TIMEOUT: Duration = Duration::from_secs(300);

// Fractional digits of UFix64 / Fix64
pub const FIX64_SCALE: usize = 8;
// Fractional digits of UFix128 / Fix128
pub const FIX128_SCALE: usize = 24;

// Flow addresses are 8 bytes wide
pub const ADDRESS_LENGTH: usize = 8;
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_LENGTH * 2;

// Access node messages can carry full contract sources
pub const MAX_GRPC_MESSAGE_SIZE: usize = 20 * 1024 * 1024;

pub enum PublicAccessNodeUrl {
    Mainnet,
    Testnet,
}

impl PublicAccessNodeUrl {
    pub fn url(&self) -> &'static str {
        match self {
            PublicAccessNodeUrl::Mainnet => "http://access.mainnet.nodes.onflow.org:9000",
            PublicAccessNodeUrl::Testnet => "http://access.devnet.nodes.onflow.org:9000",
        }
    }
}
