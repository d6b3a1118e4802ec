//! Network constants for the oracle-markets SDK.

/// Default JSON-RPC endpoint (local dev node).
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default WebSocket endpoint (local dev node). Log subscriptions need a WS provider.
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8545";

/// Ethereum mainnet chain id.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Sepolia testnet chain id.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Base mainnet chain id.
pub const BASE_CHAIN_ID: u64 = 8453;

/// Base Sepolia chain id.
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84_532;

/// Local anvil / hardhat chain id.
pub const LOCAL_CHAIN_ID: u64 = 31_337;

/// Human-readable name for a known chain id.
pub fn chain_name(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        MAINNET_CHAIN_ID => Some("mainnet"),
        SEPOLIA_CHAIN_ID => Some("sepolia"),
        BASE_CHAIN_ID => Some("base"),
        BASE_SEPOLIA_CHAIN_ID => Some("base-sepolia"),
        LOCAL_CHAIN_ID => Some("local"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_name() {
        assert_eq!(chain_name(1), Some("mainnet"));
        assert_eq!(chain_name(31_337), Some("local"));
        assert_eq!(chain_name(42), None);
    }
}
