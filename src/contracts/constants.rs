//! Protocol constants.
//!
//! Values here must match the deployed contracts exactly.

// ============================================================================
// EIP-712
// ============================================================================

/// EIP-712 domain name of the oracle adapter.
pub const EIP712_DOMAIN_NAME: &str = "AIOracleAdapter";

/// EIP-712 domain version of the oracle adapter.
pub const EIP712_DOMAIN_VERSION: &str = "1";

/// Canonical type string of the signed proposal struct.
pub const PROPOSED_OUTCOME_TYPE: &str = "ProposedOutcome(uint256 marketId,uint256 outcomeId,uint64 closeTime,bytes32 evidenceHash,uint64 validityWindow,uint64 deadline)";

/// Canonical type string of the EIP-712 domain.
pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Length of a serialized `r || s || v` ECDSA signature.
pub const SIGNATURE_LENGTH: usize = 65;

// ============================================================================
// Markets
// ============================================================================

/// Fewest outcomes a market may have.
pub const MIN_OUTCOMES: u8 = 2;

/// Fee denominator: a fee of `3000` is 0.3%.
pub const FEE_DENOMINATOR: u32 = 1_000_000;
