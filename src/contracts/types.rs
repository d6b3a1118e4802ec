//! Enums and parameter structs for contract interaction.
//!
//! Parameter structs use native Rust widths (`i32` ticks, `u32` fees). They are narrowed to
//! the ABI widths (`int24`, `uint24`, `uint160`) when a call is built; see
//! [`crate::contracts::calls`].

use std::fmt;

use alloy::primitives::aliases::{I24, U160, U24};
use alloy::primitives::ruint::UintTryFrom;
use alloy::primitives::{Address, B256, I256, U256};
use serde::{Deserialize, Serialize};

use crate::contracts::constants::{FEE_DENOMINATOR, MIN_OUTCOMES};
use crate::error::SdkError;
use crate::shared::{MAX_SQRT_RATIO, MIN_SQRT_RATIO};

// ============================================================================
// Enums
// ============================================================================

/// Market lifecycle status as stored by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MarketStatus {
    /// Trading is open
    Open = 0,
    /// Close time passed, awaiting a resolution proposal
    Closed = 1,
    /// A resolution has been proposed and the dispute window is running
    Resolving = 2,
    /// The proposal was disputed and awaits adjudication
    Disputed = 3,
    /// Final outcome set, redemptions enabled
    Resolved = 4,
    /// Market voided
    Cancelled = 5,
}

impl MarketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStatus::Open => "Open",
            MarketStatus::Closed => "Closed",
            MarketStatus::Resolving => "Resolving",
            MarketStatus::Disputed => "Disputed",
            MarketStatus::Resolved => "Resolved",
            MarketStatus::Cancelled => "Cancelled",
        }
    }

    /// `true` once the market can no longer change status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MarketStatus::Resolved | MarketStatus::Cancelled)
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for MarketStatus {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MarketStatus::Open),
            1 => Ok(MarketStatus::Closed),
            2 => Ok(MarketStatus::Resolving),
            3 => Ok(MarketStatus::Disputed),
            4 => Ok(MarketStatus::Resolved),
            5 => Ok(MarketStatus::Cancelled),
            _ => Err(SdkError::InvalidEnum {
                kind: "MarketStatus",
                value,
            }),
        }
    }
}

/// State of a market's resolution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResolutionState {
    /// No proposal yet
    None = 0,
    /// Proposed, dispute window open or elapsed
    Proposed = 1,
    /// Disputed, awaiting the arbiter
    Disputed = 2,
    /// Final outcome recorded
    Finalized = 3,
}

impl ResolutionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionState::None => "None",
            ResolutionState::Proposed => "Proposed",
            ResolutionState::Disputed => "Disputed",
            ResolutionState::Finalized => "Finalized",
        }
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for ResolutionState {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ResolutionState::None),
            1 => Ok(ResolutionState::Proposed),
            2 => Ok(ResolutionState::Disputed),
            3 => Ok(ResolutionState::Finalized),
            _ => Err(SdkError::InvalidEnum {
                kind: "ResolutionState",
                value,
            }),
        }
    }
}

// ============================================================================
// ABI width conversions
// ============================================================================

/// Narrow an `i32` tick to `int24`.
pub fn to_int24(field: &'static str, value: i32) -> Result<I24, SdkError> {
    I24::try_from(value).map_err(|_| SdkError::OutOfRange {
        field,
        value: value.to_string(),
    })
}

/// Widen an `int24` to `i32`.
pub fn from_int24(field: &'static str, value: I24) -> Result<i32, SdkError> {
    i32::try_from(value).map_err(|_| SdkError::OutOfRange {
        field,
        value: value.to_string(),
    })
}

/// Narrow a `u32` fee to `uint24`.
pub fn to_uint24(field: &'static str, value: u32) -> Result<U24, SdkError> {
    U24::try_from(value).map_err(|_| SdkError::OutOfRange {
        field,
        value: value.to_string(),
    })
}

/// Narrow a `U256` price to `uint160`.
pub fn to_uint160(field: &'static str, value: U256) -> Result<U160, SdkError> {
    U160::uint_try_from(value).map_err(|_| SdkError::OutOfRange {
        field,
        value: value.to_string(),
    })
}

/// Widen a `uint160` to `U256`.
pub fn from_uint160(value: U160) -> U256 {
    U256::from_be_slice(&value.to_be_bytes::<20>())
}

// ============================================================================
// Parameter Structs
// ============================================================================

/// Parameters for `MarketFactory.createMarket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMarketParams {
    /// ERC-20 collateral backing the market
    pub collateral_token: Address,
    /// Number of outcomes
    pub outcome_count: u8,
    /// Unix time after which trading stops
    pub close_time: u64,
    /// Keccak256 of the question text
    pub question_hash: B256,
    /// Pool fee in hundredths of a bip (`3000` = 0.3%)
    pub fee: u32,
    pub tick_spacing: i32,
    /// Starting pool price as `sqrtPriceX96`
    pub initial_sqrt_price_x96: U256,
}

impl CreateMarketParams {
    /// Client-side sanity checks. The factory remains authoritative.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.outcome_count < MIN_OUTCOMES {
            return Err(SdkError::Validation(format!(
                "outcome_count must be at least {MIN_OUTCOMES}, got {}",
                self.outcome_count
            )));
        }
        if self.fee >= FEE_DENOMINATOR {
            return Err(SdkError::Validation(format!(
                "fee must be below {FEE_DENOMINATOR}, got {}",
                self.fee
            )));
        }
        if self.tick_spacing <= 0 {
            return Err(SdkError::Validation(format!(
                "tick_spacing must be positive, got {}",
                self.tick_spacing
            )));
        }
        if self.initial_sqrt_price_x96 < MIN_SQRT_RATIO
            || self.initial_sqrt_price_x96 >= MAX_SQRT_RATIO
        {
            return Err(SdkError::OutOfRange {
                field: "initial_sqrt_price_x96",
                value: self.initial_sqrt_price_x96.to_string(),
            });
        }
        Ok(())
    }
}

/// Parameters for `PoolMarket.mint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintParams {
    pub recipient: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Liquidity to add
    pub amount: u128,
}

/// Parameters for `PoolMarket.burn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnParams {
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Liquidity to remove
    pub amount: u128,
}

/// Parameters for `PoolMarket.collect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectParams {
    pub recipient: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_requested: u128,
    pub amount1_requested: u128,
}

impl CollectParams {
    /// Collect everything owed to the position.
    pub fn all(recipient: Address, tick_lower: i32, tick_upper: i32) -> Self {
        Self {
            recipient,
            tick_lower,
            tick_upper,
            amount0_requested: u128::MAX,
            amount1_requested: u128::MAX,
        }
    }
}

/// Parameters for `PoolMarket.swap`.
///
/// A positive `amount_specified` is an exact input, a negative one an exact output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
    pub recipient: Address,
    /// `true` swaps token0 for token1 (price moves down)
    pub zero_for_one: bool,
    pub amount_specified: I256,
    pub sqrt_price_limit_x96: U256,
}

impl SwapParams {
    /// Exact-input swap with no effective price limit.
    pub fn exact_input(recipient: Address, zero_for_one: bool, amount_in: U256) -> Result<Self, SdkError> {
        let amount_specified = I256::try_from(amount_in).map_err(|_| SdkError::OutOfRange {
            field: "amount_in",
            value: amount_in.to_string(),
        })?;
        Ok(Self {
            recipient,
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96: Self::unbounded_limit(zero_for_one),
        })
    }

    /// Exact-output swap with no effective price limit.
    pub fn exact_output(recipient: Address, zero_for_one: bool, amount_out: U256) -> Result<Self, SdkError> {
        let amount = I256::try_from(amount_out).map_err(|_| SdkError::OutOfRange {
            field: "amount_out",
            value: amount_out.to_string(),
        })?;
        Ok(Self {
            recipient,
            zero_for_one,
            amount_specified: -amount,
            sqrt_price_limit_x96: Self::unbounded_limit(zero_for_one),
        })
    }

    /// Replace the price limit.
    pub fn with_price_limit(mut self, sqrt_price_limit_x96: U256) -> Self {
        self.sqrt_price_limit_x96 = sqrt_price_limit_x96;
        self
    }

    /// The loosest limit the pool accepts in the given direction.
    pub fn unbounded_limit(zero_for_one: bool) -> U256 {
        if zero_for_one {
            MIN_SQRT_RATIO + U256::from(1u8)
        } else {
            MAX_SQRT_RATIO - U256::from(1u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_status_from_u8() {
        assert_eq!(MarketStatus::try_from(0u8).unwrap(), MarketStatus::Open);
        assert_eq!(MarketStatus::try_from(3u8).unwrap(), MarketStatus::Disputed);
        assert_eq!(MarketStatus::try_from(5u8).unwrap(), MarketStatus::Cancelled);
        assert!(matches!(
            MarketStatus::try_from(6u8),
            Err(SdkError::InvalidEnum { kind: "MarketStatus", value: 6 })
        ));
    }

    #[test]
    fn test_market_status_repr_matches_contract() {
        for status in [
            MarketStatus::Open,
            MarketStatus::Closed,
            MarketStatus::Resolving,
            MarketStatus::Disputed,
            MarketStatus::Resolved,
            MarketStatus::Cancelled,
        ] {
            assert_eq!(MarketStatus::try_from(status as u8).unwrap(), status);
        }
        assert!(MarketStatus::Resolved.is_terminal());
        assert!(!MarketStatus::Disputed.is_terminal());
    }

    #[test]
    fn test_resolution_state_from_u8() {
        assert_eq!(ResolutionState::try_from(0u8).unwrap(), ResolutionState::None);
        assert_eq!(ResolutionState::try_from(3u8).unwrap(), ResolutionState::Finalized);
        assert!(ResolutionState::try_from(4u8).is_err());
        assert_eq!(ResolutionState::Disputed.to_string(), "Disputed");
    }

    #[test]
    fn test_int24_bounds() {
        assert_eq!(from_int24("tick", to_int24("tick", -887_272).unwrap()).unwrap(), -887_272);
        assert_eq!(from_int24("tick", to_int24("tick", 8_388_607).unwrap()).unwrap(), 8_388_607);
        assert!(to_int24("tick", 8_388_608).is_err());
        assert!(to_int24("tick", -8_388_609).is_err());
    }

    #[test]
    fn test_uint24_bounds() {
        assert_eq!(to_uint24("fee", 3000).unwrap(), U24::from(3000u32));
        assert_eq!(to_uint24("fee", 0).unwrap(), U24::ZERO);
        assert_eq!(to_uint24("fee", (1 << 24) - 1).unwrap(), U24::MAX);
        assert!(to_uint24("fee", 1 << 24).is_err());
    }

    #[test]
    fn test_default_swap_limits_fit_uint160() {
        let recipient = Address::repeat_byte(0x11);
        for zero_for_one in [true, false] {
            let params = SwapParams::exact_input(recipient, zero_for_one, U256::from(1u8)).unwrap();
            let narrowed = to_uint160("sqrt_price_limit_x96", params.sqrt_price_limit_x96).unwrap();
            assert_eq!(from_uint160(narrowed), params.sqrt_price_limit_x96);
        }
        let q96 = U256::from(1u8) << 96;
        assert_eq!(from_uint160(to_uint160("price", q96).unwrap()), q96);
        assert_eq!(from_uint160(to_uint160("price", U256::ZERO).unwrap()), U256::ZERO);
    }

    #[test]
    fn test_uint160_bounds() {
        let v = to_uint160("price", MAX_SQRT_RATIO).unwrap();
        assert_eq!(from_uint160(v), MAX_SQRT_RATIO);
        assert!(matches!(
            to_uint160("price", U256::from(1u8) << 160),
            Err(SdkError::OutOfRange { field: "price", .. })
        ));
    }

    #[test]
    fn test_swap_params() {
        let recipient = Address::repeat_byte(0x11);
        let exact_in = SwapParams::exact_input(recipient, true, U256::from(100u8)).unwrap();
        assert_eq!(exact_in.amount_specified, I256::try_from(100i64).unwrap());
        assert_eq!(exact_in.sqrt_price_limit_x96, MIN_SQRT_RATIO + U256::from(1u8));

        let exact_out = SwapParams::exact_output(recipient, false, U256::from(100u8)).unwrap();
        assert!(exact_out.amount_specified.is_negative());
        assert_eq!(exact_out.sqrt_price_limit_x96, MAX_SQRT_RATIO - U256::from(1u8));

        assert!(SwapParams::exact_input(recipient, true, U256::MAX).is_err());
    }

    #[test]
    fn test_collect_all() {
        let params = CollectParams::all(Address::ZERO, -60, 60);
        assert_eq!(params.amount0_requested, u128::MAX);
        assert_eq!(params.amount1_requested, u128::MAX);
    }

    #[test]
    fn test_create_market_params_validate() {
        let params = CreateMarketParams {
            collateral_token: Address::repeat_byte(0x11),
            outcome_count: 2,
            close_time: 1_800_000_000,
            question_hash: B256::repeat_byte(0x22),
            fee: 3000,
            tick_spacing: 60,
            initial_sqrt_price_x96: U256::from(1u8) << 96,
        };
        assert!(params.validate().is_ok());
        let one_outcome = CreateMarketParams {
            outcome_count: 1,
            ..params.clone()
        };
        assert!(matches!(one_outcome.validate(), Err(SdkError::Validation(_))));
        let zero_spacing = CreateMarketParams {
            tick_spacing: 0,
            ..params.clone()
        };
        assert!(zero_spacing.validate().is_err());
        let no_price = CreateMarketParams {
            initial_sqrt_price_x96: U256::ZERO,
            ..params
        };
        assert!(matches!(
            no_price.validate(),
            Err(SdkError::OutOfRange { field: "initial_sqrt_price_x96", .. })
        ));
    }
}
