//! Pool market domain: static pool parameters, price state, ticks and positions.

pub mod client;
mod convert;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::shared::{align_tick, sqrt_price_x96_to_price, MarketId, TickError};

/// Immutable parameters of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfo {
    pub address: Address,
    pub market_id: MarketId,
    pub factory: Address,
    pub collateral_token: Address,
    pub token0: Address,
    pub token1: Address,
    /// Hundredths of a bip
    pub fee: u32,
    pub tick_spacing: i32,
}

impl PoolInfo {
    /// Round `tick` down to the nearest usable tick of this pool.
    pub fn align_tick(&self, tick: i32) -> Result<i32, TickError> {
        align_tick(tick, self.tick_spacing)
    }
}

/// Current price state (`slot0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    /// `false` while the pool is mid-operation
    pub unlocked: bool,
}

impl Slot0 {
    /// Raw token1/token0 price. Lossy; for display only.
    pub fn price(&self) -> f64 {
        sqrt_price_x96_to_price(self.sqrt_price_x96)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickInfo {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub fee_growth_outside0_x128: U256,
    pub fee_growth_outside1_x128: U256,
    pub initialized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInfo {
    pub liquidity: u128,
    pub fee_growth_inside0_last_x128: U256,
    pub fee_growth_inside1_last_x128: U256,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
}

impl PositionInfo {
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0 && self.tokens_owed0 == 0 && self.tokens_owed1 == 0
    }
}

/// Pool state read at a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    pub address: Address,
    /// Block the reads were pinned to, when known by number
    pub block_number: Option<u64>,
    pub slot0: Slot0,
    /// In-range liquidity
    pub liquidity: u128,
    pub fee: u32,
    pub tick_spacing: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot0_price_at_parity() {
        let slot0 = Slot0 {
            sqrt_price_x96: U256::from(1u8) << 96,
            tick: 0,
            unlocked: true,
        };
        assert!((slot0.price() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pool_info_align_tick() {
        let info = PoolInfo {
            address: Address::ZERO,
            market_id: MarketId::new(1),
            factory: Address::ZERO,
            collateral_token: Address::ZERO,
            token0: Address::ZERO,
            token1: Address::ZERO,
            fee: 3000,
            tick_spacing: 60,
        };
        assert_eq!(info.align_tick(-61).unwrap(), -120);
        assert_eq!(info.align_tick(119).unwrap(), 60);
    }

    #[test]
    fn test_position_is_empty() {
        let mut position = PositionInfo {
            liquidity: 0,
            fee_growth_inside0_last_x128: U256::ZERO,
            fee_growth_inside1_last_x128: U256::ZERO,
            tokens_owed0: 0,
            tokens_owed1: 0,
        };
        assert!(position.is_empty());
        position.tokens_owed1 = 5;
        assert!(!position.is_empty());
    }
}
