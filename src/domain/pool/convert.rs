use crate::contracts::abi::IPoolMarket;
use crate::contracts::{from_int24, from_uint160};
use crate::domain::pool::{PositionInfo, Slot0, TickInfo};
use crate::error::SdkError;

impl TryFrom<IPoolMarket::slot0Return> for Slot0 {
    type Error = SdkError;

    fn try_from(r: IPoolMarket::slot0Return) -> Result<Self, Self::Error> {
        Ok(Self {
            sqrt_price_x96: from_uint160(r.sqrtPriceX96),
            tick: from_int24("tick", r.tick)?,
            unlocked: r.unlocked,
        })
    }
}

impl From<IPoolMarket::ticksReturn> for TickInfo {
    fn from(r: IPoolMarket::ticksReturn) -> Self {
        Self {
            liquidity_gross: r.liquidityGross,
            liquidity_net: r.liquidityNet,
            fee_growth_outside0_x128: r.feeGrowthOutside0X128,
            fee_growth_outside1_x128: r.feeGrowthOutside1X128,
            initialized: r.initialized,
        }
    }
}

impl From<IPoolMarket::positionsReturn> for PositionInfo {
    fn from(r: IPoolMarket::positionsReturn) -> Self {
        Self {
            liquidity: r.liquidity,
            fee_growth_inside0_last_x128: r.feeGrowthInside0LastX128,
            fee_growth_inside1_last_x128: r.feeGrowthInside1LastX128,
            tokens_owed0: r.tokensOwed0,
            tokens_owed1: r.tokensOwed1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::aliases::{I24, U160};
    use alloy::primitives::U256;

    #[test]
    fn test_slot0_conversion_negative_tick() {
        let r = IPoolMarket::slot0Return {
            sqrtPriceX96: U160::from(1u8) << 95,
            tick: I24::try_from(-13_863).unwrap(),
            unlocked: true,
        };
        let slot0 = Slot0::try_from(r).unwrap();
        assert_eq!(slot0.tick, -13_863);
        assert_eq!(slot0.sqrt_price_x96, U256::from(1u8) << 95);
        assert!(slot0.unlocked);
    }

    #[test]
    fn test_ticks_conversion() {
        let info = TickInfo::from(IPoolMarket::ticksReturn {
            liquidityGross: 500,
            liquidityNet: -250,
            feeGrowthOutside0X128: U256::from(7u8),
            feeGrowthOutside1X128: U256::from(8u8),
            initialized: true,
        });
        assert_eq!(info.liquidity_gross, 500);
        assert_eq!(info.liquidity_net, -250);
        assert_eq!(info.fee_growth_outside1_x128, U256::from(8u8));
        assert!(info.initialized);
    }

    #[test]
    fn test_positions_conversion() {
        let r = IPoolMarket::positionsReturn {
            liquidity: 1_000,
            feeGrowthInside0LastX128: U256::from(1u8),
            feeGrowthInside1LastX128: U256::from(2u8),
            tokensOwed0: 3,
            tokensOwed1: 4,
        };
        let position = PositionInfo::from(r);
        assert_eq!(position.liquidity, 1_000);
        assert_eq!(position.tokens_owed0, 3);
        assert_eq!(position.tokens_owed1, 4);
    }
}
