//! Concentrated-liquidity tick math.
//!
//! Exact `sqrtPriceX96` values at tick boundaries (bit-for-bit the pool's own table), plus
//! floating-point helpers for display. Prices are token1 per token0 in raw units.

use std::fmt;

use alloy::primitives::{uint, U256};

/// Lowest tick a pool accepts.
pub const MIN_TICK: i32 = -887_272;

/// Highest tick a pool accepts.
pub const MAX_TICK: i32 = -MIN_TICK;

/// `sqrt_ratio_at_tick(MIN_TICK)`.
pub const MIN_SQRT_RATIO: U256 = uint!(4295128739_U256);

/// `sqrt_ratio_at_tick(MAX_TICK)`.
pub const MAX_SQRT_RATIO: U256 =
    uint!(1461446703485210103287273052203988822378723970342_U256);

/// 2^96 as f64.
const Q96_F64: f64 = 79_228_162_514_264_337_593_543_950_336.0;

/// Per-bit multipliers: `2^128 / sqrt(1.0001^(2^i))`, Q128.128.
const TICK_RATIOS: [U256; 19] = [
    uint!(0xfff97272373d413259a46990580e213a_U256),
    uint!(0xfff2e50f5f656932ef12357cf3c7fdcc_U256),
    uint!(0xffe5caca7e10e4e61c3624eaa0941cd0_U256),
    uint!(0xffcb9843d60f6159c9db58835c926644_U256),
    uint!(0xff973b41fa98c081472e6896dfb254c0_U256),
    uint!(0xff2ea16466c96a3843ec78b326b52861_U256),
    uint!(0xfe5dee046a99a2a811c461f1969c3053_U256),
    uint!(0xfcbe86c7900a88aedcffc83b479aa3a4_U256),
    uint!(0xf987a7253ac413176f2b074cf7815e54_U256),
    uint!(0xf3392b0822b70005940c7a398e4b70f3_U256),
    uint!(0xe7159475a2c29b7443b29c7fa6e889d9_U256),
    uint!(0xd097f3bdfd2022b8845ad8f792aa5825_U256),
    uint!(0xa9f746462d870fdf8a65dc1f90e061e5_U256),
    uint!(0x70d869a156d2a1b890bb3df62baf32f7_U256),
    uint!(0x31be135f97d08fd981231505542fcfa6_U256),
    uint!(0x9aa508b5b7a84e1c677de54f3e99bc9_U256),
    uint!(0x5d6af8dedb81196699c329225ee604_U256),
    uint!(0x2216e584f5fa1ea926041bedfe98_U256),
    uint!(0x48a170391f7dc42444e8fa2_U256),
];

/// Multiplier for bit 0 of the absolute tick.
const TICK_RATIO_BIT0: U256 = uint!(0xfffcb933bd6fad37aa2d162d1a594001_U256);

/// Tick math errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    TickOutOfBounds(i32),
    SqrtRatioOutOfBounds(String),
    InvalidTickSpacing(i32),
    UnalignedTick { tick: i32, spacing: i32 },
    InvertedRange { lower: i32, upper: i32 },
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::TickOutOfBounds(t) => {
                write!(f, "Tick {} outside [{}, {}]", t, MIN_TICK, MAX_TICK)
            }
            TickError::SqrtRatioOutOfBounds(r) => write!(f, "sqrtPriceX96 {} out of bounds", r),
            TickError::InvalidTickSpacing(s) => write!(f, "Tick spacing must be positive, got {}", s),
            TickError::UnalignedTick { tick, spacing } => {
                write!(f, "Tick {} is not a multiple of spacing {}", tick, spacing)
            }
            TickError::InvertedRange { lower, upper } => {
                write!(f, "Lower tick {} must be below upper tick {}", lower, upper)
            }
        }
    }
}

impl std::error::Error for TickError {}

/// Exact `sqrtPriceX96` at a tick boundary (`sqrt(1.0001^tick) * 2^96`).
pub fn sqrt_ratio_at_tick(tick: i32) -> Result<U256, TickError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(TickError::TickOutOfBounds(tick));
    }
    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 1 != 0 {
        TICK_RATIO_BIT0
    } else {
        U256::from(1u8) << 128
    };
    for (i, multiplier) in TICK_RATIOS.iter().enumerate() {
        if abs_tick & (1u32 << (i + 1)) != 0 {
            ratio = (ratio * *multiplier) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up.
    let remainder = ratio & U256::from(u32::MAX);
    let shifted = ratio >> 32;
    Ok(if remainder.is_zero() {
        shifted
    } else {
        shifted + U256::from(1u8)
    })
}

/// Greatest tick whose boundary price is `<= sqrt_price_x96`.
pub fn tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, TickError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(TickError::SqrtRatioOutOfBounds(sqrt_price_x96.to_string()));
    }

    // Floating-point estimate, then walk to the exact answer.
    let price = sqrt_price_x96_to_price(sqrt_price_x96);
    let estimate = (price.ln() / 1.0001f64.ln()).floor();
    let mut tick = (estimate as i64).clamp(i64::from(MIN_TICK), i64::from(MAX_TICK)) as i32;

    while tick > MIN_TICK && sqrt_ratio_at_tick(tick)? > sqrt_price_x96 {
        tick -= 1;
    }
    while tick < MAX_TICK && sqrt_ratio_at_tick(tick + 1)? <= sqrt_price_x96 {
        tick += 1;
    }
    Ok(tick)
}

/// `1.0001^tick`, for display.
pub fn tick_to_price(tick: i32) -> f64 {
    1.0001f64.powi(tick)
}

/// Raw price (`(sqrtPriceX96 / 2^96)^2`), for display.
pub fn sqrt_price_x96_to_price(sqrt_price_x96: U256) -> f64 {
    let sqrt = u256_to_f64(sqrt_price_x96) / Q96_F64;
    sqrt * sqrt
}

/// Price adjusted for token decimals (token1 per token0 in whole tokens).
pub fn adjusted_price(raw_price: f64, decimals0: u8, decimals1: u8) -> f64 {
    raw_price * 10f64.powi(i32::from(decimals0) - i32::from(decimals1))
}

/// Round a tick down (towards negative infinity) to a multiple of `spacing`.
pub fn align_tick(tick: i32, spacing: i32) -> Result<i32, TickError> {
    if spacing <= 0 {
        return Err(TickError::InvalidTickSpacing(spacing));
    }
    Ok(tick.div_euclid(spacing) * spacing)
}

/// Check a `[lower, upper)` position range against a pool's tick spacing.
pub fn validate_tick_range(lower: i32, upper: i32, spacing: i32) -> Result<(), TickError> {
    if spacing <= 0 {
        return Err(TickError::InvalidTickSpacing(spacing));
    }
    if lower >= upper {
        return Err(TickError::InvertedRange { lower, upper });
    }
    for tick in [lower, upper] {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickError::TickOutOfBounds(tick));
        }
        if tick % spacing != 0 {
            return Err(TickError::UnalignedTick { tick, spacing });
        }
    }
    Ok(())
}

fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0f64, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}
