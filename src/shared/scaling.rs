//! Pure conversion between human-readable token amounts and raw base units.
//!
//! All math uses `rust_decimal::Decimal` for exact decimal arithmetic.
//! No async, no network calls.

use std::fmt;

use alloy::primitives::U256;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Largest decimals value a `Decimal` scale can carry.
pub const MAX_DECIMALS: u8 = 28;

/// Errors that can occur during amount scaling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalingError {
    NegativeAmount(String),
    Overflow { context: String },
    FractionalAmount { value: String },
    UnsupportedDecimals(u8),
    InvalidDecimal { input: String, reason: String },
}

impl fmt::Display for ScalingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingError::NegativeAmount(v) => write!(f, "Amount must not be negative, got {}", v),
            ScalingError::Overflow { context } => write!(f, "Overflow: {}", context),
            ScalingError::FractionalAmount { value } => {
                write!(f, "Fractional base units not allowed: {}", value)
            }
            ScalingError::UnsupportedDecimals(d) => {
                write!(f, "Unsupported token decimals {} (max {})", d, MAX_DECIMALS)
            }
            ScalingError::InvalidDecimal { input, reason } => {
                write!(f, "Invalid decimal '{}': {}", input, reason)
            }
        }
    }
}

impl std::error::Error for ScalingError {}

fn check_decimals(decimals: u8) -> Result<(), ScalingError> {
    if decimals > MAX_DECIMALS {
        return Err(ScalingError::UnsupportedDecimals(decimals));
    }
    Ok(())
}

/// Convert a human-readable amount into raw token base units.
///
/// ```text
/// base_units = amount * 10^decimals
/// ```
///
/// The result must be a non-negative integer; `1.0000001` USDC (6 decimals) is rejected
/// rather than silently truncated.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256, ScalingError> {
    check_decimals(decimals)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ScalingError::NegativeAmount(amount.to_string()));
    }

    let mut scaled = amount;
    for _ in 0..decimals {
        scaled = scaled
            .checked_mul(Decimal::TEN)
            .ok_or_else(|| ScalingError::Overflow {
                context: format!("{} * 10^{}", amount, decimals),
            })?;
    }

    let scaled = scaled.normalize();
    if !scaled.fract().is_zero() {
        return Err(ScalingError::FractionalAmount {
            value: scaled.to_string(),
        });
    }

    let raw = scaled.to_u128().ok_or_else(|| ScalingError::Overflow {
        context: format!("{} does not fit in u128", scaled),
    })?;
    Ok(U256::from(raw))
}

/// Convert raw token base units into a human-readable amount.
pub fn from_base_units(raw: U256, decimals: u8) -> Result<Decimal, ScalingError> {
    check_decimals(decimals)?;
    let value = u128::try_from(raw).map_err(|_| ScalingError::Overflow {
        context: format!("{} does not fit in u128", raw),
    })?;
    let value = i128::try_from(value).map_err(|_| ScalingError::Overflow {
        context: format!("{} does not fit in i128", value),
    })?;
    Decimal::try_from_i128_with_scale(value, u32::from(decimals))
        .map(|d| d.normalize())
        .map_err(|e| ScalingError::Overflow {
            context: e.to_string(),
        })
}

/// Parse a human-readable amount string and scale it to base units.
pub fn parse_base_units(input: &str, decimals: u8) -> Result<U256, ScalingError> {
    let amount = Decimal::from_str(input.trim()).map_err(|e| ScalingError::InvalidDecimal {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    to_base_units(amount, decimals)
}
