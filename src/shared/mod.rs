//! Shared newtypes and utilities used across all domain modules.
//!
//! The id newtypes wrap the exact ABI types (`uint256`, `bytes32`) so they can be
//! passed straight into call structs without conversion loss.

pub mod scaling;
pub mod tick_math;

pub use scaling::{from_base_units, to_base_units, ScalingError};
pub use tick_math::{
    align_tick, sqrt_price_x96_to_price, sqrt_ratio_at_tick, tick_at_sqrt_ratio, tick_to_price,
    validate_tick_range, TickError, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK,
};

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── MarketId ────────────────────────────────────────────────────────────────

/// Factory-assigned market identifier (`uint256` on chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketId(pub U256);

impl MarketId {
    pub fn new(id: u64) -> Self {
        Self(U256::from(id))
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// 32-byte big-endian form, as used for indexed event topics.
    pub fn to_topic(&self) -> B256 {
        B256::from(self.0.to_be_bytes::<32>())
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MarketId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<U256> for MarketId {
    fn from(id: U256) -> Self {
        Self(id)
    }
}

impl From<MarketId> for U256 {
    fn from(id: MarketId) -> Self {
        id.0
    }
}

impl FromStr for MarketId {
    type Err = alloy::primitives::ruint::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_str(s).map(Self)
    }
}

// ─── OutcomeId ───────────────────────────────────────────────────────────────

/// Outcome index within a market (`uint256` on chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeId(pub U256);

impl OutcomeId {
    pub fn new(id: u64) -> Self {
        Self(U256::from(id))
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for OutcomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OutcomeId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<U256> for OutcomeId {
    fn from(id: U256) -> Self {
        Self(id)
    }
}

impl From<OutcomeId> for U256 {
    fn from(id: OutcomeId) -> Self {
        id.0
    }
}

// ─── ProposalId ──────────────────────────────────────────────────────────────

/// EIP-712 digest identifying a signed outcome proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(pub B256);

impl ProposalId {
    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<B256> for ProposalId {
    fn from(id: B256) -> Self {
        Self(id)
    }
}

impl From<ProposalId> for B256 {
    fn from(id: ProposalId) -> Self {
        id.0
    }
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// Convert an on-chain `uint64` unix timestamp into a UTC datetime.
///
/// Returns `None` for values chrono cannot represent.
pub fn timestamp_to_datetime(secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(secs).ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Convert a UTC datetime into an on-chain `uint64` unix timestamp.
///
/// Datetimes before the epoch clamp to zero.
pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> u64 {
    u64::try_from(dt.timestamp()).unwrap_or(0)
}

/// Current unix time in seconds.
pub fn now_timestamp() -> u64 {
    datetime_to_timestamp(Utc::now())
}
