//! Market factory domain: market records and the event-driven registry.

pub mod client;
mod convert;
pub mod state;

use alloy::primitives::{Address, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contracts::MarketStatus;
use crate::shared::{timestamp_to_datetime, MarketId};

/// A market as stored by the factory (`getMarket`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: MarketId,
    pub creator: Address,
    /// Pool contract trading this market
    pub amm: Address,
    pub collateral_token: Address,
    /// Unix seconds after which trading stops
    pub close_time: u64,
    pub outcome_count: u8,
    pub status: MarketStatus,
    pub question_hash: B256,
}

impl Market {
    pub fn close_datetime(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.close_time)
    }

    /// `true` while the market accepts trades at `now`. Advisory only.
    pub fn is_trading(&self, now: u64) -> bool {
        self.status == MarketStatus::Open && now < self.close_time
    }

    pub fn is_resolved(&self) -> bool {
        self.status == MarketStatus::Resolved
    }

    /// `true` when `outcome_id` names one of this market's outcomes.
    pub fn has_outcome(&self, outcome_id: u64) -> bool {
        outcome_id < u64::from(self.outcome_count)
    }
}

/// Result of a confirmed `createMarket` transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMarket {
    pub market_id: MarketId,
    pub amm: Address,
    pub tx_hash: B256,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn market(id: u64, status: MarketStatus) -> Market {
        Market {
            id: MarketId::new(id),
            creator: Address::repeat_byte(0x01),
            amm: Address::repeat_byte(id as u8),
            collateral_token: Address::repeat_byte(0xcc),
            close_time: 2_000_000_000,
            outcome_count: 2,
            status,
            question_hash: B256::repeat_byte(0x0a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::market;
    use super::*;

    #[test]
    fn test_is_trading() {
        let m = market(1, MarketStatus::Open);
        assert!(m.is_trading(1_999_999_999));
        assert!(!m.is_trading(2_000_000_000));
        assert!(!market(1, MarketStatus::Closed).is_trading(0));
    }

    #[test]
    fn test_has_outcome() {
        let m = market(1, MarketStatus::Open);
        assert!(m.has_outcome(0));
        assert!(m.has_outcome(1));
        assert!(!m.has_outcome(2));
    }

    #[test]
    fn test_close_datetime() {
        let m = market(1, MarketStatus::Open);
        assert_eq!(m.close_datetime().unwrap().timestamp(), 2_000_000_000);
    }
}
