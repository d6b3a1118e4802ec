//! Resolution module domain: per-market resolution records and module parameters.
//!
//! The timing helpers on [`Resolution`] are advisory. They mirror the module's rules
//! (disputes strictly before the deadline, finalization from the deadline on) so callers
//! can skip transactions that would revert, but the contract decides.

pub mod client;
mod convert;

use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::contracts::ResolutionState;
use crate::shared::{MarketId, OutcomeId};

/// A market's resolution record (`getResolution`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub market_id: MarketId,
    pub state: ResolutionState,
    pub proposed_outcome: OutcomeId,
    pub proposer: Address,
    pub proposer_bond: U256,
    /// Zero address until disputed
    pub disputer: Address,
    pub disputer_bond: U256,
    pub proposed_at: u64,
    pub dispute_deadline: u64,
    pub evidence_hash: B256,
    /// Meaningful once `state` is `Finalized`
    pub final_outcome: OutcomeId,
}

impl Resolution {
    pub fn is_disputed(&self) -> bool {
        self.disputer != Address::ZERO
    }

    pub fn is_finalized(&self) -> bool {
        self.state == ResolutionState::Finalized
    }

    /// Final outcome, once finalized.
    pub fn outcome(&self) -> Option<OutcomeId> {
        self.is_finalized().then_some(self.final_outcome)
    }

    /// A proposal can still be disputed at `now`.
    pub fn is_dispute_window_open(&self, now: u64) -> bool {
        self.state == ResolutionState::Proposed && now < self.dispute_deadline
    }

    /// An undisputed proposal can be finalized at `now`.
    ///
    /// Disputed proposals are settled by the arbiter through `adjudicate`.
    pub fn can_finalize(&self, now: u64) -> bool {
        self.state == ResolutionState::Proposed && now >= self.dispute_deadline
    }

    /// Time left in the dispute window, or `None` when it is not open.
    pub fn time_until_deadline(&self, now: u64) -> Option<Duration> {
        self.is_dispute_window_open(now)
            .then(|| Duration::from_secs(self.dispute_deadline - now))
    }
}

/// Module-wide parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionParams {
    pub address: Address,
    /// Seconds a proposal stays disputable
    pub dispute_window: u64,
    pub proposer_bond: U256,
    pub disputer_bond: U256,
    pub bond_token: Address,
    pub arbiter: Address,
    pub oracle_adapter: Address,
}


#[cfg(test)]
mod tests {
    use super::fixtures::proposed;
    use super::*;

    #[test]
    fn test_dispute_window() {
        let r = proposed(1_000);
        assert!(r.is_dispute_window_open(999));
        assert!(!r.is_dispute_window_open(1_000));
        assert!(!r.can_finalize(999));
        assert!(r.can_finalize(1_000));
    }

    #[test]
    fn test_time_until_deadline() {
        let r = proposed(1_000);
        assert_eq!(r.time_until_deadline(400), Some(Duration::from_secs(600)));
        assert_eq!(r.time_until_deadline(1_000), None);
    }

    #[test]
    fn test_disputed_cannot_finalize() {
        let r = Resolution {
            state: ResolutionState::Disputed,
            disputer: Address::repeat_byte(0x02),
            ..proposed(1_000)
        };
        assert!(r.is_disputed());
        assert!(!r.can_finalize(5_000));
        assert!(!r.is_dispute_window_open(0));
        assert_eq!(r.time_until_deadline(0), None);
    }

    #[test]
    fn test_outcome_only_when_finalized() {
        let r = proposed(1_000);
        assert_eq!(r.outcome(), None);
        let r = Resolution {
            state: ResolutionState::Finalized,
            final_outcome: OutcomeId::new(1),
            ..r
        };
        assert_eq!(r.outcome(), Some(OutcomeId::new(1)));
    }
}
