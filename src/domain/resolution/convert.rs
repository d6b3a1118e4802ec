use crate::contracts::abi::IResolutionModule;
use crate::contracts::ResolutionState;
use crate::domain::resolution::Resolution;
use crate::error::SdkError;
use crate::shared::{MarketId, OutcomeId};

impl TryFrom<(MarketId, IResolutionModule::Resolution)> for Resolution {
    type Error = SdkError;

    fn try_from(
        (market_id, r): (MarketId, IResolutionModule::Resolution),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            market_id,
            state: ResolutionState::try_from(r.state)?,
            proposed_outcome: OutcomeId(r.proposedOutcome),
            proposer: r.proposer,
            proposer_bond: r.proposerBond,
            disputer: r.disputer,
            disputer_bond: r.disputerBond,
            proposed_at: r.proposedAt,
            dispute_deadline: r.disputeDeadline,
            evidence_hash: r.evidenceHash,
            final_outcome: OutcomeId(r.finalOutcome),
        })
    }
}
