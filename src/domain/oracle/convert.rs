use alloy::primitives::Address;
use alloy::rpc::types::TransactionReceipt;

use crate::contracts::abi::IAIOracleAdapter;
use crate::domain::oracle::AcceptedProposal;
use crate::error::SdkError;
use crate::events::decode_matching;
use crate::shared::{MarketId, OutcomeId, ProposalId};

impl From<IAIOracleAdapter::OutcomeProposed> for AcceptedProposal {
    fn from(e: IAIOracleAdapter::OutcomeProposed) -> Self {
        Self {
            proposal_id: ProposalId(e.proposalId),
            market_id: MarketId(e.marketId),
            outcome_id: OutcomeId(e.outcomeId),
            evidence_hash: e.evidenceHash,
            submitter: e.submitter,
        }
    }
}

impl TryFrom<(Address, &TransactionReceipt)> for AcceptedProposal {
    type Error = SdkError;

    fn try_from((adapter, receipt): (Address, &TransactionReceipt)) -> Result<Self, Self::Error> {
        decode_matching::<IAIOracleAdapter::OutcomeProposed>(receipt.inner.logs())?
            .into_iter()
            .find(|log| log.address == adapter)
            .map(|log| Self::from(log.event))
            .ok_or(SdkError::MissingEvent {
                event: "OutcomeProposed",
                tx_hash: receipt.transaction_hash,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::fixtures::{log, receipt, TX_HASH};
    use alloy::primitives::{B256, U256};
    use alloy::sol_types::SolEvent;

    fn proposed(market_id: u8) -> IAIOracleAdapter::OutcomeProposed {
        IAIOracleAdapter::OutcomeProposed {
            proposalId: B256::repeat_byte(market_id),
            marketId: U256::from(market_id),
            outcomeId: U256::from(1u8),
            evidenceHash: B256::repeat_byte(0x02),
            submitter: Address::repeat_byte(0x03),
        }
    }

    #[test]
    fn test_accepted_proposal_from_receipt() {
        let adapter = Address::repeat_byte(0xad);
        let logs = vec![
            log(Address::repeat_byte(0xae), proposed(1).encode_log_data(), 0),
            log(adapter, proposed(2).encode_log_data(), 1),
        ];
        let accepted = AcceptedProposal::try_from((adapter, &receipt(true, logs))).unwrap();
        assert_eq!(accepted.market_id, MarketId::new(2));
        assert_eq!(accepted.proposal_id, ProposalId(B256::repeat_byte(2)));
    }

    #[test]
    fn test_accepted_proposal_missing_event() {
        let adapter = Address::repeat_byte(0xad);
        let logs = vec![log(Address::repeat_byte(0xae), proposed(1).encode_log_data(), 0)];
        let err = AcceptedProposal::try_from((adapter, &receipt(true, logs))).unwrap_err();
        assert!(matches!(
            err,
            SdkError::MissingEvent { event: "OutcomeProposed", tx_hash } if tx_hash == TX_HASH
        ));
    }

    #[test]
    fn test_outcome_proposed_conversion() {
        let event = IAIOracleAdapter::OutcomeProposed {
            proposalId: B256::repeat_byte(0x01),
            marketId: U256::from(12u8),
            outcomeId: U256::from(1u8),
            evidenceHash: B256::repeat_byte(0x02),
            submitter: Address::repeat_byte(0x03),
        };
        let accepted = AcceptedProposal::from(event);
        assert_eq!(accepted.proposal_id, ProposalId(B256::repeat_byte(0x01)));
        assert_eq!(accepted.market_id, MarketId::new(12));
        assert_eq!(accepted.outcome_id, OutcomeId::new(1));
        assert_eq!(accepted.submitter, Address::repeat_byte(0x03));
    }
}
