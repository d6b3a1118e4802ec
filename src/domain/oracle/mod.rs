//! Oracle adapter domain: adapter configuration and accepted proposals.

pub mod client;
mod convert;

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::shared::{MarketId, OutcomeId, ProposalId};

/// Current configuration of an oracle adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleConfig {
    pub address: Address,
    /// Key whose EIP-712 signatures the adapter accepts
    pub oracle_signer: Address,
    /// Module the adapter forwards accepted proposals to
    pub resolution_module: Address,
    pub owner: Address,
    pub domain_separator: B256,
}

/// An outcome proposal the adapter accepted (`OutcomeProposed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedProposal {
    pub proposal_id: ProposalId,
    pub market_id: MarketId,
    pub outcome_id: OutcomeId,
    pub evidence_hash: B256,
    /// Account that relayed the signed proposal
    pub submitter: Address,
}
