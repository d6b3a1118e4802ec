//! Oracle adapter sub-client: signed proposals, configuration reads, admin calls, events.

use alloy::primitives::{Address, B256};
use alloy::rpc::types::Filter;
use alloy::sol_types::Eip712Domain;

use crate::client::OracleMarketsClient;
use crate::contracts::abi::IAIOracleAdapter;
use crate::contracts::calls;
use crate::contracts::proposal::{proposal_domain, ProposalParams, SignedProposal};
use crate::domain::oracle::{AcceptedProposal, OracleConfig};
use crate::error::{SdkError, SdkResult};
use crate::events::topics::{address_topics, market_topics, with_topic};
use crate::events::{self, event_filter, DecodedLog, LogQuery};
use crate::shared::{MarketId, ProposalId};

#[cfg(feature = "ws")]
use crate::events::WatchHandle;
#[cfg(feature = "ws")]
use tokio::sync::mpsc;

/// Sub-client bound to one oracle adapter.
pub struct Oracle<'a> {
    pub(crate) client: &'a OracleMarketsClient,
    pub(crate) address: Address,
}

impl<'a> Oracle<'a> {
    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-712 domain of this adapter on the client's chain.
    pub fn domain(&self) -> Eip712Domain {
        proposal_domain(self.client.chain_id(), self.address)
    }

    // ── Proposals (local) ────────────────────────────────────────────────

    /// Sign a proposal with the client's signer.
    pub fn sign_proposal(&self, params: ProposalParams) -> SdkResult<SignedProposal> {
        let signer = self.client.signer.as_ref().ok_or(SdkError::MissingSigner)?;
        SignedProposal::new_signed(params, signer, self.client.chain_id(), self.address)
    }

    /// Proposal id this adapter will assign to `proposal`.
    pub fn proposal_id(&self, proposal: &SignedProposal) -> ProposalId {
        proposal.proposal_id(self.client.chain_id(), self.address)
    }

    /// Check the signature against the adapter's current oracle signer.
    pub async fn verify_proposal(&self, proposal: &SignedProposal) -> SdkResult<bool> {
        let expected = self.oracle_signer().await?;
        proposal.verify(self.client.chain_id(), self.address, expected)
    }

    /// `true` when the locally computed domain separator matches the adapter's.
    pub async fn verify_domain(&self) -> SdkResult<bool> {
        Ok(self.domain_separator().await? == self.domain().separator())
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn oracle_signer(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IAIOracleAdapter::oracleSignerCall {})
            .await
    }

    pub async fn resolution_module(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IAIOracleAdapter::resolutionModuleCall {})
            .await
    }

    pub async fn domain_separator(&self) -> SdkResult<B256> {
        self.client
            .rpc
            .call(self.address, &IAIOracleAdapter::DOMAIN_SEPARATORCall {})
            .await
    }

    pub async fn owner(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IAIOracleAdapter::ownerCall {})
            .await
    }

    pub async fn is_proposal_used(&self, proposal_id: ProposalId) -> SdkResult<bool> {
        self.client
            .rpc
            .call(
                self.address,
                &IAIOracleAdapter::isProposalUsedCall {
                    proposalId: proposal_id.as_b256(),
                },
            )
            .await
    }

    /// The adapter's own digest of `proposal`.
    pub async fn hash_proposal(&self, proposal: &SignedProposal) -> SdkResult<ProposalId> {
        let hash = self
            .client
            .rpc
            .call(
                self.address,
                &IAIOracleAdapter::hashProposalCall {
                    proposal: proposal.to_abi(),
                },
            )
            .await?;
        Ok(ProposalId(hash))
    }

    /// Fetch signer, module, owner and domain separator concurrently.
    pub async fn config(&self) -> SdkResult<OracleConfig> {
        let (oracle_signer, resolution_module, owner, domain_separator) = futures_util::try_join!(
            self.oracle_signer(),
            self.resolution_module(),
            self.owner(),
            self.domain_separator(),
        )?;
        Ok(OracleConfig {
            address: self.address,
            oracle_signer,
            resolution_module,
            owner,
            domain_separator,
        })
    }

    // ── Transactions ─────────────────────────────────────────────────────

    /// Submit a signed proposal. Returns the transaction hash.
    pub async fn propose_outcome(&self, proposal: &SignedProposal) -> SdkResult<B256> {
        let tx = calls::build_propose_outcome(self.address, proposal)?;
        self.client.rpc.send(tx).await
    }

    /// Submit a signed proposal and wait for the adapter to accept it.
    pub async fn propose_outcome_and_confirm(
        &self,
        proposal: &SignedProposal,
    ) -> SdkResult<AcceptedProposal> {
        let tx = calls::build_propose_outcome(self.address, proposal)?;
        let receipt = self.client.rpc.send_and_confirm(tx).await?;
        AcceptedProposal::try_from((self.address, &receipt))
    }

    pub async fn set_oracle_signer(&self, new_signer: Address) -> SdkResult<B256> {
        let tx = calls::build_set_oracle_signer(self.address, new_signer);
        self.client.rpc.send(tx).await
    }

    pub async fn set_resolution_module(&self, new_module: Address) -> SdkResult<B256> {
        let tx = calls::build_set_resolution_module(self.address, new_module);
        self.client.rpc.send(tx).await
    }

    // ── Events ───────────────────────────────────────────────────────────

    fn outcome_proposed_filter(
        &self,
        proposal_ids: &[ProposalId],
        market_ids: &[MarketId],
        submitters: &[Address],
    ) -> Filter {
        let filter = event_filter::<IAIOracleAdapter::OutcomeProposed>(self.address);
        let filter = with_topic(filter, 1, proposal_ids.iter().map(|id| id.as_b256()).collect());
        let filter = with_topic(filter, 2, market_topics(market_ids));
        with_topic(filter, 3, address_topics(submitters))
    }

    fn oracle_signer_updated_filter(&self, previous: &[Address], new: &[Address]) -> Filter {
        let filter = event_filter::<IAIOracleAdapter::OracleSignerUpdated>(self.address);
        let filter = with_topic(filter, 1, address_topics(previous));
        with_topic(filter, 2, address_topics(new))
    }

    fn resolution_module_updated_filter(&self, previous: &[Address], new: &[Address]) -> Filter {
        let filter = event_filter::<IAIOracleAdapter::ResolutionModuleUpdated>(self.address);
        let filter = with_topic(filter, 1, address_topics(previous));
        with_topic(filter, 2, address_topics(new))
    }

    /// Historical `OutcomeProposed` logs. Empty filter slices match everything.
    pub async fn outcome_proposed_logs(
        &self,
        query: LogQuery,
        proposal_ids: &[ProposalId],
        market_ids: &[MarketId],
        submitters: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IAIOracleAdapter::OutcomeProposed>>> {
        let filter = self.outcome_proposed_filter(proposal_ids, market_ids, submitters);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    /// Accepted proposals for the given markets, oldest first.
    pub async fn accepted_proposals(
        &self,
        query: LogQuery,
        market_ids: &[MarketId],
    ) -> SdkResult<Vec<AcceptedProposal>> {
        let logs = self.outcome_proposed_logs(query, &[], market_ids, &[]).await?;
        Ok(logs
            .into_iter()
            .map(|log| AcceptedProposal::from(log.event))
            .collect())
    }

    pub async fn oracle_signer_updated_logs(
        &self,
        query: LogQuery,
        previous: &[Address],
        new: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IAIOracleAdapter::OracleSignerUpdated>>> {
        let filter = self.oracle_signer_updated_filter(previous, new);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn resolution_module_updated_logs(
        &self,
        query: LogQuery,
        previous: &[Address],
        new: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IAIOracleAdapter::ResolutionModuleUpdated>>> {
        let filter = self.resolution_module_updated_filter(previous, new);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_outcome_proposed(
        &self,
        sink: mpsc::Sender<DecodedLog<IAIOracleAdapter::OutcomeProposed>>,
        proposal_ids: &[ProposalId],
        market_ids: &[MarketId],
        submitters: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.outcome_proposed_filter(proposal_ids, market_ids, submitters);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_oracle_signer_updated(
        &self,
        sink: mpsc::Sender<DecodedLog<IAIOracleAdapter::OracleSignerUpdated>>,
        previous: &[Address],
        new: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.oracle_signer_updated_filter(previous, new);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_resolution_module_updated(
        &self,
        sink: mpsc::Sender<DecodedLog<IAIOracleAdapter::ResolutionModuleUpdated>>,
        previous: &[Address],
        new: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.resolution_module_updated_filter(previous, new);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }
}
