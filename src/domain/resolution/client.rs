//! Resolution module sub-client.

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;

use crate::client::OracleMarketsClient;
use crate::contracts::abi::IResolutionModule;
use crate::contracts::calls;
use crate::domain::resolution::{Resolution, ResolutionParams};
use crate::error::SdkResult;
use crate::events::topics::{address_topics, market_topics, with_topic};
use crate::events::{self, event_filter, DecodedLog, LogQuery};
use crate::shared::{MarketId, OutcomeId};

#[cfg(feature = "ws")]
use crate::events::WatchHandle;
#[cfg(feature = "ws")]
use tokio::sync::mpsc;

/// Sub-client bound to one resolution module.
pub struct Resolutions<'a> {
    pub(crate) client: &'a OracleMarketsClient,
    pub(crate) address: Address,
}

impl<'a> Resolutions<'a> {
    pub fn address(&self) -> Address {
        self.address
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn get_resolution(&self, market_id: MarketId) -> SdkResult<Resolution> {
        let r = self
            .client
            .rpc
            .call(
                self.address,
                &IResolutionModule::getResolutionCall {
                    marketId: market_id.as_u256(),
                },
            )
            .await?;
        Resolution::try_from((market_id, r))
    }

    /// Resolution record plus the current block timestamp, for the timing helpers.
    pub async fn get_resolution_with_time(
        &self,
        market_id: MarketId,
    ) -> SdkResult<(Resolution, u64)> {
        futures_util::try_join!(
            self.get_resolution(market_id),
            self.client.rpc.block_timestamp(),
        )
    }

    pub async fn dispute_window(&self) -> SdkResult<u64> {
        self.client
            .rpc
            .call(self.address, &IResolutionModule::disputeWindowCall {})
            .await
    }

    pub async fn proposer_bond(&self) -> SdkResult<U256> {
        self.client
            .rpc
            .call(self.address, &IResolutionModule::proposerBondCall {})
            .await
    }

    pub async fn disputer_bond(&self) -> SdkResult<U256> {
        self.client
            .rpc
            .call(self.address, &IResolutionModule::disputerBondCall {})
            .await
    }

    pub async fn bond_token(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IResolutionModule::bondTokenCall {})
            .await
    }

    pub async fn arbiter(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IResolutionModule::arbiterCall {})
            .await
    }

    pub async fn oracle_adapter(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IResolutionModule::oracleAdapterCall {})
            .await
    }

    /// Fetch every module parameter concurrently.
    pub async fn params(&self) -> SdkResult<ResolutionParams> {
        let (dispute_window, proposer_bond, disputer_bond, bond_token, arbiter, oracle_adapter) =
            futures_util::try_join!(
                self.dispute_window(),
                self.proposer_bond(),
                self.disputer_bond(),
                self.bond_token(),
                self.arbiter(),
                self.oracle_adapter(),
            )?;
        Ok(ResolutionParams {
            address: self.address,
            dispute_window,
            proposer_bond,
            disputer_bond,
            bond_token,
            arbiter,
            oracle_adapter,
        })
    }

    // ── Transactions ─────────────────────────────────────────────────────

    /// Propose an outcome directly, posting the proposer bond.
    pub async fn propose_resolution(
        &self,
        market_id: MarketId,
        outcome_id: OutcomeId,
        evidence_hash: B256,
    ) -> SdkResult<B256> {
        let tx = calls::build_propose_resolution(self.address, market_id, outcome_id, evidence_hash);
        self.client.rpc.send(tx).await
    }

    /// Dispute the pending proposal, posting the disputer bond.
    pub async fn dispute(&self, market_id: MarketId, evidence_hash: B256) -> SdkResult<B256> {
        let tx = calls::build_dispute(self.address, market_id, evidence_hash);
        self.client.rpc.send(tx).await
    }

    pub async fn finalize(&self, market_id: MarketId) -> SdkResult<B256> {
        let tx = calls::build_finalize(self.address, market_id);
        self.client.rpc.send(tx).await
    }

    /// Arbiter only.
    pub async fn adjudicate(&self, market_id: MarketId, outcome_id: OutcomeId) -> SdkResult<B256> {
        let tx = calls::build_adjudicate(self.address, market_id, outcome_id);
        self.client.rpc.send(tx).await
    }

    // ── Events ───────────────────────────────────────────────────────────

    /// Filter for events indexed as `(marketId, account)`. Also serves
    /// `ResolutionFinalized`, which only indexes the market.
    fn market_filter<E: SolEvent>(&self, market_ids: &[MarketId], accounts: &[Address]) -> Filter {
        let filter = event_filter::<E>(self.address);
        let filter = with_topic(filter, 1, market_topics(market_ids));
        with_topic(filter, 2, address_topics(accounts))
    }

    pub async fn resolution_proposed_logs(
        &self,
        query: LogQuery,
        market_ids: &[MarketId],
        proposers: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IResolutionModule::ResolutionProposed>>> {
        let filter = self.market_filter::<IResolutionModule::ResolutionProposed>(market_ids, proposers);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn resolution_disputed_logs(
        &self,
        query: LogQuery,
        market_ids: &[MarketId],
        disputers: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IResolutionModule::ResolutionDisputed>>> {
        let filter = self.market_filter::<IResolutionModule::ResolutionDisputed>(market_ids, disputers);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn resolution_finalized_logs(
        &self,
        query: LogQuery,
        market_ids: &[MarketId],
    ) -> SdkResult<Vec<DecodedLog<IResolutionModule::ResolutionFinalized>>> {
        let filter = self.market_filter::<IResolutionModule::ResolutionFinalized>(market_ids, &[]);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn bond_slashed_logs(
        &self,
        query: LogQuery,
        market_ids: &[MarketId],
        accounts: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IResolutionModule::BondSlashed>>> {
        let filter = self.market_filter::<IResolutionModule::BondSlashed>(market_ids, accounts);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn bond_returned_logs(
        &self,
        query: LogQuery,
        market_ids: &[MarketId],
        accounts: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IResolutionModule::BondReturned>>> {
        let filter = self.market_filter::<IResolutionModule::BondReturned>(market_ids, accounts);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_resolution_proposed(
        &self,
        sink: mpsc::Sender<DecodedLog<IResolutionModule::ResolutionProposed>>,
        market_ids: &[MarketId],
        proposers: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.market_filter::<IResolutionModule::ResolutionProposed>(market_ids, proposers);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_resolution_disputed(
        &self,
        sink: mpsc::Sender<DecodedLog<IResolutionModule::ResolutionDisputed>>,
        market_ids: &[MarketId],
        disputers: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.market_filter::<IResolutionModule::ResolutionDisputed>(market_ids, disputers);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_resolution_finalized(
        &self,
        sink: mpsc::Sender<DecodedLog<IResolutionModule::ResolutionFinalized>>,
        market_ids: &[MarketId],
    ) -> SdkResult<WatchHandle> {
        let filter = self.market_filter::<IResolutionModule::ResolutionFinalized>(market_ids, &[]);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_bond_slashed(
        &self,
        sink: mpsc::Sender<DecodedLog<IResolutionModule::BondSlashed>>,
        market_ids: &[MarketId],
        accounts: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.market_filter::<IResolutionModule::BondSlashed>(market_ids, accounts);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_bond_returned(
        &self,
        sink: mpsc::Sender<DecodedLog<IResolutionModule::BondReturned>>,
        market_ids: &[MarketId],
        accounts: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.market_filter::<IResolutionModule::BondReturned>(market_ids, accounts);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }
}
