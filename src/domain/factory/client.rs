//! Market factory sub-client: market reads with a TTL cache, lifecycle calls, events.

use std::time::Instant;

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Filter;
use futures_util::future::try_join_all;

use crate::client::OracleMarketsClient;
use crate::contracts::abi::IMarketFactory;
use crate::contracts::{calls, CreateMarketParams};
use crate::domain::factory::state::MarketRegistry;
use crate::domain::factory::{CreatedMarket, Market};
use crate::error::{SdkError, SdkResult};
use crate::events::topics::{address_topics, market_topics, with_topic};
use crate::events::{self, event_filter, DecodedLog, LogQuery};
use crate::shared::MarketId;

#[cfg(feature = "ws")]
use crate::events::WatchHandle;
#[cfg(feature = "ws")]
use tokio::sync::mpsc;

/// Sub-client bound to one market factory.
pub struct Markets<'a> {
    pub(crate) client: &'a OracleMarketsClient,
    pub(crate) address: Address,
}

impl<'a> Markets<'a> {
    pub fn address(&self) -> Address {
        self.address
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Get a market by id. Uses the TTL cache unless reads are pinned to a block.
    pub async fn get_market(&self, id: MarketId) -> SdkResult<Market> {
        let cacheable = self.client.rpc.pinned_block().is_none();
        if cacheable {
            let cache = self.client.market_cache.read().await;
            if let Some((market, fetched_at)) = cache.get(&(self.address, id)) {
                if fetched_at.elapsed() < self.client.market_cache_ttl {
                    return Ok(market.clone());
                }
            }
        }

        let info = self
            .client
            .rpc
            .call(self.address, &IMarketFactory::getMarketCall { marketId: id.0 })
            .await?;
        let market = Market::try_from((id, info))?;
        if cacheable {
            self.cache_market(&market).await;
        }
        Ok(market)
    }

    /// Fetch several markets concurrently, preserving input order.
    pub async fn get_markets(&self, ids: &[MarketId]) -> SdkResult<Vec<Market>> {
        try_join_all(ids.iter().map(|id| self.get_market(*id))).await
    }

    /// Number of markets created so far.
    pub async fn market_count(&self) -> SdkResult<U256> {
        self.client
            .rpc
            .call(self.address, &IMarketFactory::marketCountCall {})
            .await
    }

    /// Market traded by the pool at `amm`.
    pub async fn market_id_by_amm(&self, amm: Address) -> SdkResult<MarketId> {
        let id = self
            .client
            .rpc
            .call(self.address, &IMarketFactory::marketIdByAmmCall { amm })
            .await?;
        Ok(MarketId(id))
    }

    /// Market record for the pool at `amm`.
    pub async fn get_market_by_amm(&self, amm: Address) -> SdkResult<Market> {
        let id = self.market_id_by_amm(amm).await?;
        let market = self.get_market(id).await?;
        if market.amm != amm {
            return Err(SdkError::Validation(format!(
                "Pool {amm} is not registered with factory {}",
                self.address
            )));
        }
        Ok(market)
    }

    pub async fn resolution_module(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IMarketFactory::resolutionModuleCall {})
            .await
    }

    pub async fn owner(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IMarketFactory::ownerCall {})
            .await
    }

    // ── Cache ────────────────────────────────────────────────────────────

    /// Invalidate a cached market.
    pub async fn invalidate(&self, id: MarketId) {
        self.client
            .market_cache
            .write()
            .await
            .remove(&(self.address, id));
    }

    /// Clear every cached market of this factory.
    pub async fn clear_cache(&self) {
        let address = self.address;
        self.client
            .market_cache
            .write()
            .await
            .retain(|(factory, _), _| *factory != address);
    }

    async fn cache_market(&self, market: &Market) {
        self.client
            .market_cache
            .write()
            .await
            .insert((self.address, market.id), (market.clone(), Instant::now()));
    }

    // ── Transactions ─────────────────────────────────────────────────────

    /// Create a market. Returns the transaction hash.
    pub async fn create_market(&self, params: &CreateMarketParams) -> SdkResult<B256> {
        params.validate()?;
        let tx = calls::build_create_market(self.address, params)?;
        self.client.rpc.send(tx).await
    }

    /// Create a market and wait for the factory's `MarketCreated` event.
    pub async fn create_market_and_confirm(
        &self,
        params: &CreateMarketParams,
    ) -> SdkResult<CreatedMarket> {
        params.validate()?;
        let tx = calls::build_create_market(self.address, params)?;
        let receipt = self.client.rpc.send_and_confirm(tx).await?;
        let created = CreatedMarket::try_from((self.address, &receipt))?;
        tracing::info!(
            market_id = %created.market_id,
            amm = %created.amm,
            "Market created"
        );
        Ok(created)
    }

    /// Close trading on a market. Waits for the receipt, then drops the cached entry.
    pub async fn close_market(&self, id: MarketId) -> SdkResult<B256> {
        let receipt = self
            .client
            .rpc
            .send_and_confirm(calls::build_close_market(self.address, id))
            .await?;
        self.invalidate(id).await;
        Ok(receipt.transaction_hash)
    }

    /// Void a market. Waits for the receipt, then drops the cached entry.
    pub async fn cancel_market(&self, id: MarketId) -> SdkResult<B256> {
        let receipt = self
            .client
            .rpc
            .send_and_confirm(calls::build_cancel_market(self.address, id))
            .await?;
        self.invalidate(id).await;
        Ok(receipt.transaction_hash)
    }

    // ── Events ───────────────────────────────────────────────────────────

    fn market_created_filter(&self, market_ids: &[MarketId], creators: &[Address]) -> Filter {
        let filter = event_filter::<IMarketFactory::MarketCreated>(self.address);
        let filter = with_topic(filter, 1, market_topics(market_ids));
        with_topic(filter, 2, address_topics(creators))
    }

    fn market_status_changed_filter(&self, market_ids: &[MarketId]) -> Filter {
        let filter = event_filter::<IMarketFactory::MarketStatusChanged>(self.address);
        with_topic(filter, 1, market_topics(market_ids))
    }

    /// Historical `MarketCreated` logs. Empty filter slices match everything.
    pub async fn market_created_logs(
        &self,
        query: LogQuery,
        market_ids: &[MarketId],
        creators: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IMarketFactory::MarketCreated>>> {
        let filter = self.market_created_filter(market_ids, creators);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn market_status_changed_logs(
        &self,
        query: LogQuery,
        market_ids: &[MarketId],
    ) -> SdkResult<Vec<DecodedLog<IMarketFactory::MarketStatusChanged>>> {
        let filter = self.market_status_changed_filter(market_ids);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    /// Build a registry from the factory's logs in `query`.
    ///
    /// An open-ended range is closed at the current head (or the pinned block) so both
    /// log queries see the same chain.
    ///
    /// Outcome counts are not part of the events; seed entries with
    /// [`MarketRegistry::insert`] from [`Self::get_market`] when they are needed.
    pub async fn load_registry(&self, mut query: LogQuery) -> SdkResult<MarketRegistry> {
        // Both queries must end at the same head.
        if query.block_hash.is_none() && query.to_block.is_none() {
            let head = match self.client.rpc.pinned_block().and_then(|block| block.as_u64()) {
                Some(number) => number,
                None => self.client.rpc.block_number().await?,
            };
            query.to_block = Some(head);
        }

        let (created, changed) = futures_util::try_join!(
            self.market_created_logs(query, &[], &[]),
            self.market_status_changed_logs(query, &[]),
        )?;

        // Status changes only apply to known markets, so replay in chain order.
        enum Entry {
            Created(DecodedLog<IMarketFactory::MarketCreated>),
            Changed(DecodedLog<IMarketFactory::MarketStatusChanged>),
        }
        fn position<E>(log: &DecodedLog<E>) -> (u64, u64) {
            (log.block_number.unwrap_or(0), log.log_index.unwrap_or(0))
        }
        let mut entries: Vec<((u64, u64), Entry)> = created
            .into_iter()
            .map(|log| (position(&log), Entry::Created(log)))
            .chain(changed.into_iter().map(|log| (position(&log), Entry::Changed(log))))
            .collect();
        entries.sort_by_key(|(position, _)| *position);

        let mut registry = MarketRegistry::new();
        for (_, entry) in entries {
            match entry {
                Entry::Created(log) => registry.apply_created_log(&log),
                Entry::Changed(log) => {
                    if !registry.apply_status_log(&log)? {
                        tracing::warn!(
                            market_id = %MarketId(log.event.marketId),
                            block = ?log.block_number,
                            "Status change for a market created outside the queried range"
                        );
                    }
                }
            }
        }
        tracing::debug!(markets = registry.len(), "Loaded market registry");
        Ok(registry)
    }

    #[cfg(feature = "ws")]
    pub async fn watch_market_created(
        &self,
        sink: mpsc::Sender<DecodedLog<IMarketFactory::MarketCreated>>,
        market_ids: &[MarketId],
        creators: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.market_created_filter(market_ids, creators);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_market_status_changed(
        &self,
        sink: mpsc::Sender<DecodedLog<IMarketFactory::MarketStatusChanged>>,
        market_ids: &[MarketId],
    ) -> SdkResult<WatchHandle> {
        let filter = self.market_status_changed_filter(market_ids);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }
}
