//! Pool sub-client: state reads, liquidity and swap calls, redemption, events.

use alloy::eips::BlockId;
use alloy::primitives::{Address, B256};
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;

use crate::client::OracleMarketsClient;
use crate::contracts::abi::IPoolMarket;
use crate::contracts::{
    calls, from_int24, position_key, to_int24, BurnParams, CollectParams, MintParams, SwapParams,
};
use crate::domain::pool::{PoolInfo, PoolSnapshot, PositionInfo, Slot0, TickInfo};
use crate::error::SdkResult;
use crate::events::topics::{address_topics, int24_topics, with_topic};
use crate::events::{self, event_filter, DecodedLog, LogQuery};
use crate::rpc::RpcCaller;
use crate::shared::MarketId;

#[cfg(feature = "ws")]
use crate::events::WatchHandle;
#[cfg(feature = "ws")]
use tokio::sync::mpsc;

/// Sub-client bound to one pool (AMM) contract.
pub struct Pool<'a> {
    pub(crate) client: &'a OracleMarketsClient,
    pub(crate) address: Address,
}

impl<'a> Pool<'a> {
    pub fn address(&self) -> Address {
        self.address
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn market_id(&self) -> SdkResult<MarketId> {
        let id = self
            .client
            .rpc
            .call(self.address, &IPoolMarket::marketIdCall {})
            .await?;
        Ok(MarketId(id))
    }

    pub async fn factory(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IPoolMarket::factoryCall {})
            .await
    }

    pub async fn collateral_token(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IPoolMarket::collateralTokenCall {})
            .await
    }

    pub async fn token0(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IPoolMarket::token0Call {})
            .await
    }

    pub async fn token1(&self) -> SdkResult<Address> {
        self.client
            .rpc
            .call(self.address, &IPoolMarket::token1Call {})
            .await
    }

    pub async fn fee(&self) -> SdkResult<u32> {
        read_fee(&self.client.rpc, self.address).await
    }

    pub async fn tick_spacing(&self) -> SdkResult<i32> {
        read_tick_spacing(&self.client.rpc, self.address).await
    }

    pub async fn slot0(&self) -> SdkResult<Slot0> {
        read_slot0(&self.client.rpc, self.address).await
    }

    /// Liquidity currently in range.
    pub async fn liquidity(&self) -> SdkResult<u128> {
        read_liquidity(&self.client.rpc, self.address).await
    }

    pub async fn tick(&self, tick: i32) -> SdkResult<TickInfo> {
        let tick = to_int24("tick", tick)?;
        let r = self
            .client
            .rpc
            .call(self.address, &IPoolMarket::ticksCall { tick })
            .await?;
        Ok(r.into())
    }

    /// Position by its storage key (see [`position_key`]).
    pub async fn position_by_key(&self, key: B256) -> SdkResult<PositionInfo> {
        let r = self
            .client
            .rpc
            .call(self.address, &IPoolMarket::positionsCall { key })
            .await?;
        Ok(r.into())
    }

    pub async fn position(
        &self,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> SdkResult<PositionInfo> {
        let key = position_key(owner, tick_lower, tick_upper)?;
        self.position_by_key(key).await
    }

    /// Fetch every immutable pool parameter concurrently.
    pub async fn info(&self) -> SdkResult<PoolInfo> {
        let (market_id, factory, collateral_token, token0, token1, fee, tick_spacing) =
            futures_util::try_join!(
                self.market_id(),
                self.factory(),
                self.collateral_token(),
                self.token0(),
                self.token1(),
                self.fee(),
                self.tick_spacing(),
            )?;
        Ok(PoolInfo {
            address: self.address,
            market_id,
            factory,
            collateral_token,
            token0,
            token1,
            fee,
            tick_spacing,
        })
    }

    /// Read price state, liquidity, fee and tick spacing at one block.
    ///
    /// Uses the client's pinned block when set, otherwise pins the latest block number.
    pub async fn snapshot(&self) -> SdkResult<PoolSnapshot> {
        let (rpc, block_number) = match self.client.rpc.pinned_block() {
            Some(block) => (self.client.rpc.clone(), block.as_u64()),
            None => {
                let number = self.client.rpc.block_number().await?;
                (self.client.rpc.at_block(BlockId::number(number)), Some(number))
            }
        };
        let (slot0, liquidity, fee, tick_spacing) = futures_util::try_join!(
            read_slot0(&rpc, self.address),
            read_liquidity(&rpc, self.address),
            read_fee(&rpc, self.address),
            read_tick_spacing(&rpc, self.address),
        )?;
        Ok(PoolSnapshot {
            address: self.address,
            block_number,
            slot0,
            liquidity,
            fee,
            tick_spacing,
        })
    }

    // ── Transactions ─────────────────────────────────────────────────────

    pub async fn mint(&self, params: &MintParams) -> SdkResult<B256> {
        self.client
            .rpc
            .send(calls::build_mint(self.address, params)?)
            .await
    }

    pub async fn burn(&self, params: &BurnParams) -> SdkResult<B256> {
        self.client
            .rpc
            .send(calls::build_burn(self.address, params)?)
            .await
    }

    pub async fn collect(&self, params: &CollectParams) -> SdkResult<B256> {
        self.client
            .rpc
            .send(calls::build_collect(self.address, params)?)
            .await
    }

    pub async fn swap(&self, params: &SwapParams) -> SdkResult<B256> {
        self.client
            .rpc
            .send(calls::build_swap(self.address, params)?)
            .await
    }

    /// Redeem winning outcome tokens to the signer's own address.
    pub async fn redeem(&self) -> SdkResult<B256> {
        let recipient = self.client.rpc.require_signer()?;
        self.redeem_to(recipient).await
    }

    pub async fn redeem_to(&self, recipient: Address) -> SdkResult<B256> {
        self.client
            .rpc
            .send(calls::build_redeem(self.address, recipient))
            .await
    }

    // ── Events ───────────────────────────────────────────────────────────

    /// Filter for `Mint`, `Burn` or `Collect`, which share the indexed layout
    /// `(owner, tickLower, tickUpper)`.
    fn position_filter<E: SolEvent>(
        &self,
        owners: &[Address],
        tick_lowers: &[i32],
        tick_uppers: &[i32],
    ) -> SdkResult<Filter> {
        let filter = event_filter::<E>(self.address);
        let filter = with_topic(filter, 1, address_topics(owners));
        let filter = with_topic(filter, 2, int24_topics(tick_lowers)?);
        Ok(with_topic(filter, 3, int24_topics(tick_uppers)?))
    }

    fn swap_filter(&self, senders: &[Address], recipients: &[Address]) -> Filter {
        let filter = event_filter::<IPoolMarket::Swap>(self.address);
        let filter = with_topic(filter, 1, address_topics(senders));
        with_topic(filter, 2, address_topics(recipients))
    }

    fn redeemed_filter(&self, accounts: &[Address]) -> Filter {
        let filter = event_filter::<IPoolMarket::Redeemed>(self.address);
        with_topic(filter, 1, address_topics(accounts))
    }

    pub async fn mint_logs(
        &self,
        query: LogQuery,
        owners: &[Address],
        tick_lowers: &[i32],
        tick_uppers: &[i32],
    ) -> SdkResult<Vec<DecodedLog<IPoolMarket::Mint>>> {
        let filter = self.position_filter::<IPoolMarket::Mint>(owners, tick_lowers, tick_uppers)?;
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn burn_logs(
        &self,
        query: LogQuery,
        owners: &[Address],
        tick_lowers: &[i32],
        tick_uppers: &[i32],
    ) -> SdkResult<Vec<DecodedLog<IPoolMarket::Burn>>> {
        let filter = self.position_filter::<IPoolMarket::Burn>(owners, tick_lowers, tick_uppers)?;
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn collect_logs(
        &self,
        query: LogQuery,
        owners: &[Address],
        tick_lowers: &[i32],
        tick_uppers: &[i32],
    ) -> SdkResult<Vec<DecodedLog<IPoolMarket::Collect>>> {
        let filter =
            self.position_filter::<IPoolMarket::Collect>(owners, tick_lowers, tick_uppers)?;
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn swap_logs(
        &self,
        query: LogQuery,
        senders: &[Address],
        recipients: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IPoolMarket::Swap>>> {
        let filter = self.swap_filter(senders, recipients);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    pub async fn redeemed_logs(
        &self,
        query: LogQuery,
        accounts: &[Address],
    ) -> SdkResult<Vec<DecodedLog<IPoolMarket::Redeemed>>> {
        let filter = self.redeemed_filter(accounts);
        events::query_logs(&self.client.rpc, filter, query).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_mint(
        &self,
        sink: mpsc::Sender<DecodedLog<IPoolMarket::Mint>>,
        owners: &[Address],
        tick_lowers: &[i32],
        tick_uppers: &[i32],
    ) -> SdkResult<WatchHandle> {
        let filter = self.position_filter::<IPoolMarket::Mint>(owners, tick_lowers, tick_uppers)?;
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_burn(
        &self,
        sink: mpsc::Sender<DecodedLog<IPoolMarket::Burn>>,
        owners: &[Address],
        tick_lowers: &[i32],
        tick_uppers: &[i32],
    ) -> SdkResult<WatchHandle> {
        let filter = self.position_filter::<IPoolMarket::Burn>(owners, tick_lowers, tick_uppers)?;
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_collect(
        &self,
        sink: mpsc::Sender<DecodedLog<IPoolMarket::Collect>>,
        owners: &[Address],
        tick_lowers: &[i32],
        tick_uppers: &[i32],
    ) -> SdkResult<WatchHandle> {
        let filter =
            self.position_filter::<IPoolMarket::Collect>(owners, tick_lowers, tick_uppers)?;
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    /// Stream swaps as they land. Each `Swap` carries the post-trade price and tick.
    #[cfg(feature = "ws")]
    pub async fn watch_swap(
        &self,
        sink: mpsc::Sender<DecodedLog<IPoolMarket::Swap>>,
        senders: &[Address],
        recipients: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.swap_filter(senders, recipients);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }

    #[cfg(feature = "ws")]
    pub async fn watch_redeemed(
        &self,
        sink: mpsc::Sender<DecodedLog<IPoolMarket::Redeemed>>,
        accounts: &[Address],
    ) -> SdkResult<WatchHandle> {
        let filter = self.redeemed_filter(accounts);
        events::watch_logs(&self.client.rpc, filter, sink, &self.client.watch_config).await
    }
}

// ─── Reads shared with snapshot() ────────────────────────────────────────────

async fn read_slot0(rpc: &RpcCaller, pool: Address) -> SdkResult<Slot0> {
    let r = rpc.call(pool, &IPoolMarket::slot0Call {}).await?;
    Slot0::try_from(r)
}

async fn read_liquidity(rpc: &RpcCaller, pool: Address) -> SdkResult<u128> {
    rpc.call(pool, &IPoolMarket::liquidityCall {}).await
}

async fn read_fee(rpc: &RpcCaller, pool: Address) -> SdkResult<u32> {
    let fee = rpc.call(pool, &IPoolMarket::feeCall {}).await?;
    Ok(fee.saturating_to::<u32>())
}

async fn read_tick_spacing(rpc: &RpcCaller, pool: Address) -> SdkResult<i32> {
    let spacing = rpc.call(pool, &IPoolMarket::tickSpacingCall {}).await?;
    from_int24("tick_spacing", spacing)
}
