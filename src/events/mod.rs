//! Typed contract events: decoded logs, filters, historical queries and watchers.

pub mod protocol;
pub mod topics;
pub mod watcher;

pub use protocol::ProtocolEvent;
pub use watcher::{EventStream, LogStream, WatchConfig, WatchHandle};

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256};
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use crate::error::SdkResult;
use crate::rpc::RpcCaller;

/// A decoded event plus the log metadata it arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLog<E> {
    pub event: E,
    /// Emitting contract
    pub address: Address,
    pub block_number: Option<u64>,
    pub block_hash: Option<B256>,
    pub block_timestamp: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub log_index: Option<u64>,
    /// `true` when the log was dropped by a reorg
    pub removed: bool,
}

/// Decode a raw log as `E`. Fails when the first topic or the data does not match.
pub fn decode_log<E: SolEvent>(log: &Log) -> Result<DecodedLog<E>, alloy::sol_types::Error> {
    let event = E::decode_log_data(log.data())?;
    Ok(DecodedLog {
        event,
        address: log.address(),
        block_number: log.block_number,
        block_hash: log.block_hash,
        block_timestamp: log.block_timestamp,
        transaction_hash: log.transaction_hash,
        log_index: log.log_index,
        removed: log.removed,
    })
}

/// Decode every log matching `E`'s signature, skipping unrelated logs.
///
/// Used on transaction receipts, which mix events from several contracts.
pub fn decode_matching<E: SolEvent>(logs: &[Log]) -> SdkResult<Vec<DecodedLog<E>>> {
    logs.iter()
        .filter(|log| log.topics().first() == Some(&E::SIGNATURE_HASH))
        .map(|log| decode_log::<E>(log).map_err(Into::into))
        .collect()
}

/// Base filter for event `E` emitted by `address`.
pub fn event_filter<E: SolEvent>(address: Address) -> Filter {
    Filter::new()
        .address(address)
        .event_signature(E::SIGNATURE_HASH)
}

// ─── LogQuery ────────────────────────────────────────────────────────────────

/// Block range of a historical log query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
    /// Query a single block by hash. Overrides the range.
    pub block_hash: Option<B256>,
}

impl LogQuery {
    /// Every block from genesis to latest.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn range(from_block: u64, to_block: u64) -> Self {
        Self {
            from_block: Some(from_block),
            to_block: Some(to_block),
            block_hash: None,
        }
    }

    pub fn since(from_block: u64) -> Self {
        Self {
            from_block: Some(from_block),
            ..Self::default()
        }
    }

    pub fn at_block_hash(block_hash: B256) -> Self {
        Self {
            block_hash: Some(block_hash),
            ..Self::default()
        }
    }

    /// Apply the range to a filter.
    pub fn apply(&self, filter: Filter) -> Filter {
        if let Some(hash) = self.block_hash {
            return filter.at_block_hash(hash);
        }
        let from = self
            .from_block
            .map(BlockNumberOrTag::Number)
            .unwrap_or(BlockNumberOrTag::Earliest);
        let to = self
            .to_block
            .map(BlockNumberOrTag::Number)
            .unwrap_or(BlockNumberOrTag::Latest);
        filter.from_block(from).to_block(to)
    }
}

// ─── Shared query / watch plumbing ───────────────────────────────────────────

/// Run a historical query and decode every log as `E`.
pub(crate) async fn query_logs<E: SolEvent>(
    rpc: &RpcCaller,
    filter: Filter,
    query: LogQuery,
) -> SdkResult<Vec<DecodedLog<E>>> {
    let filter = query.apply(filter);
    let logs = rpc.get_logs(&filter).await?;
    logs.iter()
        .map(|log| decode_log::<E>(log).map_err(Into::into))
        .collect()
}

/// Subscribe to `filter` and forward decoded `E` events into `sink`.
///
/// Subscription errors are returned before any task is spawned.
#[cfg(feature = "ws")]
pub(crate) async fn watch_logs<E>(
    rpc: &RpcCaller,
    filter: Filter,
    sink: tokio::sync::mpsc::Sender<DecodedLog<E>>,
    config: &WatchConfig,
) -> SdkResult<WatchHandle>
where
    E: SolEvent + Send + 'static,
{
    use crate::error::WatchError;
    use watcher::{subscription_stream, Resubscribe, ResubscribeFuture};

    let subscription = rpc.subscribe_logs(&filter).await?;
    let resubscribe: Option<Resubscribe> = config.resubscribe.config().map(|_| {
        let rpc = rpc.clone();
        let filter = filter.clone();
        Box::new(move || -> ResubscribeFuture {
            let rpc = rpc.clone();
            let filter = filter.clone();
            Box::pin(async move {
                rpc.subscribe_logs(&filter)
                    .await
                    .map(subscription_stream)
                    .map_err(|e| WatchError::SubscribeFailed(e.to_string()))
            })
        }) as Resubscribe
    });

    Ok(watcher::spawn_watcher::<E>(
        subscription_stream(subscription),
        sink,
        config.resubscribe.clone(),
        resubscribe,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::abi::{IMarketFactory, IResolutionModule};
    use alloy::primitives::U256;

    fn log_with(data: alloy::primitives::LogData) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0x0f),
                data,
            },
            block_number: Some(10),
            transaction_hash: Some(B256::repeat_byte(0xee)),
            log_index: Some(2),
            ..Default::default()
        }
    }

    fn finalized(market: u64) -> Log {
        log_with(
            IResolutionModule::ResolutionFinalized {
                marketId: U256::from(market),
                outcomeId: U256::from(1u8),
                disputed: false,
            }
            .encode_log_data(),
        )
    }

    #[test]
    fn test_decode_log_keeps_metadata() {
        let decoded = decode_log::<IResolutionModule::ResolutionFinalized>(&finalized(3)).unwrap();
        assert_eq!(decoded.event.marketId, U256::from(3u8));
        assert_eq!(decoded.address, Address::repeat_byte(0x0f));
        assert_eq!(decoded.block_number, Some(10));
        assert_eq!(decoded.log_index, Some(2));
        assert!(!decoded.removed);
    }

    #[test]
    fn test_decode_log_wrong_event() {
        assert!(decode_log::<IMarketFactory::MarketStatusChanged>(&finalized(3)).is_err());
    }

    #[test]
    fn test_decode_matching_skips_other_events() {
        let status = log_with(
            IMarketFactory::MarketStatusChanged {
                marketId: U256::from(3u8),
                previousStatus: 2,
                newStatus: 4,
            }
            .encode_log_data(),
        );
        let logs = vec![finalized(3), status, finalized(4)];
        let decoded =
            decode_matching::<IResolutionModule::ResolutionFinalized>(&logs).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].event.marketId, U256::from(4u8));
    }

    #[test]
    fn test_event_filter() {
        let address = Address::repeat_byte(0x01);
        let filter = event_filter::<IMarketFactory::MarketCreated>(address);
        assert!(filter.address.matches(&address));
        assert!(filter.topics[0].matches(&IMarketFactory::MarketCreated::SIGNATURE_HASH));
    }

    #[test]
    fn test_log_query_apply() {
        let filter = LogQuery::range(5, 10).apply(Filter::new());
        assert_eq!(filter.get_from_block(), Some(5));
        assert_eq!(filter.get_to_block(), Some(10));

        let filter = LogQuery::since(7).apply(Filter::new());
        assert_eq!(filter.get_from_block(), Some(7));
        assert_eq!(filter.get_to_block(), None);

        let hash = B256::repeat_byte(0x42);
        let filter = LogQuery::at_block_hash(hash).apply(Filter::new());
        assert_eq!(filter.get_block_hash(), Some(hash));
    }
}
