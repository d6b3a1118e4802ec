//! Subscribe-and-forward event watchers.
//!
//! A watcher owns a background tokio task that reads a log stream, decodes each log and
//! forwards it to a caller-supplied `mpsc::Sender`. The task stops when:
//! - the handle unsubscribes (or is dropped, which aborts it),
//! - the sink's receiver is dropped,
//! - the stream ends or a log fails to decode (returned as a [`WatchError`]).
//!
//! With a non-`None` [`WatchConfig::resubscribe`] policy a closed subscription is reopened
//! with backoff instead of ending the watcher. Logs emitted while the subscription was
//! down are not replayed; use the historical `*_logs` queries to backfill.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use futures_util::stream::{Stream, StreamExt};
use pin_project_lite::pin_project;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::WatchError;
use crate::events::{decode_log, DecodedLog};
use crate::rpc::retry::RetryPolicy;

/// Boxed stream of raw logs feeding a watcher.
pub type LogStream = Pin<Box<dyn Stream<Item = Result<Log, WatchError>> + Send>>;

/// Future reopening a log stream.
pub type ResubscribeFuture = Pin<Box<dyn Future<Output = Result<LogStream, WatchError>> + Send>>;

/// Factory used to reopen a subscription after it closes.
pub type Resubscribe = Box<dyn Fn() -> ResubscribeFuture + Send + Sync>;

/// Watcher behaviour shared by all `watch_*` calls of a client.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Reopen closed subscriptions under this policy. `None` ends the watcher instead.
    pub resubscribe: RetryPolicy,
    /// Capacity of the channel created by [`OracleMarketsClient::event_stream`].
    ///
    /// [`OracleMarketsClient::event_stream`]: crate::client::OracleMarketsClient::event_stream
    pub channel_capacity: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            resubscribe: RetryPolicy::None,
            channel_capacity: 256,
        }
    }
}

// ─── WatchHandle ─────────────────────────────────────────────────────────────

/// Handle to a running watcher. Dropping it aborts the task.
#[derive(Debug)]
pub struct WatchHandle {
    event: &'static str,
    quit: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), WatchError>>>,
}

impl WatchHandle {
    /// Name of the watched event.
    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Signal the task to stop and wait for it.
    pub async fn unsubscribe(mut self) -> Result<(), WatchError> {
        if let Some(quit) = self.quit.take() {
            let _ = quit.send(());
        }
        self.wait().await
    }

    /// Wait for the task to terminate on its own and return how it ended.
    pub async fn join(mut self) -> Result<(), WatchError> {
        // Dropping the sender would read as a quit signal.
        let _quit = self.quit.take();
        self.wait().await
    }

    async fn wait(&mut self) -> Result<(), WatchError> {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(Err(WatchError::Aborted)),
            None => Ok(()),
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ─── EventStream ─────────────────────────────────────────────────────────────

pin_project! {
    /// A `Stream` of decoded events that owns its watcher.
    ///
    /// The stream ends when the watcher stops. Call [`EventStream::close`] to learn why.
    pub struct EventStream<E> {
        receiver: mpsc::Receiver<DecodedLog<E>>,
        handle: WatchHandle,
    }
}

impl<E> EventStream<E> {
    pub fn new(handle: WatchHandle, receiver: mpsc::Receiver<DecodedLog<E>>) -> Self {
        Self { receiver, handle }
    }

    pub fn handle(&self) -> &WatchHandle {
        &self.handle
    }

    /// Stop the watcher and return its termination result.
    pub async fn close(self) -> Result<(), WatchError> {
        self.handle.unsubscribe().await
    }
}

impl<E> Stream for EventStream<E> {
    type Item = DecodedLog<E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        this.receiver.poll_recv(cx)
    }
}

// ─── Task ────────────────────────────────────────────────────────────────────

enum Exit {
    Quit,
    SinkClosed,
    Failed(WatchError),
}

/// Spawn a watcher over `logs`.
///
/// `resubscribe` is consulted only when `policy` allows retries.
pub fn spawn_watcher<E>(
    logs: LogStream,
    sink: mpsc::Sender<DecodedLog<E>>,
    policy: RetryPolicy,
    resubscribe: Option<Resubscribe>,
) -> WatchHandle
where
    E: SolEvent + Send + 'static,
{
    let event = E::SIGNATURE;
    let (quit_tx, quit_rx) = oneshot::channel();
    let task = tokio::spawn(run::<E>(logs, sink, quit_rx, policy, resubscribe));
    tracing::info!(event, "Watcher started");
    WatchHandle {
        event,
        quit: Some(quit_tx),
        task: Some(task),
    }
}

async fn run<E>(
    mut logs: LogStream,
    sink: mpsc::Sender<DecodedLog<E>>,
    mut quit: oneshot::Receiver<()>,
    policy: RetryPolicy,
    resubscribe: Option<Resubscribe>,
) -> Result<(), WatchError>
where
    E: SolEvent + Send + 'static,
{
    let event = E::SIGNATURE;
    let retry = policy.config();
    let mut attempt = 0u32;

    loop {
        let err = match forward::<E>(&mut logs, &sink, &mut quit).await {
            Exit::Quit => {
                tracing::info!(event, "Watcher unsubscribed");
                return Ok(());
            }
            Exit::SinkClosed => {
                tracing::info!(event, "Watcher sink closed");
                return Ok(());
            }
            Exit::Failed(err) => err,
        };

        let can_retry = matches!(
            err,
            WatchError::SubscriptionClosed | WatchError::SubscribeFailed(_)
        );
        let (config, factory) = match (&retry, &resubscribe) {
            (Some(config), Some(factory)) if can_retry && attempt < config.max_retries => {
                (config, factory)
            }
            _ => {
                tracing::error!(event, error = %err, "Watcher failed");
                return Err(err);
            }
        };

        let delay = config.delay_for_attempt(attempt);
        attempt += 1;
        tracing::warn!(
            event,
            attempt,
            max = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Resubscribing"
        );
        tokio::select! {
            _ = &mut quit => return Ok(()),
            _ = tokio::time::sleep(delay) => {}
        }

        match factory().await {
            Ok(stream) => {
                logs = stream;
                attempt = 0;
                tracing::info!(event, "Watcher resubscribed");
            }
            Err(e) => {
                logs = Box::pin(futures_util::stream::once(async move { Err::<Log, _>(e) }));
            }
        }
    }
}

async fn forward<E>(
    logs: &mut LogStream,
    sink: &mpsc::Sender<DecodedLog<E>>,
    quit: &mut oneshot::Receiver<()>,
) -> Exit
where
    E: SolEvent + Send + 'static,
{
    loop {
        let log = tokio::select! {
            biased;
            _ = &mut *quit => return Exit::Quit,
            _ = sink.closed() => return Exit::SinkClosed,
            item = logs.next() => match item {
                Some(Ok(log)) => log,
                Some(Err(e)) => return Exit::Failed(e),
                None => return Exit::Failed(WatchError::SubscriptionClosed),
            },
        };

        let decoded = match decode_log::<E>(&log) {
            Ok(decoded) => decoded,
            Err(e) => {
                return Exit::Failed(WatchError::Decode {
                    event: E::SIGNATURE,
                    reason: e.to_string(),
                })
            }
        };

        tokio::select! {
            biased;
            _ = &mut *quit => return Exit::Quit,
            sent = sink.send(decoded) => {
                if sent.is_err() {
                    return Exit::SinkClosed;
                }
            }
        }
    }
}

/// Adapt an alloy pub/sub subscription into a [`LogStream`].
///
/// Lagged items are skipped with a warning; a closed channel yields `SubscriptionClosed`.
#[cfg(feature = "ws")]
pub fn subscription_stream(mut subscription: alloy::pubsub::Subscription<Log>) -> LogStream {
    use tokio::sync::broadcast::error::RecvError;

    Box::pin(async_stream::stream! {
        loop {
            match subscription.recv().await {
                Ok(log) => yield Ok(log),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Log subscription lagged, events dropped");
                }
                Err(RecvError::Closed) => {
                    yield Err(WatchError::SubscriptionClosed);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::abi::{IMarketFactory, IPoolMarket};
    use crate::rpc::retry::RetryConfig;
    use alloy::primitives::{Address, B256, U256};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    type StatusChanged = IMarketFactory::MarketStatusChanged;

    fn status_log(market: u64, new_status: u8) -> Log {
        let event = StatusChanged {
            marketId: U256::from(market),
            previousStatus: 0,
            newStatus: new_status,
        };
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0xfa),
                data: event.encode_log_data(),
            },
            block_number: Some(market),
            ..Default::default()
        }
    }

    fn finite(logs: Vec<Log>) -> LogStream {
        Box::pin(futures_util::stream::iter(logs.into_iter().map(Ok)))
    }

    fn endless(logs: Vec<Log>) -> LogStream {
        Box::pin(
            futures_util::stream::iter(logs.into_iter().map(Ok))
                .chain(futures_util::stream::pending()),
        )
    }

    #[tokio::test]
    async fn test_forwards_in_order_then_unsubscribes() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle = spawn_watcher::<StatusChanged>(
            endless(vec![status_log(1, 1), status_log(2, 4)]),
            tx,
            RetryPolicy::None,
            None,
        );
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.event.marketId, U256::from(1u8));
        assert_eq!(first.block_number, Some(1));
        assert_eq!(second.event.newStatus, 4);
        assert!(handle.is_running());
        assert_eq!(handle.event(), "MarketStatusChanged(uint256,uint8,uint8)");
        handle.unsubscribe().await.unwrap();
    }

    #[tokio::test]
    async fn test_stream_end_is_subscription_error() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle =
            spawn_watcher::<StatusChanged>(finite(vec![status_log(1, 1)]), tx, RetryPolicy::None, None);
        assert!(rx.recv().await.is_some());
        let err = handle.join().await.unwrap_err();
        assert!(matches!(err, WatchError::SubscriptionClosed));
    }

    #[tokio::test]
    async fn test_decode_failure_stops_watcher() {
        let swap = IPoolMarket::Swap {
            sender: Address::ZERO,
            recipient: Address::ZERO,
            amount0: Default::default(),
            amount1: Default::default(),
            sqrtPriceX96: Default::default(),
            liquidity: 0,
            tick: Default::default(),
        };
        let foreign = Log {
            inner: alloy::primitives::Log {
                address: Address::ZERO,
                data: swap.encode_log_data(),
            },
            ..Default::default()
        };
        let (tx, _rx) = mpsc::channel(8);
        let handle =
            spawn_watcher::<StatusChanged>(endless(vec![foreign]), tx, RetryPolicy::None, None);
        let err = handle.join().await.unwrap_err();
        assert!(matches!(err, WatchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_dropped_sink_ends_cleanly() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = spawn_watcher::<StatusChanged>(endless(vec![]), tx, RetryPolicy::None, None);
        handle.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_stream_error_propagates() {
        let (tx, _rx) = mpsc::channel(1);
        let logs: LogStream = Box::pin(futures_util::stream::iter(vec![Err::<Log, _>(
            WatchError::SubscribeFailed("node gone".into()),
        )]));
        let handle = spawn_watcher::<StatusChanged>(logs, tx, RetryPolicy::None, None);
        assert!(matches!(
            handle.join().await,
            Err(WatchError::SubscribeFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_resubscribes_after_close() {
        let opened = Arc::new(AtomicU32::new(0));
        let counter = opened.clone();
        let resubscribe: Resubscribe = Box::new(move || -> ResubscribeFuture {
            let n = counter.fetch_add(1, Ordering::SeqCst) as u64;
            Box::pin(async move { Ok(endless(vec![status_log(100 + n, 2)])) })
        });
        let policy = RetryPolicy::Custom(RetryConfig {
            max_retries: 2,
            initial_delay: Duration::from_millis(1),
            jitter: false,
            ..RetryConfig::default()
        });

        let (tx, mut rx) = mpsc::channel(8);
        let handle = spawn_watcher::<StatusChanged>(
            finite(vec![status_log(1, 1)]),
            tx,
            policy,
            Some(resubscribe),
        );
        assert_eq!(rx.recv().await.unwrap().event.marketId, U256::from(1u8));
        assert_eq!(rx.recv().await.unwrap().event.marketId, U256::from(100u8));
        assert_eq!(opened.load(Ordering::SeqCst), 1);
        handle.unsubscribe().await.unwrap();
    }

    #[tokio::test]
    async fn test_resubscribe_gives_up_after_max_retries() {
        let resubscribe: Resubscribe = Box::new(|| -> ResubscribeFuture {
            Box::pin(async { Err(WatchError::SubscribeFailed("refused".into())) })
        });
        let policy = RetryPolicy::Custom(RetryConfig {
            max_retries: 2,
            initial_delay: Duration::from_millis(1),
            jitter: false,
            ..RetryConfig::default()
        });
        let (tx, _rx) = mpsc::channel(8);
        let handle = spawn_watcher::<StatusChanged>(finite(vec![]), tx, policy, Some(resubscribe));
        assert!(matches!(
            handle.join().await,
            Err(WatchError::SubscribeFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_event_stream() {
        let (tx, rx) = mpsc::channel(8);
        let handle = spawn_watcher::<StatusChanged>(
            endless(vec![status_log(7, 5), status_log(8, 5)]),
            tx,
            RetryPolicy::None,
            None,
        );
        let mut stream = EventStream::new(handle, rx);
        let first = stream.next().await.unwrap();
        assert_eq!(first.event.marketId, U256::from(7u8));
        assert!(stream.handle().is_running());
        let second = stream.next().await.unwrap();
        assert_eq!(second.transaction_hash, None::<B256>);
        stream.close().await.unwrap();
    }
}
