//! Low-level JSON-RPC access: `RpcCaller`.
//!
//! Typed `eth_call`, transaction submission and log queries over an alloy `DynProvider`.
//! Reads run under the caller's [`RetryPolicy`]; transactions are submitted once.
//! Internal to the SDK. The sub-clients wrap this.

pub mod retry;

use std::future::Future;

use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes, TxKind, B256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::{Filter, Log, TransactionInput, TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;
use alloy::transports::TransportError;

use crate::error::{SdkError, SdkResult};
use retry::RetryPolicy;

/// Typed JSON-RPC caller shared by all sub-clients.
#[derive(Clone)]
pub struct RpcCaller {
    provider: DynProvider,
    signer_address: Option<Address>,
    read_retry: RetryPolicy,
    block: Option<BlockId>,
}

impl RpcCaller {
    /// Wrap a provider. `signer_address` must be set only when the provider carries a wallet.
    pub fn new(provider: DynProvider, signer_address: Option<Address>) -> Self {
        Self {
            provider,
            signer_address,
            read_retry: RetryPolicy::None,
            block: None,
        }
    }

    pub fn with_read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    /// A copy whose reads are pinned to `block`.
    pub fn at_block(&self, block: BlockId) -> Self {
        Self {
            block: Some(block),
            ..self.clone()
        }
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    pub fn read_retry(&self) -> &RetryPolicy {
        &self.read_retry
    }

    pub fn pinned_block(&self) -> Option<BlockId> {
        self.block
    }

    /// Signer address, or `MissingSigner` for read-only clients.
    pub fn require_signer(&self) -> SdkResult<Address> {
        self.signer_address.ok_or(SdkError::MissingSigner)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// `eth_call` a view function and decode its return value.
    pub async fn call<C: SolCall>(&self, to: Address, call: &C) -> SdkResult<C::Return> {
        let data = Bytes::from(call.abi_encode());
        let raw = self
            .with_retry(C::SIGNATURE, || {
                let tx = TransactionRequest {
                    to: Some(TxKind::Call(to)),
                    input: TransactionInput::new(data.clone()),
                    ..Default::default()
                };
                let request = self.provider.call(tx);
                let request = match self.block {
                    Some(block) => request.block(block),
                    None => request,
                };
                async move { request.await }
            })
            .await?;
        Ok(C::abi_decode_returns(&raw)?)
    }

    pub async fn get_logs(&self, filter: &Filter) -> SdkResult<Vec<Log>> {
        let logs = self
            .with_retry("eth_getLogs", || self.provider.get_logs(filter))
            .await?;
        tracing::debug!(count = logs.len(), "Fetched logs");
        Ok(logs)
    }

    pub async fn block_number(&self) -> SdkResult<u64> {
        Ok(self
            .with_retry("eth_blockNumber", || self.provider.get_block_number())
            .await?)
    }

    pub async fn chain_id(&self) -> SdkResult<u64> {
        Ok(self
            .with_retry("eth_chainId", || self.provider.get_chain_id())
            .await?)
    }

    /// Timestamp of the pinned block (or latest).
    pub async fn block_timestamp(&self) -> SdkResult<u64> {
        let block_id = self.block.unwrap_or_else(BlockId::latest);
        let block = self
            .with_retry("eth_getBlockByNumber", || async move {
                self.provider.get_block(block_id).await
            })
            .await?
            .ok_or_else(|| SdkError::Validation(format!("Block {} not found", block_id)))?;
        Ok(block.header.timestamp)
    }

    // ── Transactions ─────────────────────────────────────────────────────

    /// Submit a transaction through the wallet and return its hash without waiting.
    pub async fn send(&self, mut tx: TransactionRequest) -> SdkResult<B256> {
        let from = self.require_signer()?;
        tx.from = Some(from);
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(%tx_hash, %from, "Submitted transaction");
        Ok(tx_hash)
    }

    /// Submit a transaction and wait for a successful receipt.
    ///
    /// A mined-but-reverted transaction is returned as `TransactionReverted`.
    pub async fn send_and_confirm(
        &self,
        mut tx: TransactionRequest,
    ) -> SdkResult<TransactionReceipt> {
        let from = self.require_signer()?;
        tx.from = Some(from);
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(%tx_hash, %from, "Submitted transaction, awaiting receipt");
        let receipt = pending.get_receipt().await?;
        ensure_success(receipt)
    }

    // ── Subscriptions ────────────────────────────────────────────────────

    #[cfg(feature = "ws")]
    pub async fn subscribe_logs(
        &self,
        filter: &Filter,
    ) -> SdkResult<alloy::pubsub::Subscription<Log>> {
        let subscription = self.provider.subscribe_logs(filter).await?;
        tracing::debug!("Opened log subscription");
        Ok(subscription)
    }

    // ── Retry ────────────────────────────────────────────────────────────

    async fn with_retry<T, F, Fut>(&self, method: &str, mut op: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        tracing::debug!(method, "RPC request");
        let config = match self.read_retry.config() {
            None => return op().await,
            Some(config) => config,
        };

        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < config.max_retries && config.should_retry(&e) => {
                    let delay = config.delay_for_attempt(attempt);
                    tracing::warn!(
                        method,
                        attempt = attempt + 1,
                        max = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying RPC request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Reject a mined-but-reverted receipt.
fn ensure_success(receipt: TransactionReceipt) -> SdkResult<TransactionReceipt> {
    if !receipt.status() {
        tracing::warn!(tx_hash = %receipt.transaction_hash, "Transaction reverted");
        return Err(SdkError::TransactionReverted(receipt.transaction_hash));
    }
    Ok(receipt)
}

impl std::fmt::Debug for RpcCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcCaller")
            .field("signer_address", &self.signer_address)
            .field("read_retry", &self.read_retry)
            .field("block", &self.block)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{receipt, TX_HASH};
    use super::*;

    #[test]
    fn test_ensure_success_accepts_mined_receipt() {
        let mined = ensure_success(receipt(true, vec![])).unwrap();
        assert_eq!(mined.transaction_hash, TX_HASH);
    }

    #[test]
    fn test_ensure_success_rejects_reverted_receipt() {
        let err = ensure_success(receipt(false, vec![])).unwrap_err();
        assert!(matches!(err, SdkError::TransactionReverted(hash) if hash == TX_HASH));
    }
}
