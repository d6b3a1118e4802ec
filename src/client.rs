//! High-level client: `OracleMarketsClient` with nested sub-client accessors.
//!
//! Each contract has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.

use crate::config::Deployment;
use crate::domain::factory::client::Markets;
use crate::domain::factory::Market;
use crate::domain::oracle::client::Oracle;
use crate::domain::pool::client::Pool;
use crate::domain::resolution::client::Resolutions;
use crate::error::{ConfigError, SdkError, SdkResult};
use crate::events::WatchConfig;
use crate::rpc::retry::RetryPolicy;
use crate::rpc::RpcCaller;
use crate::shared::MarketId;

use alloy::eips::BlockId;
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use async_lock::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export sub-client types for convenience.
pub use crate::domain::factory::client::Markets as MarketsClient;
pub use crate::domain::oracle::client::Oracle as OracleClient;
pub use crate::domain::pool::client::Pool as PoolClient;
pub use crate::domain::resolution::client::Resolutions as ResolutionsClient;

/// Market cache: (factory, market id) → (Market, fetched_at)
pub(crate) type MarketCache = HashMap<(Address, MarketId), (Market, Instant)>;

/// The primary entry point of the SDK.
///
/// Provides nested sub-client accessors for each contract:
/// `client.oracle()`, `client.factory()`, `client.pool(amm)`, `client.resolution()`.
pub struct OracleMarketsClient {
    pub(crate) rpc: RpcCaller,
    pub(crate) deployment: Deployment,
    /// Local signer, when the provider carries its wallet
    pub(crate) signer: Option<PrivateKeySigner>,
    pub(crate) market_cache: Arc<RwLock<MarketCache>>,
    pub(crate) market_cache_ttl: Duration,
    pub(crate) watch_config: WatchConfig,
}

impl OracleMarketsClient {
    pub fn builder() -> OracleMarketsClientBuilder {
        OracleMarketsClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn oracle(&self) -> Oracle<'_> {
        self.oracle_at(self.deployment.oracle_adapter)
    }

    pub fn oracle_at(&self, address: Address) -> Oracle<'_> {
        Oracle {
            client: self,
            address,
        }
    }

    pub fn factory(&self) -> Markets<'_> {
        self.factory_at(self.deployment.market_factory)
    }

    pub fn factory_at(&self, address: Address) -> Markets<'_> {
        Markets {
            client: self,
            address,
        }
    }

    /// Pool sub-client for the market AMM at `amm`.
    pub fn pool(&self, amm: Address) -> Pool<'_> {
        Pool {
            client: self,
            address: amm,
        }
    }

    pub fn resolution(&self) -> Resolutions<'_> {
        self.resolution_at(self.deployment.resolution_module)
    }

    pub fn resolution_at(&self, address: Address) -> Resolutions<'_> {
        Resolutions {
            client: self,
            address,
        }
    }

    // ── State ────────────────────────────────────────────────────────────

    /// A client whose reads are pinned to `block`. Shares the caches of `self`; pinned
    /// market reads bypass them.
    pub fn at_block(&self, block: BlockId) -> Self {
        Self {
            rpc: self.rpc.at_block(block),
            ..self.clone()
        }
    }

    pub fn rpc(&self) -> &RpcCaller {
        &self.rpc
    }

    pub fn provider(&self) -> &DynProvider {
        self.rpc.provider()
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// Chain id of the configured deployment.
    pub fn chain_id(&self) -> u64 {
        self.deployment.chain_id
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.rpc.signer_address()
    }

    pub fn watch_config(&self) -> &WatchConfig {
        &self.watch_config
    }

    /// Subscribe to a custom filter and receive decoded `E` events as a stream.
    ///
    /// Build the filter with [`crate::events::event_filter`] and the helpers in
    /// [`crate::events::topics`].
    #[cfg(feature = "ws")]
    pub async fn event_stream<E>(
        &self,
        filter: alloy::rpc::types::Filter,
    ) -> SdkResult<crate::events::EventStream<E>>
    where
        E: alloy::sol_types::SolEvent + Send + 'static,
    {
        let (sink, receiver) = tokio::sync::mpsc::channel(self.watch_config.channel_capacity);
        let handle = crate::events::watch_logs(&self.rpc, filter, sink, &self.watch_config).await?;
        Ok(crate::events::EventStream::new(handle, receiver))
    }

    /// Clear all read caches.
    pub async fn clear_all_caches(&self) {
        self.market_cache.write().await.clear();
    }
}

impl Clone for OracleMarketsClient {
    fn clone(&self) -> Self {
        Self {
            rpc: self.rpc.clone(),
            deployment: self.deployment.clone(),
            signer: self.signer.clone(),
            market_cache: self.market_cache.clone(),
            market_cache_ttl: self.market_cache_ttl,
            watch_config: self.watch_config.clone(),
        }
    }
}

impl std::fmt::Debug for OracleMarketsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleMarketsClient")
            .field("deployment", &self.deployment)
            .field("signer", &self.signer_address())
            .field("market_cache_ttl", &self.market_cache_ttl)
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct OracleMarketsClientBuilder {
    rpc_url: Option<String>,
    deployment: Option<Deployment>,
    signer: Option<PrivateKeySigner>,
    read_retry: RetryPolicy,
    market_cache_ttl: Duration,
    watch_config: WatchConfig,
    check_chain_id: bool,
}

impl Default for OracleMarketsClientBuilder {
    fn default() -> Self {
        Self {
            rpc_url: None,
            deployment: None,
            signer: None,
            read_retry: RetryPolicy::None,
            market_cache_ttl: Duration::from_secs(60),
            watch_config: WatchConfig::default(),
            check_chain_id: true,
        }
    }
}

impl OracleMarketsClientBuilder {
    /// HTTP or WebSocket endpoint. `watch_*` needs a `ws://` / `wss://` URL.
    pub fn rpc_url(mut self, url: &str) -> Self {
        self.rpc_url = Some(url.to_string());
        self
    }

    pub fn deployment(mut self, deployment: Deployment) -> Self {
        self.deployment = Some(deployment);
        self
    }

    /// Enable transactions, signed locally with `signer`.
    pub fn signer(mut self, signer: PrivateKeySigner) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Enable transactions from a hex private key.
    pub fn private_key(self, key: &str) -> SdkResult<Self> {
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .map_err(|e: alloy::signers::local::LocalSignerError| {
                SdkError::Config(ConfigError::Invalid(format!("private key: {e}")))
            })?;
        Ok(self.signer(signer))
    }

    pub fn read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    pub fn market_cache_ttl(mut self, ttl: Duration) -> Self {
        self.market_cache_ttl = ttl;
        self
    }

    pub fn watch_config(mut self, config: WatchConfig) -> Self {
        self.watch_config = config;
        self
    }

    /// Compare the node's chain id with the deployment's on build (default `true`).
    pub fn check_chain_id(mut self, check: bool) -> Self {
        self.check_chain_id = check;
        self
    }

    /// Connect to the configured URL and build the client.
    pub async fn build(self) -> SdkResult<OracleMarketsClient> {
        let url = self.rpc_url.clone().ok_or(ConfigError::MissingRpcUrl)?;
        let provider = match &self.signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect(&url)
                .await?
                .erased(),
            None => ProviderBuilder::new().connect(&url).await?.erased(),
        };
        tracing::debug!(%url, signer = ?self.signer.as_ref().map(|s| s.address()), "Connected provider");
        self.build_with_provider(provider).await
    }

    /// Build over an existing provider (custom transports, mocks).
    ///
    /// When a signer is set, the provider must already carry the matching wallet.
    pub async fn build_with_provider(self, provider: DynProvider) -> SdkResult<OracleMarketsClient> {
        let deployment = self.deployment.ok_or(ConfigError::MissingDeployment)?;
        deployment.validate()?;

        let signer_address = self.signer.as_ref().map(|s| s.address());
        let rpc = RpcCaller::new(provider, signer_address).with_read_retry(self.read_retry);

        if self.check_chain_id {
            let chain_id = rpc.chain_id().await?;
            if chain_id != deployment.chain_id {
                return Err(ConfigError::Invalid(format!(
                    "node reports chain id {chain_id}, deployment is for {}",
                    deployment.chain_id
                ))
                .into());
            }
        }

        Ok(OracleMarketsClient {
            rpc,
            deployment,
            signer: self.signer,
            market_cache: Arc::new(RwLock::new(HashMap::new())),
            market_cache_ttl: self.market_cache_ttl,
            watch_config: self.watch_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = OracleMarketsClient::builder();
        assert!(builder.rpc_url.is_none());
        assert!(builder.check_chain_id);
        assert_eq!(builder.market_cache_ttl, Duration::from_secs(60));
        assert!(builder.read_retry.config().is_none());
    }

    #[test]
    fn test_builder_private_key() {
        let builder = OracleMarketsClient::builder()
            .private_key("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
            .unwrap();
        assert_eq!(
            builder.signer.unwrap().address(),
            alloy::primitives::address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        assert!(OracleMarketsClient::builder().private_key("not a key").is_err());
    }

    #[tokio::test]
    async fn test_build_requires_rpc_url() {
        let err = OracleMarketsClient::builder().build().await.unwrap_err();
        assert!(matches!(err, SdkError::Config(ConfigError::MissingRpcUrl)));
    }
}
